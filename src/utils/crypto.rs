use ring::digest::{Context, SHA256};

use crate::error::{BlockchainError, Result};
use std::time::{SystemTime, UNIX_EPOCH};

/// Width of every digest in the system
pub const DIGEST_LEN: usize = 32;

/// Output of the hashing capability
pub type Digest = [u8; DIGEST_LEN];

/// Hashing capability used for transaction ids, block ids, the transaction
/// root and the proof-of-work check.
///
/// Implementations must be deterministic. Swapping the implementation changes
/// every id in the system, so one hasher should be used consistently.
pub trait ContentHasher: Send + Sync {
    fn digest(&self, bytes: &[u8]) -> Digest;
}

/// Default hasher: single SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest(&self, bytes: &[u8]) -> Digest {
        sha256_digest(bytes)
    }
}

impl<H: ContentHasher + ?Sized> ContentHasher for &H {
    fn digest(&self, bytes: &[u8]) -> Digest {
        (**self).digest(bytes)
    }
}

pub fn current_timestamp() -> Result<i64> {
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BlockchainError::Io(format!("System time error: {e}")))?
        .as_millis();

    // Ensure the timestamp fits in i64
    if duration > i64::MAX as u128 {
        return Err(BlockchainError::Io("Timestamp overflow".to_string()));
    }

    Ok(duration as i64)
}

pub fn sha256_digest(data: &[u8]) -> Digest {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();

    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(digest.as_ref());
    out
}
