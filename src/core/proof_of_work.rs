use crate::core::{Block, Difficulty, DifficultySource};
use crate::error::Result;
use crate::utils::{ContentHasher, Digest, Sha256Hasher};
use data_encoding::HEXLOWER;
use log::debug;
use num_bigint::BigUint;

/// Proof-of-work predicate over block headers.
///
/// A header is valid at difficulty `d` when the first `d` bytes of its digest
/// are zero. The check is pure; searching for a nonce is left to callers.
#[derive(Debug, Clone, Default)]
pub struct ProofOfWork<H = Sha256Hasher> {
    hasher: H,
}

impl ProofOfWork<Sha256Hasher> {
    pub fn new_proof_of_work() -> ProofOfWork<Sha256Hasher> {
        ProofOfWork {
            hasher: Sha256Hasher,
        }
    }
}

impl<H: ContentHasher> ProofOfWork<H> {
    pub fn with_hasher(hasher: H) -> ProofOfWork<H> {
        ProofOfWork { hasher }
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn is_valid_proof(&self, header_bytes: &[u8], difficulty: Difficulty) -> bool {
        let digest = self.hasher.digest(header_bytes);
        let valid = has_leading_zero_bytes(&digest, difficulty);
        debug!(
            "Proof of work at difficulty {difficulty}: {} -> {}",
            HEXLOWER.encode(&digest),
            if valid { "valid" } else { "invalid" }
        );
        valid
    }

    /// Same predicate for a raw difficulty value, failing loudly when it is
    /// out of range.
    pub fn check(&self, header_bytes: &[u8], difficulty: u32) -> Result<bool> {
        let difficulty = Difficulty::new(difficulty)?;
        Ok(self.is_valid_proof(header_bytes, difficulty))
    }

    /// Validate proof-of-work for a block
    pub fn validate(&self, block: &Block, difficulty: Difficulty) -> bool {
        self.is_valid_proof(&block.header_bytes(), difficulty)
    }

    /// Validate against the source's current difficulty, read exactly once
    pub fn validate_with_source<S: DifficultySource + ?Sized>(
        &self,
        block: &Block,
        source: &S,
    ) -> bool {
        let difficulty = source.current_difficulty();
        self.validate(block, difficulty)
    }
}

/// Checks that the first `leading_zero_bytes` bytes of `digest` are zero
pub fn has_leading_zero_bytes(digest: &Digest, difficulty: Difficulty) -> bool {
    digest[..difficulty.leading_zero_bytes()]
        .iter()
        .all(|byte| *byte == 0)
}

/// Integer-target form of the same predicate
pub fn meets_target(digest: &Digest, difficulty: Difficulty) -> bool {
    BigUint::from_bytes_be(digest) < difficulty.target()
}

/// Proof-of-work check with the default SHA-256 hasher
pub fn is_valid_proof(header_bytes: &[u8], difficulty: u32) -> Result<bool> {
    ProofOfWork::new_proof_of_work().check(header_bytes, difficulty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockchainError;
    use crate::testnet::{sample_block, ConstantHasher};

    fn difficulty(d: u32) -> Difficulty {
        Difficulty::new(d).unwrap()
    }

    #[test]
    fn test_difficulty_zero_always_valid() {
        let pow = ProofOfWork::with_hasher(ConstantHasher([0xff; 32]));
        assert!(pow.is_valid_proof(b"anything", difficulty(0)));
        assert!(is_valid_proof(b"anything at all", 0).unwrap());
        assert!(is_valid_proof(&[], 0).unwrap());
    }

    #[test]
    fn test_difficulty_32_needs_all_zero_digest() {
        let zero = ProofOfWork::with_hasher(ConstantHasher([0u8; 32]));
        assert!(zero.is_valid_proof(b"header", difficulty(32)));

        let mut almost = [0u8; 32];
        almost[31] = 1;
        let almost = ProofOfWork::with_hasher(ConstantHasher(almost));
        assert!(!almost.is_valid_proof(b"header", difficulty(32)));
        assert!(almost.is_valid_proof(b"header", difficulty(31)));
    }

    #[test]
    fn test_exact_threshold() {
        let mut digest = [0xabu8; 32];
        digest[..3].copy_from_slice(&[0, 0, 0]);
        let pow = ProofOfWork::with_hasher(ConstantHasher(digest));
        assert!(pow.is_valid_proof(b"h", difficulty(3)));
        assert!(!pow.is_valid_proof(b"h", difficulty(4)));
    }

    #[test]
    fn test_monotonic_in_difficulty() {
        let mut digest = [0x55u8; 32];
        digest[..5].fill(0);
        let pow = ProofOfWork::with_hasher(ConstantHasher(digest));
        for d in 0..=5 {
            assert!(pow.is_valid_proof(b"h", difficulty(d)));
        }
        for d in 6..=32 {
            assert!(!pow.is_valid_proof(b"h", difficulty(d)));
        }
    }

    #[test]
    fn test_invalid_difficulty_is_an_error() {
        let err = is_valid_proof(b"header", 33).unwrap_err();
        assert!(matches!(err, BlockchainError::InvalidDifficulty(33)));
    }

    #[test]
    fn test_target_form_agrees_with_zero_bytes() {
        let digests = [
            [0u8; 32],
            [0xffu8; 32],
            {
                let mut d = [0xffu8; 32];
                d[..2].fill(0);
                d
            },
            {
                let mut d = [0u8; 32];
                d[4] = 1;
                d
            },
            crate::utils::sha256_digest(b"target"),
        ];
        for digest in digests.iter() {
            for d in 0..=32 {
                assert_eq!(
                    has_leading_zero_bytes(digest, difficulty(d)),
                    meets_target(digest, difficulty(d)),
                    "digest {} at difficulty {d}",
                    HEXLOWER.encode(digest)
                );
            }
        }
    }

    #[test]
    fn test_validate_uses_header_bytes() {
        let block = sample_block(&[(1, 1, 0)]);
        let pow = ProofOfWork::new_proof_of_work();
        let d = difficulty(1);
        assert_eq!(
            pow.validate(&block, d),
            block.id()[0] == 0
        );
    }

    #[test]
    fn test_sequential_nonce_search_finds_valid_header() {
        // A miner would run this search; here it only exercises the predicate
        let mut block = sample_block(&[(1, 1, 0)]);
        let pow = ProofOfWork::new_proof_of_work();
        let d = difficulty(1);
        let nonce = (0..i64::MAX)
            .find(|nonce| pow.is_valid_proof(&block.header_bytes_with_nonce(*nonce), d))
            .unwrap();
        block.set_nonce(nonce);
        assert!(pow.validate(&block, d));
        assert_eq!(block.id()[0], 0);
    }

    #[test]
    fn test_validate_with_source_reads_current_value() {
        let pow = ProofOfWork::with_hasher(ConstantHasher({
            let mut d = [1u8; 32];
            d[0] = 0;
            d
        }));
        let block = sample_block(&[]);
        let shared = crate::core::SharedDifficulty::new(difficulty(1));
        assert!(pow.validate_with_source(&block, &shared));
        shared.set(difficulty(2));
        assert!(!pow.validate_with_source(&block, &shared));
    }
}
