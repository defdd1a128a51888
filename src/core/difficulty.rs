use crate::error::{BlockchainError, Result};
use crate::utils::DIGEST_LEN;
use num_bigint::BigUint;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Two leading zero bytes, the difficulty stored chains are mined at
const DEFAULT_DIFFICULTY: u8 = 2;

/// Number of leading zero bytes a block id needs, always within `0..=32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: Difficulty = Difficulty(0);
    pub const MAX: Difficulty = Difficulty(DIGEST_LEN as u8);

    pub fn new(leading_zero_bytes: u32) -> Result<Difficulty> {
        if leading_zero_bytes > DIGEST_LEN as u32 {
            return Err(BlockchainError::InvalidDifficulty(leading_zero_bytes));
        }
        Ok(Difficulty(leading_zero_bytes as u8))
    }

    pub fn leading_zero_bytes(&self) -> usize {
        self.0 as usize
    }

    /// Bytes of the digest left unconstrained
    pub fn full_bytes(&self) -> usize {
        DIGEST_LEN - self.leading_zero_bytes()
    }

    /// Integer form of the threshold: `2^(8 * full_bytes)`.
    ///
    /// A digest read as a big-endian integer is below the target exactly
    /// when its first `leading_zero_bytes` bytes are zero.
    pub fn target(&self) -> BigUint {
        BigUint::from(1u8) << (8 * self.full_bytes())
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(DEFAULT_DIFFICULTY)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Difficulty {
    type Error = BlockchainError;

    fn try_from(value: u32) -> Result<Self> {
        Difficulty::new(value)
    }
}

/// Whoever owns the network's current difficulty.
///
/// Validators call `current_difficulty` once per check and use that value for
/// the whole comparison.
pub trait DifficultySource {
    fn current_difficulty(&self) -> Difficulty;
}

impl DifficultySource for Difficulty {
    fn current_difficulty(&self) -> Difficulty {
        *self
    }
}

/// Difficulty that another thread may adjust while validators are running
#[derive(Debug)]
pub struct SharedDifficulty {
    inner: AtomicU8,
}

impl SharedDifficulty {
    pub fn new(difficulty: Difficulty) -> SharedDifficulty {
        SharedDifficulty {
            inner: AtomicU8::new(difficulty.0),
        }
    }

    pub fn set(&self, difficulty: Difficulty) {
        self.inner.store(difficulty.0, Ordering::Release);
    }
}

impl DifficultySource for SharedDifficulty {
    fn current_difficulty(&self) -> Difficulty {
        // Only values that passed Difficulty::new are ever stored
        Difficulty(self.inner.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_range() {
        assert_eq!(Difficulty::new(0).unwrap(), Difficulty::MIN);
        assert_eq!(Difficulty::new(32).unwrap(), Difficulty::MAX);
        assert!(matches!(
            Difficulty::new(33),
            Err(BlockchainError::InvalidDifficulty(33))
        ));
        assert!(Difficulty::try_from(u32::MAX).is_err());
    }

    #[test]
    fn test_full_bytes_complement() {
        for d in 0..=32 {
            let difficulty = Difficulty::new(d).unwrap();
            assert_eq!(difficulty.leading_zero_bytes() + difficulty.full_bytes(), 32);
        }
    }

    #[test]
    fn test_target_shrinks_with_difficulty() {
        let easy = Difficulty::new(1).unwrap();
        let hard = Difficulty::new(2).unwrap();
        assert!(hard.target() < easy.target());
        assert_eq!(Difficulty::MAX.target(), BigUint::from(1u8));
    }

    #[test]
    fn test_default_difficulty() {
        assert_eq!(Difficulty::default().leading_zero_bytes(), 2);
    }

    #[test]
    fn test_shared_difficulty_updates() {
        let shared = SharedDifficulty::new(Difficulty::new(1).unwrap());
        assert_eq!(shared.current_difficulty().leading_zero_bytes(), 1);
        shared.set(Difficulty::new(4).unwrap());
        assert_eq!(shared.current_difficulty().leading_zero_bytes(), 4);
    }
}
