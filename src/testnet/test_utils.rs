//! Test utilities for codec and validation testing

use crate::core::{Block, Difficulty, ProofOfWork, Transaction, TxIn, TxOut, TxSig};
use crate::core::{SCRIPT_LEN, SIGNATURE_LEN};
use crate::utils::{ContentHasher, Digest};
use rand::Rng;
use tempfile::TempDir;

/// Hasher that ignores its input, for proof-of-work boundary tests
#[derive(Debug, Clone, Copy)]
pub struct ConstantHasher(pub Digest);

impl ContentHasher for ConstantHasher {
    fn digest(&self, _bytes: &[u8]) -> Digest {
        self.0
    }
}

/// Create a temporary directory for file-backed tests
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("temporary directory should be creatable")
}

pub fn sample_signature(seed: u8) -> TxSig {
    let mut scr = [0u8; SCRIPT_LEN];
    for (i, byte) in scr.iter_mut().enumerate() {
        *byte = seed.wrapping_add(i as u8);
    }
    TxSig::new(scr, [seed; SIGNATURE_LEN])
}

/// Deterministic transaction with the given group sizes. Different sizes
/// always give different transactions.
pub fn sample_transaction(inputs: usize, outputs: usize, signatures: usize) -> Transaction {
    let time = (inputs * 1_000_000 + outputs * 1_000 + signatures) as i64;
    let inputs = (0..inputs)
        .map(|i| TxIn::new([i as u8 + 1; 32], i as u16))
        .collect();
    let outputs = (0..outputs)
        .map(|i| TxOut::new([i as u8 + 0x10; 8], 1.5 * (i + 1) as f32))
        .collect();
    let signatures = (0..signatures)
        .map(|i| sample_signature(i as u8))
        .collect();
    Transaction::new(time, inputs, outputs, signatures).expect("sample counts fit in u16")
}

/// Block on a fixed parent holding one sample transaction per shape
pub fn sample_block(shapes: &[(usize, usize, usize)]) -> Block {
    let transactions = shapes
        .iter()
        .map(|(i, o, s)| sample_transaction(*i, *o, *s))
        .collect();
    Block::new_block([0x42; 32], transactions, 1_700_000_000_000).expect("sample block fits")
}

/// Random transaction for property-style tests
pub fn random_transaction<R: Rng>(rng: &mut R) -> Transaction {
    let inputs = (0..rng.gen_range(0..4))
        .map(|_| TxIn::new(rng.gen(), rng.gen()))
        .collect();
    let outputs = (0..rng.gen_range(0..4))
        .map(|_| TxOut::new(rng.gen(), f32::from_bits(rng.gen())))
        .collect();
    let signatures = (0..rng.gen_range(0..3))
        .map(|_| {
            let mut scr = [0u8; SCRIPT_LEN];
            rng.fill(&mut scr[..]);
            TxSig::new(scr, rng.gen())
        })
        .collect();
    Transaction::new(rng.gen(), inputs, outputs, signatures).expect("random counts fit in u16")
}

pub fn random_block<R: Rng>(rng: &mut R) -> Block {
    let transactions = (0..rng.gen_range(0..5))
        .map(|_| random_transaction(&mut *rng))
        .collect();
    let mut block =
        Block::new_block(rng.gen(), transactions, rng.gen()).expect("random block fits");
    block.set_nonce(rng.gen());
    block
}

/// Sequential nonce search so tests can build blocks that pass validation
pub fn mine_block(mut block: Block, difficulty: Difficulty) -> Block {
    let pow = ProofOfWork::new_proof_of_work();
    let nonce = (0..i64::MAX)
        .find(|nonce| pow.is_valid_proof(&block.header_bytes_with_nonce(*nonce), difficulty))
        .expect("a nonce exists at test difficulty");
    block.set_nonce(nonce);
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_transactions_differ_by_shape() {
        assert_ne!(sample_transaction(1, 1, 0), sample_transaction(2, 1, 0));
        assert_ne!(sample_transaction(1, 1, 0).id(), sample_transaction(1, 2, 0).id());
    }

    #[test]
    fn test_mine_block_meets_difficulty() {
        let d = Difficulty::new(1).unwrap();
        let block = mine_block(sample_block(&[(1, 1, 0)]), d);
        assert!(ProofOfWork::new_proof_of_work().validate(&block, d));
    }
}
