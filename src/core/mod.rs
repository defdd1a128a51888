//! Core record formats and consensus checks
//!
//! This module contains the binary codec for blocks and transactions, the
//! transaction-root aggregation, the proof-of-work predicate and the chain
//! container built from them.

pub mod block;
pub mod chain;
pub mod codec;
pub mod difficulty;
pub mod merkle;
pub mod proof_of_work;
pub mod transaction;

pub use block::{
    decode_block, decode_block_stream, encode_block, Block, BLOCK_MIN_LEN, GENESIS_PREV_ID,
    HEADER_LEN,
};
pub use chain::Chain;
pub use codec::{Decode, Encode, Reader, MAX_COUNT};
pub use difficulty::{Difficulty, DifficultySource, SharedDifficulty};
pub use merkle::{compute_tx_root, compute_tx_root_with, MerkleTree, EMPTY_TX_ROOT};
pub use proof_of_work::{has_leading_zero_bytes, is_valid_proof, meets_target, ProofOfWork};
pub use transaction::{
    decode_tx, decode_tx_stream, encode_tx, Address, OutPoint, Transaction, Tx, TxIn, TxOut,
    TxSig, ADDRESS_LEN, COINBASE_REWARD, SCRIPT_LEN, SIGNATURE_LEN, TX_IN_LEN, TX_MIN_LEN,
    TX_OUT_LEN, TX_SIG_LEN,
};
