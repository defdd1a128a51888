//! # Chain Codec - canonical block and transaction format
//!
//! Byte-exact encoding and decoding of blocks and transactions, the
//! transaction root that commits a block to its body, and the proof-of-work
//! predicate every accepted block has to satisfy.
//!
//! ## Wire format
//! Every integer is big-endian, `amt` is an IEEE-754 `f32`, and every `*_c`
//! field is an unsigned 16-bit count of the records that follow it.
//!
//! ```text
//! Block  := prev_id[32] tx_root[32] time[8] nonce[8] tx_c[2] Tx{tx_c}
//! Tx     := time[8] in_c[2] TxIn{in_c} out_c[2] TxOut{out_c} sig_c[2] TxSig{sig_c}
//! TxIn   := tx_id[32] out_i[2]
//! TxOut  := addr[8] amt[4]
//! TxSig  := scr[526] sig[32]
//! ```
//!
//! ## Hashing conventions
//! - `tx_id` is the digest of the whole encoded transaction
//! - a block id is the digest of its first 80 bytes (the header, without
//!   `tx_c` and the body); proof of work hashes the same bytes
//! - `tx_root` is a pairwise Merkle root over the transaction ids
//!
//! ## How the code is organized
//! - `core/`: record codec, transaction root, difficulty, proof of work, chain container
//! - `storage/`: flat chain and mempool files, unspent output set
//! - `config/`: difficulty and file locations
//! - `utils/`: hashing capability and JSON export
//! - `cli/`: command-line interface for inspecting and verifying data files

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, Settings};
pub use core::{
    compute_tx_root, decode_block, decode_block_stream, decode_tx, decode_tx_stream,
    encode_block, encode_tx, is_valid_proof, Block, Chain, Difficulty, DifficultySource,
    ProofOfWork, Transaction, Tx, TxIn, TxOut, TxSig, EMPTY_TX_ROOT,
};
pub use error::{BlockchainError, CodecError, Result};
pub use storage::UTXOSet;
pub use utils::{sha256_digest, ContentHasher, Digest, Sha256Hasher};
