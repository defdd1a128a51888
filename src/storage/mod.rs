//! Data storage and persistence
//!
//! Flat chain and mempool files, and the unspent output set derived from a
//! chain.

pub mod chain_file;
pub mod utxo_set;

pub use chain_file::{
    append_to_mempool, load_chain, load_mempool, load_valid_chain, save_chain, save_mempool,
};
pub use utxo_set::UTXOSet;
