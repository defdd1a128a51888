//! Utility functions and helpers
//!
//! This module contains the hashing capability, timestamps and the JSON
//! export of records.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    current_timestamp, sha256_digest, ContentHasher, Digest, Sha256Hasher, DIGEST_LEN,
};

pub use serialization::{block_to_json, parse_address, parse_hex, to_json_string, tx_to_json};
