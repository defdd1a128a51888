//! Test fixtures
//!
//! Sample and random records, a constant hasher for proof-of-work edge
//! cases, and a tiny nonce search so tests can build valid chains.

pub mod test_utils;

pub use test_utils::*;
