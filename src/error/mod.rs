//! Error handling for the chain codec
//!
//! Two layers: `CodecError` for anything that goes wrong while turning bytes
//! into records, and `BlockchainError` for everything above the codec.

use std::fmt;

/// Result type alias for blockchain operations
pub type Result<T> = std::result::Result<T, BlockchainError>;

/// Errors produced by the binary record codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Fewer bytes remain than a field or a declared count requires
    TruncatedInput { needed: usize, remaining: usize },
    /// Bytes are left over after a complete top-level record
    TrailingData { remaining: usize },
    /// A repeated group is too large for its 16-bit count or for the address space
    CountOverflow { count: usize, width: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::TruncatedInput { needed, remaining } => {
                write!(
                    f,
                    "Truncated input: needed {needed} bytes, {remaining} remaining"
                )
            }
            CodecError::TrailingData { remaining } => {
                write!(f, "Trailing data: {remaining} bytes after record")
            }
            CodecError::CountOverflow { count, width } => {
                write!(
                    f,
                    "Count overflow: {count} records of {width} bytes cannot be represented"
                )
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// Error types for everything built on top of the codec
#[derive(Debug, Clone)]
pub enum BlockchainError {
    /// Malformed binary input
    Codec(CodecError),
    /// Difficulty outside 0..=32 leading zero bytes
    InvalidDifficulty(u32),
    /// Block construction or validation errors
    InvalidBlock(String),
    /// Chain linkage, root or proof-of-work failures
    InvalidChain(String),
    /// Configuration errors
    Config(String),
    /// JSON export errors
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Invalid address format
    InvalidAddress(String),
}

impl fmt::Display for BlockchainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockchainError::Codec(err) => write!(f, "Codec error: {err}"),
            BlockchainError::InvalidDifficulty(d) => {
                write!(f, "Invalid difficulty: {d} (expected 0..=32 leading zero bytes)")
            }
            BlockchainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            BlockchainError::InvalidChain(msg) => write!(f, "Invalid chain: {msg}"),
            BlockchainError::Config(msg) => write!(f, "Configuration error: {msg}"),
            BlockchainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            BlockchainError::Io(msg) => write!(f, "I/O error: {msg}"),
            BlockchainError::InvalidAddress(addr) => write!(f, "Invalid address: {addr}"),
        }
    }
}

impl std::error::Error for BlockchainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlockchainError::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for BlockchainError {
    fn from(err: CodecError) -> Self {
        BlockchainError::Codec(err)
    }
}

impl From<std::io::Error> for BlockchainError {
    fn from(err: std::io::Error) -> Self {
        BlockchainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BlockchainError {
    fn from(err: serde_json::Error) -> Self {
        BlockchainError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BlockchainError {
    fn from(err: toml::de::Error) -> Self {
        BlockchainError::Config(err.to_string())
    }
}
