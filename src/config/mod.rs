//! Configuration management
//!
//! Difficulty and data file locations, read from an optional TOML file and
//! overridden from the environment.

pub mod settings;

pub use settings::{Config, Settings};
