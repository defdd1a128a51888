use crate::core::{Difficulty, DifficultySource};
use crate::error::{BlockchainError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const DIFFICULTY_KEY: &str = "DIFFICULTY";
const DATA_DIR_KEY: &str = "DATA_DIR";

/// Raw settings as written in the TOML file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_chain_file")]
    pub chain_file: String,
    #[serde(default = "default_mempool_file")]
    pub mempool_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            difficulty: default_difficulty(),
            data_dir: default_data_dir(),
            chain_file: default_chain_file(),
            mempool_file: default_mempool_file(),
        }
    }
}

fn default_difficulty() -> u32 {
    Difficulty::default().leading_zero_bytes() as u32
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_chain_file() -> String {
    "blockchain.bin".to_string()
}

fn default_mempool_file() -> String {
    "mempool.bin".to_string()
}

impl Settings {
    /// Parse settings from TOML text; missing keys take their defaults
    pub fn from_toml(text: &str) -> Result<Settings> {
        Ok(toml::from_str(text)?)
    }

    /// Apply `DIFFICULTY` and `DATA_DIR` as returned by `lookup`
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(DIFFICULTY_KEY) {
            self.difficulty = value.trim().parse().map_err(|e| {
                BlockchainError::Config(format!("{DIFFICULTY_KEY}={value} is not a number: {e}"))
            })?;
        }
        if let Some(dir) = lookup(DATA_DIR_KEY) {
            self.data_dir = dir;
        }
        Ok(())
    }
}

/// Validated node configuration.
///
/// The difficulty can be replaced at runtime by its owner; readers take one
/// snapshot per check through `DifficultySource`.
#[derive(Debug)]
pub struct Config {
    difficulty: RwLock<Difficulty>,
    data_dir: PathBuf,
    chain_file: String,
    mempool_file: String,
}

impl Config {
    pub fn from_settings(settings: Settings) -> Result<Config> {
        let difficulty = Difficulty::new(settings.difficulty)?;
        if settings.chain_file.is_empty() || settings.mempool_file.is_empty() {
            return Err(BlockchainError::Config(
                "chain_file and mempool_file must not be empty".to_string(),
            ));
        }
        Ok(Config {
            difficulty: RwLock::new(difficulty),
            data_dir: PathBuf::from(settings.data_dir),
            chain_file: settings.chain_file,
            mempool_file: settings.mempool_file,
        })
    }

    /// Loads the TOML file when given (a missing file is an error), then
    /// applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        Self::load_with(path, |key| env::var(key).ok())
    }

    fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    BlockchainError::Config(format!("Cannot read {}: {e}", path.display()))
                })?;
                Settings::from_toml(&text)?
            }
            None => Settings::default(),
        };
        settings.apply_overrides(lookup)?;
        Self::from_settings(settings)
    }

    pub fn get_difficulty(&self) -> Difficulty {
        match self.difficulty.read() {
            Ok(difficulty) => *difficulty,
            // The lock only guards a Copy value, a poisoned guard still holds a valid one
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn set_difficulty(&self, difficulty: Difficulty) {
        match self.difficulty.write() {
            Ok(mut guard) => *guard = difficulty,
            Err(poisoned) => *poisoned.into_inner() = difficulty,
        }
    }

    pub fn get_data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn chain_path(&self) -> PathBuf {
        self.data_dir.join(&self.chain_file)
    }

    pub fn mempool_path(&self) -> PathBuf {
        self.data_dir.join(&self.mempool_file)
    }
}

impl DifficultySource for Config {
    fn current_difficulty(&self) -> Difficulty {
        self.get_difficulty()
    }
}
