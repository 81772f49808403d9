use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OracleError, Result};

/// Phrases offered as one-click examples on the page.
pub const DEFAULT_EXAMPLES: [&str; 5] = [
    "To be or not to",
    "What art thou that",
    "The King that's dead",
    "By Heaven I charge thee",
    "Looke where it comes",
];

/// Names drifting across the page background.
pub const DEFAULT_FLOATING_WORDS: [&str; 6] = ["Hamlet", "Ghost", "King", "Horatio", "Marcellus", "Barnardo"];

/// Server configuration
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub bind: String,
    pub model_path: PathBuf,
    pub vocab_path: PathBuf,
    pub workers: usize,
    pub top_k: usize,
    pub title: String,
    pub examples: Vec<String>,
    pub floating_words: Vec<String>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        OracleConfig {
            bind: "127.0.0.1:8501".to_string(),
            model_path: PathBuf::from("next_word_lstm.bin"),
            vocab_path: PathBuf::from("word_index.json"),
            workers: 1,
            top_k: 3,
            title: "The Hamlet Oracle".to_string(),
            examples: DEFAULT_EXAMPLES.iter().map(|s| s.to_string()).collect(),
            floating_words: DEFAULT_FLOATING_WORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl OracleConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: OracleConfig = serde_json::from_str(json)
            .map_err(|e| OracleError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(OracleError::ConfigError("workers must be at least 1".to_string()));
        }
        if self.bind.trim().is_empty() {
            return Err(OracleError::ConfigError("bind address is empty".to_string()));
        }
        Ok(())
    }
}
