//! Configuration file loading for the command-line bot.
//!
//! Settings are read from `treechess.toml` in the working directory when it
//! exists. Every key is optional, and command-line flags take precedence over
//! anything read from the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use treechess_engine::{StalematePolicy, StrategyKind};

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The search depth must be at least one ply.
    #[error("Invalid depth: {0}")]
    InvalidDepth(u32),
}

/// Bot settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BotConfig {
    /// Search strategy, `naive` or `alpha-beta`.
    pub strategy: StrategyKind,
    /// Search depth in plies.
    pub depth: u32,
    /// How stalemate is scored, `draw` or `loss`.
    pub stalemate: StalematePolicy,
    /// Self-play stops after this many plies.
    pub max_plies: u32,
    /// Position used when no FEN is given on the command line.
    pub start_fen: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            strategy: StrategyKind::AlphaBeta,
            depth: 3,
            stalemate: StalematePolicy::Draw,
            max_plies: 200,
            start_fen: None,
        }
    }
}

impl BotConfig {
    /// Loads the configuration from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML for these settings,
    /// or [`ConfigError::InvalidDepth`] for a depth of zero.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: BotConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::InvalidDepth(self.depth));
        }
        Ok(())
    }

    /// Default location of the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("treechess.toml")
    }
}
