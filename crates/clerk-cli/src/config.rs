use std::fs;
use std::path::Path;

use anyhow::Context;
use clerk_keeper::ChainParams;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// `clerk` configuration, read from TOML.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClerkConfig {
    pub log_level: String,
    pub params: ChainParams,
}

impl Default for ClerkConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            params: ChainParams::default(),
        }
    }
}

impl ClerkConfig {
    /// Load from `path`, or fall back to defaults when no file is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn level(&self) -> anyhow::Result<Level> {
        self.log_level
            .parse()
            .with_context(|| format!("invalid log level {:?}", self.log_level))
    }
}
