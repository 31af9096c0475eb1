// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Construction-time configuration
//!
//! All sections default sensibly and can be loaded from TOML:
//!
//! ```toml
//! [identity]
//! name = "notes"
//!
//! [log]
//! max_batch = 256
//!
//! [view]
//! view_name = "notes-index"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which storage region a log lives in: `(kind, name)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub name: String,
    /// View type tag such as `feed<json>`; filled in by the view when empty
    pub kind: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            kind: String::new(),
        }
    }
}

impl Identity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Region name: `__<kind>__<name>__`
    pub fn storage_name(&self) -> String {
        format!("__{}__{}__", self.kind, self.name)
    }
}

/// Apply-loop tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Maximum nodes pulled from the substrate per read
    pub max_batch: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { max_batch: 1024 }
    }
}

/// Materialized view options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Defaults to `<name>-view`
    pub view_name: Option<String>,
    /// Whether the substrate may attach its replication extension to the view
    pub extension: Option<bool>,
}

impl ViewConfig {
    pub fn view_name(&self, identity: &Identity) -> String {
        self.view_name
            .clone()
            .unwrap_or_else(|| format!("{}-view", identity.name))
    }

    pub fn extension(&self) -> bool {
        self.extension.unwrap_or(true)
    }
}

/// Full configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BraidConfig {
    pub identity: Identity,
    pub log: LogConfig,
    pub view: ViewConfig,
}

impl BraidConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.identity.name.is_empty() {
            return Err(ConfigError::Invalid("identity.name is empty".to_string()));
        }
        if self.log.max_batch == 0 {
            return Err(ConfigError::Invalid("log.max_batch must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
