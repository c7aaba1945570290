//! # Configuration
//!
//! Settings read from a TOML file. Every field is optional; missing fields
//! take their defaults and unknown fields are rejected.
//!
//! ```toml
//! key_size = 32            # 16, 24 or 32
//! associated_data = ""     # bound into every envelope
//! verbose_logging = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::KeySize;
use crate::error::{Error, Result};

/// Configuration for Strongbox tools
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Size of newly generated symmetric keys
    pub key_size: KeySize,
    /// Associated data used when none is given explicitly
    pub associated_data: String,
    /// Enable verbose logging
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_size: KeySize::Aes256,
            associated_data: String::new(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

// ============================================================================
// TESTS
// ============================================================================
