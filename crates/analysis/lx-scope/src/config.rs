//! Tunables for the scope tree

use crate::error::ConfigError;
use serde::Deserialize;

/// Scope tree configuration
///
/// ```toml
/// name-index-threshold = 64
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScopeConfig {
    /// Entry count at which a scope starts keeping a name index next to its
    /// entry list. `0` disables the index, so every lookup scans linearly.
    pub name_index_threshold: usize,
}

impl ScopeConfig {
    /// Default entry count at which the name index is built
    pub const DEFAULT_NAME_INDEX_THRESHOLD: usize = 32;

    /// Parses a configuration from TOML text
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the text is not valid TOML or contains
    /// unknown keys, and `ConfigError::InvalidThreshold` for a threshold of 1.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThreshold` for a threshold of 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name_index_threshold == 1 {
            return Err(ConfigError::InvalidThreshold {
                threshold: self.name_index_threshold,
            });
        }
        Ok(())
    }

    /// Whether a scope holding `len` entries should have a name index
    pub(crate) fn wants_index(&self, len: usize) -> bool {
        self.name_index_threshold != 0 && len >= self.name_index_threshold
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            name_index_threshold: Self::DEFAULT_NAME_INDEX_THRESHOLD,
        }
    }
}
