//! Error types for scope configuration
//!
//! Scope operations themselves never fail: a missing name is `None` and a
//! redeclaration hands back the existing object. Only loading a configuration
//! can go wrong.

/// Errors that occur while loading a [`ScopeConfig`](crate::ScopeConfig)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The text is not valid TOML or does not match the config schema
    #[error("invalid scope configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A name index over a single entry can never beat a linear scan
    #[error("name-index-threshold must be 0 (disabled) or at least 2, got {threshold}")]
    InvalidThreshold {
        /// The rejected threshold
        threshold: usize,
    },
}
