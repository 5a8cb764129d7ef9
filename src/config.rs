//! Centralized configuration and builder for Trellis.
//!
//! Goals:
//! - Single place for tunables instead of scattering env lookups.
//! - TrieConfig::from_env() reads the same env vars across all entry points.
//! - Provide a simple TrieBuilder that returns a TrieConfig, which
//!   Trie::with_config will consume and validate.
//!
//! The only tunable today is the checkpoint retention bound. It must be
//! greater than zero; Trie::with_config rejects a zero bound at construction.

use std::fmt;

use crate::consts::{DEFAULT_MAX_CHECKPOINTS, ENV_MAX_CHECKPOINTS};

/// Top-level configuration for a Trellis trie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrieConfig {
    /// Maximum number of retained checkpoints. Once exceeded, the checkpoint
    /// with the smallest id is evicted.
    /// Env: TRELLIS_MAX_CHECKPOINTS (default 10)
    pub max_checkpoints: usize,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            max_checkpoints: DEFAULT_MAX_CHECKPOINTS,
        }
    }
}

impl TrieConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var(ENV_MAX_CHECKPOINTS) {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.max_checkpoints = n;
            }
        }
        cfg
    }

    /// Fluent setter (builder-style) to override the retention bound.
    pub fn with_max_checkpoints(mut self, max: usize) -> Self {
        self.max_checkpoints = max;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for TrieConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrieConfig {{ max_checkpoints: {} }}", self.max_checkpoints)
    }
}

/// Lightweight builder that produces a TrieConfig.
/// Trie exposes `Trie::builder()` returning this builder.
#[derive(Clone, Debug)]
pub struct TrieBuilder {
    cfg: TrieConfig,
}

impl Default for TrieBuilder {
    fn default() -> Self {
        // Start from env to keep entry points consistent, then allow overrides.
        Self {
            cfg: TrieConfig::from_env(),
        }
    }
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from clean defaults (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: TrieConfig::default(),
        }
    }

    pub fn max_checkpoints(mut self, max: usize) -> Self {
        self.cfg.max_checkpoints = max;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> TrieConfig {
        self.cfg
    }
}
