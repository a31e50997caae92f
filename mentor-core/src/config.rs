//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allocator::AllocatorConfig;

/// Engine tunables. Hosts load this from their own config file; every field
/// has a default that matches the campus deployment, so an empty section is
/// valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on any single model call. Expiry triggers the fallback
    /// path, it is not an error.
    pub model_timeout_secs: u64,
    // Scalar fields stay above this table so the TOML form serializes.
    pub allocator: AllocatorConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { model_timeout_secs: 20, allocator: AllocatorConfig::default() }
    }
}

impl EngineConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }
}
