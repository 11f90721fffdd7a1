//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::timestamp::DEFAULT_TOLERANCE;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub verifier: VerifierConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Verifier configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Signing secret (`whsec_` prefix optional)
    #[serde(default)]
    pub secret: Option<String>,

    /// Accepted clock distance in seconds, either direction
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: u64,
}

impl VerifierConfig {
    /// Tolerance as a [`Duration`]
    pub fn tolerance(&self) -> Duration {
        Duration::from_secs(self.tolerance_secs)
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            secret: None,
            tolerance_secs: default_tolerance_secs(),
        }
    }
}

impl std::fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

fn default_tolerance_secs() -> u64 {
    DEFAULT_TOLERANCE.as_secs()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
