mod advisor;
mod observability;
mod storage;

pub use advisor::*;
pub use observability::*;
pub use storage::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub load: LoadConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.load.default_capacity_kg == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "load.default_capacity_kg".into(),
                message: "capacity must be at least 1 kg".into(),
            });
        }

        if self.storage.state_path.as_os_str().is_empty() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: "storage.state_path".into(),
                message: "state_path must not be empty".into(),
            });
        }

        if self.advisor.enabled {
            if self.advisor.base_url.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "advisor.base_url".into(),
                    message: "base_url must not be empty".into(),
                });
            }
            if self.advisor.model.is_empty() {
                errors.push(ConfigError {
                    severity: ConfigSeverity::Error,
                    field: "advisor.model".into(),
                    message: "model must not be empty".into(),
                });
            }
        }

        // A zero window requests an advisory on every keystroke.
        if self.advisor.debounce_ms == 0 {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "advisor.debounce_ms".into(),
                message: "debounce of 0 ms sends a request for every change".into(),
            });
        }

        if self.advisor.auth.key.is_some() {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "advisor.auth.key".into(),
                message: "plaintext API key in config (prefer env or keychain)".into(),
            });
        }

        errors
    }
}
