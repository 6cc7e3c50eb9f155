use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Observability configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact, human-readable lines on stderr (interactive use).
    #[default]
    Compact,
    /// One JSON object per line on stderr (log collection).
    Json,
}

/// Logging configuration.
///
/// `filter` uses `EnvFilter` directive syntax and is only consulted when
/// `RUST_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default)]
    pub filter: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Compact,
            filter: None,
        }
    }
}

impl ObservabilityConfig {
    /// The filter directive to fall back on when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &str {
        match (&self.filter, self.log_format) {
            (Some(filter), _) => filter,
            (None, LogFormat::Compact) => "warn",
            (None, LogFormat::Json) => "info,cs_assistant=debug",
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_compact_warn() {
        let cfg = ObservabilityConfig::default();
        assert_eq!(cfg.log_format, LogFormat::Compact);
        assert_eq!(cfg.default_filter(), "warn");
    }

    #[test]
    fn json_format_is_more_verbose() {
        let cfg = ObservabilityConfig {
            log_format: LogFormat::Json,
            filter: None,
        };
        assert_eq!(cfg.default_filter(), "info,cs_assistant=debug");
    }

    #[test]
    fn explicit_filter_wins() {
        let toml_str = r#"
            log_format = "json"
            filter = "debug"
        "#;
        let cfg: ObservabilityConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.default_filter(), "debug");
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: ObservabilityConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.log_format, LogFormat::Compact);
        assert!(cfg.filter.is_none());
    }
}
