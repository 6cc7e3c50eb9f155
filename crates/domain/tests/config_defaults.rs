use cs_domain::config::{Config, LogFormat};

#[test]
fn default_capacity_is_one_tonne() {
    let config = Config::default();
    assert_eq!(config.load.default_capacity_kg, 1000);
}

#[test]
fn default_state_path() {
    let config = Config::default();
    assert_eq!(config.storage.state_path.to_str(), Some("./data/state"));
}

#[test]
fn empty_file_parses_to_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.advisor.debounce_ms, 1_500);
    assert_eq!(config.observability.log_format, LogFormat::Compact);
}

#[test]
fn full_file_parses() {
    let toml_str = r#"
[storage]
state_path = "/var/lib/cargasegura"

[load]
default_capacity_kg = 3500

[advisor]
enabled = true
debounce_ms = 800
model = "gemini-2.0-flash"

[advisor.auth]
service = "cargasegura"
account = "gemini-api-key"

[observability]
log_format = "json"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.storage.state_path.to_str(), Some("/var/lib/cargasegura"));
    assert_eq!(config.load.default_capacity_kg, 3500);
    assert_eq!(config.advisor.debounce_ms, 800);
    assert_eq!(config.advisor.model, "gemini-2.0-flash");
    assert_eq!(config.advisor.auth.account.as_deref(), Some("gemini-api-key"));
    assert_eq!(config.observability.log_format, LogFormat::Json);
    assert!(config.validate().is_empty());
}

#[test]
fn disabled_advisor_parses() {
    let config: Config = toml::from_str("[advisor]\nenabled = false\n").unwrap();
    assert!(!config.advisor.enabled);
}
