use cs_domain::config::{Config, ConfigSeverity};

/// Print every config issue. Returns `false` when any of them is an error.
pub fn validate(config: &Config, config_path: &str) -> bool {
    let issues = config.validate();

    if issues.is_empty() {
        println!("Config OK ({config_path})");
        return true;
    }

    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    for issue in &issues {
        println!("{issue}");
    }

    println!("\n{error_count} error(s), {warning_count} warning(s) in {config_path}");

    error_count == 0
}

/// Resolved config (with all defaults filled in) as TOML.
pub fn render(config: &Config) -> anyhow::Result<String> {
    toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("serializing config: {e}"))
}

pub fn show(config: &Config) -> anyhow::Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&Config::default(), "cargasegura.toml"));
    }

    #[test]
    fn zero_capacity_fails_validation() {
        let mut config = Config::default();
        config.load.default_capacity_kg = 0;
        assert!(!validate(&config, "cargasegura.toml"));
    }

    #[test]
    fn rendered_config_parses_back() {
        let mut config = Config::default();
        config.advisor.debounce_ms = 900;
        let text = render(&config).unwrap();
        assert!(text.contains("[advisor]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.advisor.debounce_ms, 900);
    }
}
