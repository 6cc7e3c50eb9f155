//! Shared utility functions for oracle adapters.

use cs_domain::config::AuthConfig;
use cs_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Http`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

/// Redact the API key from a URL for safe logging.
pub fn redact_url_key(url: &str) -> String {
    if let Some(idx) = url.find("key=") {
        let prefix = &url[..idx + 4];
        let rest = &url[idx + 4..];
        let end = rest.find('&').unwrap_or(rest.len());
        format!("{prefix}[REDACTED]{}", &rest[end..])
    } else {
        url.to_string()
    }
}

/// Find the advisor API key configured under `[advisor.auth]`.
///
/// Sources are tried in order: the inline `key`, the keychain entry named
/// by `service` and `account`, the `env` variable, and finally the
/// variable [`keychain_fallback_env_name`] derives for hosts without a
/// keychain daemon. Blank variables count as unset.
pub fn resolve_api_key(auth: &AuthConfig) -> Result<String> {
    if let Some(key) = &auth.key {
        tracing::warn!("advisor API key read from plaintext config; prefer advisor.auth.env or the keychain");
        return Ok(key.clone());
    }

    let keychain = auth.service.as_deref().zip(auth.account.as_deref());
    if let Some((service, account)) = keychain {
        match resolve_from_keychain(service, account) {
            Ok(secret) => return Ok(secret),
            Err(e) => tracing::debug!(service, account, error = %e, "advisor key not in keychain"),
        }
    }

    if let Some(value) = auth.env.as_deref().and_then(non_empty_env) {
        return Ok(value);
    }

    if let Some((service, account)) = keychain {
        let name = keychain_fallback_env_name(service, account);
        if let Some(value) = non_empty_env(&name) {
            tracing::info!(env_var = %name, "advisor key read from keychain stand-in variable");
            return Ok(value);
        }
    }

    Err(Error::Auth(match &auth.env {
        Some(name) => format!("advisor API key not found: '{name}' is unset or empty"),
        None => "advisor API key not configured: set key, env or service+account under [advisor.auth]"
            .to_owned(),
    }))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read a secret from the OS keychain.
pub fn resolve_from_keychain(service: &str, account: &str) -> Result<String> {
    keyring::Entry::new(service, account)
        .and_then(|entry| entry.get_password())
        .map_err(|e| Error::Auth(format!("keychain lookup {service}/{account}: {e}")))
}

/// `("cargasegura", "gemini-api-key")` → `"CARGASEGURA_GEMINI_API_KEY"`.
pub fn keychain_fallback_env_name(service: &str, account: &str) -> String {
    format!("{service}_{account}").to_uppercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(env: Option<&str>) -> AuthConfig {
        AuthConfig {
            env: env.map(str::to_owned),
            ..Default::default()
        }
    }

    #[test]
    fn stand_in_variable_name() {
        assert_eq!(
            keychain_fallback_env_name("cargasegura", "gemini-api-key"),
            "CARGASEGURA_GEMINI_API_KEY"
        );
    }

    #[test]
    fn redact_hides_only_the_key() {
        let url = "https://host/v1beta/models/m:generateContent?key=secret123&alt=json";
        assert_eq!(
            redact_url_key(url),
            "https://host/v1beta/models/m:generateContent?key=[REDACTED]&alt=json"
        );
        assert_eq!(redact_url_key("https://host/x"), "https://host/x");
    }

    #[test]
    fn inline_key_wins_over_everything() {
        let auth = AuthConfig {
            key: Some("inline".into()),
            service: Some("cargasegura".into()),
            account: Some("never-read".into()),
            env: Some("CS_UTIL_NEVER_READ".into()),
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "inline");
    }

    #[test]
    fn env_variable_beats_stand_in() {
        std::env::set_var("CS_UTIL_PRIMARY_KEY", "primary");
        std::env::set_var("CARGASEGURA_UTIL_ORDER", "stand-in");
        let auth = AuthConfig {
            service: Some("cargasegura".into()),
            account: Some("util-order".into()),
            ..auth(Some("CS_UTIL_PRIMARY_KEY"))
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "primary");
        std::env::remove_var("CS_UTIL_PRIMARY_KEY");
        std::env::remove_var("CARGASEGURA_UTIL_ORDER");
    }

    #[test]
    fn blank_env_falls_through_to_stand_in() {
        std::env::set_var("CS_UTIL_BLANK_KEY", "  ");
        std::env::set_var("CARGASEGURA_UTIL_HEADLESS", "stand-in");
        let auth = AuthConfig {
            service: Some("cargasegura".into()),
            account: Some("util-headless".into()),
            ..auth(Some("CS_UTIL_BLANK_KEY"))
        };
        assert_eq!(resolve_api_key(&auth).unwrap(), "stand-in");
        std::env::remove_var("CS_UTIL_BLANK_KEY");
        std::env::remove_var("CARGASEGURA_UTIL_HEADLESS");
    }

    #[test]
    fn missing_key_errors_name_the_source() {
        let err = resolve_api_key(&auth(Some("CS_UTIL_UNSET_KEY"))).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert!(err.to_string().contains("CS_UTIL_UNSET_KEY"));

        let err = resolve_api_key(&auth(None)).unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
