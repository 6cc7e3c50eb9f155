/// Shared error type used across all CargaSegura crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    /// The oracle answered, but not in the advisory schema.
    #[error("invalid advice: {0}")]
    InvalidAdvice(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("config: {0}")]
    Config(String),

    #[error("auth: {0}")]
    Auth(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejected user input for catalog additions.
///
/// Setters elsewhere coerce bad input instead of failing; only adding a
/// custom container type can be refused outright.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("container name must not be empty")]
    EmptyName,

    #[error("container weight must be a positive number, got {0:?}")]
    InvalidWeight(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display() {
        let err = Error::Provider {
            provider: "gemini".into(),
            message: "HTTP 500".into(),
        };
        assert_eq!(err.to_string(), "provider gemini: HTTP 500");
    }

    #[test]
    fn input_error_mentions_raw_weight() {
        let err = InputError::InvalidWeight("-3".into());
        assert!(err.to_string().contains("\"-3\""));
    }
}
