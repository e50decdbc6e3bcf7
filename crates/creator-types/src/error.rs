//! Error types for configuration and shared domain types.

use thiserror::Error;

/// Errors raised while loading or validating settings.
///
/// All variants are fatal: the pipeline aborts before doing any work.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Configuration sources could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required credential or identifier is not set
    #[error("Missing credential: {name} (set {hint})")]
    MissingCredential {
        /// Setting key that was empty
        name: &'static str,
        /// Where the operator can provide it
        hint: &'static str,
    },

    /// A setting has an unusable value
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for SettingsError {
    fn from(err: config::ConfigError) -> Self {
        SettingsError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_display() {
        let err = SettingsError::MissingCredential {
            name: "embedding.api_key",
            hint: "GEMINI_API_KEY",
        };
        assert_eq!(
            err.to_string(),
            "Missing credential: embedding.api_key (set GEMINI_API_KEY)"
        );
    }

    #[test]
    fn test_invalid_display() {
        let err = SettingsError::Invalid("pacing.chunk_size must be > 0".to_string());
        assert!(err.to_string().contains("chunk_size"));
    }
}
