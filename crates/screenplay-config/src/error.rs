//! Error types for configuration loading and validation

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required configuration value is absent
    #[error("missing required configuration: {0}")]
    MissingKey(String),

    /// A configuration value is present but unusable
    #[error("invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        /// Configuration key
        key: String,
        /// Offending value
        value: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Settings file could not be read
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Build an invalid-value error
    #[inline]
    pub fn invalid(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_names_the_key() {
        let err = ConfigError::MissingKey("azure.subscription_id".to_string());
        assert!(err.to_string().contains("azure.subscription_id"));
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigError::invalid("LOG_LEVEL", "loud", "expected error|warn|info|debug");
        let text = err.to_string();
        assert!(text.contains("LOG_LEVEL"));
        assert!(text.contains("loud"));
    }
}
