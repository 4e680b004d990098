//! Error types for the screenplay runtime
//!
//! One taxonomy covers the whole runtime:
//! - Missing abilities and configuration
//! - Assertion failures raised by `should`/`should_see`
//! - Memory recall failures (unknown key, wrong type)
//! - Bounded-wait timeouts
//! - Opaque collaborator failures, logged with context and rethrown

use screenplay_config::ConfigError;
use std::time::Duration;

/// Main screenplay error type
#[derive(Debug, thiserror::Error)]
pub enum ScreenplayError {
    /// An actor was asked to use an ability it never acquired
    #[error("{actor} does not have the ability {ability}")]
    MissingAbility {
        /// Actor name
        actor: String,
        /// Requested ability type
        ability: String,
    },

    /// A required configuration value is absent
    #[error("missing required configuration: {key}")]
    MissingConfig {
        /// Dotted configuration key
        key: String,
    },

    /// A `should`/`should_see` check did not hold
    #[error("assertion failed for {actor} on \"{question}\": {detail}")]
    Assertion {
        /// Actor name
        actor: String,
        /// Question text
        question: String,
        /// What went wrong
        detail: String,
    },

    /// `recall` was called for a key that was never remembered
    #[error("{actor} does not remember \"{key}\"")]
    KeyNotFound {
        /// Actor name
        actor: String,
        /// Memory key
        key: String,
    },

    /// `recall` requested a type other than the one remembered
    #[error("{actor} remembers \"{key}\", but not as {requested} (stored as {stored})")]
    TypeMismatch {
        /// Actor name
        actor: String,
        /// Memory key
        key: String,
        /// Type the caller asked for
        requested: &'static str,
        /// Type actually stored
        stored: &'static str,
    },

    /// A bounded wait exceeded its deadline
    #[error("timed out after {waited:?} waiting for {subject} to reach {expected}")]
    Timeout {
        /// What was being watched
        subject: String,
        /// The state that never arrived
        expected: String,
        /// How long the wait lasted
        waited: Duration,
    },

    /// A method was called on a disposed actor
    #[error("{actor} has been disposed")]
    ActorDisposed {
        /// Actor name
        actor: String,
    },

    /// A task factory received an unusable parameter
    #[error("{task} requires a non-empty {parameter}")]
    InvalidParameter {
        /// Task name
        task: String,
        /// Offending parameter
        parameter: String,
    },

    /// A collaborator (browser driver, cloud client, credential source)
    /// failed; the underlying error is preserved unchanged
    #[error("{context}: {source}")]
    Upstream {
        /// Where the failure surfaced
        context: String,
        /// The collaborator's error
        #[source]
        source: anyhow::Error,
    },
}

impl ScreenplayError {
    /// Wrap a collaborator failure with context
    #[inline]
    pub fn upstream(context: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Upstream {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Check whether this is an assertion-kind failure
    #[inline]
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion { .. })
    }

    /// Check whether this is a timeout
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<ConfigError> for ScreenplayError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingKey(key) => Self::MissingConfig { key },
            other => Self::upstream("configuration", other),
        }
    }
}

/// One ability whose cleanup failed during disposal
#[derive(Debug)]
pub struct CleanupFailure {
    /// Ability name
    pub ability: String,
    /// The cleanup error
    pub error: ScreenplayError,
}

/// Outcome of disposing an actor.
///
/// Disposal is best-effort: every ability's cleanup runs, and failures are
/// collected here instead of being rethrown.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Cleanups that failed
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// True when every cleanup succeeded
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, ability: impl Into<String>, error: ScreenplayError) {
        self.failures.push(CleanupFailure {
            ability: ability.into(),
            error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ability_names_actor_and_type() {
        let err = ScreenplayError::MissingAbility {
            actor: "Bob".to_string(),
            ability: "OperateMlWorkspace".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("Bob"));
        assert!(text.contains("OperateMlWorkspace"));
    }

    #[test]
    fn assertion_names_question() {
        let err = ScreenplayError::Assertion {
            actor: "Alice".to_string(),
            question: "compute state of c1".to_string(),
            detail: "answered false".to_string(),
        };
        assert!(err.is_assertion());
        assert!(err.to_string().contains("compute state of c1"));
    }

    #[test]
    fn config_missing_key_maps_to_missing_config() {
        let err: ScreenplayError = ConfigError::MissingKey("azure.resource_group".to_string()).into();
        assert!(matches!(err, ScreenplayError::MissingConfig { ref key } if key == "azure.resource_group"));
    }

    #[test]
    fn timeout_predicate() {
        let err = ScreenplayError::Timeout {
            subject: "compute instance c1".to_string(),
            expected: "Running".to_string(),
            waited: Duration::from_secs(600),
        };
        assert!(err.is_timeout());
        assert!(!err.is_assertion());
    }

    #[test]
    fn cleanup_report_collects_failures() {
        let mut report = CleanupReport::default();
        assert!(report.is_clean());

        report.record(
            "browse the web",
            ScreenplayError::upstream("close", anyhow::anyhow!("socket gone")),
        );
        assert!(!report.is_clean());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].ability, "browse the web");
    }
}
