//! Run context passed explicitly into actors and ability factories
//!
//! Replaces ambient service-locator state: settings are loaded once per
//! run and handed down, never resolved from a process-wide singleton.

use screenplay_config::Settings;
use std::sync::Arc;
use uuid::Uuid;

/// Per-run context: settings plus a run identifier for log correlation.
#[derive(Debug, Clone)]
pub struct RunContext {
    settings: Arc<Settings>,
    run_id: Uuid,
}

impl RunContext {
    /// Create a context around loaded settings
    #[inline]
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            run_id: Uuid::new_v4(),
        }
    }

    /// The settings for this run
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The run identifier
    #[inline]
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}
