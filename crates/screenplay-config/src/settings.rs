//! Settings tree for the screenplay runtime
//!
//! Values load from the environment, optionally layered on top of a TOML
//! file. Environment variables always win. Required-key accessors fail
//! with the dotted key name so a missing value surfaces exactly once, at
//! ability initialization.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Top-level settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Cloud resource identifiers and credentials
    pub azure: AzureSettings,
    /// Portal URLs
    pub urls: UrlSettings,
    /// Operation timeouts
    pub timeouts: TimeoutSettings,
    /// Bounded-retry tuning
    pub retry: RetrySettings,
    /// Compute instance tuning
    pub compute: ComputeSettings,
    /// Log level and format
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from the environment only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.overlay_env()?;
        Ok(settings)
    }

    /// Load settings from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut settings: Self = toml::from_str(&raw)?;
        settings.overlay_env()?;
        Ok(settings)
    }

    fn overlay_env(&mut self) -> Result<(), ConfigError> {
        self.azure.overlay_env();
        self.urls.overlay_env();
        self.timeouts.overlay_env()?;
        self.retry.overlay_env()?;
        self.compute.overlay_env()?;
        self.logging.overlay_env()?;
        Ok(())
    }
}

/// Cloud resource identifiers and credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureSettings {
    /// Tenant the service principal lives in
    pub tenant_id: Option<String>,
    /// Application (client) id
    pub client_id: Option<String>,
    /// Client secret for service-principal auth
    pub client_secret: Option<String>,
    /// Subscription holding the workspace
    pub subscription_id: Option<String>,
    /// Resource group holding the workspace
    pub resource_group: Option<String>,
    /// ML workspace name
    pub workspace_name: Option<String>,
}

impl AzureSettings {
    fn overlay_env(&mut self) {
        overlay_string(&mut self.tenant_id, "AZURE_TENANT_ID");
        overlay_string(&mut self.client_id, "AZURE_CLIENT_ID");
        overlay_string(&mut self.client_secret, "AZURE_CLIENT_SECRET");
        overlay_string(&mut self.subscription_id, "AZURE_SUBSCRIPTION_ID");
        overlay_string(&mut self.resource_group, "AZURE_RESOURCE_GROUP");
        overlay_string(&mut self.workspace_name, "AZURE_ML_WORKSPACE_NAME");
    }

    /// Subscription id, or a missing-key error
    pub fn require_subscription_id(&self) -> Result<&str, ConfigError> {
        require(self.subscription_id.as_deref(), "azure.subscription_id")
    }

    /// Resource group, or a missing-key error
    pub fn require_resource_group(&self) -> Result<&str, ConfigError> {
        require(self.resource_group.as_deref(), "azure.resource_group")
    }

    /// Workspace name, or a missing-key error
    pub fn require_workspace_name(&self) -> Result<&str, ConfigError> {
        require(self.workspace_name.as_deref(), "azure.workspace_name")
    }
}

/// Portal URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlSettings {
    /// Studio portal base URL
    pub base: String,
}

impl Default for UrlSettings {
    fn default() -> Self {
        Self {
            base: "https://ml.azure.com".to_string(),
        }
    }
}

impl UrlSettings {
    fn overlay_env(&mut self) {
        if let Some(base) = env_string("BASE_URL") {
            self.base = base;
        }
    }
}

/// Operation timeouts, stored in milliseconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    /// Default timeout for element-level operations
    pub default_ms: u64,
    /// Timeout for navigation and page loads
    pub navigation_ms: u64,
    /// Milliseconds between element-visibility polls
    pub poll_interval_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            default_ms: 30_000,
            navigation_ms: 60_000,
            poll_interval_ms: 500,
        }
    }
}

impl TimeoutSettings {
    fn overlay_env(&mut self) -> Result<(), ConfigError> {
        overlay_parse(&mut self.default_ms, "DEFAULT_TIMEOUT")?;
        overlay_parse(&mut self.navigation_ms, "NAVIGATION_TIMEOUT")?;
        overlay_parse(&mut self.poll_interval_ms, "ELEMENT_POLL_INTERVAL")?;
        Ok(())
    }

    /// Default timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }

    /// Navigation timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Element poll interval as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Bounded-retry tuning for flaky interactions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Maximum attempts before giving up
    pub max_retries: u32,
    /// Fixed delay between attempts, in milliseconds
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_ms: 1_000,
        }
    }
}

impl RetrySettings {
    fn overlay_env(&mut self) -> Result<(), ConfigError> {
        overlay_parse(&mut self.max_retries, "MAX_RETRIES")?;
        overlay_parse(&mut self.delay_ms, "RETRY_DELAY")?;
        Ok(())
    }

    /// Delay between attempts as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Compute instance tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeSettings {
    /// Default compute instance to operate on
    pub instance_name: Option<String>,
    /// Seconds between compute state polls
    pub poll_interval_secs: u64,
    /// Seconds to wait for a compute state transition
    pub state_timeout_secs: u64,
}

impl Default for ComputeSettings {
    fn default() -> Self {
        Self {
            instance_name: None,
            poll_interval_secs: 30,
            state_timeout_secs: 600,
        }
    }
}

impl ComputeSettings {
    fn overlay_env(&mut self) -> Result<(), ConfigError> {
        overlay_string(&mut self.instance_name, "COMPUTE_INSTANCE_NAME");
        overlay_parse(&mut self.poll_interval_secs, "COMPUTE_POLL_INTERVAL")?;
        overlay_parse(&mut self.state_timeout_secs, "COMPUTE_STATE_TIMEOUT")?;
        Ok(())
    }

    /// Poll interval as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// State-transition timeout as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn state_timeout(&self) -> Duration {
        Duration::from_secs(self.state_timeout_secs)
    }
}

/// Log level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational and above
    #[default]
    Info,
    /// Everything
    Debug,
}

impl LogLevel {
    /// Directive string understood by the env filter
    #[inline]
    #[must_use]
    pub fn as_directive(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(ConfigError::invalid(
                "LOG_LEVEL",
                other,
                "expected error|warn|info|debug",
            )),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON lines
    #[default]
    Json,
    /// Human-readable lines
    Simple,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "simple" => Ok(Self::Simple),
            other => Err(ConfigError::invalid(
                "LOG_FORMAT",
                other,
                "expected json|simple",
            )),
        }
    }
}

/// Log level and format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level to emit
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
}

impl LoggingSettings {
    fn overlay_env(&mut self) -> Result<(), ConfigError> {
        if let Some(level) = env_string("LOG_LEVEL") {
            self.level = level.parse()?;
        }
        if let Some(format) = env_string("LOG_FORMAT") {
            self.format = format.parse()?;
        }
        Ok(())
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn overlay_string(slot: &mut Option<String>, key: &str) {
    if let Some(value) = env_string(key) {
        *slot = Some(value);
    }
}

fn overlay_parse<T>(slot: &mut T, key: &str) -> Result<(), ConfigError>
where
    T: FromStr,
{
    if let Some(raw) = env_string(key) {
        *slot = raw
            .parse()
            .map_err(|_| ConfigError::invalid(key, raw.as_str(), "expected an integer"))?;
    }
    Ok(())
}

fn require<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingKey(key.to_string())),
    }
}
