//! Screenplay Config - layered settings for the screenplay runtime
//!
//! Provides the configuration surface the abilities read from:
//! - A `Settings` tree covering cloud, URL, timeout, retry, compute and
//!   logging knobs
//! - Environment-variable loading with optional TOML file layering
//! - Required-key accessors that fail naming the missing key
//! - Tracing initialization driven by the logging settings
//!
//! # Example
//!
//! ```rust
//! use screenplay_config::Settings;
//!
//! let settings = Settings::from_env().unwrap();
//! assert_eq!(settings.urls.base, "https://ml.azure.com");
//! ```

pub mod error;
pub mod logging;
pub mod settings;

pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{
    AzureSettings, ComputeSettings, LogFormat, LogLevel, LoggingSettings, RetrySettings,
    Settings, TimeoutSettings, UrlSettings,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
