//! Page-driver seam - the browser collaborator surface
//!
//! The runtime never talks to a browser directly; it talks to whatever
//! implements [`PageDriver`]. A production implementation wraps a real
//! automation backend; tests script a stub.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use screenplay_core::ScreenplayError;
use std::path::Path;
use std::time::Duration;

/// Errors surfaced by a page driver
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Navigation did not complete
    #[error("navigation to {url} failed: {reason}")]
    Navigation {
        /// Target URL
        url: String,
        /// Backend's explanation
        reason: String,
    },

    /// An element could not be interacted with
    #[error("element {selector} failed: {reason}")]
    Element {
        /// CSS selector
        selector: String,
        /// Backend's explanation
        reason: String,
    },

    /// The page was already closed.
    ///
    /// Cleanup treats this as success; everything else does not.
    #[error("page already closed")]
    AlreadyClosed,

    /// Any other backend failure
    #[error("driver backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<DriverError> for ScreenplayError {
    fn from(err: DriverError) -> Self {
        ScreenplayError::upstream("browser driver", err)
    }
}

/// A page object exposing navigate/click/fill/wait/screenshot operations.
///
/// All timeouts are supplied by the caller; a driver must not hang past
/// the given deadline.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to a URL
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Wait for the current navigation to settle
    async fn wait_for_load(&self, timeout: Duration) -> Result<(), DriverError>;

    /// Click the element matched by a selector
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Fill an input element
    async fn fill(&self, selector: &str, value: &str, timeout: Duration)
        -> Result<(), DriverError>;

    /// Check whether a selector currently matches a visible element
    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError>;

    /// Text content of the element matched by a selector
    async fn text_of(&self, selector: &str, timeout: Duration) -> Result<String, DriverError>;

    /// Page title
    async fn title(&self) -> Result<String, DriverError>;

    /// Current URL
    async fn current_url(&self) -> Result<String, DriverError>;

    /// Capture a screenshot to the given path
    async fn screenshot(&self, path: &Path) -> Result<(), DriverError>;

    /// Close the page and release the browser handle
    async fn close(&self) -> Result<(), DriverError>;
}
