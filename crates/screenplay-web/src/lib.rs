//! Screenplay Web - browser capability for screenplay scenarios
//!
//! Everything browser-shaped lives behind the [`PageDriver`] seam:
//! - [`BrowseTheWeb`] is the ability an actor acquires to drive a page
//! - Tasks cover navigation, workspace selection, interactive sign-in
//!   and screenshots
//! - Questions read the title, URL and element visibility
//!
//! A production driver wraps a real browser-automation backend; the
//! runtime itself never links one.

#![warn(unreachable_pub)]

pub mod browse;
pub mod driver;
pub mod questions;
pub mod tasks;

// Re-exports for convenience
pub use browse::BrowseTheWeb;
pub use driver::{DriverError, PageDriver};
pub use questions::{CurrentUrl, ElementVisibility, PageTitle};
pub use tasks::{CaptureScreenshot, NavigateTo, OpenWorkspace, SignIn};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
