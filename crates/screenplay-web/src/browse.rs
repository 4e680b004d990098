//! BrowseTheWeb - the ability to drive a browser page
//!
//! Owns exactly one page driver plus the timeout and retry settings its
//! operations run under. Domain operations log intent and outcome and
//! rethrow driver failures unchanged.

use crate::driver::{DriverError, PageDriver};
use async_trait::async_trait;
use screenplay_core::{wait_until, Ability, PollSettings, ScreenplayError};
use screenplay_config::{RetrySettings, Settings, TimeoutSettings};
use std::path::Path;
use std::time::Duration;

/// Selectors that match the sign-in form's username field
const USERNAME_SELECTORS: &[&str] = &["input[type=\"email\"]", "input[name=\"loginfmt\"]", "#i0116"];
/// Selectors that match the sign-in form's password field
const PASSWORD_SELECTORS: &[&str] = &["input[type=\"password\"]", "input[name=\"passwd\"]", "#i0118"];
/// Sign-in form submit button (also confirms the stay-signed-in prompt)
const SUBMIT_BUTTON: &str = "#idSIButton9";
/// Selectors that match the optional "stay signed in" prompt
const STAY_SIGNED_IN_SELECTORS: &[&str] = &["#KmsiCheckboxField", "#kmsiTitle"];
/// The prompt shows up right after submit or not at all
const STAY_SIGNED_IN_WINDOW: Duration = Duration::from_secs(5);

/// The ability to drive a browser page
pub struct BrowseTheWeb {
    driver: Box<dyn PageDriver>,
    timeouts: TimeoutSettings,
    retry: RetrySettings,
}

impl BrowseTheWeb {
    /// Wrap a page driver with the run's timeout and retry settings
    #[must_use]
    pub fn with_driver(driver: Box<dyn PageDriver>, settings: &Settings) -> Self {
        Self {
            driver,
            timeouts: settings.timeouts,
            retry: settings.retry,
        }
    }

    /// Navigate to a URL and wait for the load to settle
    pub async fn navigate_to(&self, url: &str) -> Result<(), ScreenplayError> {
        tracing::info!(url, "navigating");
        let timeout = self.timeouts.navigation_timeout();
        self.driver.goto(url, timeout).await?;
        self.driver.wait_for_load(timeout).await?;
        tracing::info!(url, "navigation complete");
        Ok(())
    }

    /// Wait until any of the given selectors becomes visible, returning
    /// the one that matched first.
    ///
    /// Driver errors during a probe count as "not visible yet"; only the
    /// deadline fails the wait.
    pub async fn wait_for_any_visible(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<String, ScreenplayError> {
        let subject = format!("any of {selectors:?}");
        let poll = PollSettings::new(self.timeouts.poll_interval(), timeout);
        let driver = self.driver.as_ref();

        wait_until(&subject, "visible", poll, move || async move {
            for selector in selectors {
                if matches!(driver.is_visible(selector).await, Ok(true)) {
                    return Ok(Some((*selector).to_string()));
                }
            }
            Ok(None)
        })
        .await
    }

    /// Click a selector with the configured bounded retry
    pub async fn click_with_retry(&self, selector: &str) -> Result<(), ScreenplayError> {
        let label = format!("click {selector}");
        let driver = self.driver.as_ref();
        let timeout = self.timeouts.default_timeout();

        screenplay_core::retry(&label, &self.retry, move || async move {
            driver
                .click(selector, timeout)
                .await
                .map_err(|e| ScreenplayError::upstream(format!("click {selector}"), e))
        })
        .await
    }

    /// Fill a field; password fields are redacted in the logs
    pub async fn fill_field(&self, selector: &str, value: &str) -> Result<(), ScreenplayError> {
        let shown = if is_secret_field(selector) { "***" } else { value };
        tracing::info!(selector, value = shown, "filling");
        self.driver
            .fill(selector, value, self.timeouts.default_timeout())
            .await?;
        Ok(())
    }

    /// Interactive sign-in: detect the login form, submit credentials,
    /// and accept the optional "stay signed in" prompt when it appears.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<(), ScreenplayError> {
        tracing::info!(username, "signing in");
        let timeout = self.timeouts.default_timeout();

        let username_field = self.wait_for_any_visible(USERNAME_SELECTORS, timeout).await?;
        self.fill_field(&username_field, username).await?;
        self.click_with_retry(SUBMIT_BUTTON).await?;

        let password_field = self.wait_for_any_visible(PASSWORD_SELECTORS, timeout).await?;
        self.fill_field(&password_field, password).await?;
        self.click_with_retry(SUBMIT_BUTTON).await?;

        match self
            .wait_for_any_visible(STAY_SIGNED_IN_SELECTORS, STAY_SIGNED_IN_WINDOW)
            .await
        {
            Ok(_) => {
                tracing::debug!("accepting stay-signed-in prompt");
                self.click_with_retry(SUBMIT_BUTTON).await?;
            }
            Err(err) if err.is_timeout() => {
                tracing::debug!("no stay-signed-in prompt");
            }
            Err(err) => return Err(err),
        }

        self.driver
            .wait_for_load(self.timeouts.navigation_timeout())
            .await?;
        tracing::info!(username, "signed in");
        Ok(())
    }

    /// Whether a selector currently matches a visible element
    pub async fn is_visible(&self, selector: &str) -> Result<bool, ScreenplayError> {
        Ok(self.driver.is_visible(selector).await?)
    }

    /// Text content of the element matched by a selector
    pub async fn text_of(&self, selector: &str) -> Result<String, ScreenplayError> {
        Ok(self
            .driver
            .text_of(selector, self.timeouts.default_timeout())
            .await?)
    }

    /// Current page title
    pub async fn title(&self) -> Result<String, ScreenplayError> {
        Ok(self.driver.title().await?)
    }

    /// Current page URL
    pub async fn current_url(&self) -> Result<String, ScreenplayError> {
        Ok(self.driver.current_url().await?)
    }

    /// Capture a screenshot to the given path
    pub async fn save_screenshot(&self, path: &Path) -> Result<(), ScreenplayError> {
        tracing::info!(path = %path.display(), "capturing screenshot");
        Ok(self.driver.screenshot(path).await?)
    }
}

#[async_trait]
impl Ability for BrowseTheWeb {
    fn name(&self) -> &str {
        "browse the web"
    }

    async fn initialize(&self) -> Result<(), ScreenplayError> {
        // Prove the page responds before any task uses it.
        let title = self.driver.title().await?;
        tracing::debug!(title, "browser page is responsive");
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), ScreenplayError> {
        match self.driver.close().await {
            Ok(()) | Err(DriverError::AlreadyClosed) => Ok(()),
            Err(err) => Err(ScreenplayError::upstream("closing browser page", err)),
        }
    }
}

fn is_secret_field(selector: &str) -> bool {
    selector.contains("password") || selector.contains("passwd") || selector == "#i0118"
}

impl std::fmt::Debug for BrowseTheWeb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowseTheWeb")
            .field("timeouts", &self.timeouts)
            .finish()
    }
}
