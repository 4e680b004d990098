//! Web tasks - business actions performed through [`BrowseTheWeb`]

use crate::browse::BrowseTheWeb;
use async_trait::async_trait;
use screenplay_core::{Actor, ScreenplayError, Task};
use std::path::PathBuf;

/// Studio workspace picker
const WORKSPACE_SELECTOR: &str = "[data-testid='workspace-selector']";

fn non_empty(task: &str, parameter: &str, value: String) -> Result<String, ScreenplayError> {
    if value.trim().is_empty() {
        Err(ScreenplayError::InvalidParameter {
            task: task.to_string(),
            parameter: parameter.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Navigate the browser to a URL
#[derive(Debug)]
pub struct NavigateTo {
    url: String,
}

impl NavigateTo {
    /// Build the task; the URL must be non-empty
    pub fn url(url: impl Into<String>) -> Result<Self, ScreenplayError> {
        Ok(Self {
            url: non_empty("navigate", "url", url.into())?,
        })
    }
}

#[async_trait]
impl Task for NavigateTo {
    fn name(&self) -> String {
        format!("navigate to {}", self.url)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let browse = actor.ability::<BrowseTheWeb>()?;
        browse.navigate_to(&self.url).await
    }
}

/// Open the studio portal and select a workspace by name
#[derive(Debug)]
pub struct OpenWorkspace {
    workspace: String,
}

impl OpenWorkspace {
    /// Build the task; the workspace name must be non-empty
    pub fn named(workspace: impl Into<String>) -> Result<Self, ScreenplayError> {
        Ok(Self {
            workspace: non_empty("open workspace", "workspace", workspace.into())?,
        })
    }
}

#[async_trait]
impl Task for OpenWorkspace {
    fn name(&self) -> String {
        format!("open workspace {}", self.workspace)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let browse = actor.ability::<BrowseTheWeb>()?;
        let settings = actor.context().settings();

        browse.navigate_to(&settings.urls.base).await?;
        browse
            .wait_for_any_visible(&[WORKSPACE_SELECTOR], settings.timeouts.navigation_timeout())
            .await?;
        browse.click_with_retry(WORKSPACE_SELECTOR).await?;

        let option = format!(
            "[data-testid='workspace-option'][data-workspace='{}']",
            self.workspace
        );
        browse.click_with_retry(&option).await
    }
}

/// Sign in interactively with the given credentials
pub struct SignIn {
    username: String,
    password: String,
}

impl SignIn {
    /// Build the task; both credentials must be non-empty
    pub fn with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ScreenplayError> {
        Ok(Self {
            username: non_empty("sign in", "username", username.into())?,
            password: non_empty("sign in", "password", password.into())?,
        })
    }
}

#[async_trait]
impl Task for SignIn {
    fn name(&self) -> String {
        // Never include the password in a task name.
        format!("sign in as {}", self.username)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let browse = actor.ability::<BrowseTheWeb>()?;
        browse.sign_in(&self.username, &self.password).await
    }
}

impl std::fmt::Debug for SignIn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignIn")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Capture a screenshot of the current page
#[derive(Debug)]
pub struct CaptureScreenshot {
    path: PathBuf,
}

impl CaptureScreenshot {
    /// Build the task for the given output path
    #[must_use]
    pub fn to(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Task for CaptureScreenshot {
    fn name(&self) -> String {
        format!("capture screenshot to {}", self.path.display())
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let browse = actor.ability::<BrowseTheWeb>()?;
        browse.save_screenshot(&self.path).await
    }
}
