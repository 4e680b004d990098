//! Testing utilities for the screenplay workspace
//!
//! Scriptable stand-ins for the browser and cloud collaborators, plus
//! small ability fixtures for exercising the actor lifecycle.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use screenplay_cloud::{
    CloudError, ComputeInstance, ComputeState, Credential, CredentialError, CredentialSource,
    WorkspaceClient,
};
use screenplay_core::{Ability, ScreenplayError};
use screenplay_web::{DriverError, PageDriver};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Install a test-writer subscriber so `tracing` output lands in the
/// captured test output. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Shared, clonable record of actions a stub observed
pub type ActionLog = Arc<Mutex<Vec<String>>>;

pub fn action_log() -> ActionLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[derive(Default)]
struct PageState {
    visible: HashSet<String>,
    click_failures: HashMap<String, u32>,
    title: String,
    url: String,
    closed: bool,
}

/// A scriptable page driver.
///
/// Visibility, titles and per-selector click failures are programmed up
/// front; every interaction is appended to the shared action log. Clones
/// share state, so a test can keep a handle after boxing one into an
/// ability.
#[derive(Clone)]
pub struct StubPage {
    state: Arc<Mutex<PageState>>,
    actions: ActionLog,
}

impl StubPage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PageState {
                title: "Azure ML Studio".to_string(),
                ..PageState::default()
            })),
            actions: action_log(),
        }
    }

    /// Mark selectors as currently visible
    pub fn with_visible(self, selectors: &[&str]) -> Self {
        {
            let mut state = self.state.lock();
            for selector in selectors {
                state.visible.insert((*selector).to_string());
            }
        }
        self
    }

    /// Make the next `failures` clicks on `selector` fail before one
    /// succeeds
    pub fn with_failing_clicks(self, selector: &str, failures: u32) -> Self {
        self.state
            .lock()
            .click_failures
            .insert(selector.to_string(), failures);
        self
    }

    pub fn with_title(self, title: &str) -> Self {
        self.state.lock().title = title.to_string();
        self
    }

    /// Flip a selector visible after the page has been built
    pub fn reveal(&self, selector: &str) {
        self.state.lock().visible.insert(selector.to_string());
    }

    pub fn actions(&self) -> ActionLog {
        Arc::clone(&self.actions)
    }

    pub fn recorded_actions(&self) -> Vec<String> {
        self.actions.lock().clone()
    }

    pub fn was_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn record(&self, action: String) {
        self.actions.lock().push(action);
    }
}

impl Default for StubPage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageDriver for StubPage {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.state.lock().url = url.to_string();
        self.record(format!("goto {url}"));
        Ok(())
    }

    async fn wait_for_load(&self, _timeout: Duration) -> Result<(), DriverError> {
        self.record("wait_for_load".to_string());
        Ok(())
    }

    async fn click(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if let Some(remaining) = state.click_failures.get_mut(selector) {
            if *remaining > 0 {
                *remaining -= 1;
                drop(state);
                self.record(format!("click {selector} (failed)"));
                return Err(DriverError::Element {
                    selector: selector.to_string(),
                    reason: "element detached".to_string(),
                });
            }
        }
        drop(state);
        self.record(format!("click {selector}"));
        Ok(())
    }

    async fn fill(
        &self,
        selector: &str,
        value: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.record(format!("fill {selector}={value}"));
        Ok(())
    }

    async fn is_visible(&self, selector: &str) -> Result<bool, DriverError> {
        Ok(self.state.lock().visible.contains(selector))
    }

    async fn text_of(&self, selector: &str, _timeout: Duration) -> Result<String, DriverError> {
        Ok(format!("text of {selector}"))
    }

    async fn title(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().title.clone())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        Ok(self.state.lock().url.clone())
    }

    async fn screenshot(&self, path: &Path) -> Result<(), DriverError> {
        self.record(format!("screenshot {}", path.display()));
        Ok(())
    }

    async fn close(&self) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(DriverError::AlreadyClosed);
        }
        state.closed = true;
        drop(state);
        self.record("close".to_string());
        Ok(())
    }
}

struct ComputeRecord {
    state: ComputeState,
    target: Option<ComputeState>,
    polls_remaining: u32,
}

#[derive(Default)]
struct WorkspaceState {
    instances: HashMap<String, ComputeRecord>,
    connected: bool,
    workspace_exists: bool,
}

/// A scriptable workspace client with a small compute state machine.
///
/// `start_compute` moves an instance to `Starting`; after the configured
/// number of status polls it settles at `Running`. `stop_compute` is
/// symmetric through `Stopping` to `Stopped`. Clones share state.
#[derive(Clone)]
pub struct StubWorkspace {
    state: Arc<Mutex<WorkspaceState>>,
    polls_to_settle: u32,
}

impl StubWorkspace {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkspaceState {
                workspace_exists: true,
                ..WorkspaceState::default()
            })),
            polls_to_settle: 1,
        }
    }

    /// Number of status polls a transition stays in its intermediate
    /// state before settling
    pub fn with_polls_to_settle(mut self, polls: u32) -> Self {
        self.polls_to_settle = polls;
        self
    }

    pub fn with_instance(self, name: &str, state: ComputeState) -> Self {
        self.state.lock().instances.insert(
            name.to_string(),
            ComputeRecord {
                state,
                target: None,
                polls_remaining: 0,
            },
        );
        self
    }

    pub fn with_missing_workspace(self) -> Self {
        self.state.lock().workspace_exists = false;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }
}

impl Default for StubWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspaceClient for StubWorkspace {
    async fn connect(&self, credential: &Credential) -> Result<(), CloudError> {
        if credential.is_expired() {
            return Err(CloudError::Auth("token expired".to_string()));
        }
        self.state.lock().connected = true;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), CloudError> {
        self.state.lock().connected = false;
        Ok(())
    }

    async fn workspace_exists(&self) -> Result<bool, CloudError> {
        Ok(self.state.lock().workspace_exists)
    }

    async fn start_compute(&self, name: &str) -> Result<(), CloudError> {
        let mut state = self.state.lock();
        let record = state
            .instances
            .get_mut(name)
            .ok_or_else(|| CloudError::ComputeNotFound(name.to_string()))?;
        record.state = ComputeState::Starting;
        record.target = Some(ComputeState::Running);
        record.polls_remaining = self.polls_to_settle;
        Ok(())
    }

    async fn stop_compute(&self, name: &str) -> Result<(), CloudError> {
        let mut state = self.state.lock();
        let record = state
            .instances
            .get_mut(name)
            .ok_or_else(|| CloudError::ComputeNotFound(name.to_string()))?;
        record.state = ComputeState::Stopping;
        record.target = Some(ComputeState::Stopped);
        record.polls_remaining = self.polls_to_settle;
        Ok(())
    }

    async fn compute_status(&self, name: &str) -> Result<ComputeInstance, CloudError> {
        let mut state = self.state.lock();
        let record = state
            .instances
            .get_mut(name)
            .ok_or_else(|| CloudError::ComputeNotFound(name.to_string()))?;

        if let Some(target) = record.target {
            if record.polls_remaining == 0 {
                record.state = target;
                record.target = None;
            } else {
                record.polls_remaining -= 1;
            }
        }

        Ok(ComputeInstance {
            name: name.to_string(),
            state: record.state,
            vm_size: "Standard_DS3_v2".to_string(),
            location: "westus2".to_string(),
        })
    }
}

/// A credential source that always produces a one-hour token
pub struct StaticTokenSource {
    pub name: &'static str,
    pub token: &'static str,
}

#[async_trait]
impl CredentialSource for StaticTokenSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn acquire(&self) -> Result<Credential, CredentialError> {
        Ok(Credential::new(
            self.token,
            Utc::now() + ChronoDuration::hours(1),
        ))
    }
}

/// A credential source that never produces a token
pub struct UnavailableSource {
    pub name: &'static str,
    pub reason: &'static str,
}

#[async_trait]
impl CredentialSource for UnavailableSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn acquire(&self) -> Result<Credential, CredentialError> {
        Err(CredentialError::Unavailable {
            source_name: self.name.to_string(),
            reason: self.reason.to_string(),
        })
    }
}

/// An ability that records its lifecycle events into a shared log
pub struct RecordingAbility {
    pub label: &'static str,
    pub events: ActionLog,
}

impl RecordingAbility {
    pub fn new(label: &'static str, events: ActionLog) -> Self {
        Self { label, events }
    }
}

#[async_trait]
impl Ability for RecordingAbility {
    fn name(&self) -> &str {
        self.label
    }

    async fn initialize(&self) -> Result<(), ScreenplayError> {
        self.events.lock().push(format!("{} initialized", self.label));
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), ScreenplayError> {
        self.events.lock().push(format!("{} cleaned up", self.label));
        Ok(())
    }
}

/// An ability whose cleanup always fails
pub struct BrokenCleanupAbility;

#[async_trait]
impl Ability for BrokenCleanupAbility {
    fn name(&self) -> &str {
        "broken cleanup"
    }

    async fn initialize(&self) -> Result<(), ScreenplayError> {
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), ScreenplayError> {
        Err(ScreenplayError::upstream(
            "broken cleanup",
            anyhow::anyhow!("resource refused to release"),
        ))
    }
}
