//! OperateMlWorkspace - the ability to manage an ML workspace
//!
//! Owns one workspace client, the credential chain that authenticates it,
//! and the compute polling settings its waits run under. Initialization
//! validates configuration, acquires a credential and proves the
//! workspace is reachable, so a misconfigured run fails before the first
//! task.

use crate::client::{CloudError, ComputeInstance, ComputeState, WorkspaceClient};
use crate::credentials::CredentialChain;
use async_trait::async_trait;
use screenplay_config::{AzureSettings, ComputeSettings, Settings};
use screenplay_core::{wait_until, Ability, PollSettings, ScreenplayError};
use std::time::Duration;

/// The ability to manage an ML workspace and its compute instances
pub struct OperateMlWorkspace {
    client: Box<dyn WorkspaceClient>,
    chain: CredentialChain,
    azure: AzureSettings,
    compute: ComputeSettings,
}

impl OperateMlWorkspace {
    /// Wrap a workspace client with the run's credential chain and
    /// compute settings
    #[must_use]
    pub fn with_client(
        client: Box<dyn WorkspaceClient>,
        chain: CredentialChain,
        settings: &Settings,
    ) -> Self {
        Self {
            client,
            chain,
            azure: settings.azure.clone(),
            compute: settings.compute.clone(),
        }
    }

    /// Default compute instance from settings, or a missing-key error
    pub fn default_instance(&self) -> Result<&str, ScreenplayError> {
        match self.compute.instance_name.as_deref() {
            Some(name) if !name.trim().is_empty() => Ok(name),
            _ => Err(ScreenplayError::MissingConfig {
                key: "compute.instance_name".to_string(),
            }),
        }
    }

    /// Request a compute instance start
    pub async fn start_compute(&self, name: &str) -> Result<(), ScreenplayError> {
        tracing::info!(compute = name, "starting compute instance");
        self.client.start_compute(name).await?;
        Ok(())
    }

    /// Request a compute instance stop
    pub async fn stop_compute(&self, name: &str) -> Result<(), ScreenplayError> {
        tracing::info!(compute = name, "stopping compute instance");
        self.client.stop_compute(name).await?;
        Ok(())
    }

    /// Current status of a compute instance
    pub async fn compute_status(&self, name: &str) -> Result<ComputeInstance, ScreenplayError> {
        Ok(self.client.compute_status(name).await?)
    }

    /// Whether the configured workspace is reachable
    pub async fn workspace_exists(&self) -> Result<bool, ScreenplayError> {
        Ok(self.client.workspace_exists().await?)
    }

    /// Poll until the instance reaches `target`, using the configured
    /// compute poll interval and state timeout.
    ///
    /// A `Failed` report aborts the wait immediately unless `Failed` is
    /// the target. Status errors abort too; a broken client is not a
    /// timeout.
    pub async fn wait_for_compute_state(
        &self,
        name: &str,
        target: ComputeState,
    ) -> Result<ComputeInstance, ScreenplayError> {
        self.wait_for_compute_state_within(name, target, self.compute.state_timeout())
            .await
    }

    /// Same as [`wait_for_compute_state`](Self::wait_for_compute_state)
    /// with an explicit deadline.
    pub async fn wait_for_compute_state_within(
        &self,
        name: &str,
        target: ComputeState,
        timeout: Duration,
    ) -> Result<ComputeInstance, ScreenplayError> {
        let subject = format!("compute instance {name}");
        let expected = target.to_string();
        let poll = PollSettings::new(self.compute.poll_interval(), timeout);
        let client = self.client.as_ref();

        tracing::info!(compute = name, target = %target, ?timeout, "waiting for compute state");
        wait_until(&subject, &expected, poll, move || async move {
            let instance = client.compute_status(name).await?;
            tracing::debug!(compute = name, state = %instance.state, "compute state polled");
            if instance.state == target {
                Ok(Some(instance))
            } else if instance.state == ComputeState::Failed {
                Err(ScreenplayError::upstream(
                    format!("compute instance {name}"),
                    anyhow::anyhow!("entered Failed while waiting for {target}"),
                ))
            } else {
                Ok(None)
            }
        })
        .await
    }
}

#[async_trait]
impl Ability for OperateMlWorkspace {
    fn name(&self) -> &str {
        "operate the ML workspace"
    }

    async fn initialize(&self) -> Result<(), ScreenplayError> {
        // Surface configuration gaps one dotted key at a time.
        let workspace = self.azure.require_workspace_name()?.to_string();
        self.azure.require_subscription_id()?;
        self.azure.require_resource_group()?;

        let credential = self.chain.acquire().await.map_err(ScreenplayError::from)?;
        self.client.connect(&credential).await?;

        if !self.client.workspace_exists().await? {
            return Err(CloudError::WorkspaceNotFound(workspace).into());
        }
        tracing::info!(workspace, "workspace connection established");
        Ok(())
    }

    async fn cleanup(&self) -> Result<(), ScreenplayError> {
        if let Err(error) = self.client.disconnect().await {
            tracing::debug!(%error, "disconnect after use failed");
        }
        Ok(())
    }
}

impl std::fmt::Debug for OperateMlWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperateMlWorkspace")
            .field("workspace", &self.azure.workspace_name)
            .field("compute", &self.compute)
            .finish()
    }
}
