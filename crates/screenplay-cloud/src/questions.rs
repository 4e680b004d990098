//! Compute questions - read-only queries answered through
//! [`OperateMlWorkspace`]

use crate::client::{ComputeInstance, ComputeState};
use crate::workspace::OperateMlWorkspace;
use async_trait::async_trait;
use screenplay_core::{Actor, Question, ScreenplayError};

/// Full status of a compute instance
#[derive(Debug)]
pub struct ComputeStatus {
    instance: String,
}

impl ComputeStatus {
    /// Build the question for the given instance
    #[must_use]
    pub fn of(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }
}

#[async_trait]
impl Question for ComputeStatus {
    type Answer = ComputeInstance;

    fn question(&self) -> String {
        format!("status of compute {}", self.instance)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<ComputeInstance, ScreenplayError> {
        actor
            .ability::<OperateMlWorkspace>()?
            .compute_status(&self.instance)
            .await
    }
}

/// Whether a compute instance is currently in a given state
#[derive(Debug)]
pub struct ComputeStateIs {
    instance: String,
    expected: ComputeState,
}

impl ComputeStateIs {
    /// Build the question for the given instance and state
    #[must_use]
    pub fn expected(instance: impl Into<String>, state: ComputeState) -> Self {
        Self {
            instance: instance.into(),
            expected: state,
        }
    }
}

#[async_trait]
impl Question for ComputeStateIs {
    type Answer = bool;

    fn question(&self) -> String {
        format!("compute {} is {}", self.instance, self.expected)
    }

    async fn answered_by(&self, actor: &Actor) -> Result<bool, ScreenplayError> {
        let instance = actor
            .ability::<OperateMlWorkspace>()?
            .compute_status(&self.instance)
            .await?;
        Ok(instance.state == self.expected)
    }
}

/// Whether the configured workspace is reachable
#[derive(Debug)]
pub struct WorkspaceIsReachable;

impl WorkspaceIsReachable {
    /// Build the question
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        Self
    }
}

#[async_trait]
impl Question for WorkspaceIsReachable {
    type Answer = bool;

    fn question(&self) -> String {
        "the workspace is reachable".to_string()
    }

    async fn answered_by(&self, actor: &Actor) -> Result<bool, ScreenplayError> {
        actor
            .ability::<OperateMlWorkspace>()?
            .workspace_exists()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockWorkspaceClient;
    use crate::credentials::CredentialChain;
    use screenplay_config::Settings;
    use screenplay_core::Actor;

    fn operating_actor(client: MockWorkspaceClient) -> Actor {
        let actor = Actor::named("Alice");
        actor
            .can(OperateMlWorkspace::with_client(
                Box::new(client),
                CredentialChain::new(),
                &Settings::default(),
            ))
            .unwrap();
        actor
    }

    fn running_instance() -> ComputeInstance {
        ComputeInstance {
            name: "gpu-box".to_string(),
            state: ComputeState::Running,
            vm_size: "Standard_NC6".to_string(),
            location: "westus2".to_string(),
        }
    }

    #[tokio::test]
    async fn compute_status_is_read_fresh_each_time() {
        let mut client = MockWorkspaceClient::new();
        client
            .expect_compute_status()
            .times(2)
            .returning(|_| Ok(running_instance()));

        let actor = operating_actor(client);
        let first = actor.asks_for(ComputeStatus::of("gpu-box")).await.unwrap();
        let second = actor.asks_for(ComputeStatus::of("gpu-box")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.state, ComputeState::Running);
    }

    #[tokio::test]
    async fn compute_state_check_feeds_should() {
        let mut client = MockWorkspaceClient::new();
        client
            .expect_compute_status()
            .returning(|_| Ok(running_instance()));

        let actor = operating_actor(client);
        actor
            .should(ComputeStateIs::expected("gpu-box", ComputeState::Running))
            .await
            .unwrap();

        let err = actor
            .should(ComputeStateIs::expected("gpu-box", ComputeState::Stopped))
            .await
            .unwrap_err();
        assert!(err.is_assertion());
        assert!(err.to_string().contains("gpu-box"));
    }

    #[tokio::test]
    async fn reachability_reflects_the_client_answer() {
        let mut client = MockWorkspaceClient::new();
        client.expect_workspace_exists().returning(|| Ok(false));

        let actor = operating_actor(client);
        let reachable = actor.asks_for(WorkspaceIsReachable::now()).await.unwrap();
        assert!(!reachable);
    }
}
