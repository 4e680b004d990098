//! Workspace-client seam - the cloud collaborator surface
//!
//! The runtime never calls a cloud SDK directly; it talks to whatever
//! implements [`WorkspaceClient`]. A production implementation wraps the
//! resource-management SDK; tests script a stub.

use crate::credentials::Credential;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use screenplay_core::ScreenplayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a compute instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeState {
    /// Provisioning or booting
    Starting,
    /// Ready for work
    Running,
    /// Shutting down
    Stopping,
    /// Deallocated
    Stopped,
    /// Provisioning failed
    Failed,
    /// Anything the backend reports that we do not model
    Unknown,
}

impl FromStr for ComputeState {
    type Err = std::convert::Infallible;

    /// Backend state strings are matched case-insensitively; anything
    /// unrecognized maps to [`ComputeState::Unknown`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "starting" | "creating" => Self::Starting,
            "running" => Self::Running,
            "stopping" => Self::Stopping,
            "stopped" | "deallocated" => Self::Stopped,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        })
    }
}

impl std::fmt::Display for ComputeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
            Self::Stopped => "Stopped",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        };
        write!(f, "{text}")
    }
}

/// A compute instance as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeInstance {
    /// Instance name
    pub name: String,
    /// Current lifecycle state
    pub state: ComputeState,
    /// VM size, e.g. "Standard_DS3_v2"
    pub vm_size: String,
    /// Region the instance lives in
    pub location: String,
}

/// Errors surfaced by a workspace client
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The credential was rejected
    #[error("authentication failed: {0}")]
    Auth(String),

    /// No compute instance with the given name
    #[error("compute instance {0} not found")]
    ComputeNotFound(String),

    /// The configured workspace does not exist or is not visible
    #[error("workspace {0} not found")]
    WorkspaceNotFound(String),

    /// Any other backend failure
    #[error("cloud api error: {0}")]
    Api(#[from] anyhow::Error),
}

impl From<CloudError> for ScreenplayError {
    fn from(err: CloudError) -> Self {
        ScreenplayError::upstream("cloud workspace client", err)
    }
}

/// A client scoped to one subscription/resource-group/workspace triple.
///
/// `connect` must succeed before any other operation is called;
/// `disconnect` must tolerate a connection that is already gone.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkspaceClient: Send + Sync {
    /// Authenticate and open the connection
    async fn connect(&self, credential: &Credential) -> Result<(), CloudError>;

    /// Release the connection
    async fn disconnect(&self) -> Result<(), CloudError>;

    /// Whether the configured workspace is reachable
    async fn workspace_exists(&self) -> Result<bool, CloudError>;

    /// Request a compute instance start
    async fn start_compute(&self, name: &str) -> Result<(), CloudError>;

    /// Request a compute instance stop
    async fn stop_compute(&self, name: &str) -> Result<(), CloudError>;

    /// Current status of a compute instance
    async fn compute_status(&self, name: &str) -> Result<ComputeInstance, CloudError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn states_parse_case_insensitively() {
        assert_eq!("RUNNING".parse::<ComputeState>().unwrap(), ComputeState::Running);
        assert_eq!("stopped".parse::<ComputeState>().unwrap(), ComputeState::Stopped);
        assert_eq!("Creating".parse::<ComputeState>().unwrap(), ComputeState::Starting);
        assert_eq!("deallocated".parse::<ComputeState>().unwrap(), ComputeState::Stopped);
    }

    #[test]
    fn unrecognized_states_are_unknown_not_errors() {
        assert_eq!(
            "Resizing".parse::<ComputeState>().unwrap(),
            ComputeState::Unknown
        );
    }

    #[test]
    fn cloud_errors_become_upstream_screenplay_errors() {
        let err: ScreenplayError = CloudError::ComputeNotFound("c1".to_string()).into();
        let text = err.to_string();
        assert!(text.contains("cloud workspace client"));
        assert!(text.contains("c1"));
    }
}
