//! Screenplay Cloud - ML workspace capability for screenplay scenarios
//!
//! Everything cloud-shaped lives behind two seams:
//! - [`WorkspaceClient`] abstracts the resource-management backend
//! - [`CredentialSource`] abstracts token acquisition, composed into an
//!   ordered [`CredentialChain`]
//!
//! [`OperateMlWorkspace`] is the ability an actor acquires to start and
//! stop compute instances and to wait on their state transitions. Tasks
//! and questions cover the compute lifecycle.

#![warn(unreachable_pub)]

pub mod client;
pub mod credentials;
pub mod questions;
pub mod tasks;
pub mod workspace;

// Re-exports for convenience
pub use client::{CloudError, ComputeInstance, ComputeState, WorkspaceClient};
pub use credentials::{
    ClientSecretSource, Credential, CredentialChain, CredentialError, CredentialSource,
};
pub use questions::{ComputeStateIs, ComputeStatus, WorkspaceIsReachable};
pub use tasks::{StartCompute, StopCompute, WaitForComputeState};
pub use workspace::OperateMlWorkspace;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
