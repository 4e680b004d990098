//! Ability trait - a capability an actor can hold
//!
//! An ability owns exactly one external integration surface (a browser
//! page, a cloud client) and exposes domain operations over it. Actors
//! hold at most one instance per concrete ability type.

use crate::error::ScreenplayError;
use async_trait::async_trait;
use std::any::Any;

/// A capability an actor can hold.
///
/// Lifecycle contract:
/// - [`initialize`](Ability::initialize) must fully succeed, including
///   proving connectivity to the backing collaborator, before any task
///   uses the ability.
/// - [`cleanup`](Ability::cleanup) releases any owned external handle and
///   must tolerate resources that are already released.
#[async_trait]
pub trait Ability: Any + Send + Sync {
    /// Human-readable capability name, e.g. "operate an ML workspace"
    fn name(&self) -> &str;

    /// Acquire credentials and prove connectivity to the collaborator
    async fn initialize(&self) -> Result<(), ScreenplayError>;

    /// Release any held connection or handle
    async fn cleanup(&self) -> Result<(), ScreenplayError>;
}
