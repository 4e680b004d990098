//! Task trait - a named business action performed as an actor

use crate::actor::Actor;
use crate::error::ScreenplayError;
use async_trait::async_trait;

/// One encapsulated business action with its bound parameters.
///
/// Tasks are built through named factories that validate their required
/// parameters. `perform_as` resolves the abilities it needs off the actor
/// and issues the underlying operation; it carries no retry of its own,
/// so a failure propagates straight to the calling `attempts_to`.
/// Re-invoking a task re-issues the operation.
#[async_trait]
pub trait Task: Send + Sync {
    /// Task name used in logs and errors, e.g. "start compute c1"
    fn name(&self) -> String;

    /// Perform the action as the given actor
    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError>;
}
