//! Question trait - a named read-only query evaluated by an actor

use crate::actor::Actor;
use crate::error::ScreenplayError;
use async_trait::async_trait;

/// One encapsulated query with its bound parameters.
///
/// Answers are computed fresh on every `answered_by` call; questions never
/// cache. The answer type is whatever the caller needs: a bool for
/// `should`, or a domain object inspected via `should_see`.
#[async_trait]
pub trait Question: Send + Sync {
    /// The typed answer this question produces
    type Answer: Send;

    /// Question text used in logs and assertion errors
    fn question(&self) -> String;

    /// Evaluate the query as the given actor
    async fn answered_by(&self, actor: &Actor) -> Result<Self::Answer, ScreenplayError>;
}
