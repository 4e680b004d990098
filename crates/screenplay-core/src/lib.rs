//! Screenplay Core - actor runtime for scenario automation
//!
//! The runtime that drives scenarios:
//! - Actors hold abilities (one per concrete type) and a typed memory
//! - Tasks perform named business actions as an actor
//! - Questions evaluate named queries for assertions
//! - Bounded waits and linear retries shared by the abilities
//!
//! # Example
//!
//! ```rust
//! use screenplay_core::Actor;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), screenplay_core::ScreenplayError> {
//! let actor = Actor::named("Alice");
//! actor.remember("compute", "c1".to_string())?;
//! assert_eq!(actor.recall::<String>("compute")?, "c1");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod ability;
pub mod actor;
pub mod context;
pub mod error;
mod memory;
pub mod question;
pub mod task;
pub mod wait;

// Re-exports for convenience
pub use ability::Ability;
pub use actor::Actor;
pub use context::RunContext;
pub use error::{CleanupFailure, CleanupReport, ScreenplayError};
pub use question::Question;
pub use task::Task;
pub use wait::{retry, wait_until, PollSettings};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for writing abilities, tasks and questions
    pub use crate::{
        Ability, Actor, CleanupReport, PollSettings, Question, RunContext, ScreenplayError, Task,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
