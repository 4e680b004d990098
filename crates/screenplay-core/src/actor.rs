//! Actor - the central orchestrator of the screenplay runtime
//!
//! An actor holds a capability set (abilities, one per concrete type), a
//! typed key/value memory, and drives task execution and question
//! evaluation. Concurrent actors are independent; any single actor's
//! task sequence is strictly serial.

use crate::ability::Ability;
use crate::context::RunContext;
use crate::error::{CleanupReport, ScreenplayError};
use crate::memory::{Memory, RecallError};
use crate::question::Question;
use crate::task::Task;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct AbilityEntry {
    /// Lifecycle handle used for cleanup
    ability: Arc<dyn Ability>,
    /// Same instance, kept downcastable to its concrete type
    typed: Arc<dyn Any + Send + Sync>,
}

/// The entity performing actions and queries in a scenario.
///
/// # Example
///
/// ```rust,ignore
/// let alice = Actor::named("Alice").with_context(context);
/// alice.acquire(OperateMlWorkspace::with_client(client, &settings)).await?;
/// alice.attempts_to(StartCompute::named("c1")?).await?;
/// alice.should(ComputeStateIs::expected("c1", ComputeState::Running)).await?;
/// alice.dispose().await;
/// ```
pub struct Actor {
    name: String,
    context: RunContext,
    abilities: DashMap<TypeId, AbilityEntry>,
    memory: Memory,
    disposed: AtomicBool,
}

impl Actor {
    /// Create an actor with the given name and a default context
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: RunContext::default(),
            abilities: DashMap::new(),
            memory: Memory::default(),
            disposed: AtomicBool::new(false),
        }
    }

    /// Replace the run context (builder-style, before granting abilities)
    #[inline]
    #[must_use]
    pub fn with_context(mut self, context: RunContext) -> Self {
        self.context = context;
        self
    }

    /// Actor name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The run context this actor was created with
    #[inline]
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Grant an ability, keyed by its concrete type.
    ///
    /// Granting a second ability of the same type replaces the first and
    /// logs a warning; the replaced instance is not cleaned up. Callers
    /// that care should `dispose` or avoid the duplicate grant.
    ///
    /// # Errors
    /// - `ScreenplayError::ActorDisposed` after `dispose`
    pub fn can<T: Ability>(&self, ability: T) -> Result<&Self, ScreenplayError> {
        self.ensure_alive()?;

        let name = ability.name().to_string();
        let arc = Arc::new(ability);
        let entry = AbilityEntry {
            ability: arc.clone(),
            typed: arc,
        };

        if let Some(old) = self.abilities.insert(TypeId::of::<T>(), entry) {
            tracing::warn!(
                actor = %self.name,
                ability = %old.ability.name(),
                "replacing an already-granted ability; the previous instance was not cleaned up"
            );
        }
        tracing::debug!(actor = %self.name, ability = %name, "ability granted");
        Ok(self)
    }

    /// Initialize an ability, then grant it.
    ///
    /// Nothing is registered if initialization fails, so a task can never
    /// see a half-initialized capability.
    pub async fn acquire<T: Ability>(&self, ability: T) -> Result<&Self, ScreenplayError> {
        self.ensure_alive()?;

        tracing::debug!(actor = %self.name, ability = %ability.name(), "initializing ability");
        ability.initialize().await?;
        self.can(ability)
    }

    /// Look up the ability registered under type `T`.
    ///
    /// # Errors
    /// - `ScreenplayError::MissingAbility` naming this actor and `T`
    /// - `ScreenplayError::ActorDisposed` after `dispose`
    pub fn ability<T: Ability>(&self) -> Result<Arc<T>, ScreenplayError> {
        self.ensure_alive()?;

        let missing = || ScreenplayError::MissingAbility {
            actor: self.name.clone(),
            ability: std::any::type_name::<T>().to_string(),
        };

        let entry = self.abilities.get(&TypeId::of::<T>()).ok_or_else(missing)?;
        entry.typed.clone().downcast::<T>().map_err(|_| missing())
    }

    /// Check whether this actor holds an ability of type `T`. Never
    /// fails; a disposed actor simply has no abilities left.
    #[must_use]
    pub fn has_ability<T: Ability>(&self) -> bool {
        self.abilities.contains_key(&TypeId::of::<T>())
    }

    /// Perform one task, logging intent and outcome
    pub async fn attempts_to<T: Task>(&self, task: T) -> Result<&Self, ScreenplayError> {
        self.ensure_alive()?;
        self.perform(&task).await?;
        Ok(self)
    }

    /// Fluent alias of [`attempts_to`](Actor::attempts_to)
    pub async fn and<T: Task>(&self, task: T) -> Result<&Self, ScreenplayError> {
        self.attempts_to(task).await
    }

    /// Perform tasks strictly in order, each completing before the next
    /// starts, short-circuiting on the first failure.
    pub async fn attempts_to_all(
        &self,
        tasks: Vec<Box<dyn Task>>,
    ) -> Result<&Self, ScreenplayError> {
        self.ensure_alive()?;
        for task in &tasks {
            self.perform(task.as_ref()).await?;
        }
        Ok(self)
    }

    async fn perform(&self, task: &dyn Task) -> Result<(), ScreenplayError> {
        let task_name = task.name();
        tracing::info!(actor = %self.name, task = %task_name, "attempting");
        match task.perform_as(self).await {
            Ok(()) => {
                tracing::info!(actor = %self.name, task = %task_name, "completed");
                Ok(())
            }
            Err(error) => {
                tracing::error!(actor = %self.name, task = %task_name, %error, "task failed");
                Err(error)
            }
        }
    }

    /// Evaluate a question and return its typed answer.
    ///
    /// Every call re-queries the live system; answers are never cached.
    pub async fn asks_for<Q: Question>(&self, question: Q) -> Result<Q::Answer, ScreenplayError> {
        self.ensure_alive()?;

        let text = question.question();
        tracing::info!(actor = %self.name, question = %text, "asking");
        match question.answered_by(self).await {
            Ok(answer) => {
                tracing::debug!(actor = %self.name, question = %text, "answered");
                Ok(answer)
            }
            Err(error) => {
                tracing::error!(actor = %self.name, question = %text, %error, "question failed");
                Err(error)
            }
        }
    }

    /// Evaluate a boolean question, failing with an assertion error
    /// naming this actor and the question when the answer is `false`.
    pub async fn should<Q>(&self, question: Q) -> Result<&Self, ScreenplayError>
    where
        Q: Question<Answer = bool>,
    {
        let text = question.question();
        if self.asks_for(question).await? {
            Ok(self)
        } else {
            Err(ScreenplayError::Assertion {
                actor: self.name.clone(),
                question: text,
                detail: "answered false".to_string(),
            })
        }
    }

    /// Evaluate a question and apply a caller-supplied inspection to the
    /// answer; a check failure becomes an assertion error.
    pub async fn should_see<Q, F>(&self, question: Q, check: F) -> Result<&Self, ScreenplayError>
    where
        Q: Question,
        F: FnOnce(Q::Answer) -> anyhow::Result<()>,
    {
        let text = question.question();
        let answer = self.asks_for(question).await?;
        check(answer).map_err(|error| ScreenplayError::Assertion {
            actor: self.name.clone(),
            question: text,
            detail: error.to_string(),
        })?;
        Ok(self)
    }

    /// Store a value under a key; an existing key is overwritten
    pub fn remember<V>(&self, key: impl Into<String>, value: V) -> Result<&Self, ScreenplayError>
    where
        V: Any + Send + Sync,
    {
        self.ensure_alive()?;
        self.memory.remember(key, value);
        Ok(self)
    }

    /// Retrieve a remembered value.
    ///
    /// # Errors
    /// - `ScreenplayError::KeyNotFound` when the key was never remembered
    /// - `ScreenplayError::TypeMismatch` when it was remembered under a
    ///   different type
    pub fn recall<V>(&self, key: &str) -> Result<V, ScreenplayError>
    where
        V: Any + Clone,
    {
        self.ensure_alive()?;
        self.memory.recall(key).map_err(|error| match error {
            RecallError::KeyNotFound => ScreenplayError::KeyNotFound {
                actor: self.name.clone(),
                key: key.to_string(),
            },
            RecallError::TypeMismatch { stored } => ScreenplayError::TypeMismatch {
                actor: self.name.clone(),
                key: key.to_string(),
                requested: std::any::type_name::<V>(),
                stored,
            },
        })
    }

    /// Check whether a key was remembered. Never fails.
    #[must_use]
    pub fn remembers(&self, key: &str) -> bool {
        self.memory.contains(key)
    }

    /// Drop a remembered key, reporting whether it existed
    pub fn forget(&self, key: &str) -> Result<bool, ScreenplayError> {
        self.ensure_alive()?;
        Ok(self.memory.forget(key))
    }

    /// Clean up every held ability and clear the actor's state.
    ///
    /// Best-effort: a cleanup failure on one ability is recorded and
    /// logged as a warning, and the remaining abilities are still cleaned
    /// up. After disposal every other method fails with `ActorDisposed`.
    /// Disposing twice is a no-op.
    pub async fn dispose(&self) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.disposed.swap(true, Ordering::SeqCst) {
            return report;
        }

        let keys: Vec<TypeId> = self.abilities.iter().map(|entry| *entry.key()).collect();
        for key in keys {
            if let Some((_, entry)) = self.abilities.remove(&key) {
                let ability_name = entry.ability.name().to_string();
                if let Err(error) = entry.ability.cleanup().await {
                    tracing::warn!(
                        actor = %self.name,
                        ability = %ability_name,
                        %error,
                        "ability cleanup failed, continuing with the rest"
                    );
                    report.record(ability_name, error);
                }
            }
        }

        self.memory.clear();
        tracing::info!(
            actor = %self.name,
            failures = report.failures.len(),
            "actor disposed"
        );
        report
    }

    fn ensure_alive(&self) -> Result<(), ScreenplayError> {
        if self.disposed.load(Ordering::SeqCst) {
            Err(ScreenplayError::ActorDisposed {
                actor: self.name.clone(),
            })
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.name)
            .field("abilities", &self.abilities.len())
            .field("disposed", &self.disposed.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct TakeNotes {
        initialized: AtomicBool,
    }

    #[async_trait]
    impl Ability for TakeNotes {
        fn name(&self) -> &str {
            "take notes"
        }

        async fn initialize(&self) -> Result<(), ScreenplayError> {
            self.initialized.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn cleanup(&self) -> Result<(), ScreenplayError> {
            Ok(())
        }
    }

    struct Sing;

    #[async_trait]
    impl Ability for Sing {
        fn name(&self) -> &str {
            "sing"
        }

        async fn initialize(&self) -> Result<(), ScreenplayError> {
            Ok(())
        }

        async fn cleanup(&self) -> Result<(), ScreenplayError> {
            Err(ScreenplayError::upstream(
                "sing cleanup",
                anyhow::anyhow!("microphone already unplugged"),
            ))
        }
    }

    struct RecordStep {
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    #[async_trait]
    impl Task for RecordStep {
        fn name(&self) -> String {
            format!("record step {}", self.label)
        }

        async fn perform_as(&self, _actor: &Actor) -> Result<(), ScreenplayError> {
            self.log.lock().unwrap().push(self.label);
            if self.fail {
                Err(ScreenplayError::upstream(
                    "step",
                    anyhow::anyhow!("{} blew up", self.label),
                ))
            } else {
                Ok(())
            }
        }
    }

    struct Answer(bool);

    #[async_trait]
    impl Question for Answer {
        type Answer = bool;

        fn question(&self) -> String {
            "the fixed answer".to_string()
        }

        async fn answered_by(&self, _actor: &Actor) -> Result<bool, ScreenplayError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn granted_ability_is_immediately_visible() {
        let actor = Actor::named("Alice");
        actor.can(TakeNotes::default()).unwrap();
        assert!(actor.has_ability::<TakeNotes>());
        assert!(actor.ability::<TakeNotes>().is_ok());
    }

    #[tokio::test]
    async fn missing_ability_names_actor_and_type() {
        let actor = Actor::named("Bob");
        assert!(!actor.has_ability::<TakeNotes>());

        let err = actor.ability::<TakeNotes>().unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Bob"));
        assert!(text.contains("TakeNotes"));
    }

    #[tokio::test]
    async fn acquire_initializes_before_granting() {
        let actor = Actor::named("Alice");
        actor.acquire(TakeNotes::default()).await.unwrap();

        let notes = actor.ability::<TakeNotes>().unwrap();
        assert!(notes.initialized.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn duplicate_grant_replaces_instance() {
        let actor = Actor::named("Alice");
        let first = TakeNotes::default();
        first.initialized.store(true, Ordering::SeqCst);
        actor.can(first).unwrap();
        actor.can(TakeNotes::default()).unwrap();

        // The second (uninitialized) instance won.
        let current = actor.ability::<TakeNotes>().unwrap();
        assert!(!current.initialized.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn memory_round_trip_and_errors() {
        let actor = Actor::named("Alice");
        actor.remember("compute", "c1".to_string()).unwrap();

        assert!(actor.remembers("compute"));
        assert_eq!(actor.recall::<String>("compute").unwrap(), "c1");

        assert!(!actor.remembers("never"));
        let missing = actor.recall::<String>("never").unwrap_err();
        assert!(matches!(missing, ScreenplayError::KeyNotFound { .. }));

        let mismatched = actor.recall::<u32>("compute").unwrap_err();
        match mismatched {
            ScreenplayError::TypeMismatch { requested, .. } => assert_eq!(requested, "u32"),
            other => panic!("expected a type mismatch, got {other}"),
        }
    }

    #[tokio::test]
    async fn task_sequence_short_circuits_in_order() {
        let actor = Actor::named("Alice");
        let log = Arc::new(Mutex::new(Vec::new()));

        let tasks: Vec<Box<dyn Task>> = vec![
            Box::new(RecordStep {
                label: "t1",
                log: log.clone(),
                fail: false,
            }),
            Box::new(RecordStep {
                label: "t2",
                log: log.clone(),
                fail: true,
            }),
            Box::new(RecordStep {
                label: "t3",
                log: log.clone(),
                fail: false,
            }),
        ];

        let err = actor.attempts_to_all(tasks).await.unwrap_err();
        assert!(err.to_string().contains("t2 blew up"));
        assert_eq!(*log.lock().unwrap(), vec!["t1", "t2"]);
    }

    #[tokio::test]
    async fn should_passes_through_on_true() {
        let actor = Actor::named("Alice");
        actor.should(Answer(true)).await.unwrap();
    }

    #[tokio::test]
    async fn should_fails_naming_actor_and_question_on_false() {
        let actor = Actor::named("Alice");
        let err = actor.should(Answer(false)).await.unwrap_err();
        assert!(err.is_assertion());
        let text = err.to_string();
        assert!(text.contains("Alice"));
        assert!(text.contains("the fixed answer"));
    }

    #[tokio::test]
    async fn should_see_turns_check_failures_into_assertions() {
        let actor = Actor::named("Alice");
        let err = actor
            .should_see(Answer(true), |answer| {
                anyhow::ensure!(!answer, "expected a false answer");
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(err.is_assertion());
        assert!(err.to_string().contains("expected a false answer"));
    }

    #[tokio::test]
    async fn dispose_is_best_effort_and_final() {
        let actor = Actor::named("Alice");
        actor.can(Sing).unwrap();
        actor.can(TakeNotes::default()).unwrap();
        actor.remember("key", 1u8).unwrap();

        let report = actor.dispose().await;
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].ability, "sing");

        // Everything is gone and further calls fail fast.
        assert!(!actor.has_ability::<TakeNotes>());
        assert!(!actor.remembers("key"));
        assert!(matches!(
            actor.can(TakeNotes::default()),
            Err(ScreenplayError::ActorDisposed { .. })
        ));
        assert!(matches!(
            actor.recall::<u8>("key"),
            Err(ScreenplayError::ActorDisposed { .. })
        ));

        // Second dispose is a no-op.
        let report = actor.dispose().await;
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn disposed_actor_rejects_tasks_and_questions() {
        let actor = Actor::named("Alice");
        actor.dispose().await;

        let log = Arc::new(Mutex::new(Vec::new()));
        let err = actor
            .attempts_to(RecordStep {
                label: "t1",
                log: log.clone(),
                fail: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenplayError::ActorDisposed { .. }));
        assert!(log.lock().unwrap().is_empty());

        let err = actor.asks_for(Answer(true)).await.unwrap_err();
        assert!(matches!(err, ScreenplayError::ActorDisposed { .. }));
    }
}
