//! Compute tasks - state-changing actions performed through
//! [`OperateMlWorkspace`]

use crate::client::ComputeState;
use crate::workspace::OperateMlWorkspace;
use async_trait::async_trait;
use screenplay_core::{Actor, ScreenplayError, Task};
use std::time::Duration;

fn non_empty(task: &str, parameter: &str, value: String) -> Result<String, ScreenplayError> {
    if value.trim().is_empty() {
        Err(ScreenplayError::InvalidParameter {
            task: task.to_string(),
            parameter: parameter.to_string(),
        })
    } else {
        Ok(value)
    }
}

/// Start a compute instance
#[derive(Debug)]
pub struct StartCompute {
    instance: String,
}

impl StartCompute {
    /// Build the task; the instance name must be non-empty
    pub fn named(instance: impl Into<String>) -> Result<Self, ScreenplayError> {
        Ok(Self {
            instance: non_empty("start compute", "instance", instance.into())?,
        })
    }
}

#[async_trait]
impl Task for StartCompute {
    fn name(&self) -> String {
        format!("start compute {}", self.instance)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let workspace = actor.ability::<OperateMlWorkspace>()?;
        workspace.start_compute(&self.instance).await
    }
}

/// Stop a compute instance
#[derive(Debug)]
pub struct StopCompute {
    instance: String,
}

impl StopCompute {
    /// Build the task; the instance name must be non-empty
    pub fn named(instance: impl Into<String>) -> Result<Self, ScreenplayError> {
        Ok(Self {
            instance: non_empty("stop compute", "instance", instance.into())?,
        })
    }
}

#[async_trait]
impl Task for StopCompute {
    fn name(&self) -> String {
        format!("stop compute {}", self.instance)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let workspace = actor.ability::<OperateMlWorkspace>()?;
        workspace.stop_compute(&self.instance).await
    }
}

/// Wait until a compute instance reaches a target state
#[derive(Debug)]
pub struct WaitForComputeState {
    instance: String,
    target: ComputeState,
    timeout: Option<Duration>,
}

impl WaitForComputeState {
    /// Build the task; the instance name must be non-empty
    pub fn of(
        instance: impl Into<String>,
        target: ComputeState,
    ) -> Result<Self, ScreenplayError> {
        Ok(Self {
            instance: non_empty("wait for compute state", "instance", instance.into())?,
            target,
            timeout: None,
        })
    }

    /// Override the configured state timeout
    #[must_use]
    pub fn within(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Task for WaitForComputeState {
    fn name(&self) -> String {
        format!("wait for compute {} to reach {}", self.instance, self.target)
    }

    async fn perform_as(&self, actor: &Actor) -> Result<(), ScreenplayError> {
        let workspace = actor.ability::<OperateMlWorkspace>()?;
        match self.timeout {
            Some(timeout) => {
                workspace
                    .wait_for_compute_state_within(&self.instance, self.target, timeout)
                    .await?
            }
            None => {
                workspace
                    .wait_for_compute_state(&self.instance, self.target)
                    .await?
            }
        };
        Ok(())
    }
}
