// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission runner: walks a mission's steps in order.
//!
//! Before each step, and once more before completing, the runner reads the
//! mission status. A pause or cancel written by another caller is honoured
//! there; the step in flight at the time is never interrupted.

use std::sync::Arc;

use wp_core::{Clock, LogLevel, MissionId, MissionStatus, Step};

use crate::audit::Audit;
use crate::error::MissionFailure;
use crate::executor::StepExecutor;
use crate::registry::MissionRegistry;

/// How a run that did not fail came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionOutcome {
    Completed,
    /// Stopped at a checkpoint after `pause_mission`
    Paused,
}

wp_core::simple_display! {
    MissionOutcome {
        Completed => "completed",
        Paused => "paused",
    }
}

/// Settled result of one mission run
pub type RunResult = Result<MissionOutcome, MissionFailure>;

pub(crate) struct MissionRunner<C: Clock> {
    registry: Arc<MissionRegistry<C>>,
    executor: StepExecutor<C>,
}

impl<C: Clock> MissionRunner<C> {
    pub(crate) fn new(registry: Arc<MissionRegistry<C>>, executor: StepExecutor<C>) -> Self {
        Self { registry, executor }
    }

    /// Mark the mission running from its first step.
    ///
    /// Returns the steps to hand to [`run`](Self::run), or `None` if the
    /// mission is gone. The status is written here, before any task is
    /// spawned, so a pause or cancel issued right after is never overwritten.
    pub(crate) fn start(&self, id: &str) -> Option<Arc<[Step]>> {
        let now = self.registry.clock().epoch_ms();
        let steps = self.registry.update(id, |m| {
            m.status = MissionStatus::Running;
            m.started_at_ms = Some(now);
            m.completed_at_ms = None;
            m.current_step_index = 0;
            Arc::clone(&m.steps)
        })?;
        Audit::new(&self.registry, id).record(
            LogLevel::Info,
            None,
            "Starting mission",
            Some(serde_json::json!({ "steps": steps.len() })),
        );
        Some(steps)
    }

    /// Walk the steps of a mission already marked by [`start`](Self::start)
    pub(crate) async fn run(&self, mission_id: MissionId, steps: Arc<[Step]>) -> RunResult {
        let id = mission_id.as_str();
        let audit = Audit::new(&self.registry, id);

        for (index, step) in steps.iter().enumerate() {
            if let Some(outcome) = self.enter_step(id, index, step)? {
                return Ok(outcome);
            }

            if let Some(check) = &step.condition {
                match check.check().await {
                    Ok(true) => {}
                    Ok(false) => {
                        audit.warning(
                            Some(step),
                            format!("Step '{}' condition not met, skipping", step.name),
                        );
                        continue;
                    }
                    Err(e) => {
                        let failure = MissionFailure::Condition {
                            step: step.name.clone(),
                            message: format!("{e:#}"),
                        };
                        return Err(self.fail(id, step, failure));
                    }
                }
            }

            if let Err(e) = self.executor.execute_step(id, step).await {
                return Err(self.fail(id, step, e.into()));
            }
        }

        self.complete(id, steps.len())
    }

    /// Checkpoint before step `index`; on `Running` the index advances
    fn enter_step(
        &self,
        id: &str,
        index: usize,
        step: &Step,
    ) -> Result<Option<MissionOutcome>, MissionFailure> {
        let status = self
            .registry
            .update(id, |m| {
                if m.status == MissionStatus::Running {
                    m.current_step_index = index;
                }
                m.status
            })
            .ok_or(MissionFailure::Removed)?;
        let halted = halt_for(status);
        if !matches!(halted, Ok(None)) {
            tracing::info!(mission_id = id, step = %step.name, %status, "run stopped at checkpoint");
        }
        halted
    }

    fn complete(&self, id: &str, step_count: usize) -> RunResult {
        let now = self.registry.clock().epoch_ms();
        let status = self
            .registry
            .update(id, |m| {
                let status = m.status;
                if status == MissionStatus::Running {
                    m.status = MissionStatus::Completed;
                    m.completed_at_ms = Some(now);
                    m.current_step_index = step_count;
                }
                status
            })
            .ok_or(MissionFailure::Removed)?;

        if let Some(outcome) = halt_for(status)? {
            tracing::info!(mission_id = id, %status, "run stopped before completion");
            return Ok(outcome);
        }
        Audit::new(&self.registry, id).record(LogLevel::Success, None, "Mission completed", None);
        Ok(MissionOutcome::Completed)
    }

    fn fail(&self, id: &str, step: &Step, failure: MissionFailure) -> MissionFailure {
        self.registry.update(id, |m| m.status = MissionStatus::Failed);
        Audit::new(&self.registry, id).error(Some(step), failure.to_string());
        failure
    }
}

/// `Ok(None)` to keep going, otherwise how the run stops
fn halt_for(status: MissionStatus) -> Result<Option<MissionOutcome>, MissionFailure> {
    match status {
        MissionStatus::Running => Ok(None),
        MissionStatus::Paused => Ok(Some(MissionOutcome::Paused)),
        MissionStatus::Pending | MissionStatus::Completed | MissionStatus::Failed => {
            Err(MissionFailure::Cancelled)
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
