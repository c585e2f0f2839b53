// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step executor: timeout enforcement and exponential-backoff retry.
//!
//! Each attempt runs the action on its own tokio task. When the step's
//! timeout fires the task is abandoned, not aborted: the action keeps
//! running in the background and whatever it eventually returns is ignored.
//! The action interface has no cancellation hook, so actions that must not
//! outlive their step need to bound themselves.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use wp_core::{Clock, LogLevel, Step};

use crate::audit::Audit;
use crate::config::EngineConfig;
use crate::error::StepError;
use crate::registry::MissionRegistry;

/// Why a single attempt failed
#[derive(Debug)]
enum AttemptError {
    TimedOut(Duration),
    Failed(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::TimedOut(limit) => write!(f, "timed out after {}ms", limit.as_millis()),
            AttemptError::Failed(message) => f.write_str(message),
        }
    }
}

pub(crate) struct StepExecutor<C: Clock> {
    registry: Arc<MissionRegistry<C>>,
    config: EngineConfig,
}

impl<C: Clock> StepExecutor<C> {
    pub(crate) fn new(registry: Arc<MissionRegistry<C>>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Run one step to success or terminal failure.
    ///
    /// Records retries and success in the mission log. Terminal failures are
    /// returned for the runner to record; mission status is never touched.
    pub(crate) async fn execute_step(&self, mission_id: &str, step: &Step) -> Result<(), StepError> {
        let audit = Audit::new(&self.registry, mission_id);
        let max_attempts = step.retry.attempts();
        let started = tokio::time::Instant::now();
        let mut attempt = 1;

        loop {
            tracing::debug!(mission_id, step = %step.name, attempt, max_attempts, "running step");
            let err = match self.attempt(step).await {
                Ok(()) => {
                    audit.record(
                        LogLevel::Success,
                        Some(step),
                        format!("Step '{}' completed", step.name),
                        Some(serde_json::json!({
                            "attempts": attempt,
                            "elapsed_ms": started.elapsed().as_millis() as u64,
                        })),
                    );
                    return Ok(());
                }
                Err(err) => err,
            };

            if attempt >= max_attempts {
                return Err(self.terminal_error(step, attempt, err));
            }

            let delay = self.config.backoff_delay(attempt);
            audit.record(
                LogLevel::Warning,
                Some(step),
                format!(
                    "Step '{}' attempt {}/{} failed, retrying in {}ms: {}",
                    step.name,
                    attempt,
                    max_attempts,
                    delay.as_millis(),
                    err
                ),
                Some(serde_json::json!({
                    "attempt": attempt,
                    "max_attempts": max_attempts,
                    "delay_ms": delay.as_millis() as u64,
                    "error": err.to_string(),
                })),
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, step: &Step) -> Result<(), AttemptError> {
        let action = Arc::clone(&step.action);
        let task = tokio::spawn(async move { action.run().await });

        let joined = match step.timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::warn!(step = %step.name, timeout_ms = limit.as_millis() as u64, "step action abandoned after timeout");
                    return Err(AttemptError::TimedOut(limit));
                }
            },
            None => task.await,
        };

        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(AttemptError::Failed(format!("{e:#}"))),
            Err(e) => Err(AttemptError::Failed(format!("action panicked: {e}"))),
        }
    }

    fn terminal_error(&self, step: &Step, attempts: u32, err: AttemptError) -> StepError {
        let name = step.name.clone();
        if step.retry.retry_on_fail {
            return StepError::Exhausted { step: name, attempts, last_error: err.to_string() };
        }
        match err {
            AttemptError::TimedOut(timeout) => StepError::Timeout { step: name, timeout },
            AttemptError::Failed(message) => StepError::Failed { step: name, message },
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
