// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Steps: the unit of work inside a mission.
//!
//! A step pairs a caller-supplied [`StepAction`] with an optional gating
//! [`Check`], an optional timeout and a [`RetryPolicy`]. Steps are immutable
//! once attached to a mission; clones share the same action.

use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

crate::define_id! {
    /// Identifier of a step within a mission.
    pub struct StepId;
}

/// Attempts made by a retrying step when no limit is given.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// The work a step performs.
///
/// The engine imposes nothing beyond "returns, fails, or fails to return
/// within its timeout". When a timeout fires the returned future is dropped;
/// work the action spawned elsewhere keeps running.
#[async_trait]
pub trait StepAction: Send + Sync {
    async fn run(&self) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> StepAction for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn run(&self) -> anyhow::Result<()> {
        (self)().await
    }
}

/// A predicate, possibly asynchronous.
///
/// Gates a step (false skips it) and drives condition polling.
#[async_trait]
pub trait Check: Send + Sync {
    async fn check(&self) -> anyhow::Result<bool>;
}

#[async_trait]
impl<F, Fut> Check for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<bool>> + Send + 'static,
{
    async fn check(&self) -> anyhow::Result<bool> {
        (self)().await
    }
}

/// Retry behaviour of a failing step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retry_on_fail: bool,
    /// Total attempts when `retry_on_fail` is set
    pub max_retries: u32,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self { retry_on_fail: false, max_retries: DEFAULT_MAX_RETRIES }
    }

    pub fn retries(max_retries: u32) -> Self {
        Self { retry_on_fail: true, max_retries }
    }

    /// Number of times the action is attempted (never zero)
    pub fn attempts(&self) -> u32 {
        if self.retry_on_fail {
            self.max_retries.max(1)
        } else {
            1
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// One unit of work within a mission
#[derive(Clone)]
pub struct Step {
    pub id: StepId,
    pub name: String,
    pub action: Arc<dyn StepAction>,
    pub condition: Option<Arc<dyn Check>>,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
}

impl Step {
    /// Create a step with a generated id, no condition, no timeout and no retry
    pub fn new(name: impl Into<String>, action: impl StepAction + 'static) -> Self {
        Self {
            id: StepId::generate("stp-"),
            name: name.into(),
            action: Arc::new(action),
            condition: None,
            timeout: None,
            retry: RetryPolicy::none(),
        }
    }

    crate::setters! {
        into { id: StepId }
        set { retry: RetryPolicy }
        option { timeout: Duration }
    }

    /// Gate the step on a predicate evaluated right before the action runs
    pub fn condition(mut self, check: impl Check + 'static) -> Self {
        self.condition = Some(Arc::new(check));
        self
    }

    /// Retry up to `max_retries` attempts in total
    pub fn retry_on_fail(mut self, max_retries: u32) -> Self {
        self.retry = RetryPolicy::retries(max_retries);
        self
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("conditional", &self.condition.is_some())
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
