// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Polled conditions: a predicate plus the callback fired when it holds.

use crate::step::Check;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

crate::define_id! {
    /// Identifier of a registered condition.
    ///
    /// Re-registering an id replaces the previous polling loop.
    pub struct ConditionId;
}

/// Polling period used when none is given.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Side effect run each time a condition's check passes
#[async_trait]
pub trait Trigger: Send + Sync {
    async fn fire(&self) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> Trigger for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    async fn fire(&self) -> anyhow::Result<()> {
        (self)().await
    }
}

/// A predicate polled on an interval, not tied to any mission
#[derive(Clone)]
pub struct Condition {
    pub id: ConditionId,
    pub name: String,
    pub check: Arc<dyn Check>,
    pub interval: Duration,
    pub on_trigger: Arc<dyn Trigger>,
}

impl Condition {
    pub fn new(
        id: impl Into<ConditionId>,
        name: impl Into<String>,
        check: impl Check + 'static,
        on_trigger: impl Trigger + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            check: Arc::new(check),
            interval: DEFAULT_POLL_INTERVAL,
            on_trigger: Arc::new(on_trigger),
        }
    }

    crate::setters! {
        set { interval: Duration }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("interval", &self.interval)
            .finish()
    }
}

#[cfg(test)]
#[path = "condition_tests.rs"]
mod tests;
