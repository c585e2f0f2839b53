// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition watcher: one cancellable polling loop per condition id.
//!
//! The first poll happens one interval after registration. Check and
//! trigger errors go to `tracing` and never stop the loop; conditions are
//! not tied to any mission, so there is no mission log to write them to.
//!
//! A trigger must not re-register or remove its own condition: stopping a
//! loop waits for its task, and the task would be waiting on itself.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use wp_core::{Condition, ConditionId};

/// Intervals shorter than this are raised to it
const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct WatchHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatchHandle {
    fn spawn(condition: Condition) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(condition, cancel.clone()));
        Self { cancel, task }
    }

    /// Returns once the loop task has exited
    async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            if e.is_panic() {
                tracing::warn!(error = %e, "condition loop panicked");
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct ConditionWatcher {
    loops: Mutex<HashMap<ConditionId, WatchHandle>>,
}

impl ConditionWatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start polling `condition`, replacing any loop registered under its id
    pub(crate) async fn execute_when(&self, condition: Condition) {
        let id = condition.id.clone();
        let previous = self.loops.lock().remove(&id);
        if let Some(previous) = previous {
            previous.stop().await;
            tracing::info!(condition = %id, "previous condition loop stopped");
        }

        tracing::info!(
            condition = %id,
            name = %condition.name,
            interval_ms = condition.interval.as_millis() as u64,
            "condition registered"
        );
        let handle = WatchHandle::spawn(condition);
        // A concurrent registration of the same id may have slipped in
        let replaced = self.loops.lock().insert(id, handle);
        if let Some(replaced) = replaced {
            replaced.stop().await;
        }
    }

    /// Stop and forget a condition; no tick fires after this returns
    pub(crate) async fn remove_condition(&self, id: &str) -> bool {
        let handle = self.loops.lock().remove(id);
        match handle {
            Some(handle) => {
                handle.stop().await;
                tracing::info!(condition = id, "condition removed");
                true
            }
            None => false,
        }
    }

    pub(crate) fn condition_ids(&self) -> Vec<ConditionId> {
        let mut ids: Vec<ConditionId> = self.loops.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) async fn stop_all(&self) {
        let handles: Vec<WatchHandle> = self.loops.lock().drain().map(|(_, h)| h).collect();
        for handle in handles {
            handle.stop().await;
        }
    }
}

async fn poll_loop(condition: Condition, cancel: CancellationToken) {
    let period = condition.interval.max(MIN_INTERVAL);
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = poll_once(&condition) => {}
        }
    }
    tracing::debug!(condition = %condition.id, "condition loop exited");
}

async fn poll_once(condition: &Condition) {
    match condition.check.check().await {
        Ok(true) => {
            tracing::debug!(condition = %condition.id, "condition met, firing trigger");
            if let Err(e) = condition.on_trigger.fire().await {
                tracing::warn!(condition = %condition.id, error = %format!("{e:#}"), "condition trigger failed");
            }
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(condition = %condition.id, error = %format!("{e:#}"), "condition check failed");
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
