// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission audit log.
//!
//! Appends entries to a mission's own log and mirrors each one to the
//! process-wide `tracing` sink. The tracing side is write-only; nothing in
//! the engine reads it back.

use wp_core::{Clock, LogLevel, MissionLog, Step};

use crate::registry::MissionRegistry;

/// Audit writer bound to one mission
pub(crate) struct Audit<'a, C: Clock> {
    registry: &'a MissionRegistry<C>,
    mission_id: &'a str,
}

impl<'a, C: Clock> Audit<'a, C> {
    pub(crate) fn new(registry: &'a MissionRegistry<C>, mission_id: &'a str) -> Self {
        Self { registry, mission_id }
    }

    pub(crate) fn info(&self, step: Option<&Step>, message: impl Into<String>) {
        self.record(LogLevel::Info, step, message, None);
    }

    pub(crate) fn warning(&self, step: Option<&Step>, message: impl Into<String>) {
        self.record(LogLevel::Warning, step, message, None);
    }

    pub(crate) fn error(&self, step: Option<&Step>, message: impl Into<String>) {
        self.record(LogLevel::Error, step, message, None);
    }

    /// Append an entry; silently dropped if the mission is gone
    pub(crate) fn record(
        &self,
        level: LogLevel,
        step: Option<&Step>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
    ) {
        let mut entry = MissionLog::new(self.registry.clock().epoch_ms(), level, message);
        entry.step_id = step.map(|s| s.id.clone());
        entry.data = data;

        mirror(self.mission_id, &entry);
        if self.registry.update(self.mission_id, |m| m.logs.push(entry)).is_none() {
            tracing::debug!(mission_id = self.mission_id, "log entry for unknown mission dropped");
        }
    }
}

fn mirror(mission_id: &str, entry: &MissionLog) {
    let step = entry.step_id.as_ref().map(|s| s.as_str()).unwrap_or("-");
    match entry.level {
        LogLevel::Info => tracing::info!(mission_id, step, "{}", entry.message),
        LogLevel::Success => {
            tracing::info!(mission_id, step, outcome = "success", "{}", entry.message)
        }
        LogLevel::Warning => tracing::warn!(mission_id, step, "{}", entry.message),
        LogLevel::Error => tracing::error!(mission_id, step, "{}", entry.message),
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
