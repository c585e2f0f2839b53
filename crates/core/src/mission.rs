// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission definition, record and status.

use crate::log::MissionLog;
use crate::step::{RetryPolicy, Step, StepId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

crate::define_id! {
    /// Caller-supplied unique identifier of a mission.
    pub struct MissionId;
}

/// Lifecycle status of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Paused,
}

impl MissionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MissionStatus::Completed | MissionStatus::Failed)
    }
}

crate::simple_display! {
    MissionStatus {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Paused => "paused",
    }
}

/// A mission as handed to the registry, before it has any status or log
#[derive(Debug, Clone)]
pub struct MissionDef {
    pub id: MissionId,
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<Step>,
}

impl MissionDef {
    pub fn new(id: impl Into<MissionId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), description: None, steps: Vec::new() }
    }

    crate::setters! {
        set { steps: Vec<Step> }
        option { description: String }
    }

    /// Append a step after the ones already defined
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }
}

/// Registry record for a mission: definition plus live status and log
#[derive(Debug, Clone)]
pub struct Mission {
    pub id: MissionId,
    pub name: String,
    pub description: Option<String>,
    /// Fixed at definition time
    pub steps: Arc<[Step]>,
    pub status: MissionStatus,
    pub created_at_ms: u64,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    /// Step executing or last attempted; `steps.len()` only once completed
    pub current_step_index: usize,
    pub logs: Vec<MissionLog>,
}

impl Mission {
    /// Build a pending record from a definition
    pub fn new(def: MissionDef, created_at_ms: u64) -> Self {
        Self {
            id: def.id,
            name: def.name,
            description: def.description,
            steps: def.steps.into(),
            status: MissionStatus::Pending,
            created_at_ms,
            started_at_ms: None,
            completed_at_ms: None,
            current_step_index: 0,
            logs: Vec::new(),
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_step_index)
    }

    /// Serializable view of the record, for persistence and display
    pub fn summary(&self) -> MissionSummary {
        MissionSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            steps: self.steps.iter().map(StepSummary::from).collect(),
            status: self.status,
            created_at_ms: self.created_at_ms,
            started_at_ms: self.started_at_ms,
            completed_at_ms: self.completed_at_ms,
            current_step_index: self.current_step_index,
            logs: self.logs.clone(),
        }
    }
}

/// Step metadata without the action, safe to serialize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSummary {
    pub id: StepId,
    pub name: String,
    pub conditional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    pub retry_on_fail: bool,
    pub max_retries: u32,
}

impl From<&Step> for StepSummary {
    fn from(step: &Step) -> Self {
        let RetryPolicy { retry_on_fail, max_retries } = step.retry;
        Self {
            id: step.id.clone(),
            name: step.name.clone(),
            conditional: step.condition.is_some(),
            timeout_ms: step.timeout.map(|t| t.as_millis() as u64),
            retry_on_fail,
            max_retries,
        }
    }
}

/// Snapshot of a mission record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSummary {
    pub id: MissionId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<StepSummary>,
    pub status: MissionStatus,
    pub created_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    pub current_step_index: usize,
    #[serde(default)]
    pub logs: Vec<MissionLog>,
}

#[cfg(test)]
#[path = "mission_tests.rs"]
mod tests;
