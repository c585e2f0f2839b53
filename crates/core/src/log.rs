// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-mission audit log entries.

use crate::step::StepId;
use serde::{Deserialize, Serialize};

/// Severity of a mission log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

crate::simple_display! {
    LogLevel {
        Info => "info",
        Warning => "warning",
        Error => "error",
        Success => "success",
    }
}

/// One append-only entry in a mission's log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionLog {
    pub timestamp_ms: u64,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<StepId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl MissionLog {
    pub fn new(timestamp_ms: u64, level: LogLevel, message: impl Into<String>) -> Self {
        Self { timestamp_ms, level, message: message.into(), step_id: None, data: None }
    }

    crate::setters! {
        option {
            step_id: StepId,
            data: serde_json::Value,
        }
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
