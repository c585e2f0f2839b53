// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use std::time::Duration;
use thiserror::Error;
use wp_core::MissionId;

/// Terminal outcome of one step invocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// The action did not settle within the step's timeout
    #[error("Step '{step}' timed out after {}ms", .timeout.as_millis())]
    Timeout { step: String, timeout: Duration },
    /// The action failed and the step does not retry
    #[error("Step '{step}' failed: {message}")]
    Failed { step: String, message: String },
    /// Every attempt allowed by the retry policy failed
    #[error("Step '{step}' failed after {attempts} attempts: {last_error}")]
    Exhausted { step: String, attempts: u32, last_error: String },
}

impl StepError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StepError::Timeout { .. })
    }

    pub fn step(&self) -> &str {
        match self {
            StepError::Timeout { step, .. }
            | StepError::Failed { step, .. }
            | StepError::Exhausted { step, .. } => step,
        }
    }
}

/// Why a mission run stopped without completing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissionFailure {
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("Step '{step}' condition failed: {message}")]
    Condition { step: String, message: String },
    #[error("mission cancelled")]
    Cancelled,
    #[error("mission removed while running")]
    Removed,
    #[error("mission run aborted: {0}")]
    Aborted(String),
}

/// Errors returned to engine callers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("mission not found: {0}")]
    NotFound(MissionId),
    #[error("mission already running: {0}")]
    AlreadyRunning(MissionId),
    #[error("mission id already defined: {0}")]
    DuplicateId(MissionId),
    #[error("mission {id} failed: {source}")]
    Mission {
        id: MissionId,
        #[source]
        source: MissionFailure,
    },
}

/// Invalid engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid {var}: '{value}' is not a number of milliseconds")]
    InvalidEnv { var: &'static str, value: String },
    #[error("backoff base must be non-zero")]
    ZeroBackoff,
}
