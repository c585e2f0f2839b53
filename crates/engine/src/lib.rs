// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wp-engine: runs missions step by step and polls conditions
//!
//! Missions run on the ambient tokio runtime. Each mission id has at most
//! one run in flight; pause and cancel take effect between steps.

mod audit;
mod config;
mod coordinator;
mod engine;
pub mod env;
mod error;
mod executor;
mod registry;
mod runner;
mod watcher;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use config::{EngineConfig, DEFAULT_BACKOFF_BASE};
pub use coordinator::ExecutionHandle;
pub use engine::{EngineDeps, MissionEngine};
pub use error::{ConfigError, EngineError, MissionFailure, StepError};
pub use runner::{MissionOutcome, RunResult};
