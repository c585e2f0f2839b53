// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wp-core: Mission, step and condition data model for the Waypoint engine

pub mod macros;

pub mod clock;
pub mod condition;
pub mod event;
pub mod id;
pub mod log;
pub mod mission;
pub mod step;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use condition::{Condition, ConditionId, Trigger, DEFAULT_POLL_INTERVAL};
pub use event::StatusChange;
pub use log::{LogLevel, MissionLog};
pub use mission::{Mission, MissionDef, MissionId, MissionStatus, MissionSummary, StepSummary};
pub use step::{Check, RetryPolicy, Step, StepAction, StepId, DEFAULT_MAX_RETRIES};
