// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status transition notifications for broadcast collaborators.

use crate::mission::{MissionId, MissionStatus};
use serde::{Deserialize, Serialize};

/// One mission status transition, in the order it was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub mission_id: MissionId,
    pub from: MissionStatus,
    pub to: MissionStatus,
    pub at_ms: u64,
}

impl std::fmt::Display for StatusChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} -> {}", self.mission_id, self.from, self.to)
    }
}
