// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

use crate::error::ConfigError;

pub const BACKOFF_BASE_VAR: &str = "WP_BACKOFF_BASE_MS";
pub const BACKOFF_CAP_VAR: &str = "WP_BACKOFF_CAP_MS";

/// Retry backoff base (`WP_BACKOFF_BASE_MS`), unset means default
pub fn backoff_base() -> Result<Option<Duration>, ConfigError> {
    millis(BACKOFF_BASE_VAR)
}

/// Upper bound on a single backoff delay (`WP_BACKOFF_CAP_MS`)
pub fn backoff_cap() -> Result<Option<Duration>, ConfigError> {
    millis(BACKOFF_CAP_VAR)
}

fn millis(var: &'static str) -> Result<Option<Duration>, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}
