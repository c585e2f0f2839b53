// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration

use std::time::Duration;

use crate::env;
use crate::error::ConfigError;

/// Default retry backoff base: delays of 2s, 4s, 8s, ...
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Tunables shared by every mission run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay after failed attempt `n` is `backoff_base * 2^n`
    pub backoff_base: Duration,
    /// Upper bound on a single delay
    pub backoff_cap: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { backoff_base: DEFAULT_BACKOFF_BASE, backoff_cap: None }
    }
}

impl EngineConfig {
    /// Defaults overridden by `WP_BACKOFF_BASE_MS` / `WP_BACKOFF_CAP_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base) = env::backoff_base()? {
            if base.is_zero() {
                return Err(ConfigError::ZeroBackoff);
            }
            config.backoff_base = base;
        }
        config.backoff_cap = env::backoff_cap()?;
        Ok(config)
    }

    /// Wait between failed attempt `failed_attempt` (1-based) and the next one
    pub fn backoff_delay(&self, failed_attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(failed_attempt);
        let delay = self.backoff_base.saturating_mul(factor);
        match self.backoff_cap {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
