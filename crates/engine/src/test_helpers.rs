// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for the engine crate.

use std::sync::Arc;

use tokio::sync::mpsc;
use wp_core::{FakeClock, LogLevel, MissionDef, MissionLog, StatusChange, Step};

use crate::engine::{EngineDeps, MissionEngine};
use crate::registry::MissionRegistry;
use crate::EngineConfig;

/// Engine wired to a fake clock and a status channel
pub(crate) struct TestContext {
    pub engine: MissionEngine<FakeClock>,
    pub clock: FakeClock,
    pub status_rx: mpsc::UnboundedReceiver<StatusChange>,
}

/// Route engine tracing to the test writer; honours `RUST_LOG`
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) fn setup() -> TestContext {
    init_tracing();
    let clock = FakeClock::new();
    let (tx, status_rx) = mpsc::unbounded_channel();
    let engine = MissionEngine::with_deps(
        EngineDeps { clock: clock.clone(), status_tx: Some(tx) },
        EngineConfig::default(),
    );
    TestContext { engine, clock, status_rx }
}

impl TestContext {
    /// Define mission `id` with the given steps
    pub(crate) fn define(&self, id: &str, steps: Vec<Step>) {
        self.engine.define_mission(MissionDef::new(id, format!("mission {id}")).steps(steps)).unwrap();
    }

    /// Drain every status change announced so far
    pub(crate) fn transitions(&mut self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        while let Ok(change) = self.status_rx.try_recv() {
            out.push((change.from.to_string(), change.to.to_string()));
        }
        out
    }
}

/// Registry holding a single mission `m1` with the given steps
pub(crate) fn registry_with(steps: Vec<Step>) -> Arc<MissionRegistry<FakeClock>> {
    init_tracing();
    let registry = Arc::new(MissionRegistry::new(FakeClock::new(), None));
    registry.define(MissionDef::new("m1", "test mission").steps(steps)).unwrap();
    registry
}

/// `(level, message)` pairs for compact assertions
pub(crate) fn entries(logs: &[MissionLog]) -> Vec<(LogLevel, String)> {
    logs.iter().map(|l| (l.level, l.message.clone())).collect()
}

pub(crate) fn count_level(logs: &[MissionLog], level: LogLevel) -> usize {
    logs.iter().filter(|l| l.level == level).count()
}
