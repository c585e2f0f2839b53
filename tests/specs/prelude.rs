// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared setup for engine specs.

pub use std::sync::Arc;
pub use std::time::Duration;

pub use tokio::sync::mpsc::UnboundedReceiver;
pub use tokio::time::Instant;
pub use wp_core::test_support::{
    always_fails, always_succeeds, constant, never_resolves, CountingTrigger, FakeAction, FakeCheck,
};
pub use wp_core::{
    Condition, FakeClock, LogLevel, MissionDef, MissionLog, MissionStatus, StatusChange, Step,
};
pub use wp_engine::{
    EngineConfig, EngineDeps, EngineError, MissionEngine, MissionFailure, MissionOutcome,
    StepError,
};

/// Route engine tracing to the test writer; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Harness {
    pub engine: MissionEngine<FakeClock>,
    pub clock: FakeClock,
    pub changes: UnboundedReceiver<StatusChange>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let clock = FakeClock::new();
        let (tx, changes) = tokio::sync::mpsc::unbounded_channel();
        let engine = MissionEngine::with_deps(
            EngineDeps { clock: clock.clone(), status_tx: Some(tx) },
            EngineConfig::default(),
        );
        Self { engine, clock, changes }
    }

    pub fn define(&self, id: &str, steps: Vec<Step>) {
        self.engine.define_mission(MissionDef::new(id, format!("mission {id}")).steps(steps)).unwrap();
    }

    pub fn status(&self, id: &str) -> MissionStatus {
        self.engine.get_mission(id).unwrap().status
    }

    /// `to` status of every change announced so far
    pub fn statuses(&mut self) -> Vec<MissionStatus> {
        let mut out = Vec::new();
        while let Ok(change) = self.changes.try_recv() {
            out.push(change.to);
        }
        out
    }
}

/// `"<level>: <message>"` lines, easy to diff
pub fn log_lines(logs: &[MissionLog]) -> Vec<String> {
    logs.iter().map(|l| format!("{}: {}", l.level, l.message)).collect()
}

pub type Order = Arc<parking_lot::Mutex<Vec<&'static str>>>;

/// Step that records its name, then takes `delay` on the tokio clock
pub fn recording(order: &Order, name: &'static str, delay: Duration) -> Step {
    let order = Arc::clone(order);
    Step::new(name, move || {
        let order = Arc::clone(&order);
        async move {
            order.lock().push(name);
            tokio::time::sleep(delay).await;
            anyhow::Ok(())
        }
    })
}
