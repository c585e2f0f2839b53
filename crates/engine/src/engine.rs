// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public engine facade.
//!
//! A [`MissionEngine`] owns its registries; several engines can live in one
//! process without sharing anything. Clones share the same state.

use std::sync::Arc;

use tokio::sync::mpsc;
use wp_core::{
    Clock, Condition, ConditionId, Mission, MissionDef, MissionId, MissionLog, StatusChange,
    SystemClock,
};

use crate::config::EngineConfig;
use crate::coordinator::{Coordinator, ExecutionHandle};
use crate::error::EngineError;
use crate::executor::StepExecutor;
use crate::registry::MissionRegistry;
use crate::runner::{MissionOutcome, MissionRunner};
use crate::watcher::ConditionWatcher;

/// External collaborators injected into the engine
pub struct EngineDeps<C: Clock> {
    pub clock: C,
    /// Receives one [`StatusChange`] per mission status transition
    pub status_tx: Option<mpsc::UnboundedSender<StatusChange>>,
}

impl Default for EngineDeps<SystemClock> {
    fn default() -> Self {
        Self { clock: SystemClock, status_tx: None }
    }
}

#[derive(Clone)]
pub struct MissionEngine<C: Clock = SystemClock> {
    registry: Arc<MissionRegistry<C>>,
    coordinator: Arc<Coordinator<C>>,
    watcher: Arc<ConditionWatcher>,
    config: EngineConfig,
}

impl MissionEngine<SystemClock> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_deps(EngineDeps::default(), config)
    }
}

impl<C: Clock> MissionEngine<C> {
    pub fn with_deps(deps: EngineDeps<C>, config: EngineConfig) -> Self {
        let registry = Arc::new(MissionRegistry::new(deps.clock, deps.status_tx));
        let executor = StepExecutor::new(Arc::clone(&registry), config.clone());
        let runner = MissionRunner::new(Arc::clone(&registry), executor);
        let coordinator = Arc::new(Coordinator::new(Arc::clone(&registry), runner));
        Self { registry, coordinator, watcher: Arc::new(ConditionWatcher::new()), config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -- Registry --

    /// Register a new mission in `pending` status
    pub fn define_mission(&self, def: MissionDef) -> Result<MissionId, EngineError> {
        self.registry.define(def)
    }

    pub fn get_mission(&self, id: &str) -> Option<Mission> {
        self.registry.get(id)
    }

    /// Snapshot of every mission, oldest first
    pub fn get_all_missions(&self) -> Vec<Mission> {
        self.registry.all()
    }

    /// The mission's log in append order; empty for unknown ids
    pub fn get_mission_logs(&self, id: &str) -> Vec<MissionLog> {
        self.registry.logs(id)
    }

    /// Evict a mission that has no run in flight
    pub fn discard_mission(&self, id: &str) -> Result<Mission, EngineError> {
        self.coordinator.discard_mission(id)
    }

    // -- Execution --

    /// Start the mission, or join its in-flight run.
    ///
    /// The run proceeds whether or not the handle is awaited. Must be called
    /// from within a tokio runtime.
    pub fn execute_mission(&self, id: &str) -> Result<ExecutionHandle, EngineError> {
        self.coordinator.execute_mission(id)
    }

    /// Execute and wait for the run to settle
    pub async fn run_mission(&self, id: &str) -> Result<MissionOutcome, EngineError> {
        let handle = self.execute_mission(id)?;
        handle.await.map_err(|source| EngineError::Mission { id: id.into(), source })
    }

    /// Cooperative pause; returns false if the mission was not running
    pub fn pause_mission(&self, id: &str) -> Result<bool, EngineError> {
        self.coordinator.pause_mission(id)
    }

    /// Re-run a paused mission from its first step
    pub async fn resume_mission(&self, id: &str) -> Result<Option<ExecutionHandle>, EngineError> {
        self.coordinator.resume_mission(id).await
    }

    /// Mark the mission failed; an in-flight step still runs to its end
    pub fn cancel_mission(&self, id: &str) -> Result<(), EngineError> {
        self.coordinator.cancel_mission(id)
    }

    // -- Conditions --

    pub async fn execute_when(&self, condition: Condition) {
        self.watcher.execute_when(condition).await;
    }

    pub async fn remove_condition(&self, id: &str) -> bool {
        self.watcher.remove_condition(id).await
    }

    pub fn condition_ids(&self) -> Vec<ConditionId> {
        self.watcher.condition_ids()
    }

    /// Stop every condition loop, abort in-flight runs and forget all missions
    pub async fn destroy(&self) {
        self.watcher.stop_all().await;
        self.coordinator.abort_all();
        self.registry.clear();
        tracing::info!("mission engine destroyed");
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
