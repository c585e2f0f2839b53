// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution coordinator: at most one run per mission id.
//!
//! Each run is a tokio task whose result is wrapped in a [`Shared`] future
//! and kept in the in-flight map until the task ends. Every caller asking to
//! execute a mission while its run is in flight gets a clone of that same
//! handle, so step execution for one id is never interleaved.
//!
//! Pause and cancel only write the mission status. The runner notices at its
//! next checkpoint; nothing interrupts the step in flight.

use std::collections::HashMap;
use std::fmt;
use std::future::IntoFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tokio::task::AbortHandle;
use wp_core::{Clock, Mission, MissionId, MissionStatus};

use crate::audit::Audit;
use crate::error::{EngineError, MissionFailure};
use crate::registry::MissionRegistry;
use crate::runner::{MissionRunner, RunResult};

type SharedRun = Shared<BoxFuture<'static, RunResult>>;

/// Awaitable handle to a mission run; every clone observes the same result
#[derive(Clone)]
pub struct ExecutionHandle {
    mission_id: MissionId,
    run: SharedRun,
}

impl ExecutionHandle {
    pub fn mission_id(&self) -> &MissionId {
        &self.mission_id
    }

    /// The settled result, if the run has finished and been polled
    pub fn peek(&self) -> Option<&RunResult> {
        self.run.peek()
    }

    /// True when both handles observe the same run
    pub fn same_run(&self, other: &ExecutionHandle) -> bool {
        self.run.ptr_eq(&other.run)
    }
}

impl IntoFuture for ExecutionHandle {
    type Output = RunResult;
    type IntoFuture = SharedRun;

    fn into_future(self) -> Self::IntoFuture {
        self.run
    }
}

impl fmt::Debug for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionHandle")
            .field("mission_id", &self.mission_id)
            .field("settled", &self.run.peek().is_some())
            .finish()
    }
}

struct InFlight {
    run_id: u64,
    handle: ExecutionHandle,
    abort: AbortHandle,
}

type InFlightMap = Arc<Mutex<HashMap<MissionId, InFlight>>>;

/// Removes the in-flight entry when the run task ends, however it ends
struct InFlightGuard {
    in_flight: InFlightMap,
    mission_id: MissionId,
    run_id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        if in_flight.get(&self.mission_id).is_some_and(|run| run.run_id == self.run_id) {
            in_flight.remove(&self.mission_id);
        }
    }
}

pub(crate) struct Coordinator<C: Clock> {
    registry: Arc<MissionRegistry<C>>,
    runner: Arc<MissionRunner<C>>,
    in_flight: InFlightMap,
    next_run_id: AtomicU64,
}

impl<C: Clock> Coordinator<C> {
    pub(crate) fn new(registry: Arc<MissionRegistry<C>>, runner: MissionRunner<C>) -> Self {
        Self {
            registry,
            runner: Arc::new(runner),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_run_id: AtomicU64::new(1),
        }
    }

    /// Start a run, or join the one already in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub(crate) fn execute_mission(&self, id: &str) -> Result<ExecutionHandle, EngineError> {
        let mut in_flight = self.in_flight.lock();
        let status = self.registry.status(id).ok_or_else(|| EngineError::NotFound(id.into()))?;
        if let Some(run) = in_flight.get(id) {
            tracing::debug!(mission_id = id, run_id = run.run_id, "joining in-flight run");
            return Ok(run.handle.clone());
        }
        if status == MissionStatus::Running {
            return Err(EngineError::AlreadyRunning(id.into()));
        }

        self.spawn_run(&mut in_flight, id, status)
    }

    /// Mark the mission running and spawn its run; caller holds the in-flight lock
    fn spawn_run(
        &self,
        in_flight: &mut HashMap<MissionId, InFlight>,
        id: &str,
        from: MissionStatus,
    ) -> Result<ExecutionHandle, EngineError> {
        let steps = self.runner.start(id).ok_or_else(|| EngineError::NotFound(id.into()))?;
        let mission_id = MissionId::new(id);
        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        let guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            mission_id: mission_id.clone(),
            run_id,
        };
        let runner = Arc::clone(&self.runner);
        let task = tokio::spawn({
            let mission_id = mission_id.clone();
            async move {
                let _guard = guard;
                runner.run(mission_id, steps).await
            }
        });
        let abort = task.abort_handle();

        let run = async move {
            task.await.unwrap_or_else(|e| Err(MissionFailure::Aborted(e.to_string())))
        }
        .boxed()
        .shared();
        let handle = ExecutionHandle { mission_id: mission_id.clone(), run };

        tracing::info!(mission_id = id, run_id, %from, "mission run started");
        in_flight.insert(mission_id, InFlight { run_id, handle: handle.clone(), abort });
        Ok(handle)
    }

    /// Returns whether the mission was running and is now paused
    pub(crate) fn pause_mission(&self, id: &str) -> Result<bool, EngineError> {
        let paused = self
            .registry
            .update(id, |m| {
                let running = m.status == MissionStatus::Running;
                if running {
                    m.status = MissionStatus::Paused;
                }
                running
            })
            .ok_or_else(|| EngineError::NotFound(id.into()))?;

        if paused {
            Audit::new(&self.registry, id).info(None, "Mission paused");
        }
        Ok(paused)
    }

    /// Restart a paused mission from its first step.
    ///
    /// Waits for the paused run to settle before starting the new one.
    /// Returns `None` if the mission was not paused, or stopped being paused
    /// while the previous run wound down.
    pub(crate) async fn resume_mission(&self, id: &str) -> Result<Option<ExecutionHandle>, EngineError> {
        match self.registry.status(id) {
            None => return Err(EngineError::NotFound(id.into())),
            Some(MissionStatus::Paused) => {}
            Some(_) => return Ok(None),
        }
        let previous = self.in_flight.lock().get(id).map(|run| run.handle.clone());
        if let Some(previous) = previous {
            tracing::debug!(mission_id = id, "waiting for paused run to settle");
            let _ = previous.await;
        }

        let mut in_flight = self.in_flight.lock();
        let status = self.registry.status(id).ok_or_else(|| EngineError::NotFound(id.into()))?;
        if status != MissionStatus::Paused || in_flight.contains_key(id) {
            return Ok(None);
        }
        Audit::new(&self.registry, id).info(None, "Mission resumed");
        self.spawn_run(&mut in_flight, id, status).map(Some)
    }

    pub(crate) fn cancel_mission(&self, id: &str) -> Result<(), EngineError> {
        self.registry
            .update(id, |m| m.status = MissionStatus::Failed)
            .ok_or_else(|| EngineError::NotFound(id.into()))?;
        Audit::new(&self.registry, id).warning(None, "Mission cancelled");
        Ok(())
    }

    /// Remove a mission that has no run in flight
    pub(crate) fn discard_mission(&self, id: &str) -> Result<Mission, EngineError> {
        let in_flight = self.in_flight.lock();
        if in_flight.contains_key(id) || self.registry.status(id) == Some(MissionStatus::Running) {
            return Err(EngineError::AlreadyRunning(id.into()));
        }
        let mission = self.registry.remove(id).ok_or_else(|| EngineError::NotFound(id.into()))?;
        tracing::info!(mission_id = id, status = %mission.status, "mission discarded");
        Ok(mission)
    }

    #[cfg(test)]
    pub(crate) fn in_flight_count(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Abort every in-flight run; their handles settle as `Aborted`
    pub(crate) fn abort_all(&self) {
        let runs: Vec<InFlight> = self.in_flight.lock().drain().map(|(_, run)| run).collect();
        for run in runs {
            tracing::info!(mission_id = %run.handle.mission_id, run_id = run.run_id, "aborting mission run");
            run.abort.abort();
        }
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
