// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory mission registry.
//!
//! The registry is the only owner of mission records. Every mutation goes
//! through [`MissionRegistry::update`], which announces a [`StatusChange`]
//! while the lock is still held whenever the closure changed the status, so
//! subscribers see transitions in exactly the order they were applied.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use wp_core::{Clock, Mission, MissionDef, MissionId, MissionLog, MissionStatus, StatusChange};

use crate::error::EngineError;

pub(crate) struct MissionRegistry<C: Clock> {
    missions: Mutex<HashMap<MissionId, Mission>>,
    clock: C,
    status_tx: Option<mpsc::UnboundedSender<StatusChange>>,
}

impl<C: Clock> MissionRegistry<C> {
    pub(crate) fn new(clock: C, status_tx: Option<mpsc::UnboundedSender<StatusChange>>) -> Self {
        Self { missions: Mutex::new(HashMap::new()), clock, status_tx }
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    /// Store a new pending mission; ids are never overwritten
    pub(crate) fn define(&self, def: MissionDef) -> Result<MissionId, EngineError> {
        let mut missions = self.missions.lock();
        if missions.contains_key(&def.id) {
            return Err(EngineError::DuplicateId(def.id));
        }
        let id = def.id.clone();
        let mission = Mission::new(def, self.clock.epoch_ms());
        tracing::info!(mission_id = %id, steps = mission.steps.len(), "mission defined");
        missions.insert(id.clone(), mission);
        Ok(id)
    }

    pub(crate) fn get(&self, id: &str) -> Option<Mission> {
        self.missions.lock().get(id).cloned()
    }

    /// Snapshot of every mission, oldest first
    pub(crate) fn all(&self) -> Vec<Mission> {
        let mut missions: Vec<Mission> = self.missions.lock().values().cloned().collect();
        missions.sort_by(|a, b| a.created_at_ms.cmp(&b.created_at_ms).then(a.id.cmp(&b.id)));
        missions
    }

    pub(crate) fn logs(&self, id: &str) -> Vec<MissionLog> {
        self.missions.lock().get(id).map(|m| m.logs.clone()).unwrap_or_default()
    }

    pub(crate) fn status(&self, id: &str) -> Option<MissionStatus> {
        self.missions.lock().get(id).map(|m| m.status)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.missions.lock().contains_key(id)
    }

    pub(crate) fn remove(&self, id: &str) -> Option<Mission> {
        self.missions.lock().remove(id)
    }

    pub(crate) fn clear(&self) {
        self.missions.lock().clear();
    }

    /// Mutate a mission record under the registry lock.
    ///
    /// Returns `None` if the mission is not registered.
    pub(crate) fn update<T>(&self, id: &str, f: impl FnOnce(&mut Mission) -> T) -> Option<T> {
        let mut missions = self.missions.lock();
        let mission = missions.get_mut(id)?;
        let from = mission.status;
        let out = f(mission);
        if mission.status != from {
            self.announce(StatusChange {
                mission_id: mission.id.clone(),
                from,
                to: mission.status,
                at_ms: self.clock.epoch_ms(),
            });
        }
        Some(out)
    }

    fn announce(&self, change: StatusChange) {
        tracing::info!(
            mission_id = %change.mission_id,
            from = %change.from,
            to = %change.to,
            "mission status changed"
        );
        if let Some(tx) = &self.status_tx {
            // A dropped receiver only means nobody is listening any more
            let _ = tx.send(change);
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
