// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mission control specs
//!
//! Single-flight execution, cooperative pause/resume and cancel.

use crate::prelude::*;
use std::future::IntoFuture;

#[tokio::test(start_paused = true)]
async fn concurrent_executions_share_one_run() {
    let h = Harness::new();
    let slow = FakeAction::sleep(Duration::from_secs(2));
    h.define("m1", vec![Step::new("slow", slow.clone())]);

    let handles: Vec<_> = (0..5).map(|_| h.engine.execute_mission("m1").unwrap()).collect();
    assert!(handles.iter().all(|handle| handle.same_run(&handles[0])));

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.into_future().await);
    }

    assert_eq!(slow.calls(), 1);
    assert!(results.iter().all(|r| r == &Ok(MissionOutcome::Completed)));
    assert_eq!(h.status("m1"), MissionStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn executing_from_many_tasks_still_runs_once() {
    let h = Harness::new();
    let slow = FakeAction::sleep(Duration::from_secs(1));
    h.define("m1", vec![Step::new("slow", slow.clone())]);

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let engine = h.engine.clone();
            tokio::spawn(async move { engine.run_mission("m1").await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap(), Ok(MissionOutcome::Completed));
    }
    assert_eq!(slow.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn resume_restarts_from_the_first_step() {
    let mut h = Harness::new();
    let order = Order::default();
    h.define(
        "m1",
        vec![
            recording(&order, "A", Duration::from_secs(1)),
            recording(&order, "B", Duration::from_secs(1)),
            recording(&order, "C", Duration::from_secs(1)),
        ],
    );

    let first = h.engine.execute_mission("m1").unwrap();
    // Pause while B is in flight
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(h.engine.pause_mission("m1").unwrap());
    assert_eq!(first.into_future().await, Ok(MissionOutcome::Paused));
    assert_eq!(*order.lock(), vec!["A", "B"]);
    assert_eq!(h.status("m1"), MissionStatus::Paused);

    let resumed = h.engine.resume_mission("m1").await.unwrap().unwrap();
    assert_eq!(resumed.await, Ok(MissionOutcome::Completed));

    assert_eq!(*order.lock(), vec!["A", "B", "A", "B", "C"]);
    assert_eq!(
        h.statuses(),
        vec![
            MissionStatus::Running,
            MissionStatus::Paused,
            MissionStatus::Running,
            MissionStatus::Completed,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn pause_lets_the_current_step_finish() {
    let h = Harness::new();
    let current = FakeAction::sleep(Duration::from_secs(5));
    let next = FakeAction::succeed();
    h.define("m1", vec![Step::new("current", current.clone()), Step::new("next", next.clone())]);

    let handle = h.engine.execute_mission("m1").unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    h.engine.pause_mission("m1").unwrap();

    let start = Instant::now();
    assert_eq!(handle.await, Ok(MissionOutcome::Paused));
    assert!(start.elapsed() >= Duration::from_secs(4));
    assert_eq!(next.calls(), 0);
    let logs = h.engine.get_mission_logs("m1");
    assert!(logs.iter().any(|l| l.message == "Step 'current' completed"));
}

#[tokio::test(start_paused = true)]
async fn executing_a_paused_mission_while_its_run_winds_down_joins_it() {
    let h = Harness::new();
    h.define("m1", vec![Step::new("slow", FakeAction::sleep(Duration::from_secs(2)))]);

    let first = h.engine.execute_mission("m1").unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
    h.engine.pause_mission("m1").unwrap();

    let again = h.engine.execute_mission("m1").unwrap();
    assert!(again.same_run(&first));
}

#[tokio::test(start_paused = true)]
async fn cancel_marks_failed_and_stops_between_steps() {
    let h = Harness::new();
    let next = FakeAction::succeed();
    h.define(
        "m1",
        vec![Step::new("first", FakeAction::sleep(Duration::from_secs(1))), Step::new("next", next.clone())],
    );

    let handle = h.engine.execute_mission("m1").unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    h.engine.cancel_mission("m1").unwrap();
    assert_eq!(h.status("m1"), MissionStatus::Failed);

    assert_eq!(handle.await, Err(MissionFailure::Cancelled));
    assert_eq!(next.calls(), 0);
    let logs = h.engine.get_mission_logs("m1");
    assert!(logs.iter().any(|l| l.level == LogLevel::Warning && l.message == "Mission cancelled"));
}

#[tokio::test(start_paused = true)]
async fn running_mission_cannot_be_discarded() {
    let h = Harness::new();
    h.define("m1", vec![Step::new("slow", FakeAction::sleep(Duration::from_secs(1)))]);

    let handle = h.engine.execute_mission("m1").unwrap();
    assert_eq!(h.engine.discard_mission("m1").unwrap_err(), EngineError::AlreadyRunning("m1".into()));

    handle.await.unwrap();
    assert!(h.engine.discard_mission("m1").is_ok());
    assert!(h.engine.get_mission("m1").is_none());
}
