// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition polling specs

use crate::prelude::*;

fn condition(id: &str, check: FakeCheck, trigger: CountingTrigger, interval_ms: u64) -> Condition {
    Condition::new(id, id, check, trigger).interval(Duration::from_millis(interval_ms))
}

#[tokio::test(start_paused = true)]
async fn trigger_fires_on_each_consecutive_passing_poll() {
    let h = Harness::new();
    let trigger = CountingTrigger::new();
    h.engine.execute_when(condition("disk-full", constant(true), trigger.clone(), 1_000)).await;

    tokio::time::sleep(Duration::from_millis(2_500)).await;

    assert_eq!(trigger.count(), 2);
}

#[tokio::test(start_paused = true)]
async fn failing_checks_and_triggers_keep_polling() {
    let h = Harness::new();
    let check = FakeCheck::failing("probe unreachable");
    let noisy = CountingTrigger::failing("pager offline");
    h.engine.execute_when(condition("probe", check.clone(), CountingTrigger::new(), 1_000)).await;
    h.engine.execute_when(condition("pager", constant(true), noisy.clone(), 1_000)).await;

    tokio::time::sleep(Duration::from_millis(4_500)).await;

    assert_eq!(check.calls(), 4);
    assert_eq!(noisy.count(), 4);
}

#[tokio::test(start_paused = true)]
async fn removal_is_immediate() {
    let h = Harness::new();
    let trigger = CountingTrigger::new();
    h.engine.execute_when(condition("c1", constant(true), trigger.clone(), 100)).await;

    tokio::time::sleep(Duration::from_millis(350)).await;
    assert!(h.engine.remove_condition("c1").await);
    assert_eq!(trigger.count(), 3);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(trigger.count(), 3);
}

#[tokio::test(start_paused = true)]
async fn reregistering_an_id_keeps_a_single_loop() {
    let h = Harness::new();
    let trigger = CountingTrigger::new();
    for _ in 0..3 {
        h.engine.execute_when(condition("c1", constant(true), trigger.clone(), 1_000)).await;
    }

    tokio::time::sleep(Duration::from_millis(3_500)).await;

    assert_eq!(trigger.count(), 3);
    assert_eq!(h.engine.condition_ids().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn trigger_can_start_a_mission() {
    let h = Harness::new();
    let step = FakeAction::succeed();
    h.define("m1", vec![Step::new("react", step.clone())]);

    let engine = h.engine.clone();
    let on_trigger = move || {
        let engine = engine.clone();
        async move {
            engine.execute_mission("m1")?;
            anyhow::Ok(())
        }
    };
    h.engine
        .execute_when(
            Condition::new("c1", "start m1", FakeCheck::sequence([false, true, false]), on_trigger)
                .interval(Duration::from_secs(1)),
        )
        .await;

    tokio::time::sleep(Duration::from_millis(2_500)).await;

    assert_eq!(step.calls(), 1);
    assert_eq!(h.status("m1"), MissionStatus::Completed);
}
