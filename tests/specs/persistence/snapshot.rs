// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot specs
//!
//! A persistence collaborator reads missions and logs back out of the engine
//! and can rebuild the definitions in a fresh one.

use crate::prelude::*;
use similar_asserts::assert_eq;
use wp_core::MissionSummary;

#[tokio::test(start_paused = true)]
async fn summaries_serialize_without_actions() {
    let h = Harness::new();
    h.clock.set_epoch_ms(1_700_000_000_000);
    h.engine
        .define_mission(
            MissionDef::new("nightly", "Nightly report")
                .description("Collect and mail the report")
                .step(Step::new("collect", always_succeeds()).id("collect"))
                .step(
                    Step::new("mail", always_succeeds())
                        .id("mail")
                        .timeout(Duration::from_secs(30))
                        .retry_on_fail(2),
                ),
        )
        .unwrap();

    let summary = h.engine.get_mission("nightly").unwrap().summary();
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "id": "nightly",
            "name": "Nightly report",
            "description": "Collect and mail the report",
            "steps": [
                {
                    "id": "collect",
                    "name": "collect",
                    "conditional": false,
                    "retry_on_fail": false,
                    "max_retries": 3
                },
                {
                    "id": "mail",
                    "name": "mail",
                    "conditional": false,
                    "timeout_ms": 30000,
                    "retry_on_fail": true,
                    "max_retries": 2
                }
            ],
            "status": "pending",
            "created_at_ms": 1_700_000_000_000u64,
            "current_step_index": 0,
            "logs": []
        })
    );
    let back: MissionSummary = serde_json::from_value(json).unwrap();
    assert_eq!(back, summary);
}

#[tokio::test(start_paused = true)]
async fn snapshot_after_run_carries_logs_and_status() {
    let h = Harness::new();
    h.define("m1", vec![Step::new("only", always_succeeds()).id("only")]);
    h.engine.run_mission("m1").await.unwrap();

    let snapshot: Vec<MissionSummary> =
        h.engine.get_all_missions().iter().map(|m| m.summary()).collect();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].status, MissionStatus::Completed);
    assert_eq!(snapshot[0].logs, h.engine.get_mission_logs("m1"));
    let step_log = snapshot[0].logs.iter().find(|l| l.level == LogLevel::Success).unwrap();
    assert_eq!(step_log.step_id.as_ref().map(|s| s.as_str()), Some("only"));
}

#[tokio::test(start_paused = true)]
async fn missions_can_be_redefined_in_a_fresh_engine() {
    let old = Harness::new();
    old.define("a", vec![Step::new("one", always_succeeds())]);
    old.clock.advance(Duration::from_secs(1));
    old.define("b", vec![]);

    let fresh = Harness::new();
    for mission in old.engine.get_all_missions() {
        let def = MissionDef::new(mission.id.clone(), mission.name.clone()).steps(mission.steps.to_vec());
        fresh.engine.define_mission(def).unwrap();
    }

    let ids: Vec<String> = fresh.engine.get_all_missions().iter().map(|m| m.id.to_string()).collect();
    assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(fresh.engine.run_mission("a").await.unwrap(), MissionOutcome::Completed);
}
