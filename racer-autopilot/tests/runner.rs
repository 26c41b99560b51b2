use std::collections::HashSet;
use std::fs;
use std::io::Write;

use racer_autopilot::runner::{run_batch, run_race, RaceSpec};

#[test]
fn same_spec_replays_identically() {
    let spec = RaceSpec {
        bot_id: "cruiser",
        seed: 42,
        laps: 1,
        traffic: 4,
        max_ticks: 3_000,
    };
    let first = run_race(&spec).unwrap();
    let second = run_race(&spec).unwrap();

    assert_eq!(first.metrics.fingerprint, second.metrics.fingerprint);
    assert_eq!(first.metrics.ticks, second.metrics.ticks);
    assert_eq!(first.metrics.crashes, second.metrics.crashes);
    assert_eq!(first.metrics.lap_times, second.metrics.lap_times);
    assert_eq!(first.final_snapshot, second.final_snapshot);
}

#[test]
fn different_seeds_produce_different_races() {
    let base = RaceSpec {
        bot_id: "flatout",
        seed: 7,
        laps: 1,
        traffic: 4,
        max_ticks: 1_500,
    };
    let other = RaceSpec { seed: 8, ..base };
    let first = run_race(&base).unwrap();
    let second = run_race(&other).unwrap();
    assert_ne!(first.metrics.fingerprint, second.metrics.fingerprint);
}

#[test]
fn unknown_bot_is_rejected() {
    let spec = RaceSpec {
        bot_id: "does-not-exist",
        seed: 1,
        laps: 1,
        traffic: 0,
        max_ticks: 10,
    };
    let err = run_race(&spec).unwrap_err();
    assert!(err.to_string().contains("unknown bot"));
}

#[test]
fn zero_tick_budget_is_rejected() {
    let spec = RaceSpec {
        bot_id: "flatout",
        seed: 1,
        laps: 1,
        traffic: 0,
        max_ticks: 0,
    };
    assert!(run_race(&spec).is_err());
}

#[test]
fn metrics_round_trip_through_json() {
    let spec = RaceSpec {
        bot_id: "flatout",
        seed: 11,
        laps: 1,
        traffic: 2,
        max_ticks: 600,
    };
    let artifact = run_race(&spec).unwrap();
    let json = serde_json::to_string_pretty(&artifact.metrics).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    let read_back = fs::read_to_string(file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&read_back).unwrap();

    assert_eq!(value["bot_id"], "flatout");
    assert_eq!(value["seed"], 11);
    assert_eq!(value["ticks"], 600);
    assert!(value["fingerprint"].is_u64());
}

#[test]
fn batch_covers_every_seed_in_the_range() {
    let summary = run_batch("flatout", 10, 4, 1, 2, 900).unwrap();
    assert_eq!(summary.runs.len(), 4);
    let seeds: HashSet<u32> = summary.runs.iter().map(|run| run.seed).collect();
    assert_eq!(seeds, HashSet::from([10, 11, 12, 13]));
    assert!(summary.runs.iter().all(|run| run.ticks <= 900));
}

#[test]
fn the_cruiser_reaches_and_holds_its_target_speed() {
    let spec = RaceSpec {
        bot_id: "cruiser",
        seed: 3,
        laps: 1,
        traffic: 0,
        max_ticks: 2_000,
    };
    let artifact = run_race(&spec).unwrap();
    // Target is 60% of max speed (7200); the opening straight is long
    // enough to get there before the first curve.
    assert!(artifact.metrics.top_speed > 7_000.0);
    assert!(artifact.metrics.top_speed < 9_000.0);
}
