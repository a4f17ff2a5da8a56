//! Persistence tests.
//!
//! The snapshot must round-trip the whole aggregate exactly, and an engine
//! reopened on the same database must resume where it left off.

use guard_desk_core::{
    command::{Command, JournalEntry},
    config::DeskConfig,
    engine::DeskEngine,
    error::DeskError,
    replacement::ReplacementRequest,
    schedule::ShiftLocator,
    snapshot::{DeskSnapshot, DeskState},
    store::DeskStore,
};

fn busy_engine(store: DeskStore) -> DeskEngine {
    let mut engine = DeskEngine::open(DeskConfig::default(), store).expect("open engine");
    let at = ShiftLocator { week: 2, shift_index: 4 };
    let absent = engine.schedule().shift(at).unwrap().personnel[1].clone();
    let replacement = engine.replacement_candidates(at).unwrap()[0].id.clone();
    engine
        .perform_replacement(ReplacementRequest { absent_id: absent, replacement_id: replacement, at })
        .unwrap();
    engine.record_fulfilled("p-0", 2).unwrap();
    engine.record_penalty("p-0", 3).unwrap();
    engine.record_penalty("p-0", 1).unwrap();
    engine
        .submit(Command::RenamePerson { person_id: "p-0".into(), name: "Night Owl".into() })
        .unwrap();
    engine.submit(Command::SetCurrentWeek { week: 3 }).unwrap();
    engine
}

#[test]
fn snapshot_json_round_trips_losslessly() {
    let engine = busy_engine(DeskStore::in_memory().unwrap());
    let snapshot = DeskSnapshot { sequence: engine.sequence(), state: engine.state().clone() };

    let json = snapshot.to_json().unwrap();
    let restored = DeskSnapshot::from_json(&json).unwrap();
    assert_eq!(restored, snapshot);

    // Out-of-order weeks in history survive as written.
    let weeks: Vec<u32> =
        restored.state.roster.get("p-0").unwrap().history().iter().map(|e| e.week).collect();
    assert_eq!(weeks, vec![2, 3, 1]);
}

#[test]
fn every_command_writes_snapshot_and_journal() {
    let engine = busy_engine(DeskStore::in_memory().unwrap());

    assert_eq!(engine.sequence(), 6);
    // Only the latest snapshot is kept; the journal holds the history.
    assert_eq!(engine.store().snapshot_count().unwrap(), 1);

    let journal = engine.store().journal_entries().unwrap();
    let types: Vec<&str> = journal.iter().map(|e| e.command_type.as_str()).collect();
    assert_eq!(
        types,
        vec![
            "perform_replacement",
            "record_fulfilled",
            "record_penalty",
            "record_penalty",
            "rename_person",
            "set_current_week",
        ]
    );
    let sequences: Vec<u64> = journal.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);

    let latest = engine.store().latest_snapshot().unwrap().unwrap();
    assert_eq!(latest.sequence, 6);
    assert_eq!(&latest.state, engine.state());
}

#[test]
fn rejected_command_writes_nothing() {
    let mut engine = DeskEngine::in_memory(DeskConfig::default()).unwrap();
    assert!(engine.record_penalty("ghost", 1).is_err());

    assert_eq!(engine.store().snapshot_count().unwrap(), 1);
    assert!(engine.store().journal_entries().unwrap().is_empty());
}

#[test]
fn reopened_engine_resumes_from_latest_snapshot() {
    let dir = std::env::temp_dir().join(format!("guard-desk-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("resume.db");
    let _ = std::fs::remove_file(&path);
    let path = path.to_string_lossy().to_string();

    let expected: DeskState = {
        let engine = busy_engine(DeskStore::open(&path).unwrap());
        engine.state().clone()
    };

    let engine = DeskEngine::open(DeskConfig::default(), DeskStore::open(&path).unwrap()).unwrap();
    assert_eq!(engine.sequence(), 6);
    assert_eq!(engine.state(), &expected);
    assert_eq!(engine.state().current_week, 3);
    assert_eq!(engine.roster().get("p-0").unwrap().name, "Night Owl");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn snapshot_table_does_not_grow_with_commands() {
    let mut engine = DeskEngine::in_memory(DeskConfig::default()).unwrap();
    for week in 1..=50 {
        engine.submit(Command::SetCurrentWeek { week }).unwrap();
    }

    assert_eq!(engine.store().snapshot_count().unwrap(), 1);
    assert_eq!(engine.store().journal_entries().unwrap().len(), 50);
    assert_eq!(engine.store().latest_snapshot().unwrap().unwrap().sequence, 50);
}

#[test]
fn failed_snapshot_write_rolls_back_the_journal_row() {
    let config = DeskConfig::default();
    let store = DeskStore::in_memory().unwrap();
    store.migrate().unwrap();
    let snapshot = DeskSnapshot { sequence: 0, state: DeskState::initial(&config).unwrap() };
    store.save_snapshot(&snapshot).unwrap();

    // Sequence 0 is already taken, so the snapshot insert fails after the journal insert.
    let entry = JournalEntry {
        id:           None,
        sequence:     0,
        command_id:   "cmd-0".into(),
        command_type: "set_current_week".into(),
        command_json: "{}".into(),
        events_json:  "[]".into(),
    };
    assert!(store.commit_transition(&entry, &snapshot).is_err());

    assert!(
        store.journal_entries().unwrap().is_empty(),
        "Journal row survived a failed snapshot write"
    );
    assert_eq!(store.snapshot_count().unwrap(), 1);
    assert_eq!(store.latest_snapshot().unwrap().unwrap(), snapshot);
}

fn store_with_default_snapshot() -> DeskStore {
    let store = DeskStore::in_memory().unwrap();
    store.migrate().unwrap();
    let state = DeskState::initial(&DeskConfig::default()).unwrap();
    store.save_snapshot(&DeskSnapshot { sequence: 0, state }).unwrap();
    store
}

#[test]
fn resuming_under_a_different_horizon_is_rejected() {
    let config = DeskConfig { total_weeks: 108, ..DeskConfig::default() };
    let err = DeskEngine::open(config, store_with_default_snapshot()).unwrap_err();
    assert!(matches!(err, DeskError::Configuration { .. }), "Unexpected error: {err}");
}

#[test]
fn resuming_under_a_different_head_count_is_rejected() {
    let config = DeskConfig { personnel_per_shift: 3, ..DeskConfig::default() };
    let err = DeskEngine::open(config, store_with_default_snapshot()).unwrap_err();
    assert!(matches!(err, DeskError::Configuration { .. }), "Unexpected error: {err}");
}

#[test]
fn resuming_under_the_same_config_succeeds() {
    let engine = DeskEngine::open(DeskConfig::default(), store_with_default_snapshot()).unwrap();
    assert_eq!(engine.sequence(), 0);
    assert_eq!(engine.roster().len(), 18);
}

#[test]
fn snapshot_with_duplicate_person_ids_fails_to_load() {
    let config = DeskConfig::default();
    let snapshot = DeskSnapshot { sequence: 0, state: DeskState::initial(&config).unwrap() };
    let mut json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    let roster = json["state"]["roster"].as_array_mut().unwrap();
    roster[1]["id"] = serde_json::json!("p-0");

    let err = DeskSnapshot::from_json(&json.to_string()).unwrap_err();
    assert!(err.to_string().contains("duplicate person id"), "Unexpected error: {err}");
}
