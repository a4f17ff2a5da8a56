//! Attendance ledger tests.
//!
//! Tests cover: counter updates per event kind, the cached counters always
//! matching a fold over history, and retirement monotonicity.

use guard_desk_core::{
    command::Command,
    config::DeskConfig,
    engine::DeskEngine,
    error::DeskError,
    event::DeskEvent,
    person::{EventKind, LedgerTotals, Status},
};

fn build() -> DeskEngine {
    DeskEngine::in_memory(DeskConfig::default()).expect("in-memory engine")
}

fn assert_projection_holds(engine: &DeskEngine) {
    let threshold = engine.config().retirement_threshold;
    let fine = engine.config().fine_amount;
    for person in engine.roster().iter() {
        let totals = LedgerTotals::from_history(person.history(), threshold);
        assert!(
            totals.matches(person),
            "Cached counters diverged from history for {}: {totals:?} vs {person:?}",
            person.id
        );

        let penalties = person.history().iter().filter(|e| e.kind == EventKind::Penalty).count();
        let compensations =
            person.history().iter().filter(|e| e.kind == EventKind::Compensation).count();
        assert_eq!(person.penalty_total, fine * penalties as i64);
        assert_eq!(person.compensation_total, fine * compensations as i64);
    }
}

#[test]
fn fulfilled_increments_count_and_resets_streak() {
    let mut engine = build();
    engine.record_penalty("p-3", 1).unwrap();
    engine.record_penalty("p-3", 2).unwrap();

    let person = engine.record_fulfilled("p-3", 3).unwrap();
    assert_eq!(person.fulfilled_shifts, 1);
    assert_eq!(person.consecutive_absences, 0);
    assert_eq!(person.total_absences, 2, "Fulfilled must not erase past absences");

    let last = person.history().last().unwrap();
    assert_eq!((last.week, last.kind, last.amount), (3, EventKind::Fulfilled, 0));
}

#[test]
fn penalty_charges_fine_and_counts_absence() {
    let mut engine = build();
    let person = engine.record_penalty("p-0", 4).unwrap();

    assert_eq!(person.total_absences, 1);
    assert_eq!(person.consecutive_absences, 1);
    assert_eq!(person.penalty_total, 50_000);
    assert_eq!(person.status, Status::Active);
    assert_eq!(person.history().len(), 1);
    assert_eq!(person.history()[0].kind, EventKind::Penalty);
    assert_eq!(person.history()[0].amount, 50_000);
}

#[test]
fn compensation_mirrors_fine_and_leaves_streak_alone() {
    let mut engine = build();
    engine.record_penalty("p-5", 1).unwrap();

    let person = engine.record_compensation("p-5", 2).unwrap();
    assert_eq!(person.compensation_total, 50_000);
    assert_eq!(person.consecutive_absences, 1, "Compensation must not reset the streak");
    assert_eq!(person.total_absences, 1);
    assert_eq!(person.lifetime_net(), 0);
}

#[test]
fn third_consecutive_penalty_retires() {
    let mut engine = build();
    assert!(engine.record_penalty("p-1", 1).unwrap().is_active());
    assert!(engine.record_penalty("p-1", 2).unwrap().is_active());
    let person = engine.record_penalty("p-1", 3).unwrap();

    assert!(person.is_retired());
    assert_eq!(person.consecutive_absences, 3);
}

#[test]
fn retirement_emits_one_event_and_never_reverts() {
    let mut engine = build();

    let mut retired_events = 0;
    for week in 1..=5 {
        let events = engine
            .submit(Command::RecordPenalty { person_id: "p-2".into(), week })
            .unwrap();
        retired_events += events
            .iter()
            .filter(|e| matches!(e, DeskEvent::PersonRetired { .. }))
            .count();
    }
    assert_eq!(retired_events, 1, "Re-crossing the threshold must not retire again");

    // A fulfilled event resets the counter but not the status.
    let person = engine.record_fulfilled("p-2", 6).unwrap();
    assert_eq!(person.consecutive_absences, 0);
    assert!(person.is_retired());
    assert_projection_holds(&engine);
}

#[test]
fn interrupted_streak_does_not_retire() {
    let mut engine = build();
    engine.record_penalty("p-4", 1).unwrap();
    engine.record_penalty("p-4", 2).unwrap();
    engine.record_fulfilled("p-4", 3).unwrap();
    engine.record_penalty("p-4", 4).unwrap();
    let person = engine.record_penalty("p-4", 5).unwrap();

    assert!(person.is_active());
    assert_eq!(person.total_absences, 4);
    assert_eq!(person.consecutive_absences, 2);
}

#[test]
fn unknown_person_is_not_found_and_changes_nothing() {
    let mut engine = build();
    let before = engine.state().clone();

    let err = engine.record_fulfilled("nobody", 1).unwrap_err();
    assert!(matches!(err, DeskError::PersonNotFound { .. }));
    assert!(err.is_not_found());
    assert!(engine.record_penalty("nobody", 1).unwrap_err().is_not_found());
    assert!(engine.record_compensation("nobody", 1).unwrap_err().is_not_found());

    assert_eq!(engine.state(), &before);
    assert_eq!(engine.sequence(), 0, "Rejected commands must not advance the sequence");
}

#[test]
fn week_outside_horizon_is_rejected() {
    let mut engine = build();
    let err = engine.record_penalty("p-0", 106).unwrap_err();
    assert!(matches!(err, DeskError::WeekNotFound { week: 106, total_weeks: 105 }));
    assert!(engine.record_fulfilled("p-0", 0).is_err());
    assert!(engine.roster().get("p-0").unwrap().history().is_empty());
}

#[test]
fn mixed_sequence_keeps_counters_in_line_with_history() {
    let mut engine = build();
    for week in 1..=12 {
        let a = format!("p-{}", week % 4);
        let b = format!("p-{}", (week + 1) % 4);
        match week % 3 {
            0 => { engine.record_fulfilled(&a, week).unwrap(); }
            1 => { engine.record_penalty(&a, week).unwrap(); }
            _ => { engine.record_compensation(&b, week).unwrap(); }
        }
    }
    assert_projection_holds(&engine);
}

#[test]
fn history_preserves_call_order() {
    let mut engine = build();
    engine.record_penalty("p-7", 9).unwrap();
    engine.record_fulfilled("p-7", 2).unwrap();
    engine.record_compensation("p-7", 5).unwrap();

    let weeks: Vec<u32> = engine
        .roster()
        .get("p-7")
        .unwrap()
        .history()
        .iter()
        .map(|e| e.week)
        .collect();
    assert_eq!(weeks, vec![9, 2, 5]);
}
