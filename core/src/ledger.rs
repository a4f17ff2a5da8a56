//! Attendance ledger operations.
//!
//! RULES:
//!   - Events are appended, never edited or removed.
//!   - Each operation validates before touching anything, then appends the
//!     event and updates the counters together. No caller can observe one
//!     without the other.

use crate::{
    calendar,
    config::DeskConfig,
    error::DeskResult,
    event::DeskEvent,
    person::Person,
    roster::Roster,
    types::Week,
};

/// Result of a ledger operation: the updated person and what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerUpdate {
    pub person: Person,
    pub events: Vec<DeskEvent>,
}

/// Append a `fulfilled` event and reset the consecutive-absence counter.
pub fn record_fulfilled(
    roster:    &mut Roster,
    config:    &DeskConfig,
    person_id: &str,
    week:      Week,
) -> DeskResult<LedgerUpdate> {
    calendar::check_week(config, week)?;
    let person = roster.get_mut(person_id)?;
    person.push_fulfilled(week);
    log::debug!("week={week} fulfilled: {person_id} (total {})", person.fulfilled_shifts);

    Ok(LedgerUpdate {
        person: person.clone(),
        events: vec![DeskEvent::FulfilledRecorded { person_id: person_id.to_string(), week }],
    })
}

/// Append a `penalty` event with the fixed fine. Retires the person once
/// the consecutive-absence counter reaches the threshold.
pub fn record_penalty(
    roster:    &mut Roster,
    config:    &DeskConfig,
    person_id: &str,
    week:      Week,
) -> DeskResult<LedgerUpdate> {
    calendar::check_week(config, week)?;
    let person = roster.get_mut(person_id)?;
    let retired_now = person.push_penalty(week, config.fine_amount, config.retirement_threshold);

    let mut events = vec![DeskEvent::PenaltyRecorded {
        person_id:            person_id.to_string(),
        week,
        amount:               config.fine_amount,
        consecutive_absences: person.consecutive_absences,
    }];

    if retired_now {
        log::info!(
            "week={week} {person_id} retired after {} consecutive absences",
            person.consecutive_absences
        );
        events.push(DeskEvent::PersonRetired {
            person_id:            person_id.to_string(),
            week,
            consecutive_absences: person.consecutive_absences,
        });
    } else {
        log::debug!(
            "week={week} penalty: {person_id} ({} consecutive)",
            person.consecutive_absences
        );
    }

    Ok(LedgerUpdate { person: person.clone(), events })
}

/// Append a `compensation` event. The amount always mirrors the fine.
pub fn record_compensation(
    roster:    &mut Roster,
    config:    &DeskConfig,
    person_id: &str,
    week:      Week,
) -> DeskResult<LedgerUpdate> {
    calendar::check_week(config, week)?;
    let person = roster.get_mut(person_id)?;
    person.push_compensation(week, config.fine_amount);
    log::debug!("week={week} compensation: {person_id}");

    Ok(LedgerUpdate {
        person: person.clone(),
        events: vec![DeskEvent::CompensationRecorded {
            person_id: person_id.to_string(),
            week,
            amount:    config.fine_amount,
        }],
    })
}
