//! Replacement transaction.
//!
//! One logical unit with four effects:
//!   1. penalty for the absent person (retirement check included)
//!   2. compensation for the replacement
//!   3. original -> replacement recorded in the shift's replacement map
//!   4. the absent id swapped for the replacement id, same slot
//!
//! Every precondition is checked before the first effect is applied, so
//! the ledger and the schedule can never disagree about who worked.

use crate::{
    calendar,
    config::DeskConfig,
    error::{DeskError, DeskResult},
    event::DeskEvent,
    ledger,
    person::Person,
    roster::Roster,
    schedule::{Schedule, Shift, ShiftLocator},
    types::PersonId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplacementRequest {
    pub absent_id:      PersonId,
    pub replacement_id: PersonId,
    /// Week and shift to change; the ledger events are stamped with this week.
    pub at:             ShiftLocator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementOutcome {
    pub absent:      Person,
    pub replacement: Person,
    pub shift:       Shift,
    pub events:      Vec<DeskEvent>,
}

pub fn perform_replacement(
    roster:   &mut Roster,
    schedule: &mut Schedule,
    config:   &DeskConfig,
    request:  &ReplacementRequest,
) -> DeskResult<ReplacementOutcome> {
    let ReplacementRequest { absent_id, replacement_id, at } = request;

    // ── Preconditions ─────────────────────────────
    if absent_id == replacement_id {
        return Err(DeskError::invalid(format!(
            "'{absent_id}' cannot replace themselves (same person)"
        )));
    }
    calendar::check_week(config, at.week)?;
    roster.get(absent_id)?;
    let candidate = roster.get(replacement_id)?;
    if candidate.is_retired() {
        // Candidate listing filters retired persons; reaching here is a caller bug.
        log::warn!("week={} replacement {replacement_id} is retired", at.week);
    }

    let shift = schedule.shift(*at)?;
    let slot = shift.slot_of(absent_id).ok_or_else(|| DeskError::NotAssigned {
        person_id:   absent_id.clone(),
        week:        at.week,
        shift_index: at.shift_index,
    })?;
    if shift.is_assigned(replacement_id) {
        return Err(DeskError::invalid(format!(
            "'{replacement_id}' is already on shift {} of week {}",
            at.shift_index, at.week
        )));
    }

    // ── Effects ───────────────────────────────────
    let penalty = ledger::record_penalty(roster, config, absent_id, at.week)?;
    let compensation = ledger::record_compensation(roster, config, replacement_id, at.week)?;

    let shift = schedule.shift_mut(*at)?;
    shift.replacements.insert(absent_id.clone(), replacement_id.clone());
    shift.personnel[slot] = replacement_id.clone();

    log::debug!(
        "week={} shift={} {absent_id} -> {replacement_id} (slot {slot})",
        at.week,
        at.shift_index
    );

    let mut events = penalty.events;
    events.extend(compensation.events);
    events.push(DeskEvent::ReplacementPerformed {
        at:             *at,
        absent_id:      absent_id.clone(),
        replacement_id: replacement_id.clone(),
        slot,
    });

    Ok(ReplacementOutcome {
        absent:      penalty.person,
        replacement: compensation.person,
        shift:       shift.clone(),
        events,
    })
}
