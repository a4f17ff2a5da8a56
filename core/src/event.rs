//! Events emitted by state transitions.
//!
//! Every successful command produces one or more events. They are returned
//! to the caller for re-rendering and written to the journal.
//! Variants are added over time; never removed or reordered.

use crate::{
    schedule::ShiftLocator,
    types::{Amount, PersonId, Week},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    // ── Ledger ─────────────────────────────────────
    FulfilledRecorded {
        person_id: PersonId,
        week:      Week,
    },
    PenaltyRecorded {
        person_id:            PersonId,
        week:                 Week,
        amount:               Amount,
        consecutive_absences: u32,
    },
    CompensationRecorded {
        person_id: PersonId,
        week:      Week,
        amount:    Amount,
    },
    PersonRetired {
        person_id:            PersonId,
        week:                 Week,
        consecutive_absences: u32,
    },

    // ── Schedule ───────────────────────────────────
    ReplacementPerformed {
        at:             ShiftLocator,
        absent_id:      PersonId,
        replacement_id: PersonId,
        slot:           usize,
    },
    ScheduleGenerated {
        weeks:     Week,
        pool_size: usize,
    },

    // ── Roster / session ───────────────────────────
    PersonRenamed {
        person_id: PersonId,
        name:      String,
    },
    CurrentWeekChanged {
        from: Week,
        to:   Week,
    },
}

impl DeskEvent {
    /// Stable string name of the variant, used for the journal.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::FulfilledRecorded { .. }    => "fulfilled_recorded",
            Self::PenaltyRecorded { .. }      => "penalty_recorded",
            Self::CompensationRecorded { .. } => "compensation_recorded",
            Self::PersonRetired { .. }        => "person_retired",
            Self::ReplacementPerformed { .. } => "replacement_performed",
            Self::ScheduleGenerated { .. }    => "schedule_generated",
            Self::PersonRenamed { .. }        => "person_renamed",
            Self::CurrentWeekChanged { .. }   => "current_week_changed",
        }
    }
}
