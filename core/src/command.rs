use serde::{Deserialize, Serialize};
use crate::types::{PersonId, Week};

/// Every mutation the administrator can request.
/// Variants are added over time; never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    // ── Ledger ─────────────────────────────────────
    RecordFulfilled {
        person_id: PersonId,
        week:      Week,
    },
    RecordPenalty {
        person_id: PersonId,
        week:      Week,
    },
    RecordCompensation {
        person_id: PersonId,
        week:      Week,
    },

    // ── Schedule ───────────────────────────────────
    PerformReplacement {
        absent_id:      PersonId,
        replacement_id: PersonId,
        week:           Week,
        shift_index:    usize,
    },
    /// Every current occupant of the shift worked it.
    MarkShiftFulfilled {
        week:        Week,
        shift_index: usize,
    },
    /// Discard the schedule and its replacement history and rebuild it.
    Regenerate,

    // ── Roster / session ───────────────────────────
    RenamePerson {
        person_id: PersonId,
        name:      String,
    },
    SetCurrentWeek {
        week: Week,
    },
}

impl Command {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RecordFulfilled { .. }    => "record_fulfilled",
            Self::RecordPenalty { .. }      => "record_penalty",
            Self::RecordCompensation { .. } => "record_compensation",
            Self::PerformReplacement { .. } => "perform_replacement",
            Self::MarkShiftFulfilled { .. } => "mark_shift_fulfilled",
            Self::Regenerate                => "regenerate",
            Self::RenamePerson { .. }       => "rename_person",
            Self::SetCurrentWeek { .. }     => "set_current_week",
        }
    }
}

/// An applied command as persisted to the journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id:           Option<i64>,
    pub sequence:     u64,
    pub command_id:   String,
    pub command_type: String,
    pub command_json: String,
    pub events_json:  String, // JSON array of DeskEvent
}
