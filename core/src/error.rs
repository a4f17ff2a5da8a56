use thiserror::Error;

use crate::types::Week;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Person '{person_id}' not found")]
    PersonNotFound { person_id: String },

    #[error("Week {week} is outside the calendar (1..={total_weeks})")]
    WeekNotFound { week: Week, total_weeks: Week },

    #[error("Cycle {cycle} is outside the calendar (1..={cycle_count})")]
    CycleNotFound { cycle: u32, cycle_count: u32 },

    #[error("Shift {shift_index} not found in week {week}")]
    ShiftNotFound { week: Week, shift_index: usize },

    #[error("Person '{person_id}' is not assigned to shift {shift_index} of week {week}")]
    NotAssigned {
        person_id:   String,
        week:        Week,
        shift_index: usize,
    },

    #[error("Invalid operation: {reason}")]
    InvalidOperation { reason: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration { reason: reason.into() }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidOperation { reason: reason.into() }
    }

    pub(crate) fn person_not_found(person_id: &str) -> Self {
        Self::PersonNotFound { person_id: person_id.to_string() }
    }

    /// True for the "referenced thing does not exist" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PersonNotFound { .. }
                | Self::WeekNotFound { .. }
                | Self::CycleNotFound { .. }
                | Self::ShiftNotFound { .. }
                | Self::NotAssigned { .. }
        )
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
