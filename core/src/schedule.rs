//! Shifts and weekly schedules.

use crate::{
    error::{DeskError, DeskResult},
    types::{PersonId, Week},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Morning,
    Afternoon,
}

impl Period {
    /// Generation order within a day.
    pub const ALL: [Period; 2] = [Period::Morning, Period::Afternoon];
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shift {
    pub day:       String,
    pub day_index: usize,
    pub period:    Period,
    /// Current occupants, one per required slot.
    pub personnel: Vec<PersonId>,
    /// Originally assigned id -> id that replaced them. Display only.
    pub replacements: BTreeMap<PersonId, PersonId>,
}

impl Shift {
    pub fn is_assigned(&self, person_id: &str) -> bool {
        self.personnel.iter().any(|p| p == person_id)
    }

    pub fn slot_of(&self, person_id: &str) -> Option<usize> {
        self.personnel.iter().position(|p| p == person_id)
    }

    /// Who replaced `original_id` on this shift, if anyone.
    pub fn replaced_by(&self, original_id: &str) -> Option<&PersonId> {
        self.replacements.get(original_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub week:   Week,
    pub shifts: Vec<Shift>,
}

/// Address of one shift: 1-based week, 0-based shift index within it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShiftLocator {
    pub week:        Week,
    pub shift_index: usize,
}

/// The full horizon, one WeeklySchedule per week, in week order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Schedule {
    weeks: Vec<WeeklySchedule>,
}

impl Schedule {
    pub(crate) fn from_weeks(weeks: Vec<WeeklySchedule>) -> Self {
        Self { weeks }
    }

    pub fn weeks(&self) -> &[WeeklySchedule] {
        &self.weeks
    }

    pub fn week(&self, week: Week) -> DeskResult<&WeeklySchedule> {
        self.weeks
            .iter()
            .find(|w| w.week == week)
            .ok_or(DeskError::WeekNotFound { week, total_weeks: self.weeks.len() as Week })
    }

    pub fn shift(&self, at: ShiftLocator) -> DeskResult<&Shift> {
        self.week(at.week)?
            .shifts
            .get(at.shift_index)
            .ok_or(DeskError::ShiftNotFound { week: at.week, shift_index: at.shift_index })
    }

    pub(crate) fn shift_mut(&mut self, at: ShiftLocator) -> DeskResult<&mut Shift> {
        let total_weeks = self.weeks.len() as Week;
        self.weeks
            .iter_mut()
            .find(|w| w.week == at.week)
            .ok_or(DeskError::WeekNotFound { week: at.week, total_weeks })?
            .shifts
            .get_mut(at.shift_index)
            .ok_or(DeskError::ShiftNotFound { week: at.week, shift_index: at.shift_index })
    }

    /// Total assignments per person id across the horizon.
    pub fn assignment_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for shift in self.weeks.iter().flat_map(|w| &w.shifts) {
            for id in &shift.personnel {
                *counts.entry(id.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }
}
