//! The aggregate state and its snapshot form.
//!
//! A snapshot is written after every applied command. It captures the
//! whole aggregate, so loading the latest one restores the session exactly,
//! history order included.

use crate::{
    calendar,
    config::DeskConfig,
    error::{DeskError, DeskResult},
    generator,
    roster::Roster,
    schedule::{Schedule, WeeklySchedule},
    types::Week,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskState {
    pub roster:       Roster,
    pub schedule:     Schedule,
    pub current_week: Week,
}

impl DeskState {
    /// Fresh state: seeded roster, generated schedule, week 1.
    pub fn initial(config: &DeskConfig) -> DeskResult<Self> {
        Self::with_roster(Roster::seed(config.initial_roster_size), config)
    }

    pub fn with_roster(roster: Roster, config: &DeskConfig) -> DeskResult<Self> {
        let schedule = generator::generate_for_roster(&roster, config)?;
        Ok(Self { roster, schedule, current_week: 1 })
    }

    /// Fail with a configuration error when a loaded state no longer fits
    /// the horizon or head count in `config`.
    pub fn check_against(&self, config: &DeskConfig) -> DeskResult<()> {
        let weeks = self.schedule.weeks();
        if weeks.len() != config.total_weeks as usize {
            return Err(DeskError::configuration(format!(
                "stored schedule has {} weeks, config expects {}",
                weeks.len(),
                config.total_weeks
            )));
        }
        for (i, week) in weeks.iter().enumerate() {
            if week.week as usize != i + 1 || week.shifts.len() != config.shifts_per_week() {
                return Err(DeskError::configuration(format!(
                    "stored week {} does not match the configured calendar",
                    week.week
                )));
            }
            if let Some(shift) =
                week.shifts.iter().find(|s| s.personnel.len() != config.personnel_per_shift)
            {
                return Err(DeskError::configuration(format!(
                    "stored week {} {:?} {} has {} occupants, config expects {}",
                    week.week,
                    shift.period,
                    shift.day,
                    shift.personnel.len(),
                    config.personnel_per_shift
                )));
            }
        }
        calendar::check_week(config, self.current_week).map_err(|_| {
            DeskError::configuration(format!(
                "stored current week {} is outside the configured horizon",
                self.current_week
            ))
        })
    }

    /// The week the administrator is currently looking at.
    pub fn current_schedule(&self) -> DeskResult<&WeeklySchedule> {
        self.schedule.week(self.current_week)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeskSnapshot {
    /// Number of commands applied when this snapshot was taken.
    pub sequence: u64,
    pub state:    DeskState,
}

impl DeskSnapshot {
    pub fn to_json(&self) -> DeskResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> DeskResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
