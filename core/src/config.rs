use crate::{
    error::{DeskError, DeskResult},
    types::{Amount, Cycle, Week},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether retired persons take part in shift generation.
///
/// Generation never filters on its own: the choice is made here, explicitly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetiredPolicy {
    /// Generate over the whole roster, retired members included.
    #[default]
    Include,
    /// Drop retired members from the rotation before generating.
    Exclude,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeskConfig {
    /// Amount charged per penalty and paid per compensation.
    pub fine_amount: Amount,
    /// Consecutive absences that retire a person.
    pub retirement_threshold: u32,
    /// Head count required on every shift.
    pub personnel_per_shift: usize,
    pub weeks_per_cycle: Week,
    /// Whole horizon; must be a multiple of `weeks_per_cycle`.
    pub total_weeks: Week,
    /// Date of the first day of week 1.
    pub start_date: NaiveDate,
    /// Seven day labels, first day of the week first.
    pub day_labels: Vec<String>,
    /// Size of the roster created on first start.
    pub initial_roster_size: usize,
    #[serde(default)]
    pub retired_generation: RetiredPolicy,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            fine_amount:          50_000,
            retirement_threshold: 3,
            personnel_per_shift:  2,
            weeks_per_cycle:      3,
            total_weeks:          105, // 35 cycles, 2026 and 2027
            start_date:           NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            day_labels: [
                "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            initial_roster_size:  18,
            retired_generation:   RetiredPolicy::Include,
        }
    }
}

impl DeskConfig {
    /// Load from a JSON file and validate.
    /// In tests, use DeskConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DeskConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the generator and settlement cannot honour.
    pub fn validate(&self) -> DeskResult<()> {
        if self.fine_amount < 0 {
            return Err(DeskError::configuration("fine_amount must not be negative"));
        }
        if self.retirement_threshold == 0 {
            return Err(DeskError::configuration("retirement_threshold must be at least 1"));
        }
        if self.personnel_per_shift == 0 {
            return Err(DeskError::configuration("personnel_per_shift must be at least 1"));
        }
        if self.weeks_per_cycle == 0 || self.total_weeks == 0 {
            return Err(DeskError::configuration("cycle length and horizon must be non-zero"));
        }
        if self.total_weeks % self.weeks_per_cycle != 0 {
            return Err(DeskError::configuration(format!(
                "total_weeks {} is not a whole number of {}-week cycles",
                self.total_weeks, self.weeks_per_cycle
            )));
        }
        if self.day_labels.len() != 7 {
            return Err(DeskError::configuration(format!(
                "expected 7 day labels, got {}",
                self.day_labels.len()
            )));
        }
        Ok(())
    }

    pub fn cycle_count(&self) -> Cycle {
        self.total_weeks / self.weeks_per_cycle
    }

    /// Shifts per week: two periods on each labelled day.
    pub fn shifts_per_week(&self) -> usize {
        self.day_labels.len() * crate::schedule::Period::ALL.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = DeskConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cycle_count(), 35);
        assert_eq!(config.shifts_per_week(), 14);
    }

    #[test]
    fn partial_cycle_horizon_is_rejected() {
        let config = DeskConfig { total_weeks: 10, ..DeskConfig::default() };
        assert!(matches!(config.validate(), Err(DeskError::Configuration { .. })));
    }

    #[test]
    fn zero_quota_is_rejected() {
        let config = DeskConfig { personnel_per_shift: 0, ..DeskConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_policy_defaults_to_include() {
        let mut json = serde_json::to_value(DeskConfig::default()).unwrap();
        json.as_object_mut().unwrap().remove("retired_generation");
        let config: DeskConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.retired_generation, RetiredPolicy::Include);
    }
}
