//! Calendar arithmetic: weeks, cycles and concrete dates.
//!
//! Nothing here is stored: cycle index and week range are always derived
//! from the week number and the configured cycle length.

use crate::{
    config::DeskConfig,
    error::{DeskError, DeskResult},
    types::{Cycle, Week},
};
use chrono::{Duration, NaiveDate};
use std::ops::RangeInclusive;

/// Fail with WeekNotFound unless `week` is inside the horizon.
pub fn check_week(config: &DeskConfig, week: Week) -> DeskResult<()> {
    if week == 0 || week > config.total_weeks {
        return Err(DeskError::WeekNotFound { week, total_weeks: config.total_weeks });
    }
    Ok(())
}

/// The 1-based cycle a week belongs to.
pub fn cycle_of_week(config: &DeskConfig, week: Week) -> Cycle {
    (week.saturating_sub(1)) / config.weeks_per_cycle + 1
}

/// Inclusive week range of a 1-based cycle.
/// Empty for cycle 0 or a cycle whose weeks cannot be represented.
pub fn cycle_week_range(config: &DeskConfig, cycle: Cycle) -> RangeInclusive<Week> {
    let start = cycle
        .checked_sub(1)
        .and_then(|c| c.checked_mul(config.weeks_per_cycle))
        .and_then(|w| w.checked_add(1));
    let end = cycle.checked_mul(config.weeks_per_cycle);
    match (start, end) {
        (Some(start), Some(end)) => start..=end,
        _ => 1..=0,
    }
}

/// True on the last week of a cycle, where settlement happens.
pub fn is_cycle_close(config: &DeskConfig, week: Week) -> bool {
    week > 0 && week % config.weeks_per_cycle == 0
}

/// Concrete date of a shift day: start date + (week - 1) weeks + day index.
pub fn shift_date(config: &DeskConfig, week: Week, day_index: usize) -> DeskResult<NaiveDate> {
    check_week(config, week)?;
    if day_index >= config.day_labels.len() {
        return Err(DeskError::invalid(format!("day index {day_index} out of range")));
    }
    let offset = i64::from(week - 1) * 7 + day_index as i64;
    config
        .start_date
        .checked_add_signed(Duration::days(offset))
        .ok_or_else(|| DeskError::configuration("calendar date overflow"))
}
