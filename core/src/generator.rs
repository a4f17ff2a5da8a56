//! Shift rotation generator.
//!
//! The roster is a cyclic sequence. One cursor walks it across the whole
//! horizon (never reset per week or day): every shift takes the next
//! `personnel_per_shift` members from the cursor, then the cursor moves on
//! by the same amount, wrapping modulo the pool size.
//!
//! RULES:
//!   - No randomness. Same pool order in, same schedule out.
//!   - Every shift is staffed to quota, or generation fails.
//!   - Retired members are filtered only when the config says so.

use crate::{
    config::DeskConfig,
    error::{DeskError, DeskResult},
    person::Person,
    roster::Roster,
    schedule::{Period, Schedule, Shift, WeeklySchedule},
    types::{PersonId, Week},
};
use std::collections::BTreeMap;

/// Build the schedule for the roster under the configured retired policy.
pub fn generate_for_roster(roster: &Roster, config: &DeskConfig) -> DeskResult<Schedule> {
    let pool: Vec<&Person> = roster.rotation_pool(config.retired_generation);
    log::debug!(
        "generating {} weeks over {} of {} persons (policy {:?})",
        config.total_weeks,
        pool.len(),
        roster.len(),
        config.retired_generation
    );
    let ids: Vec<PersonId> = pool.into_iter().map(|p| p.id.clone()).collect();
    generate(&ids, config)
}

/// Build the schedule for an explicit, ordered id pool.
pub fn generate(pool: &[PersonId], config: &DeskConfig) -> DeskResult<Schedule> {
    let quota = config.personnel_per_shift;
    let n = pool.len();
    if quota == 0 || quota > n {
        return Err(DeskError::configuration(format!(
            "cannot staff {quota} per shift from a pool of {n}"
        )));
    }

    let mut cursor = 0usize;
    let mut weeks = Vec::with_capacity(config.total_weeks as usize);

    for week in 1..=config.total_weeks {
        let mut shifts = Vec::with_capacity(config.shifts_per_week());
        for (day_index, day) in config.day_labels.iter().enumerate() {
            for period in Period::ALL {
                let personnel = (0..quota).map(|k| pool[(cursor + k) % n].clone()).collect();
                cursor = (cursor + quota) % n;
                shifts.push(Shift {
                    day: day.clone(),
                    day_index,
                    period,
                    personnel,
                    replacements: BTreeMap::new(),
                });
            }
        }
        weeks.push(WeeklySchedule { week, shifts });
    }

    Ok(Schedule::from_weeks(weeks))
}

/// Where the cursor stands at the start of `week`, for display and tests.
pub fn cursor_at_week(pool_size: usize, config: &DeskConfig, week: Week) -> usize {
    if pool_size == 0 {
        return 0;
    }
    let slots = (week.saturating_sub(1) as usize) * config.shifts_per_week() * config.personnel_per_shift;
    slots % pool_size
}
