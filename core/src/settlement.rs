//! Cycle settlement: read-only projections over the ledger.
//!
//! Nothing here mutates. Calling any function twice on the same roster
//! gives the same answer.

use crate::{
    calendar,
    config::DeskConfig,
    error::{DeskError, DeskResult},
    person::{EventKind, Person},
    roster::Roster,
    types::{Amount, Cycle, PersonId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CycleStats {
    /// Sum of penalty amounts in the cycle.
    pub owed:   Amount,
    /// Sum of compensation amounts in the cycle.
    pub earned: Amount,
}

impl CycleStats {
    pub fn net(&self) -> Amount {
        self.earned - self.owed
    }
}

/// Owed and earned for one person over one 1-based cycle.
/// A cycle outside the horizon simply has no events.
pub fn cycle_stats(person: &Person, cycle: Cycle, config: &DeskConfig) -> CycleStats {
    if cycle == 0 || cycle > config.cycle_count() {
        return CycleStats::default();
    }
    let weeks = calendar::cycle_week_range(config, cycle);
    person
        .history()
        .iter()
        .filter(|e| weeks.contains(&e.week))
        .fold(CycleStats::default(), |mut acc, e| {
            match e.kind {
                EventKind::Penalty      => acc.owed += e.amount,
                EventKind::Compensation => acc.earned += e.amount,
                EventKind::Fulfilled    => {}
            }
            acc
        })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettlementRow {
    pub person_id: PersonId,
    pub name:      String,
    pub retired:   bool,
    pub owed:      Amount,
    pub earned:    Amount,
    pub net:       Amount,
}

/// One settlement row per person, in roster order.
pub fn cycle_report(
    roster: &Roster,
    cycle:  Cycle,
    config: &DeskConfig,
) -> DeskResult<Vec<SettlementRow>> {
    if cycle == 0 || cycle > config.cycle_count() {
        return Err(DeskError::CycleNotFound { cycle, cycle_count: config.cycle_count() });
    }
    Ok(roster
        .iter()
        .map(|p| {
            let stats = cycle_stats(p, cycle, config);
            SettlementRow {
                person_id: p.id.clone(),
                name:      p.name.clone(),
                retired:   p.is_retired(),
                owed:      stats.owed,
                earned:    stats.earned,
                net:       stats.net(),
            }
        })
        .collect())
}

/// Roster-wide totals for the header counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GlobalTotals {
    pub absences:         u32,
    pub fulfilled_shifts: u32,
    /// Fines collected across everyone.
    pub fines_collected:  Amount,
    pub retired:          usize,
}

impl GlobalTotals {
    pub fn from_roster(roster: &Roster) -> Self {
        roster.iter().fold(Self::default(), |mut acc, p| {
            acc.absences += p.total_absences;
            acc.fulfilled_shifts += p.fulfilled_shifts;
            acc.fines_collected += p.penalty_total;
            if p.is_retired() {
                acc.retired += 1;
            }
            acc
        })
    }
}
