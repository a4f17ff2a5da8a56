//! Person records and their append-only attendance history.
//!
//! RULE: `history` is the source of truth. The counters on Person are a
//! cached projection of it and must always equal `LedgerTotals::from_history`.

use crate::types::{Amount, PersonId, Week};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Retired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Absent from an assigned shift; the person owes the fine.
    Penalty,
    /// Covered someone else's shift; the person earns the fine.
    Compensation,
    /// Worked an assigned shift.
    Fulfilled,
}

/// One immutable entry in a person's history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEvent {
    pub week:   Week,
    pub kind:   EventKind,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id:   PersonId,
    pub name: String,

    pub total_absences:       u32,
    pub consecutive_absences: u32,
    pub fulfilled_shifts:     u32,
    pub penalty_total:        Amount,
    pub compensation_total:   Amount,
    pub status:               Status,

    history: Vec<LedgerEvent>,
}

impl Person {
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id:                   id.into(),
            name:                 name.into(),
            total_absences:       0,
            consecutive_absences: 0,
            fulfilled_shifts:     0,
            penalty_total:        0,
            compensation_total:   0,
            status:               Status::Active,
            history:              Vec::new(),
        }
    }

    pub fn history(&self) -> &[LedgerEvent] {
        &self.history
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    pub fn is_retired(&self) -> bool {
        self.status == Status::Retired
    }

    /// Earned minus owed over the whole history.
    pub fn lifetime_net(&self) -> Amount {
        self.compensation_total - self.penalty_total
    }

    // Mutators are crate-private: callers go through ledger.rs, which
    // validates first and then applies event and counters together.

    pub(crate) fn push_fulfilled(&mut self, week: Week) {
        self.history.push(LedgerEvent { week, kind: EventKind::Fulfilled, amount: 0 });
        self.fulfilled_shifts += 1;
        self.consecutive_absences = 0;
    }

    /// Returns true when this penalty is the one that retires the person.
    pub(crate) fn push_penalty(&mut self, week: Week, fine: Amount, threshold: u32) -> bool {
        self.history.push(LedgerEvent { week, kind: EventKind::Penalty, amount: fine });
        self.total_absences += 1;
        self.penalty_total += fine;
        self.consecutive_absences += 1;

        if self.status == Status::Active && self.consecutive_absences >= threshold {
            self.status = Status::Retired;
            return true;
        }
        false
    }

    pub(crate) fn push_compensation(&mut self, week: Week, amount: Amount) {
        self.history.push(LedgerEvent { week, kind: EventKind::Compensation, amount });
        self.compensation_total += amount;
    }
}

/// Counters recomputed from scratch by folding a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub total_absences:       u32,
    pub consecutive_absences: u32,
    pub fulfilled_shifts:     u32,
    pub penalty_total:        Amount,
    pub compensation_total:   Amount,
    pub retired:              bool,
}

impl LedgerTotals {
    pub fn from_history(history: &[LedgerEvent], retirement_threshold: u32) -> Self {
        history.iter().fold(Self::default(), |mut acc, event| {
            match event.kind {
                EventKind::Fulfilled => {
                    acc.fulfilled_shifts += 1;
                    acc.consecutive_absences = 0;
                }
                EventKind::Penalty => {
                    acc.total_absences += 1;
                    acc.penalty_total += event.amount;
                    acc.consecutive_absences += 1;
                    if acc.consecutive_absences >= retirement_threshold {
                        acc.retired = true;
                    }
                }
                EventKind::Compensation => {
                    acc.compensation_total += event.amount;
                }
            }
            acc
        })
    }

    /// True when the cached counters on `person` match this projection.
    pub fn matches(&self, person: &Person) -> bool {
        self.total_absences == person.total_absences
            && self.consecutive_absences == person.consecutive_absences
            && self.fulfilled_shifts == person.fulfilled_shifts
            && self.penalty_total == person.penalty_total
            && self.compensation_total == person.compensation_total
            && self.retired == person.is_retired()
    }
}
