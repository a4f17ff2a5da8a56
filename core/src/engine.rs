//! The desk engine: every mutation goes through `apply`.
//!
//! RULES:
//!   - `apply` is pure: current state + command in, new state + events out.
//!   - A command either succeeds completely or is rejected with no change.
//!   - The engine persists the new snapshot and a journal row before it
//!     swaps the new state in.

use crate::{
    calendar,
    command::{Command, JournalEntry},
    config::DeskConfig,
    error::DeskResult,
    event::DeskEvent,
    generator,
    ledger,
    person::Person,
    replacement::{self, ReplacementOutcome, ReplacementRequest},
    roster::Roster,
    schedule::{Schedule, ShiftLocator},
    settlement::{self, CycleStats, GlobalTotals, SettlementRow},
    snapshot::{DeskSnapshot, DeskState},
    store::DeskStore,
    types::{Cycle, Week},
};

/// The result of a successful state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state:  DeskState,
    pub events: Vec<DeskEvent>,
}

/// Apply one command to a copy of `state`.
pub fn apply(state: &DeskState, config: &DeskConfig, command: &Command) -> DeskResult<Transition> {
    let mut next = state.clone();

    let events = match command {
        Command::RecordFulfilled { person_id, week } => {
            ledger::record_fulfilled(&mut next.roster, config, person_id, *week)?.events
        }
        Command::RecordPenalty { person_id, week } => {
            ledger::record_penalty(&mut next.roster, config, person_id, *week)?.events
        }
        Command::RecordCompensation { person_id, week } => {
            ledger::record_compensation(&mut next.roster, config, person_id, *week)?.events
        }
        Command::PerformReplacement { absent_id, replacement_id, week, shift_index } => {
            let request = ReplacementRequest {
                absent_id:      absent_id.clone(),
                replacement_id: replacement_id.clone(),
                at:             ShiftLocator { week: *week, shift_index: *shift_index },
            };
            replacement::perform_replacement(&mut next.roster, &mut next.schedule, config, &request)?
                .events
        }
        Command::MarkShiftFulfilled { week, shift_index } => {
            calendar::check_week(config, *week)?;
            let at = ShiftLocator { week: *week, shift_index: *shift_index };
            let occupants = next.schedule.shift(at)?.personnel.clone();
            let mut events = Vec::with_capacity(occupants.len());
            for person_id in &occupants {
                events.extend(ledger::record_fulfilled(&mut next.roster, config, person_id, *week)?.events);
            }
            events
        }
        Command::Regenerate => {
            next.schedule = generator::generate_for_roster(&next.roster, config)?;
            let pool_size = next.roster.rotation_pool(config.retired_generation).len();
            log::info!("schedule regenerated over {pool_size} persons");
            vec![DeskEvent::ScheduleGenerated { weeks: config.total_weeks, pool_size }]
        }
        Command::RenamePerson { person_id, name } => {
            let person = next.roster.rename(person_id, name)?;
            vec![DeskEvent::PersonRenamed {
                person_id: person_id.clone(),
                name:      person.name.clone(),
            }]
        }
        Command::SetCurrentWeek { week } => {
            calendar::check_week(config, *week)?;
            let from = next.current_week;
            next.current_week = *week;
            vec![DeskEvent::CurrentWeekChanged { from, to: *week }]
        }
    };

    Ok(Transition { state: next, events })
}

pub struct DeskEngine {
    config:   DeskConfig,
    state:    DeskState,
    store:    DeskStore,
    sequence: u64,
}

impl DeskEngine {
    /// Resume from the latest snapshot in `store`, or start fresh and save
    /// the initial state as sequence 0.
    pub fn open(config: DeskConfig, store: DeskStore) -> DeskResult<Self> {
        config.validate()?;
        store.migrate()?;

        let (state, sequence) = match store.latest_snapshot()? {
            Some(snapshot) => {
                snapshot.state.check_against(&config)?;
                log::info!("resuming from snapshot at sequence {}", snapshot.sequence);
                (snapshot.state, snapshot.sequence)
            }
            None => {
                let state = DeskState::initial(&config)?;
                store.save_snapshot(&DeskSnapshot { sequence: 0, state: state.clone() })?;
                log::info!(
                    "initialised {} persons over {} weeks",
                    state.roster.len(),
                    config.total_weeks
                );
                (state, 0)
            }
        };

        Ok(Self { config, state, store, sequence })
    }

    /// Start from an explicit roster instead of the seeded one.
    pub fn with_roster(config: DeskConfig, store: DeskStore, roster: Roster) -> DeskResult<Self> {
        config.validate()?;
        store.migrate()?;
        let state = DeskState::with_roster(roster, &config)?;
        store.save_snapshot(&DeskSnapshot { sequence: 0, state: state.clone() })?;
        Ok(Self { config, state, store, sequence: 0 })
    }

    /// Fresh engine on an in-memory store (used in tests).
    pub fn in_memory(config: DeskConfig) -> DeskResult<Self> {
        Self::open(config, DeskStore::in_memory()?)
    }

    /// Apply, persist, then swap in. Returns the events produced.
    pub fn submit(&mut self, command: Command) -> DeskResult<Vec<DeskEvent>> {
        let transition = match apply(&self.state, &self.config, &command) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("rejected {}: {e}", command.type_name());
                return Err(e);
            }
        };

        let sequence = self.sequence + 1;
        let entry = JournalEntry {
            id:           None,
            sequence,
            command_id:   uuid::Uuid::new_v4().to_string(),
            command_type: command.type_name().to_string(),
            command_json: serde_json::to_string(&command)?,
            events_json:  serde_json::to_string(&transition.events)?,
        };
        let snapshot = DeskSnapshot { sequence, state: transition.state };
        self.store.commit_transition(&entry, &snapshot)?;

        self.sequence = sequence;
        self.state = snapshot.state;
        Ok(transition.events)
    }

    // ── Entry points returning what the caller re-renders ───────────

    pub fn record_fulfilled(&mut self, person_id: &str, week: Week) -> DeskResult<Person> {
        self.submit(Command::RecordFulfilled { person_id: person_id.to_string(), week })?;
        Ok(self.state.roster.get(person_id)?.clone())
    }

    pub fn record_penalty(&mut self, person_id: &str, week: Week) -> DeskResult<Person> {
        self.submit(Command::RecordPenalty { person_id: person_id.to_string(), week })?;
        Ok(self.state.roster.get(person_id)?.clone())
    }

    pub fn record_compensation(&mut self, person_id: &str, week: Week) -> DeskResult<Person> {
        self.submit(Command::RecordCompensation { person_id: person_id.to_string(), week })?;
        Ok(self.state.roster.get(person_id)?.clone())
    }

    pub fn perform_replacement(&mut self, request: ReplacementRequest) -> DeskResult<ReplacementOutcome> {
        let events = self.submit(Command::PerformReplacement {
            absent_id:      request.absent_id.clone(),
            replacement_id: request.replacement_id.clone(),
            week:           request.at.week,
            shift_index:    request.at.shift_index,
        })?;
        Ok(ReplacementOutcome {
            absent:      self.state.roster.get(&request.absent_id)?.clone(),
            replacement: self.state.roster.get(&request.replacement_id)?.clone(),
            shift:       self.state.schedule.shift(request.at)?.clone(),
            events,
        })
    }

    pub fn regenerate(&mut self) -> DeskResult<&Schedule> {
        self.submit(Command::Regenerate)?;
        Ok(&self.state.schedule)
    }

    // ── Read side ──────────────────────────────────────────────────

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn state(&self) -> &DeskState {
        &self.state
    }

    pub fn roster(&self) -> &Roster {
        &self.state.roster
    }

    pub fn schedule(&self) -> &Schedule {
        &self.state.schedule
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn store(&self) -> &DeskStore {
        &self.store
    }

    pub fn cycle_stats(&self, person_id: &str, cycle: Cycle) -> DeskResult<CycleStats> {
        let person = self.state.roster.get(person_id)?;
        Ok(settlement::cycle_stats(person, cycle, &self.config))
    }

    pub fn cycle_report(&self, cycle: Cycle) -> DeskResult<Vec<SettlementRow>> {
        settlement::cycle_report(&self.state.roster, cycle, &self.config)
    }

    pub fn global_totals(&self) -> GlobalTotals {
        GlobalTotals::from_roster(&self.state.roster)
    }

    pub fn replacement_candidates(&self, at: ShiftLocator) -> DeskResult<Vec<&Person>> {
        let shift = self.state.schedule.shift(at)?;
        Ok(self.state.roster.replacement_candidates(shift))
    }
}

impl std::fmt::Debug for DeskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskEngine")
            .field("sequence", &self.sequence)
            .field("current_week", &self.state.current_week)
            .field("persons", &self.state.roster.len())
            .finish()
    }
}

