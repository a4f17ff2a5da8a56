//! Guard desk core: shift rotation, attendance ledger and cycle settlement.
//!
//! All mutations flow through `engine::apply`; everything else is either a
//! building block it calls or a read-side projection.

pub mod calendar;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod ledger;
pub mod person;
pub mod replacement;
pub mod roster;
pub mod schedule;
pub mod settlement;
pub mod snapshot;
pub mod store;
pub mod types;
