//! Shared primitive types used across the entire desk.

/// A calendar week, 1-based within the configured horizon.
pub type Week = u32;

/// A settlement cycle, 1-based.
pub type Cycle = u32;

/// A stable, unique identifier for a person on the roster.
pub type PersonId = String;

/// A money amount in whole currency units.
pub type Amount = i64;
