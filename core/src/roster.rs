//! The roster: ordered source of truth for identity and counters.
//!
//! Persons are never removed. Roster order drives the rotation, so it is
//! preserved exactly through serialization.

use crate::{
    config::RetiredPolicy,
    error::{DeskError, DeskResult},
    person::Person,
    schedule::Shift,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(try_from = "Vec<Person>", into = "Vec<Person>")]
pub struct Roster {
    persons: Vec<Person>,
}

// Loaded rosters go through the same duplicate-id check as new ones.
impl TryFrom<Vec<Person>> for Roster {
    type Error = DeskError;

    fn try_from(persons: Vec<Person>) -> DeskResult<Self> {
        Self::new(persons)
    }
}

impl From<Roster> for Vec<Person> {
    fn from(roster: Roster) -> Self {
        roster.persons
    }
}

impl Roster {
    pub fn new(persons: Vec<Person>) -> DeskResult<Self> {
        for (i, p) in persons.iter().enumerate() {
            if persons[..i].iter().any(|q| q.id == p.id) {
                return Err(DeskError::configuration(format!("duplicate person id '{}'", p.id)));
            }
        }
        Ok(Self { persons })
    }

    /// Initial roster: ids `p-0..`, names `Guard 1..`.
    pub fn seed(count: usize) -> Self {
        let persons = (0..count)
            .map(|i| Person::new(format!("p-{i}"), format!("Guard {}", i + 1)))
            .collect();
        Self { persons }
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }

    pub fn get(&self, person_id: &str) -> DeskResult<&Person> {
        self.persons
            .iter()
            .find(|p| p.id == person_id)
            .ok_or_else(|| DeskError::person_not_found(person_id))
    }

    pub(crate) fn get_mut(&mut self, person_id: &str) -> DeskResult<&mut Person> {
        self.persons
            .iter_mut()
            .find(|p| p.id == person_id)
            .ok_or_else(|| DeskError::person_not_found(person_id))
    }

    pub fn contains(&self, person_id: &str) -> bool {
        self.persons.iter().any(|p| p.id == person_id)
    }

    /// Persons that enter the rotation under `policy`, in roster order.
    pub fn rotation_pool(&self, policy: RetiredPolicy) -> Vec<&Person> {
        match policy {
            RetiredPolicy::Include => self.persons.iter().collect(),
            RetiredPolicy::Exclude => self.persons.iter().filter(|p| p.is_active()).collect(),
        }
    }

    /// Active persons not already on `shift`, in roster order.
    /// This is the only pool a replacement should be picked from.
    pub fn replacement_candidates(&self, shift: &Shift) -> Vec<&Person> {
        self.persons
            .iter()
            .filter(|p| p.is_active() && !shift.is_assigned(&p.id))
            .collect()
    }

    /// Change a display name. Identity never changes.
    pub(crate) fn rename(&mut self, person_id: &str, name: &str) -> DeskResult<&Person> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DeskError::invalid("name must not be empty"));
        }
        let person = self.get_mut(person_id)?;
        person.name = name.to_string();
        Ok(&*person)
    }
}
