//! Guest list view.

use super::{contains_needle, search_needle};
use crate::model::person::{Person, Side};
use serde::{Deserialize, Serialize};

/// Status chips shown above the guest list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeopleFilter {
    #[default]
    All,
    NotInvited,
    Invited,
    #[serde(rename = "gelin")]
    BrideSide,
    #[serde(rename = "damat")]
    GroomSide,
    #[serde(rename = "ortak")]
    Shared,
}

impl PeopleFilter {
    pub fn matches(self, person: &Person) -> bool {
        match self {
            Self::All => true,
            Self::NotInvited => !person.invited,
            Self::Invited => person.invited,
            Self::BrideSide => person.side == Side::Bride,
            Self::GroomSide => person.side == Side::Groom,
            Self::Shared => person.side == Side::Shared,
        }
    }
}

/// Headline counters for the guest list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeopleStats {
    pub total: usize,
    pub invited: usize,
}

/// Returns people passing `filter` and matching `query`, in stored order.
///
/// Search looks at name, notes and phone.
pub fn filter_people<'a>(people: &'a [Person], filter: PeopleFilter, query: &str) -> Vec<&'a Person> {
    let needle = search_needle(query);
    people
        .iter()
        .filter(|person| filter.matches(person))
        .filter(|person| match needle.as_deref() {
            None => true,
            Some(needle) => {
                contains_needle(&person.name, needle)
                    || contains_needle(&person.notes, needle)
                    || contains_needle(&person.phone, needle)
            }
        })
        .collect()
}

pub fn people_stats(people: &[Person]) -> PeopleStats {
    PeopleStats {
        total: people.len(),
        invited: people.iter().filter(|person| person.invited).count(),
    }
}
