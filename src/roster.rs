//! Participant roster management
//!
//! This module tracks the participants of a buzzer session as last observed
//! from the event stream. The roster keeps participants in arrival order and
//! tolerates updates for identifiers it does not know about, since late events
//! for participants that already left are expected.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A unique identifier for participants in a session
///
/// Identifiers are assigned by the server and are opaque to the client.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Id(u64);

impl Id {
    /// Creates an identifier from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value of the identifier
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A participant as seen by the client
///
/// `buzzed` and `locked_out` are never both set once an event has been fully
/// applied: a participant is first the buzzer, then becomes locked out when the
/// round resumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Server assigned identifier
    pub id: Id,
    /// Display name
    pub name: String,
    /// Whether this participant is the one who stopped the round
    pub buzzed: bool,
    /// Whether this participant is barred from buzzing until cleared
    pub locked_out: bool,
}

impl Participant {
    /// Creates a participant with no buzz or lock-out flags
    pub fn new(id: Id, name: String) -> Self {
        Self {
            id,
            name,
            buzzed: false,
            locked_out: false,
        }
    }
}

/// Ordered-by-arrival mapping from identifier to participant
///
/// Every identifier appears at most once.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    fn position(&self, id: Id) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    fn get_mut(&mut self, id: Id) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Adds a participant at the end of the roster
    ///
    /// An identifier that is already present keeps its position and only
    /// takes the new name.
    ///
    /// # Returns
    ///
    /// `true` if the participant was not present before
    pub fn insert(&mut self, id: Id, name: String) -> bool {
        if let Some(existing) = self.get_mut(id) {
            existing.name = name;
            return false;
        }
        self.participants.push(Participant::new(id, name));
        true
    }

    /// Renames a participant in place
    ///
    /// # Returns
    ///
    /// `false` if the identifier is unknown, in which case nothing changes
    pub fn rename(&mut self, id: Id, name: String) -> bool {
        match self.get_mut(id) {
            Some(participant) => {
                participant.name = name;
                true
            }
            None => false,
        }
    }

    /// Removes a participant from the roster
    ///
    /// # Returns
    ///
    /// The removed participant, or `None` if the identifier is unknown
    pub fn remove(&mut self, id: Id) -> Option<Participant> {
        self.position(id).map(|index| self.participants.remove(index))
    }

    /// Marks a participant as the one who buzzed
    ///
    /// # Returns
    ///
    /// `false` if the identifier is unknown
    pub fn mark_buzzed(&mut self, id: Id) -> bool {
        match self.get_mut(id) {
            Some(participant) => {
                participant.buzzed = true;
                true
            }
            None => false,
        }
    }

    /// Turns a buzzer into a locked out participant
    ///
    /// # Returns
    ///
    /// `false` if the identifier is unknown
    pub fn lock_out(&mut self, id: Id) -> bool {
        match self.get_mut(id) {
            Some(participant) => {
                participant.buzzed = false;
                participant.locked_out = true;
                true
            }
            None => false,
        }
    }

    /// Clears the buzz and lock-out flags of every participant
    pub fn clear_flags(&mut self) {
        for participant in &mut self.participants {
            participant.buzzed = false;
            participant.locked_out = false;
        }
    }

    /// Removes every participant
    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Checks whether the identifier belongs to a participant currently marked as buzzer
    pub fn is_buzzer(&self, id: Id) -> bool {
        self.get(id).is_some_and(|p| p.buzzed)
    }

    /// Gets a participant by identifier
    pub fn get(&self, id: Id) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Checks whether the identifier is present
    pub fn contains(&self, id: Id) -> bool {
        self.position(id).is_some()
    }

    /// Iterates over participants in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Identifiers of all participants in arrival order
    pub fn ids(&self) -> Vec<Id> {
        self.participants.iter().map(|p| p.id).collect_vec()
    }

    /// Number of participants
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether the roster has no participants
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
