//! Entity definitions handled by the event store.

use time::Date;
use uuid::Uuid;

use crate::state::flake::{FlakePair, Slot};

/// One participant as persisted inside an event record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntity {
    /// Email address, fixed at creation time.
    pub email: String,
    /// Per-participant secret token; possession addresses the event and
    /// identifies this slot.
    pub token: String,
    /// Whether this participant currently wants to cancel.
    pub flaked: bool,
}

/// A stored event record: one proposed meeting between two participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntity {
    /// Server-assigned opaque identifier.
    pub id: Uuid,
    /// Calendar date of the proposed event, no time-of-day.
    pub date: Date,
    /// Free-text description, non-empty.
    pub description: String,
    /// The two fixed participants, creator first.
    pub participants: [ParticipantEntity; 2],
}

impl EventEntity {
    /// Borrow the participant occupying `slot`.
    pub fn participant(&self, slot: Slot) -> &ParticipantEntity {
        match slot {
            Slot::First => &self.participants[0],
            Slot::Second => &self.participants[1],
        }
    }

    /// Mutably borrow the participant occupying `slot`.
    pub fn participant_mut(&mut self, slot: Slot) -> &mut ParticipantEntity {
        match slot {
            Slot::First => &mut self.participants[0],
            Slot::Second => &mut self.participants[1],
        }
    }

    /// Snapshot both flake flags.
    pub fn flags(&self) -> FlakePair {
        FlakePair {
            first: self.participants[0].flaked,
            second: self.participants[1].flaked,
        }
    }
}
