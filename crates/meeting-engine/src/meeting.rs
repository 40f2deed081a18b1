//! Meetings and the store that holds them.

use std::fmt;

use serde::Serialize;

use crate::error::{Result, SchedulerError};
use crate::slot::TimeSlot;

/// Store-assigned handle for a meeting. Ids are dense and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MeetingId(usize);

impl MeetingId {
    /// An id for the meeting at `index`. Whether it exists is the store's call.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A booked meeting: one slot, one or more participants.
///
/// Participants are held by identifier; the [`Directory`](crate::directory::Directory)
/// owns the person records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meeting {
    id: MeetingId,
    slot: TimeSlot,
    participants: Vec<String>,
}

impl Meeting {
    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn slot(&self) -> TimeSlot {
        self.slot
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn has_participant(&self, identifier: &str) -> bool {
        self.participants.iter().any(|p| p == identifier)
    }

    /// Caller must already have booked `identifier`'s ledger at this meeting's slot.
    pub(crate) fn push_participant(&mut self, identifier: &str) {
        self.participants.push(identifier.to_string());
    }
}

/// Result of a booking attempt that passed validation.
///
/// A busy participant is an ordinary outcome, not an error, so it lives here
/// instead of in [`SchedulerError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BookingOutcome {
    /// Every participant was free and is now booked.
    Booked { meeting: MeetingId },
    /// At least one participant was busy; nothing changed.
    Unavailable { slot: TimeSlot, busy: Vec<String> },
}

impl BookingOutcome {
    pub fn is_booked(&self) -> bool {
        matches!(self, Self::Booked { .. })
    }

    pub fn meeting_id(&self) -> Option<MeetingId> {
        match self {
            Self::Booked { meeting } => Some(*meeting),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Every meeting created so far, in creation order.
#[derive(Debug, Clone, Default)]
pub struct MeetingStore {
    meetings: Vec<Meeting>,
}

impl MeetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next inserted meeting will receive.
    pub fn next_id(&self) -> MeetingId {
        MeetingId::new(self.meetings.len())
    }

    /// Append a meeting. Ledger bookings are the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInput`] if `participants` is empty.
    pub fn insert(&mut self, slot: TimeSlot, participants: Vec<String>) -> Result<MeetingId> {
        if participants.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "a meeting needs at least one participant".to_string(),
            ));
        }
        let id = self.next_id();
        self.meetings.push(Meeting {
            id,
            slot,
            participants,
        });
        Ok(id)
    }

    pub fn get(&self, id: MeetingId) -> Result<&Meeting> {
        self.meetings
            .get(id.0)
            .ok_or_else(|| SchedulerError::NotFound(format!("meeting {id}")))
    }

    pub(crate) fn get_mut(&mut self, id: MeetingId) -> Result<&mut Meeting> {
        self.meetings
            .get_mut(id.0)
            .ok_or_else(|| SchedulerError::NotFound(format!("meeting {id}")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Meeting> {
        self.meetings.iter()
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }
}
