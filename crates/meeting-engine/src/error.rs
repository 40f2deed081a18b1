//! Error types for meeting-engine operations.

use thiserror::Error;

use crate::slot::TimeSlot;

/// Hard failures. A participant being busy is not one of these; see
/// [`BookingOutcome::Unavailable`](crate::meeting::BookingOutcome::Unavailable).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Identifier already registered: {0}")]
    DuplicateIdentifier(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A ledger was asked to book a slot it already holds. The booking protocol
    /// checks availability first, so seeing this means that check was skipped.
    #[error("Slot {slot} is already booked for {identifier}")]
    Conflict { identifier: String, slot: TimeSlot },

    #[error(
        "No slot found: {found} of {requested} slots after examining {examined} candidates"
    )]
    NoSlotFound {
        requested: usize,
        found: usize,
        examined: usize,
    },
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
