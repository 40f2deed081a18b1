//! Structured notifications emitted by the scheduler.
//!
//! The scheduler never prints. Every observable step is handed to a [`Reporter`]
//! as a [`SchedulerEvent`]; what happens next is up to the sink.
//!
//! - [`TracingReporter`]: emits `tracing` events (the default)
//! - `Vec<SchedulerEvent>`: records events, handy in tests
//! - `()`: discards everything

use std::fmt;

use chrono::Weekday;
use serde::Serialize;
use tracing::info;

use crate::directory::Person;
use crate::meeting::MeetingId;
use crate::preferences::Preferences;
use crate::slot::TimeSlot;

/// Something the scheduler did that a caller may want to show or record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedulerEvent {
    PersonRegistered {
        person: Person,
    },
    MeetingCreated {
        meeting: MeetingId,
        slot: TimeSlot,
        weekday: Weekday,
        participants: Vec<Person>,
    },
    /// A booking was abandoned because some participants were busy.
    MeetingRejected {
        slot: TimeSlot,
        busy: Vec<String>,
    },
    ParticipantAdded {
        meeting: MeetingId,
        slot: TimeSlot,
        person: Person,
    },
    SlotsSuggested {
        participants: Vec<String>,
        preferences: Preferences,
        slots: Vec<TimeSlot>,
    },
}

impl fmt::Display for SchedulerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonRegistered { person } => {
                write!(f, "> Successfully added new person: {person}")
            }
            Self::MeetingCreated {
                meeting,
                slot,
                weekday,
                participants,
            } => {
                writeln!(f, "> Successfully created new meeting {meeting}.")?;
                writeln!(f, "Displaying Meeting at: {slot} - {weekday}")?;
                write!(f, "    Participants:")?;
                for person in participants {
                    write!(f, "\n    {person}")?;
                }
                Ok(())
            }
            Self::MeetingRejected { slot, busy } => write!(
                f,
                "¤ attempted createMeeting at: {slot} - not available: {}",
                busy.join(", ")
            ),
            Self::ParticipantAdded {
                meeting,
                slot,
                person,
            } => write!(f, "> Added {person} to meeting {meeting} at {slot}"),
            Self::SlotsSuggested {
                participants,
                slots,
                ..
            } => {
                let slots: Vec<String> = slots.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "> Suggesting Timeslots for Meeting with Participants: [{}]\n [{}]",
                    participants.join(", "),
                    slots.join(", ")
                )
            }
        }
    }
}

/// A sink for [`SchedulerEvent`]s.
pub trait Reporter {
    fn report(&mut self, event: &SchedulerEvent);
}

/// Forwards every event to `tracing` at `INFO`, with the event's key fields
/// attached as structured fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: &SchedulerEvent) {
        match event {
            SchedulerEvent::PersonRegistered { person } => {
                info!(email = person.email(), name = person.name(), "person registered");
            }
            SchedulerEvent::MeetingCreated {
                meeting,
                slot,
                participants,
                ..
            } => {
                let emails: Vec<&str> = participants.iter().map(Person::email).collect();
                info!(%meeting, %slot, participants = ?emails, "meeting created");
            }
            SchedulerEvent::MeetingRejected { slot, busy } => {
                info!(%slot, busy = ?busy, "meeting rejected, participants unavailable");
            }
            SchedulerEvent::ParticipantAdded {
                meeting,
                slot,
                person,
            } => {
                info!(%meeting, %slot, email = person.email(), "participant added");
            }
            SchedulerEvent::SlotsSuggested {
                participants,
                slots,
                ..
            } => {
                let slots: Vec<String> = slots.iter().map(ToString::to_string).collect();
                info!(participants = ?participants, slots = ?slots, "slots suggested");
            }
        }
    }
}

impl Reporter for Vec<SchedulerEvent> {
    fn report(&mut self, event: &SchedulerEvent) {
        self.push(event.clone());
    }
}

impl Reporter for () {
    fn report(&mut self, _event: &SchedulerEvent) {}
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: &SchedulerEvent) {
        (**self).report(event);
    }
}
