//! # meeting-engine
//!
//! Deterministic meeting scheduling.
//!
//! Keeps a directory of people, one availability ledger per person and the
//! meetings booked between them, and finds the earliest whole-hour slots at
//! which a whole group is free, within day-of-week and hour-of-day preferences.
//! The library never reads the system clock: every time-dependent operation
//! takes the "now" anchor from the caller.
//!
//! ## Modules
//!
//! - [`slot`]: Whole-hour time slots and the `HH-dd-MM-yyyy` text format
//! - [`directory`]: Registered people keyed by email-shaped identifier
//! - [`ledger`]: Per-person booked slots, held in an arena keyed by identifier
//! - [`meeting`]: Meetings, the meeting store and booking outcomes
//! - [`preferences`]: Allowed days and hours for suggestions
//! - [`suggest`]: Bounded forward search for free slots
//! - [`report`]: Structured events and the sinks that receive them
//! - [`config`]: TOML-loadable scheduler defaults
//! - [`scheduler`]: The facade tying it all together
//! - [`error`]: Error types

pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod meeting;
pub mod preferences;
pub mod report;
pub mod scheduler;
pub mod slot;
pub mod suggest;

pub use config::{ConfigError, SchedulerConfig};
pub use directory::{is_valid_identifier, Directory, Person};
pub use error::SchedulerError;
pub use ledger::{Booking, Ledger, Ledgers};
pub use meeting::{BookingOutcome, Meeting, MeetingId, MeetingStore};
pub use preferences::{parse_days, parse_hours, Preferences};
pub use report::{Reporter, SchedulerEvent, TracingReporter};
pub use scheduler::Scheduler;
pub use slot::TimeSlot;
pub use suggest::{suggest_slots, SearchLimit};
