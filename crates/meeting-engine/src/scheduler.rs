//! The scheduler facade: one value that owns the directory, the ledgers and the
//! meeting store, and exposes the registration, booking, schedule and
//! suggestion operations over them.
//!
//! Nothing here reads the wall clock. Operations that depend on "now" take an
//! `as_of` argument, so the same calls always give the same answers.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use meeting_engine::{BookingOutcome, Scheduler, TimeSlot};
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register_person("Ada", "ada@x.com").unwrap();
//! scheduler.register_person("Bob", "bob@x.com").unwrap();
//!
//! let outcome = scheduler
//!     .create_meeting_at("09-21-02-2024", &["ada@x.com", "bob@x.com"])
//!     .unwrap();
//! assert!(outcome.is_booked());
//!
//! // Booking Ada again at the same hour is a soft rejection, not an error.
//! let again = scheduler
//!     .create_meeting_at("09-21-02-2024", &["ada@x.com"])
//!     .unwrap();
//! assert!(matches!(again, BookingOutcome::Unavailable { .. }));
//!
//! // Wednesday morning: the next free preferred slot is Thursday 09:00.
//! let now = NaiveDate::from_ymd_opt(2024, 2, 21).unwrap().and_hms_opt(8, 0, 0).unwrap();
//! let slots = scheduler.suggest_slot(&["ada@x.com", "bob@x.com"], now).unwrap();
//! assert_eq!(slots, vec![TimeSlot::parse("09-22-02-2024").unwrap()]);
//! ```

use chrono::NaiveDateTime;

use crate::config::SchedulerConfig;
use crate::directory::{Directory, Person};
use crate::error::{Result, SchedulerError};
use crate::ledger::Ledgers;
use crate::meeting::{BookingOutcome, Meeting, MeetingId, MeetingStore};
use crate::preferences::Preferences;
use crate::report::{Reporter, SchedulerEvent, TracingReporter};
use crate::slot::TimeSlot;
use crate::suggest;

/// In-memory scheduler. Mutating operations take `&mut self`, so a booking is
/// never observed half-applied.
#[derive(Debug)]
pub struct Scheduler<R = TracingReporter> {
    directory: Directory,
    ledgers: Ledgers,
    meetings: MeetingStore,
    config: SchedulerConfig,
    reporter: R,
}

impl Scheduler<TracingReporter> {
    /// A scheduler with default preferences that reports through `tracing`.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// The config is taken as given. An invalid search limit or default
    /// preferences surface as [`SchedulerError::InvalidInput`] from the
    /// suggestion calls; use [`SchedulerConfig::validate`] to catch them earlier.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::with_reporter(config, TracingReporter)
    }
}

impl Default for Scheduler<TracingReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reporter> Scheduler<R> {
    /// See [`Scheduler::with_config`] for how `config` is checked.
    pub fn with_reporter(config: SchedulerConfig, reporter: R) -> Self {
        Self {
            directory: Directory::new(),
            ledgers: Ledgers::new(),
            meetings: MeetingStore::new(),
            config,
            reporter,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The preferences used when a caller supplies none.
    pub fn default_preferences(&self) -> &Preferences {
        &self.config.preferences
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn ledgers(&self) -> &Ledgers {
        &self.ledgers
    }

    pub fn meetings(&self) -> &MeetingStore {
        &self.meetings
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut R {
        &mut self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    // ── People ──────────────────────────────────────────────────────────────

    /// Register a person and open their (empty) ledger.
    ///
    /// # Errors
    ///
    /// See [`Directory::register`].
    pub fn register_person(&mut self, name: &str, email: &str) -> Result<Person> {
        let person = self.directory.register(name, email)?.clone();
        self.ledgers.open(email);
        self.reporter.report(&SchedulerEvent::PersonRegistered {
            person: person.clone(),
        });
        Ok(person)
    }

    pub fn rename_person(&mut self, email: &str, name: &str) -> Result<Person> {
        Ok(self.directory.rename(email, name)?.clone())
    }

    pub fn person(&self, email: &str) -> Result<&Person> {
        self.directory.resolve(email)
    }

    // ── Booking ─────────────────────────────────────────────────────────────

    /// Book a meeting at `slot` for every listed participant, or for none.
    ///
    /// All identifiers are resolved before anything changes. If any participant
    /// is already booked at `slot` the result is [`BookingOutcome::Unavailable`]
    /// and no ledger or store is touched.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::InvalidInput`] if `participants` is empty, lists the
    ///   same identifier twice, or contains a malformed identifier.
    /// - [`SchedulerError::NotFound`] if an identifier is not registered.
    pub fn create_meeting<S: AsRef<str>>(
        &mut self,
        slot: TimeSlot,
        participants: &[S],
    ) -> Result<BookingOutcome> {
        if participants.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "a meeting needs at least one participant".to_string(),
            ));
        }
        let identifiers: Vec<String> = participants
            .iter()
            .map(|p| p.as_ref().to_string())
            .collect();
        for (i, id) in identifiers.iter().enumerate() {
            if identifiers[..i].contains(id) {
                return Err(SchedulerError::InvalidInput(format!(
                    "'{id}' is listed more than once"
                )));
            }
        }
        let people: Vec<Person> = self
            .directory
            .resolve_all(&identifiers)?
            .into_iter()
            .cloned()
            .collect();

        let busy = self.ledgers.busy_at(&identifiers, slot)?;
        if !busy.is_empty() {
            let event = SchedulerEvent::MeetingRejected {
                slot,
                busy: busy.clone(),
            };
            self.reporter.report(&event);
            return Ok(BookingOutcome::Unavailable { slot, busy });
        }

        let meeting = self.meetings.next_id();
        for id in &identifiers {
            self.ledgers.get_mut(id)?.book(id, slot, meeting)?;
        }
        let inserted = self.meetings.insert(slot, identifiers)?;
        debug_assert_eq!(inserted, meeting);

        self.reporter.report(&SchedulerEvent::MeetingCreated {
            meeting,
            slot,
            weekday: slot.weekday(),
            participants: people,
        });
        Ok(BookingOutcome::Booked { meeting })
    }

    /// [`create_meeting`](Self::create_meeting) with the slot given as `HH-dd-MM-yyyy`.
    pub fn create_meeting_at<S: AsRef<str>>(
        &mut self,
        slot: &str,
        participants: &[S],
    ) -> Result<BookingOutcome> {
        let slot = TimeSlot::parse(slot)?;
        self.create_meeting(slot, participants)
    }

    /// Add one more participant to an existing meeting.
    ///
    /// The person's ledger is booked at the meeting's slot first, so the meeting
    /// never lists someone whose ledger lacks the slot.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::NotFound`] for an unknown meeting or person.
    /// - [`SchedulerError::InvalidInput`] if the person already takes part.
    pub fn add_participant(&mut self, meeting: MeetingId, email: &str) -> Result<BookingOutcome> {
        let slot = self.meetings.get(meeting)?.slot();
        let person = self.directory.resolve(email)?.clone();
        if self.meetings.get(meeting)?.has_participant(email) {
            return Err(SchedulerError::InvalidInput(format!(
                "'{email}' already takes part in meeting {meeting}"
            )));
        }

        if !self.ledgers.get(email)?.is_free_at(slot) {
            let busy = vec![email.to_string()];
            self.reporter.report(&SchedulerEvent::MeetingRejected {
                slot,
                busy: busy.clone(),
            });
            return Ok(BookingOutcome::Unavailable { slot, busy });
        }

        self.ledgers.get_mut(email)?.book(email, slot, meeting)?;
        self.meetings.get_mut(meeting)?.push_participant(email);
        self.reporter.report(&SchedulerEvent::ParticipantAdded {
            meeting,
            slot,
            person,
        });
        Ok(BookingOutcome::Booked { meeting })
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn is_free_at(&self, email: &str, slot: TimeSlot) -> Result<bool> {
        self.directory.resolve(email)?;
        Ok(self.ledgers.get(email)?.is_free_at(slot))
    }

    pub fn meeting(&self, id: MeetingId) -> Result<&Meeting> {
        self.meetings.get(id)
    }

    /// Meetings for `email` whose slot is strictly after `as_of`, in the order
    /// they were booked.
    pub fn upcoming_meetings(&self, email: &str, as_of: NaiveDateTime) -> Result<Vec<&Meeting>> {
        self.directory.resolve(email)?;
        self.ledgers
            .get(email)?
            .bookings()
            .iter()
            .filter(|booking| booking.slot.is_after(as_of))
            .map(|booking| self.meetings.get(booking.meeting))
            .collect()
    }

    // ── Suggestions ─────────────────────────────────────────────────────────

    /// Read-only search behind [`suggest_slots`](Self::suggest_slots). Reports nothing.
    pub fn find_slots<S: AsRef<str>>(
        &self,
        participants: &[S],
        count: usize,
        preferences: &Preferences,
        as_of: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>> {
        if participants.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "at least one participant is required".to_string(),
            ));
        }
        suggest::check_request(count, preferences)?;
        self.directory.resolve_all(participants)?;
        let ledgers = self.ledgers.get_all(participants)?;
        suggest::suggest_slots(&ledgers, count, preferences, as_of, self.config.search)
    }

    /// Suggest the earliest `count` slots at which every participant is free,
    /// searching from the day after `as_of`.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::InvalidInput`] for no participants, `count == 0`, or
    ///   empty/out-of-range preferences (each with its own message).
    /// - [`SchedulerError::NotFound`] for an unregistered participant.
    /// - [`SchedulerError::NoSlotFound`] if the configured search limit runs out.
    pub fn suggest_slots<S: AsRef<str>>(
        &mut self,
        participants: &[S],
        count: usize,
        preferences: &Preferences,
        as_of: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>> {
        let slots = self.find_slots(participants, count, preferences, as_of)?;
        self.reporter.report(&SchedulerEvent::SlotsSuggested {
            participants: participants.iter().map(|p| p.as_ref().to_string()).collect(),
            preferences: preferences.clone(),
            slots: slots.clone(),
        });
        Ok(slots)
    }

    /// [`suggest_slots`](Self::suggest_slots) with the configured default preferences.
    pub fn suggest_slots_with_defaults<S: AsRef<str>>(
        &mut self,
        participants: &[S],
        count: usize,
        as_of: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>> {
        let preferences = self.config.preferences.clone();
        self.suggest_slots(participants, count, &preferences, as_of)
    }

    /// A single slot with the configured default preferences.
    pub fn suggest_slot<S: AsRef<str>>(
        &mut self,
        participants: &[S],
        as_of: NaiveDateTime,
    ) -> Result<Vec<TimeSlot>> {
        self.suggest_slots_with_defaults(participants, 1, as_of)
    }
}
