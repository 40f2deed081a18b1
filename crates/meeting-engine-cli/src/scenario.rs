//! Scripted sessions: a TOML list of steps replayed against one scheduler.
//!
//! ```toml
//! now = "08-13-02-2024"
//!
//! [[steps]]
//! action = "register"
//! name = "Ada"
//! email = "ada@example.com"
//!
//! [[steps]]
//! action = "suggest"
//! participants = ["ada@example.com"]
//! count = 3
//! ```

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Weekday};
use meeting_engine::{
    MeetingId, Person, Preferences, Reporter, Scheduler, SchedulerConfig, SchedulerEvent,
    TimeSlot, TracingReporter,
};
use serde::{Deserialize, Serialize};

/// The built-in demo session.
pub const DEMO: &str = include_str!("../scenarios/demo.toml");

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Anchor time as `HH-dd-MM-yyyy`.
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default)]
    pub config: Option<SchedulerConfig>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    Register {
        name: String,
        email: String,
    },
    Rename {
        email: String,
        name: String,
    },
    Book {
        slot: String,
        participants: Vec<String>,
    },
    AddParticipant {
        meeting: usize,
        email: String,
    },
    /// Show a person's meetings after the anchor time.
    Schedule {
        email: String,
    },
    /// Without `days` or `hours` the configured defaults apply. A missing
    /// filter falls back to its default when the other one is given.
    Suggest {
        participants: Vec<String>,
        count: Option<usize>,
        days: Option<Vec<Weekday>>,
        hours: Option<Vec<u32>>,
    },
}

impl Step {
    fn action(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Rename { .. } => "rename",
            Self::Book { .. } => "book",
            Self::AddParticipant { .. } => "add_participant",
            Self::Schedule { .. } => "schedule",
            Self::Suggest { .. } => "suggest",
        }
    }
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse scenario")
    }

    /// Read a scenario from `path`, or from stdin when `path` is `-`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read scenario from stdin")?;
            buf
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario {}", path.display()))?
        };
        Self::from_toml_str(&text)
    }

    /// The scenario's own anchor time, if it names one.
    pub fn anchor(&self) -> Result<Option<TimeSlot>> {
        self.now
            .as_deref()
            .map(TimeSlot::parse)
            .transpose()
            .context("scenario `now` is not a valid slot")
    }
}

/// One line of output from a run.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Event(SchedulerEvent),
    Schedule(ScheduleView),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event(event) => fmt::Display::fmt(event, f),
            Self::Schedule(view) => fmt::Display::fmt(view, f),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename = "schedule")]
pub struct ScheduleView {
    pub person: Person,
    pub as_of: NaiveDateTime,
    pub meetings: Vec<MeetingView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingView {
    pub meeting: MeetingId,
    pub slot: TimeSlot,
    pub weekday: Weekday,
    pub participants: Vec<Person>,
}

impl fmt::Display for ScheduleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "## Upcoming meetings for {} ##", self.person)?;
        for meeting in &self.meetings {
            write!(
                f,
                "\nDisplaying Meeting at: {} - {}\n    Participants:",
                meeting.slot, meeting.weekday
            )?;
            for person in &meeting.participants {
                write!(f, "\n    {person}")?;
            }
        }
        Ok(())
    }
}

/// Collects scheduler events in order and forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<Entry>,
    tracing: TracingReporter,
}

impl Transcript {
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }
}

impl Reporter for Transcript {
    fn report(&mut self, event: &SchedulerEvent) {
        self.tracing.report(event);
        self.entries.push(Entry::Event(event.clone()));
    }
}

/// Replay `steps` against a fresh scheduler. The first hard error aborts the run.
pub fn run(steps: &[Step], config: SchedulerConfig, now: NaiveDateTime) -> Result<Vec<Entry>> {
    let mut scheduler = Scheduler::with_reporter(config, Transcript::default());
    for (i, step) in steps.iter().enumerate() {
        apply(&mut scheduler, step, now)
            .with_context(|| format!("step {} ({}) failed", i + 1, step.action()))?;
    }
    Ok(scheduler.into_reporter().into_entries())
}

fn apply(scheduler: &mut Scheduler<Transcript>, step: &Step, now: NaiveDateTime) -> Result<()> {
    match step {
        Step::Register { name, email } => {
            scheduler.register_person(name, email)?;
        }
        Step::Rename { email, name } => {
            scheduler.rename_person(email, name)?;
        }
        Step::Book { slot, participants } => {
            scheduler.create_meeting_at(slot, participants)?;
        }
        Step::AddParticipant { meeting, email } => {
            scheduler.add_participant(MeetingId::new(*meeting), email)?;
        }
        Step::Schedule { email } => {
            let view = schedule_view(scheduler, email, now)?;
            scheduler.reporter_mut().push(Entry::Schedule(view));
        }
        Step::Suggest {
            participants,
            count,
            days,
            hours,
        } => {
            match (count, days, hours) {
                (None, None, None) => {
                    scheduler.suggest_slot(participants, now)?;
                }
                (Some(count), None, None) => {
                    scheduler.suggest_slots_with_defaults(participants, *count, now)?;
                }
                (count, days, hours) => {
                    let defaults = scheduler.default_preferences();
                    let preferences = Preferences::new(
                        days.clone().unwrap_or_else(|| defaults.days.clone()),
                        hours.clone().unwrap_or_else(|| defaults.hours.clone()),
                    );
                    scheduler.suggest_slots(
                        participants,
                        count.unwrap_or(1),
                        &preferences,
                        now,
                    )?;
                }
            }
        }
    }
    Ok(())
}

fn schedule_view<R: Reporter>(
    scheduler: &Scheduler<R>,
    email: &str,
    now: NaiveDateTime,
) -> Result<ScheduleView> {
    let person = scheduler.person(email)?.clone();
    let mut meetings = Vec::new();
    for meeting in scheduler.upcoming_meetings(email, now)? {
        let participants = meeting
            .participants()
            .iter()
            .map(|id| scheduler.person(id).cloned())
            .collect::<Result<Vec<_>, _>>()?;
        meetings.push(MeetingView {
            meeting: meeting.id(),
            slot: meeting.slot(),
            weekday: meeting.slot().weekday(),
            participants,
        });
    }
    Ok(ScheduleView {
        person,
        as_of: now,
        meetings,
    })
}
