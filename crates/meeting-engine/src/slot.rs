//! Whole-hour time slots.
//!
//! A [`TimeSlot`] is the atomic bookable unit: a local date and hour with minutes,
//! seconds and sub-second fields always zero. Two slots are equal iff their
//! truncated instants are equal, so any `NaiveDateTime` can be turned into a slot
//! without the caller having to clean it up first.
//!
//! # Text format
//!
//! Slots cross the boundary as `HH-dd-MM-yyyy` strings (24-hour hour, zero-padded
//! day and month, four-digit year):
//!
//! ```
//! use chrono::{Datelike, Timelike, Weekday};
//! use meeting_engine::slot::TimeSlot;
//!
//! let slot: TimeSlot = "09-21-02-2024".parse().unwrap();
//! assert_eq!(slot.datetime().year(), 2024);
//! assert_eq!(slot.datetime().hour(), 9);
//! assert_eq!(slot.weekday(), Weekday::Wed);
//! assert_eq!(slot.to_string(), "09-21-02-2024");
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// The `chrono` format string equivalent of `HH-dd-MM-yyyy`, used for display.
const DISPLAY_FORMAT: &str = "%H-%d-%m-%Y";

/// A point in time truncated to whole-hour granularity.
///
/// Serialized as an ISO datetime. Deserializing goes through [`TimeSlot::new`], so
/// stray minutes in the input are truncated like anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "NaiveDateTime", into = "NaiveDateTime")]
pub struct TimeSlot(NaiveDateTime);

impl TimeSlot {
    /// Truncate `datetime` to the start of its hour.
    pub fn new(datetime: NaiveDateTime) -> Self {
        let time = NaiveTime::MIN + chrono::Duration::hours(i64::from(datetime.hour()));
        Self(datetime.date().and_time(time))
    }

    /// Build a slot from calendar components.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInput`] if the date does not exist or the
    /// hour is outside 0-23.
    pub fn from_ymd_h(year: i32, month: u32, day: u32, hour: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            SchedulerError::InvalidInput(format!(
                "{year:04}-{month:02}-{day:02} is not a calendar date"
            ))
        })?;
        let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(|| {
            SchedulerError::InvalidInput(format!("hour {hour} is outside 0-23"))
        })?;
        Ok(Self(date.and_time(time)))
    }

    /// Parse an `HH-dd-MM-yyyy` string.
    ///
    /// Every field must be zero-padded to its full width; `"9-21-02-2024"` is
    /// rejected, as is anything with trailing text.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInput`] if the string is malformed or names
    /// a date or hour that does not exist.
    pub fn parse(input: &str) -> Result<Self> {
        let malformed = || {
            SchedulerError::InvalidInput(format!(
                "time slot '{input}' does not match HH-dd-MM-yyyy"
            ))
        };

        let fields: Vec<&str> = input.split('-').collect();
        let [hour, day, month, year] = fields.as_slice() else {
            return Err(malformed());
        };

        let hour = fixed_width_number(hour, 2).ok_or_else(malformed)?;
        let day = fixed_width_number(day, 2).ok_or_else(malformed)?;
        let month = fixed_width_number(month, 2).ok_or_else(malformed)?;
        let year = fixed_width_number(year, 4).ok_or_else(malformed)?;

        // Four ASCII digits always fit in an i32.
        Self::from_ymd_h(year as i32, month, day, hour)
            .map_err(|_| {
                SchedulerError::InvalidInput(format!(
                    "time slot '{input}' names a date or hour that does not exist"
                ))
            })
    }

    /// The underlying (already truncated) datetime.
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Hour of day, 0-23.
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// The same hour `days` calendar days later (earlier if negative), or `None`
    /// past the end of the representable calendar.
    pub fn plus_days(&self, days: i64) -> Option<Self> {
        self.0
            .checked_add_signed(chrono::Duration::try_days(days)?)
            .map(Self)
    }

    /// The slot `hours` hours later (earlier if negative). Crosses midnight freely.
    /// `None` past the end of the representable calendar.
    pub fn plus_hours(&self, hours: i64) -> Option<Self> {
        self.0
            .checked_add_signed(chrono::Duration::try_hours(hours)?)
            .map(Self)
    }

    /// The same day at `hour`, or `None` if `hour` is outside 0-23.
    pub fn with_hour(&self, hour: u32) -> Option<Self> {
        self.0.with_hour(hour).map(Self)
    }

    /// Whether this slot lies strictly after `instant`.
    pub fn is_after(&self, instant: NaiveDateTime) -> bool {
        self.0 > instant
    }
}

impl From<NaiveDateTime> for TimeSlot {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::new(datetime)
    }
}

impl From<TimeSlot> for NaiveDateTime {
    fn from(slot: TimeSlot) -> Self {
        slot.0
    }
}

impl FromStr for TimeSlot {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

/// Parse a field of exactly `width` ASCII digits.
fn fixed_width_number(field: &str, width: usize) -> Option<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
