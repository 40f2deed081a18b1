//! Day-of-week and hour-of-day filters for slot suggestion.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::slot::TimeSlot;

/// Allowed days and hours for suggested slots.
///
/// Day order is irrelevant. Hour order matters in exactly one place: the first
/// hour picks the starting hour of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub days: Vec<Weekday>,
    pub hours: Vec<u32>,
}

impl Default for Preferences {
    /// Monday to Friday at 09:00, 10:00, 13:00 and 14:00.
    fn default() -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            hours: vec![9, 10, 13, 14],
        }
    }
}

impl Preferences {
    pub fn new(days: Vec<Weekday>, hours: Vec<u32>) -> Self {
        Self { days, hours }
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::InvalidInput`] if either filter is empty or an
    /// hour is outside 0-23. Each case has its own message.
    pub fn validate(&self) -> Result<()> {
        if self.days.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "preferred days must not be empty".to_string(),
            ));
        }
        if self.hours.is_empty() {
            return Err(SchedulerError::InvalidInput(
                "preferred hours must not be empty".to_string(),
            ));
        }
        if let Some(hour) = self.hours.iter().find(|h| **h > 23) {
            return Err(SchedulerError::InvalidInput(format!(
                "preferred hour {hour} is outside 0-23"
            )));
        }
        Ok(())
    }

    pub fn allows_day(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn allows_hour(&self, hour: u32) -> bool {
        self.hours.contains(&hour)
    }

    pub fn allows(&self, slot: TimeSlot) -> bool {
        self.allows_day(slot.weekday()) && self.allows_hour(slot.hour())
    }

    /// The hour a search starts from: the first one given, not the smallest.
    pub fn first_hour(&self) -> Option<u32> {
        self.hours.first().copied()
    }
}

/// Parse a comma-separated list of day names.
///
/// Accepts full and abbreviated names in any case, plus the shorthands
/// `weekdays`, `weekend` and `all`. Duplicates are dropped.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidInput`] for an unknown name or an empty list.
pub fn parse_days(list: &str) -> Result<Vec<Weekday>> {
    let mut days = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let expanded: &[Weekday] = match token.to_lowercase().as_str() {
            "weekdays" => &[
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            "weekend" => &[Weekday::Sat, Weekday::Sun],
            "all" => &[
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            name => match parse_weekday(name) {
                Some(day) => std::slice::from_ref(day),
                None => {
                    return Err(SchedulerError::InvalidInput(format!(
                        "unknown day '{token}'"
                    )))
                }
            },
        };
        for day in expanded {
            if !days.contains(day) {
                days.push(*day);
            }
        }
    }
    if days.is_empty() {
        return Err(SchedulerError::InvalidInput(
            "preferred days must not be empty".to_string(),
        ));
    }
    Ok(days)
}

/// Parse a comma-separated list of hours, keeping the given order.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidInput`] for a non-number, an hour above 23, or
/// an empty list.
pub fn parse_hours(list: &str) -> Result<Vec<u32>> {
    let mut hours = Vec::new();
    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let hour: u32 = token
            .parse()
            .map_err(|_| SchedulerError::InvalidInput(format!("'{token}' is not an hour")))?;
        if hour > 23 {
            return Err(SchedulerError::InvalidInput(format!(
                "preferred hour {hour} is outside 0-23"
            )));
        }
        if !hours.contains(&hour) {
            hours.push(hour);
        }
    }
    if hours.is_empty() {
        return Err(SchedulerError::InvalidInput(
            "preferred hours must not be empty".to_string(),
        ));
    }
    Ok(hours)
}

/// Parse a lowercase weekday name, full or abbreviated.
fn parse_weekday(s: &str) -> Option<&'static Weekday> {
    match s {
        "monday" | "mon" => Some(&Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(&Weekday::Tue),
        "wednesday" | "wed" => Some(&Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(&Weekday::Thu),
        "friday" | "fri" => Some(&Weekday::Fri),
        "saturday" | "sat" => Some(&Weekday::Sat),
        "sunday" | "sun" => Some(&Weekday::Sun),
        _ => None,
    }
}
