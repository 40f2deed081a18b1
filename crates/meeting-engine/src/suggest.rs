//! Forward search for slots at which a whole group is free.
//!
//! The search is deterministic: given the same ledgers, preferences and `as_of`
//! anchor it always returns the same slots in the same order. It never reads the
//! system clock.
//!
//! # Algorithm
//!
//! 1. Start one calendar day after `as_of`, at the *first* preferred hour.
//! 2. Move forward whole days until the candidate falls on a preferred day.
//! 3. Accept the candidate if every participant is free and it has not been
//!    accepted already.
//! 4. Otherwise move forward one hour at a time until the hour is preferred
//!    again (possibly rolling into the next day) and go back to step 2.
//!
//! Every examined candidate counts against a [`SearchLimit`], so infeasible
//! preferences end in [`SchedulerError::NoSlotFound`] instead of spinning forever.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Result, SchedulerError};
use crate::ledger::Ledger;
use crate::preferences::Preferences;
use crate::slot::TimeSlot;

/// Upper bound on the work one suggestion request may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimit {
    /// Candidates examined before giving up.
    pub max_candidates: usize,
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self {
            max_candidates: 10_000,
        }
    }
}

impl SearchLimit {
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(SchedulerError::InvalidInput(
                "search limit must allow at least one candidate".to_string(),
            ));
        }
        Ok(())
    }
}

/// Check the parts of a suggestion request that do not depend on who is asking.
///
/// # Errors
///
/// Returns [`SchedulerError::InvalidInput`] if `count` is zero or `preferences`
/// does not validate.
pub fn check_request(count: usize, preferences: &Preferences) -> Result<()> {
    if count < 1 {
        return Err(SchedulerError::InvalidInput(
            "count must be at least 1".to_string(),
        ));
    }
    preferences.validate()
}

/// The first slot a search anchored at `as_of` examines, before day alignment.
pub fn initial_candidate(as_of: NaiveDateTime, preferences: &Preferences) -> Result<TimeSlot> {
    let hour = preferences.first_hour().ok_or_else(|| {
        SchedulerError::InvalidInput("preferred hours must not be empty".to_string())
    })?;
    let next_day = TimeSlot::new(as_of).plus_days(1).ok_or_else(|| {
        SchedulerError::InvalidInput(format!("as_of {as_of} has no following day"))
    })?;
    next_day.with_hour(hour).ok_or_else(|| {
        SchedulerError::InvalidInput(format!("preferred hour {hour} is outside 0-23"))
    })
}

/// Find the earliest `count` slots at which every ledger is free.
///
/// Slots come back in the order they were found, which is chronological.
///
/// # Errors
///
/// - [`SchedulerError::InvalidInput`] if `ledgers` is empty, `count` is zero, the
///   preferences are empty or out of range, `limit` allows no candidates, or
///   `as_of` is the last representable day.
/// - [`SchedulerError::NoSlotFound`] if `limit` is exhausted first, or the search
///   runs off the end of the calendar.
pub fn suggest_slots(
    ledgers: &[&Ledger],
    count: usize,
    preferences: &Preferences,
    as_of: NaiveDateTime,
    limit: SearchLimit,
) -> Result<Vec<TimeSlot>> {
    if ledgers.is_empty() {
        return Err(SchedulerError::InvalidInput(
            "at least one participant is required".to_string(),
        ));
    }
    check_request(count, preferences)?;
    limit.validate()?;

    let mut candidate = initial_candidate(as_of, preferences)?;
    debug!(
        start = %candidate,
        weekday = ?candidate.weekday(),
        count,
        participants = ledgers.len(),
        "searching forward for free slots"
    );

    let mut found: Vec<TimeSlot> = Vec::with_capacity(count);
    let mut examined = 0usize;

    let exhausted = |found: &[TimeSlot], examined: usize| SchedulerError::NoSlotFound {
        requested: count,
        found: found.len(),
        examined,
    };

    while found.len() < count {
        candidate = match align_to_preferred_day(candidate, preferences) {
            Some(aligned) => aligned,
            None => {
                debug!(
                    examined,
                    found = found.len(),
                    "search reached the end of the calendar"
                );
                return Err(exhausted(&found, examined));
            }
        };

        if examined >= limit.max_candidates {
            debug!(examined, found = found.len(), "search limit reached");
            return Err(exhausted(&found, examined));
        }
        examined += 1;

        let all_free = ledgers.iter().all(|ledger| ledger.is_free_at(candidate));
        if all_free && !found.contains(&candidate) {
            found.push(candidate);
            debug!(
                slot = %candidate,
                weekday = ?candidate.weekday(),
                found = found.len(),
                count,
                "slot is free for all participants"
            );
        } else {
            trace!(slot = %candidate, "candidate rejected");
            candidate = match next_preferred_hour(candidate, preferences) {
                Some(next) => next,
                None => {
                    debug!(
                        examined,
                        found = found.len(),
                        "search reached the end of the calendar"
                    );
                    return Err(exhausted(&found, examined));
                }
            };
        }
    }

    Ok(found)
}

/// Advance whole days until the weekday is preferred. The hour is untouched.
/// `None` if the calendar ends first.
fn align_to_preferred_day(
    mut candidate: TimeSlot,
    preferences: &Preferences,
) -> Option<TimeSlot> {
    // Terminates within a week because the day set is non-empty.
    while !preferences.allows_day(candidate.weekday()) {
        candidate = candidate.plus_days(1)?;
    }
    Some(candidate)
}

/// Advance at least one hour, stopping at the next preferred hour.
/// `None` if the calendar ends first.
fn next_preferred_hour(
    mut candidate: TimeSlot,
    preferences: &Preferences,
) -> Option<TimeSlot> {
    // Terminates within a day because hours are non-empty and within 0-23.
    loop {
        candidate = candidate.plus_hours(1)?;
        if preferences.allows_hour(candidate.hour()) {
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meeting::MeetingId;
    use chrono::{NaiveDate, Weekday};

    fn slot(s: &str) -> TimeSlot {
        TimeSlot::parse(s).unwrap()
    }

    /// Wednesday 2024-02-21, 11:30.
    fn wednesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 21)
            .unwrap()
            .and_hms_opt(11, 30, 0)
            .unwrap()
    }

    fn ledger_with(slots: &[&str]) -> Ledger {
        let mut ledger = Ledger::default();
        for (i, s) in slots.iter().enumerate() {
            ledger.book("p@x.com", slot(s), MeetingId::new(i)).unwrap();
        }
        ledger
    }

    fn defaults(ledgers: &[&Ledger], count: usize) -> Result<Vec<TimeSlot>> {
        suggest_slots(
            ledgers,
            count,
            &Preferences::default(),
            wednesday(),
            SearchLimit::default(),
        )
    }

    #[test]
    fn test_wednesday_suggests_thursday_nine() {
        let a = Ledger::default();
        let b = Ledger::default();
        let slots = defaults(&[&a, &b], 1).unwrap();
        assert_eq!(slots, vec![slot("09-22-02-2024")]);
        assert_eq!(slots[0].weekday(), Weekday::Thu);
    }

    #[test]
    fn test_consecutive_preferred_hours() {
        let a = Ledger::default();
        let slots = defaults(&[&a], 5).unwrap();
        assert_eq!(
            slots,
            vec![
                slot("09-22-02-2024"),
                slot("10-22-02-2024"),
                slot("13-22-02-2024"),
                slot("14-22-02-2024"),
                slot("09-23-02-2024"),
            ]
        );
    }

    #[test]
    fn test_skips_weekend() {
        let a = Ledger::default();
        let slots = defaults(&[&a], 6).unwrap();
        // Four on Thursday, then Friday 09:00 and 10:00.
        assert_eq!(slots[5], slot("10-23-02-2024"));

        let friday = NaiveDate::from_ymd_opt(2024, 2, 23)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let slots = suggest_slots(
            &[&a],
            1,
            &Preferences::default(),
            friday,
            SearchLimit::default(),
        )
        .unwrap();
        assert_eq!(slots, vec![slot("09-26-02-2024")]);
        assert_eq!(slots[0].weekday(), Weekday::Mon);
    }

    #[test]
    fn test_any_busy_participant_blocks_slot() {
        let a = ledger_with(&["09-22-02-2024"]);
        let b = ledger_with(&["10-22-02-2024"]);
        let slots = defaults(&[&a, &b], 2).unwrap();
        assert_eq!(slots, vec![slot("13-22-02-2024"), slot("14-22-02-2024")]);
    }

    #[test]
    fn test_fully_booked_day_rolls_over() {
        let a = ledger_with(&[
            "09-22-02-2024",
            "10-22-02-2024",
            "13-22-02-2024",
            "14-22-02-2024",
            "09-23-02-2024",
        ]);
        let slots = defaults(&[&a], 1).unwrap();
        assert_eq!(slots, vec![slot("10-23-02-2024")]);
    }

    #[test]
    fn test_first_hour_as_given_not_smallest() {
        let a = Ledger::default();
        let prefs = Preferences::new(Preferences::default().days, vec![14, 9]);
        let slots =
            suggest_slots(&[&a], 3, &prefs, wednesday(), SearchLimit::default()).unwrap();
        // Thursday 09:00 is never examined: the search starts at 14:00.
        assert_eq!(
            slots,
            vec![
                slot("14-22-02-2024"),
                slot("09-23-02-2024"),
                slot("14-23-02-2024"),
            ]
        );
    }

    #[test]
    fn test_day_alignment_keeps_start_hour() {
        let a = Ledger::default();
        let prefs = Preferences::new(vec![Weekday::Mon], vec![13]);
        let slots =
            suggest_slots(&[&a], 2, &prefs, wednesday(), SearchLimit::default()).unwrap();
        assert_eq!(slots, vec![slot("13-26-02-2024"), slot("13-04-03-2024")]);
    }

    #[test]
    fn test_as_of_minutes_are_ignored() {
        let a = Ledger::default();
        let late = NaiveDate::from_ymd_opt(2024, 2, 21)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let slots =
            suggest_slots(&[&a], 1, &Preferences::default(), late, SearchLimit::default())
                .unwrap();
        assert_eq!(slots, vec![slot("09-22-02-2024")]);
    }

    #[test]
    fn test_limit_surfaces_no_slot_found() {
        let a = ledger_with(&["09-26-02-2024", "09-04-03-2024", "09-11-03-2024"]);
        let prefs = Preferences::new(vec![Weekday::Mon], vec![9]);
        let err = suggest_slots(
            &[&a],
            1,
            &prefs,
            wednesday(),
            SearchLimit { max_candidates: 3 },
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::NoSlotFound {
                requested: 1,
                found: 0,
                examined: 3,
            }
        );

        // One more candidate reaches the free Monday.
        let slots = suggest_slots(
            &[&a],
            1,
            &prefs,
            wednesday(),
            SearchLimit { max_candidates: 4 },
        )
        .unwrap();
        assert_eq!(slots, vec![slot("09-18-03-2024")]);
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let a = Ledger::default();
        let limit = SearchLimit::default();
        let prefs = Preferences::default();

        assert!(matches!(
            suggest_slots(&[], 1, &prefs, wednesday(), limit),
            Err(SchedulerError::InvalidInput(_))
        ));
        assert_eq!(
            suggest_slots(&[&a], 0, &prefs, wednesday(), limit).unwrap_err(),
            SchedulerError::InvalidInput("count must be at least 1".into())
        );
        let no_days = Preferences::new(vec![], vec![9]);
        assert!(suggest_slots(&[&a], 1, &no_days, wednesday(), limit).is_err());
        let no_hours = Preferences::new(vec![Weekday::Mon], vec![]);
        assert!(suggest_slots(&[&a], 1, &no_hours, wednesday(), limit).is_err());
    }

    #[test]
    fn test_initial_candidate_is_next_day_first_hour() {
        let prefs = Preferences::new(vec![Weekday::Sat], vec![13, 9]);
        let start = initial_candidate(wednesday(), &prefs).unwrap();
        // Day alignment has not happened yet.
        assert_eq!(start, slot("13-22-02-2024"));
    }

    #[test]
    fn test_zero_limit_is_invalid() {
        assert!(SearchLimit { max_candidates: 0 }.validate().is_err());
        assert!(SearchLimit::default().validate().is_ok());

        let a = Ledger::default();
        let err = suggest_slots(
            &[&a],
            1,
            &Preferences::default(),
            wednesday(),
            SearchLimit { max_candidates: 0 },
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::InvalidInput("search limit must allow at least one candidate".into())
        );
    }

    #[test]
    fn test_last_representable_day_is_invalid_anchor() {
        let a = Ledger::default();
        let err = suggest_slots(
            &[&a],
            1,
            &Preferences::default(),
            NaiveDateTime::MAX,
            SearchLimit::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidInput(_)));
    }

    #[test]
    fn test_search_ends_with_calendar() {
        let a = Ledger::default();
        let all_days = Preferences::new(
            vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            vec![9],
        );
        let day_before_last = NaiveDate::MAX
            .pred_opt()
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        // The last day's 09:00 is found; the next 09:00 does not exist.
        let err = suggest_slots(&[&a], 2, &all_days, day_before_last, SearchLimit::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::NoSlotFound {
                requested: 2,
                found: 1,
                ..
            }
        ));
    }
}
