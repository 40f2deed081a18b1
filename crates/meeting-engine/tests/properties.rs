//! Property tests for booking and suggestion invariants.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use meeting_engine::{BookingOutcome, Preferences, Scheduler, SchedulerConfig, TimeSlot};
use proptest::prelude::*;

const PEOPLE: [&str; 4] = ["a@x.com", "b@x.com", "c@x.com", "d@x.com"];

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn scheduler() -> Scheduler<()> {
    let mut scheduler = Scheduler::with_reporter(SchedulerConfig::default(), ());
    for (i, email) in PEOPLE.iter().enumerate() {
        scheduler.register_person(&format!("P{i}"), email).unwrap();
    }
    scheduler
}

/// A slot somewhere in March 2024.
fn slot_strategy() -> impl Strategy<Value = TimeSlot> {
    (1u32..=31, 0u32..24).prop_map(|(day, hour)| TimeSlot::from_ymd_h(2024, 3, day, hour).unwrap())
}

/// A non-empty subset of `PEOPLE`, in index order.
fn group_strategy() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(PEOPLE.to_vec(), 1..=PEOPLE.len())
}

fn preferences_strategy() -> impl Strategy<Value = Preferences> {
    (
        proptest::sample::subsequence(ALL_DAYS.to_vec(), 1..=7),
        proptest::collection::vec(0u32..24, 1..6),
    )
        .prop_map(|(days, hours)| Preferences::new(days, hours))
}

fn as_of_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (1u32..=28, 0u32..24, 0u32..60).prop_map(|(day, hour, minute)| {
        NaiveDate::from_ymd_opt(2024, 2, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    })
}

proptest! {
    #[test]
    fn registered_identifiers_round_trip(n in 1usize..20) {
        let mut scheduler = Scheduler::with_reporter(SchedulerConfig::default(), ());
        let emails: Vec<String> = (0..n).map(|i| format!("user{i}@example.org")).collect();
        for email in &emails {
            scheduler.register_person("User", email).unwrap();
        }
        for email in &emails {
            prop_assert_eq!(scheduler.person(email).unwrap().email(), email.as_str());
        }
        prop_assert_eq!(scheduler.directory().len(), n);
    }

    #[test]
    fn bookings_are_all_or_nothing(
        bookings in proptest::collection::vec((slot_strategy(), group_strategy()), 1..30)
    ) {
        let mut scheduler = scheduler();
        for (slot, group) in bookings {
            let before: Vec<usize> = PEOPLE
                .iter()
                .map(|p| scheduler.ledgers().get(p).unwrap().len())
                .collect();
            let meetings_before = scheduler.meetings().len();
            let any_busy = group.iter().any(|p| !scheduler.is_free_at(p, slot).unwrap());

            let outcome = scheduler.create_meeting(slot, &group).unwrap();
            let after: Vec<usize> = PEOPLE
                .iter()
                .map(|p| scheduler.ledgers().get(p).unwrap().len())
                .collect();

            match outcome {
                BookingOutcome::Booked { .. } => {
                    prop_assert!(!any_busy);
                    prop_assert_eq!(scheduler.meetings().len(), meetings_before + 1);
                    for (i, p) in PEOPLE.iter().enumerate() {
                        let expected = before[i] + usize::from(group.contains(p));
                        prop_assert_eq!(after[i], expected);
                    }
                    for p in &group {
                        let hits = scheduler
                            .ledgers()
                            .get(p)
                            .unwrap()
                            .bookings()
                            .iter()
                            .filter(|b| b.slot == slot)
                            .count();
                        prop_assert_eq!(hits, 1);
                    }
                }
                BookingOutcome::Unavailable { busy, .. } => {
                    prop_assert!(any_busy);
                    prop_assert!(!busy.is_empty());
                    prop_assert_eq!(scheduler.meetings().len(), meetings_before);
                    prop_assert_eq!(after, before);
                }
            }
        }
    }

    #[test]
    fn suggestions_respect_filters_and_bookings(
        booked in proptest::collection::vec((slot_strategy(), group_strategy()), 0..40),
        group in group_strategy(),
        preferences in preferences_strategy(),
        count in 1usize..8,
        as_of in as_of_strategy(),
    ) {
        let mut scheduler = scheduler();
        for (slot, members) in booked {
            scheduler.create_meeting(slot, &members).unwrap();
        }

        let slots = scheduler.find_slots(&group, count, &preferences, as_of).unwrap();

        prop_assert_eq!(slots.len(), count);
        let distinct: HashSet<TimeSlot> = slots.iter().copied().collect();
        prop_assert_eq!(distinct.len(), slots.len());
        for slot in &slots {
            prop_assert!(preferences.allows(*slot));
            prop_assert!(slot.is_after(as_of));
            for person in &group {
                prop_assert!(scheduler.is_free_at(person, *slot).unwrap());
            }
        }
        let mut sorted = slots.clone();
        sorted.sort();
        prop_assert_eq!(sorted, slots);
    }

    #[test]
    fn parsed_slots_have_zero_minutes(day in 1u32..=28, month in 1u32..=12, hour in 0u32..24) {
        let text = format!("{hour:02}-{day:02}-{month:02}-2025");
        let slot = TimeSlot::parse(&text).unwrap();
        prop_assert_eq!(slot.hour(), hour);
        prop_assert_eq!(slot.to_string(), text);
    }
}
