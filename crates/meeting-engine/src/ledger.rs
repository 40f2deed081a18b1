//! Per-person availability ledgers.
//!
//! Each registered person has exactly one [`Ledger`] holding the slots they are
//! booked for. Ledgers live in a [`Ledgers`] arena keyed by identifier rather than
//! inside the person record, so booking code can borrow several of them without
//! touching the directory.

use std::collections::BTreeMap;

use crate::error::{Result, SchedulerError};
use crate::meeting::MeetingId;
use crate::slot::TimeSlot;

/// One booked slot and the meeting that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Booking {
    pub slot: TimeSlot,
    pub meeting: MeetingId,
}

/// The slots one person is booked for, in booking order.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    bookings: Vec<Booking>,
}

impl Ledger {
    /// True iff nothing is booked at `slot`.
    pub fn is_free_at(&self, slot: TimeSlot) -> bool {
        !self.bookings.iter().any(|b| b.slot == slot)
    }

    /// Book `slot` for `meeting`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Conflict`] if `slot` is already booked. `owner` is
    /// only used in the error.
    pub fn book(&mut self, owner: &str, slot: TimeSlot, meeting: MeetingId) -> Result<()> {
        if !self.is_free_at(slot) {
            return Err(SchedulerError::Conflict {
                identifier: owner.to_string(),
                slot,
            });
        }
        self.bookings.push(Booking { slot, meeting });
        Ok(())
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

/// Arena of ledgers indexed by person identifier.
#[derive(Debug, Clone, Default)]
pub struct Ledgers {
    by_identifier: BTreeMap<String, Ledger>,
}

impl Ledgers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger for `identifier`. Opening an existing ledger is a no-op.
    pub fn open(&mut self, identifier: &str) {
        self.by_identifier
            .entry(identifier.to_string())
            .or_default();
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::NotFound`] if no ledger was opened for `identifier`.
    pub fn get(&self, identifier: &str) -> Result<&Ledger> {
        self.by_identifier
            .get(identifier)
            .ok_or_else(|| SchedulerError::NotFound(format!("ledger for '{identifier}'")))
    }

    /// # Errors
    ///
    /// Returns [`SchedulerError::NotFound`] if no ledger was opened for `identifier`.
    pub fn get_mut(&mut self, identifier: &str) -> Result<&mut Ledger> {
        self.by_identifier
            .get_mut(identifier)
            .ok_or_else(|| SchedulerError::NotFound(format!("ledger for '{identifier}'")))
    }

    /// Fetch the ledgers for several identifiers at once, in the order given.
    pub fn get_all<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<Vec<&Ledger>> {
        identifiers.iter().map(|id| self.get(id.as_ref())).collect()
    }

    /// Identifiers among `identifiers` whose ledger already holds `slot`.
    pub fn busy_at<S: AsRef<str>>(&self, identifiers: &[S], slot: TimeSlot) -> Result<Vec<String>> {
        let mut busy = Vec::new();
        for id in identifiers {
            let id = id.as_ref();
            if !self.get(id)?.is_free_at(slot) {
                busy.push(id.to_string());
            }
        }
        Ok(busy)
    }

    pub fn len(&self) -> usize {
        self.by_identifier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_identifier.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> TimeSlot {
        TimeSlot::parse(s).unwrap()
    }

    #[test]
    fn test_empty_ledger_is_free() {
        let ledger = Ledger::default();
        assert!(ledger.is_free_at(slot("09-21-02-2024")));
    }

    #[test]
    fn test_book_marks_slot_busy() {
        let mut ledger = Ledger::default();
        ledger
            .book("a@x.com", slot("09-21-02-2024"), MeetingId::new(0))
            .unwrap();
        assert!(!ledger.is_free_at(slot("09-21-02-2024")));
        assert!(ledger.is_free_at(slot("10-21-02-2024")));
        assert!(ledger.is_free_at(slot("09-22-02-2024")));
    }

    #[test]
    fn test_double_booking_is_conflict() {
        let mut ledger = Ledger::default();
        ledger
            .book("a@x.com", slot("09-21-02-2024"), MeetingId::new(0))
            .unwrap();
        let err = ledger
            .book("a@x.com", slot("09-21-02-2024"), MeetingId::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            SchedulerError::Conflict {
                identifier: "a@x.com".into(),
                slot: slot("09-21-02-2024"),
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_bookings_keep_insertion_order() {
        let mut ledger = Ledger::default();
        ledger
            .book("a@x.com", slot("14-21-02-2024"), MeetingId::new(0))
            .unwrap();
        ledger
            .book("a@x.com", slot("09-21-02-2024"), MeetingId::new(1))
            .unwrap();
        let slots: Vec<TimeSlot> = ledger.bookings().iter().map(|b| b.slot).collect();
        assert_eq!(slots, vec![slot("14-21-02-2024"), slot("09-21-02-2024")]);
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut ledgers = Ledgers::new();
        ledgers.open("a@x.com");
        ledgers
            .get_mut("a@x.com")
            .unwrap()
            .book("a@x.com", slot("09-21-02-2024"), MeetingId::new(0))
            .unwrap();
        ledgers.open("a@x.com");
        assert_eq!(ledgers.len(), 1);
        assert_eq!(ledgers.get("a@x.com").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_ledger_is_not_found() {
        let ledgers = Ledgers::new();
        assert!(matches!(
            ledgers.get("a@x.com").unwrap_err(),
            SchedulerError::NotFound(_)
        ));
    }

    #[test]
    fn test_busy_at_lists_only_busy_people() {
        let mut ledgers = Ledgers::new();
        ledgers.open("a@x.com");
        ledgers.open("b@x.com");
        ledgers
            .get_mut("b@x.com")
            .unwrap()
            .book("b@x.com", slot("09-21-02-2024"), MeetingId::new(0))
            .unwrap();
        let busy = ledgers
            .busy_at(&["a@x.com", "b@x.com"], slot("09-21-02-2024"))
            .unwrap();
        assert_eq!(busy, vec!["b@x.com".to_string()]);
    }
}
