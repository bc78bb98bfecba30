//! Appointment availability: bookable dates and fixed time slots.

use chrono::{Days, NaiveDate};
use serde::{Serialize, Serializer};

/// A bookable installation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    Morning,
    Afternoon,
    LateAfternoon,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 3] = [
        TimeSlot::Morning,
        TimeSlot::Afternoon,
        TimeSlot::LateAfternoon,
    ];

    /// Value written into the cart's time attribute.
    #[must_use]
    pub fn value(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
            TimeSlot::LateAfternoon => "Late Afternoon",
        }
    }

    /// Label shown to the shopper.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning (9 AM - 12 PM)",
            TimeSlot::Afternoon => "Afternoon (12 PM - 3 PM)",
            TimeSlot::LateAfternoon => "Late Afternoon (3 PM - 6 PM)",
        }
    }

    /// Parses either the value or the label, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|slot| {
            slot.value().eq_ignore_ascii_case(raw) || slot.label().eq_ignore_ascii_case(raw)
        })
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.value())
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

/// Earliest date an appointment can be booked on.
#[must_use]
pub fn first_bookable_date(today: NaiveDate, lead_days: u32) -> NaiveDate {
    today
        .checked_add_days(Days::new(u64::from(lead_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// `count` consecutive bookable dates starting at [`first_bookable_date`].
#[must_use]
pub fn available_dates(today: NaiveDate, lead_days: u32, count: usize) -> Vec<NaiveDate> {
    first_bookable_date(today, lead_days)
        .iter_days()
        .take(count)
        .collect()
}

#[must_use]
pub fn is_bookable(date: NaiveDate, today: NaiveDate, lead_days: u32) -> bool {
    date >= first_bookable_date(today, lead_days)
}
