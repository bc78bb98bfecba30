use chrono::NaiveDate;
use installbook_core::{Location, VehicleSelection};
use serde::Serialize;

use crate::schedule::TimeSlot;
use crate::step::Step;

/// Appointment chosen in the schedule step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    /// Whether the shopper waits on site during the installation.
    pub stay_with_vehicle: bool,
}

impl Default for Appointment {
    fn default() -> Self {
        Self {
            date: None,
            time: None,
            stay_with_vehicle: true,
        }
    }
}

impl Appointment {
    /// `YYYY-MM-DD`, or empty when no date is set.
    #[must_use]
    pub fn date_value(&self) -> String {
        self.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    }

    #[must_use]
    pub fn time_value(&self) -> &'static str {
        self.time.map_or("", TimeSlot::value)
    }
}

/// Everything collected during one booking session.
///
/// Owned by [`crate::BookingFlow`] and only changed through its step
/// operations. Resets to `FlowState::default()` on close and after a
/// successful submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowState {
    pub current_step: Step,
    pub zipcode: String,
    pub locations: Vec<Location>,
    pub selected_location: Option<Location>,
    pub member_id: Option<String>,
    pub vehicle: VehicleSelection,
    pub appointment: Appointment,
    pub include_installation: bool,
    /// Zipcode the cached `locations` were fetched for.
    #[serde(skip)]
    pub(crate) locations_zipcode: Option<String>,
}

impl FlowState {
    /// Cached locations for `zipcode`, if that is what was last looked up.
    pub(crate) fn cached_locations(&self, zipcode: &str) -> Option<&[Location]> {
        (self.locations_zipcode.as_deref() == Some(zipcode) && !self.locations.is_empty())
            .then_some(self.locations.as_slice())
    }
}
