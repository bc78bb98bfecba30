//! Booking wizard for the installation widget: step sequencing, answer
//! validation, the vehicle cascade, and cart submission.

pub mod controller;
pub mod error;
pub mod mapping;
pub mod schedule;
pub mod state;
pub mod step;
pub mod submit;
pub mod vehicle;

pub use controller::{Advance, BookingFlow, BookingReceipt, HostSignal, StepPayload};
pub use error::{FlowError, ValidationError};
pub use mapping::{map_details_to_options, match_field, BookingDetails, BookingField};
pub use schedule::{available_dates, first_bookable_date, is_bookable, TimeSlot};
pub use state::{Appointment, FlowState};
pub use step::Step;
pub use submit::{submit_sequentially, SubmissionError};
pub use vehicle::VehiclePicker;
