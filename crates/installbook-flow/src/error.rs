use installbook_client::ClientError;
use installbook_core::VehicleKind;
use thiserror::Error;

use crate::step::Step;
use crate::submit::SubmissionError;

/// Step input rejected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("zipcode \"{0}\" is not exactly 5 digits")]
    InvalidZipcode(String),

    #[error("member id \"{0}\" is not one of the listed locations")]
    UnknownLocation(String),

    #[error("no installation date selected")]
    MissingDate,

    #[error("no time slot selected")]
    MissingTime,

    #[error("no vehicle {0} selected")]
    MissingVehicle(VehicleKind),

    #[error("no product id configured for checkout")]
    MissingProductId,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("no installers service zipcode {zipcode}")]
    NotServiceable { zipcode: String },

    #[error("expected input for the {expected} step, got {got}")]
    StepMismatch { expected: Step, got: Step },

    #[error("installer lookup failed: {0}")]
    LocationLookup(#[source] ClientError),

    #[error("vehicle {kind} lookup failed: {source}")]
    VehicleLookup {
        kind: VehicleKind,
        #[source]
        source: ClientError,
    },

    #[error("product lookup failed: {0}")]
    ProductFetch(#[source] ClientError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("adding product to cart failed: {0}")]
    CartAdd(#[source] ClientError),

    #[error("client setup failed: {0}")]
    Client(#[from] ClientError),
}

impl FlowError {
    /// Banner text shown to the shopper for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FlowError::Validation(ValidationError::InvalidZipcode(_)) => {
                "Please enter a valid 5-digit zipcode".to_string()
            }
            FlowError::Validation(ValidationError::UnknownLocation(_)) => {
                "Please select an installation location".to_string()
            }
            FlowError::Validation(ValidationError::MissingDate) => {
                "Please select an installation date".to_string()
            }
            FlowError::Validation(ValidationError::MissingTime) => {
                "Please select a time slot".to_string()
            }
            FlowError::Validation(ValidationError::MissingVehicle(kind)) => {
                format!("Please select a vehicle {kind}")
            }
            FlowError::NotServiceable { .. } => {
                "Sorry, installation service is not available in your area".to_string()
            }
            FlowError::LocationLookup(_) => {
                "Failed to check zipcode. Please try again.".to_string()
            }
            FlowError::VehicleLookup { kind, .. } => format!("Failed to load {kind}s"),
            FlowError::ProductFetch(_) | FlowError::Submission(_) => {
                "Failed to complete checkout. Please try again.".to_string()
            }
            FlowError::Validation(ValidationError::MissingProductId) | FlowError::CartAdd(_) => {
                "Failed to add product to cart. Please try again.".to_string()
            }
            FlowError::StepMismatch { .. } | FlowError::Client(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
