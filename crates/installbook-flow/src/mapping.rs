//! Translating booking answers into product option attributes.
//!
//! Storefront products declare options such as "Vehicle Year" or "Zip Code",
//! each with a numeric entity id. An option is matched to a booking field when
//! a keyword appears, case-insensitively, anywhere in its display name. The
//! merchant's `phf_mapping` keywords are tried first, then the built-in ones.

use installbook_core::{AttributeMapping, PhfMapping, Product};

use crate::state::FlowState;

/// A booking answer that can be written into a product option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingField {
    Year,
    Make,
    Model,
    Date,
    Time,
    MemberId,
    Zipcode,
}

impl BookingField {
    /// Matching priority when several keywords hit the same display name.
    pub const ALL: [BookingField; 7] = [
        BookingField::Year,
        BookingField::Make,
        BookingField::Model,
        BookingField::Date,
        BookingField::Time,
        BookingField::MemberId,
        BookingField::Zipcode,
    ];

    /// Built-in display-name keywords, lowercase.
    ///
    /// The storefront schema spells the model option "Vehicle Modal", so both
    /// spellings are accepted.
    #[must_use]
    pub fn builtin_keywords(self) -> &'static [&'static str] {
        match self {
            BookingField::Year => &["year"],
            BookingField::Make => &["make"],
            BookingField::Model => &["modal", "model"],
            BookingField::Date => &["date"],
            BookingField::Time => &["time"],
            BookingField::MemberId => &["member"],
            BookingField::Zipcode => &["zip", "postcode", "postal"],
        }
    }

    fn configured_keyword(self, phf: &PhfMapping) -> Option<&str> {
        let keyword = match self {
            BookingField::Year => phf.year.as_deref(),
            BookingField::Make => phf.make.as_deref(),
            BookingField::Model => phf.model.as_deref(),
            BookingField::Date => phf.date.as_deref(),
            BookingField::Time => phf.time.as_deref(),
            BookingField::MemberId => phf.member_id.as_deref(),
            BookingField::Zipcode => phf.zipcode.as_deref(),
        };
        keyword.map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Flattened booking answers, each already rendered as the cart value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDetails {
    pub year: String,
    pub make: String,
    pub model: String,
    pub date: String,
    pub time: String,
    pub member_id: String,
    pub zipcode: String,
}

impl BookingDetails {
    #[must_use]
    pub fn from_state(state: &FlowState) -> Self {
        Self {
            year: state.vehicle.year_label().to_string(),
            make: state.vehicle.make_label().to_string(),
            model: state.vehicle.model_label().to_string(),
            date: state.appointment.date_value(),
            time: state.appointment.time_value().to_string(),
            member_id: state.member_id.clone().unwrap_or_default(),
            zipcode: state.zipcode.clone(),
        }
    }

    #[must_use]
    pub fn value(&self, field: BookingField) -> &str {
        match field {
            BookingField::Year => &self.year,
            BookingField::Make => &self.make,
            BookingField::Model => &self.model,
            BookingField::Date => &self.date,
            BookingField::Time => &self.time,
            BookingField::MemberId => &self.member_id,
            BookingField::Zipcode => &self.zipcode,
        }
    }
}

/// Finds the booking field an option display name refers to.
#[must_use]
pub fn match_field(display_name: &str, phf: &PhfMapping) -> Option<BookingField> {
    let name = display_name.to_lowercase();
    let contains = |keyword: &str| name.contains(&keyword.to_lowercase());

    BookingField::ALL
        .into_iter()
        .find(|field| field.configured_keyword(phf).is_some_and(contains))
        .or_else(|| {
            BookingField::ALL
                .into_iter()
                .find(|field| field.builtin_keywords().iter().any(|k| contains(k)))
        })
}

/// Maps every option declared on `product` to a value from `details`.
///
/// Each declared option gets an entry; options that match no field, or whose
/// field has no answer, map to the empty string.
#[must_use]
pub fn map_details_to_options(
    product: &Product,
    details: &BookingDetails,
    phf: &PhfMapping,
) -> AttributeMapping {
    product
        .options
        .iter()
        .map(|option| {
            let value = match match_field(&option.display_name, phf) {
                Some(field) => details.value(field).to_string(),
                None => {
                    tracing::debug!(
                        option = %option.display_name,
                        entity_id = %option.entity_id,
                        "product option matches no booking field"
                    );
                    String::new()
                }
            };
            (option.entity_id.clone(), value)
        })
        .collect()
}

#[cfg(test)]
#[path = "mapping_test.rs"]
mod tests;
