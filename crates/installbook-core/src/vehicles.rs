//! Vehicle cascade values.
//!
//! The vehicle endpoints answer with bare scalars (`"2023"`, `"Toyota"`) or
//! objects whose id field name varies by backend (`id`, `makeID`, `makeId`,
//! `make_id`). Both shapes are turned into a [`VehicleOption`] once, at the API
//! boundary, so the rest of the flow never inspects raw JSON again.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which level of the year → make → model → type cascade a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Year,
    Make,
    Model,
    Type,
}

impl VehicleKind {
    /// Object keys that may carry the identifier, in lookup order.
    #[must_use]
    pub fn id_keys(self) -> &'static [&'static str] {
        match self {
            VehicleKind::Year => &["id", "yearID", "yearId", "year_id"],
            VehicleKind::Make => &["id", "makeID", "makeId", "make_id"],
            VehicleKind::Model => &["id", "modelID", "modelId", "model_id"],
            VehicleKind::Type => &["id", "typeID", "typeId", "type_id"],
        }
    }

    /// Object keys that may carry the display label, in lookup order.
    #[must_use]
    pub fn label_keys(self) -> &'static [&'static str] {
        match self {
            VehicleKind::Year => &["year", "name", "label", "value"],
            VehicleKind::Make => &["make", "name", "label", "makeName", "make_name", "value"],
            VehicleKind::Model => &["model", "name", "label", "modelName", "model_name", "value"],
            VehicleKind::Type => &["type", "name", "label", "typeName", "type_name", "value"],
        }
    }
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleKind::Year => write!(f, "year"),
            VehicleKind::Make => write!(f, "make"),
            VehicleKind::Model => write!(f, "model"),
            VehicleKind::Type => write!(f, "type"),
        }
    }
}

/// One selectable entry in a vehicle dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleOption {
    /// Identifier to send to the next cascading query.
    pub id: String,
    /// Text shown to the shopper and written into the cart attributes.
    pub label: String,
}

impl VehicleOption {
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// A bare scalar value acts as both id and label.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: value.clone(),
            label: value,
        }
    }

    /// Builds an option from one raw API entry.
    ///
    /// Returns `None` for nulls, empty strings, and objects with neither an id
    /// nor a label field.
    #[must_use]
    pub fn from_value(kind: VehicleKind, value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let id = kind
                    .id_keys()
                    .iter()
                    .find_map(|key| map.get(*key).and_then(scalar_text));
                let label = kind
                    .label_keys()
                    .iter()
                    .find_map(|key| map.get(*key).and_then(scalar_text));
                match (id, label) {
                    (Some(id), Some(label)) => Some(Self { id, label }),
                    (Some(only), None) | (None, Some(only)) => Some(Self::scalar(only)),
                    (None, None) => None,
                }
            }
            other => scalar_text(other).map(Self::scalar),
        }
    }

    /// Case-insensitive match against either the label or the id.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        self.label.eq_ignore_ascii_case(text) || self.id == text
    }
}

/// The make the shopper picked, as handed over by the host.
///
/// Hosts either pass back an option they received from this crate or the
/// plain text of a dropdown/free-text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MakeSelection {
    Option(VehicleOption),
    Text(String),
}

impl MakeSelection {
    /// Interprets a raw selected value: objects carry their own id, scalars
    /// are kept as text to be resolved against the fetched makes.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => {
                VehicleOption::from_value(VehicleKind::Make, value).map(MakeSelection::Option)
            }
            other => scalar_text(other).map(MakeSelection::Text),
        }
    }

    /// Label to show and to store, regardless of how the make was selected.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            MakeSelection::Option(option) => &option.label,
            MakeSelection::Text(text) => text.trim(),
        }
    }
}

/// Resolves the make the shopper picked to a concrete option.
///
/// A selected option is kept as-is. Free text is looked up in the most
/// recently fetched makes list and resolves to that entry, id and catalog
/// label both; unmatched text becomes a scalar option of the text itself.
/// Empty selections resolve to `None`.
#[must_use]
pub fn resolve_make(
    selection: &MakeSelection,
    known_makes: &[VehicleOption],
) -> Option<VehicleOption> {
    match selection {
        MakeSelection::Option(option) => {
            let id = option.id.trim();
            (!id.is_empty()).then(|| VehicleOption::new(id, option.label.clone()))
        }
        MakeSelection::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            let resolved = known_makes
                .iter()
                .find(|make| make.matches(text))
                .cloned()
                .unwrap_or_else(|| VehicleOption::scalar(text));
            Some(resolved)
        }
    }
}

/// Resolves the identifier to send as `makeID` in the models lookup.
///
/// See [`resolve_make`].
#[must_use]
pub fn resolve_make_id(selection: &MakeSelection, known_makes: &[VehicleOption]) -> Option<String> {
    resolve_make(selection, known_makes).map(|make| make.id)
}

/// Vehicle chosen in the vehicle step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSelection {
    pub year: Option<VehicleOption>,
    pub make: Option<VehicleOption>,
    pub model: Option<VehicleOption>,
    pub vehicle_type: Option<VehicleOption>,
}

impl VehicleSelection {
    #[must_use]
    pub fn year_label(&self) -> &str {
        self.year.as_ref().map_or("", |o| o.label.as_str())
    }

    #[must_use]
    pub fn make_label(&self) -> &str {
        self.make.as_ref().map_or("", |o| o.label.as_str())
    }

    #[must_use]
    pub fn model_label(&self) -> &str {
        self.model.as_ref().map_or("", |o| o.label.as_str())
    }

    #[must_use]
    pub fn type_label(&self) -> &str {
        self.vehicle_type.as_ref().map_or("", |o| o.label.as_str())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
