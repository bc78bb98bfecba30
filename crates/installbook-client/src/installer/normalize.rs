//! Normalization from raw installer/vehicle payloads to core types.
//!
//! Installer backends disagree on field names (`lat` vs `latitude`,
//! `member_id` vs `memberId`) and send coordinates as strings or numbers.
//! Records that cannot be placed on a map or selected (no member id or no
//! coordinates) are dropped with a debug log rather than failing the whole
//! lookup. Unnamed records are labelled with their member id.

use std::collections::HashSet;

use installbook_core::{Location, VehicleKind, VehicleOption};
use serde_json::Value;

use super::response::RawListResponse;

const LOCATION_LIST_KEYS: &[&str] = &["locations", "installers"];
const MEMBER_ID_KEYS: &[&str] = &["member_id", "memberId", "memberID", "id"];
const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "longitude", "lon", "long"];
const NAME_KEYS: &[&str] = &["name", "installer_name", "business_name", "company"];
const DISTANCE_KEYS: &[&str] = &["distance", "distance_miles", "dist"];
const CITY_KEYS: &[&str] = &["city", "town"];
const ADDRESS_KEYS: &[&str] = &["address", "address1", "address_line1", "street"];

/// Unit appended to bare numeric distances.
const DISTANCE_UNIT: &str = "mi";

/// Normalizes an installer lookup payload into locations, dropping duplicates
/// by member id (first occurrence wins).
#[must_use]
pub fn normalize_locations(payload: Value) -> Vec<Location> {
    let raw = RawListResponse::classify(payload, LOCATION_LIST_KEYS);
    if let RawListResponse::Unrecognized(other) = &raw {
        tracing::warn!(
            payload = %other,
            "unrecognized installer response shape; treating as empty"
        );
    }

    let mut seen = HashSet::new();
    raw.into_items()
        .iter()
        .filter_map(map_location)
        .filter(|location| seen.insert(location.member_id.clone()))
        .collect()
}

/// Normalizes a vehicle list payload into options, dropping duplicate ids.
#[must_use]
pub fn normalize_vehicle_options(kind: VehicleKind, payload: Value) -> Vec<VehicleOption> {
    let raw = RawListResponse::classify(payload, &[list_key(kind)]);
    if let RawListResponse::Unrecognized(other) = &raw {
        tracing::warn!(
            %kind,
            payload = %other,
            "unrecognized vehicle response shape; treating as empty"
        );
    }

    let mut seen = HashSet::new();
    raw.into_items()
        .iter()
        .filter_map(|item| VehicleOption::from_value(kind, item))
        .filter(|option| seen.insert(option.id.clone()))
        .collect()
}

fn list_key(kind: VehicleKind) -> &'static str {
    match kind {
        VehicleKind::Year => "years",
        VehicleKind::Make => "makes",
        VehicleKind::Model => "models",
        VehicleKind::Type => "types",
    }
}

fn map_location(record: &Value) -> Option<Location> {
    let Some(member_id) = first_text(record, MEMBER_ID_KEYS) else {
        tracing::debug!(%record, "dropping installer record without member id");
        return None;
    };

    let (Some(lat), Some(lng)) = (first_f64(record, LAT_KEYS), first_f64(record, LNG_KEYS)) else {
        tracing::debug!(%member_id, "dropping installer record without coordinates");
        return None;
    };

    let name = first_text(record, NAME_KEYS).unwrap_or_else(|| {
        tracing::debug!(%member_id, "installer record without a name; using member id");
        member_id.clone()
    });

    Some(Location {
        lat,
        lng,
        member_id,
        name,
        distance: format_distance(DISTANCE_KEYS.iter().find_map(|key| record.get(*key))),
        city: first_text(record, CITY_KEYS),
        address: first_text(record, ADDRESS_KEYS),
    })
}

/// Renders a distance with a unit suffix.
///
/// Numbers and numeric strings get one decimal place and `mi`; strings that
/// already carry a unit (`"3 km"`) pass through; anything else is `0.0 mi`.
pub(crate) fn format_distance(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .map_or_else(unknown_distance, |d| format!("{d:.1} {DISTANCE_UNIT}")),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if let Ok(d) = trimmed.parse::<f64>() {
                format!("{d:.1} {DISTANCE_UNIT}")
            } else if trimmed.chars().any(|c| c.is_ascii_digit())
                && trimmed.chars().any(char::is_alphabetic)
            {
                trimmed.to_string()
            } else {
                unknown_distance()
            }
        }
        _ => unknown_distance(),
    }
}

fn unknown_distance() -> String {
    format!("0.0 {DISTANCE_UNIT}")
}

fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(value_as_string))
}

fn first_f64(record: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(value_as_f64))
}

fn value_as_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|raw| raw.trim().parse::<f64>().ok()))
        .filter(|v| v.is_finite())
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
