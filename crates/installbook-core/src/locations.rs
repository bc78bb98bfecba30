use serde::{Deserialize, Serialize};

/// An installer location that can service a zipcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    /// Installer-network member id, the key used to select a location.
    pub member_id: String,
    pub name: String,
    /// Distance from the searched zipcode, always carrying a unit, e.g. `"4.2 mi"`.
    pub distance: String,
    pub city: Option<String>,
    pub address: Option<String>,
}

impl Location {
    /// Returns `true` if this location carries the given member id.
    #[must_use]
    pub fn has_member_id(&self, member_id: &str) -> bool {
        self.member_id == member_id.trim()
    }
}
