//! HTTP client for the installer network API: zipcode → installer locations
//! and the year → make → model → type vehicle cascade.

mod normalize;
mod response;

use installbook_core::{Location, VehicleKind, VehicleOption, WidgetConfig};
use reqwest::Client;

use crate::error::ClientError;
use crate::http::{build_client, normalize_base_url, send_json, with_bearer};
use crate::zipcode::is_valid_zipcode;

pub use normalize::{normalize_locations, normalize_vehicle_options};
pub use response::RawListResponse;

/// Client for the installer/vehicle REST endpoints.
///
/// Dependent lookups short-circuit to an empty list when their parent value
/// is missing, so callers can wire dropdown changes straight through without
/// guarding every call.
pub struct InstallerClient {
    client: Client,
    base_url: String,
    token: String,
    program_id: String,
}

impl InstallerClient {
    /// Creates a client for the API base URL selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] if the configured base URL does
    /// not parse, or [`ClientError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &WidgetConfig) -> Result<Self, ClientError> {
        Self::with_base_url(config, config.api_base_url())
    }

    /// Creates a client against an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`InstallerClient::new`].
    pub fn with_base_url(config: &WidgetConfig, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            client: build_client(config.request_timeout_secs, &config.user_agent, false)?,
            base_url: normalize_base_url(base_url)?,
            token: config.token.clone(),
            program_id: config.program_id.clone(),
        })
    }

    /// Looks up installer locations that service `zipcode`.
    ///
    /// The zipcode must be exactly five digits; anything else is rejected
    /// before a request is made. An empty result means the area is not
    /// serviceable and is returned as `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidZipcode`] for malformed input (no request sent).
    /// - [`ClientError::NotFound`] / [`ClientError::UnexpectedStatus`] for non-2xx responses.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if the body is not JSON.
    pub async fn lookup_locations(&self, zipcode: &str) -> Result<Vec<Location>, ClientError> {
        if !is_valid_zipcode(zipcode) {
            return Err(ClientError::InvalidZipcode {
                zipcode: zipcode.to_string(),
            });
        }

        let url = format!("{}/api/installers/by-zipcode", self.base_url);
        let body = serde_json::json!({
            "zipcode": zipcode,
            "programId": self.program_id,
        });
        let request = with_bearer(self.client.post(&url), &self.token).json(&body);
        let payload = send_json(request, &url, &format!("installers for {zipcode}")).await?;

        let locations = normalize_locations(payload);
        tracing::debug!(zipcode, count = locations.len(), "installer lookup complete");
        Ok(locations)
    }

    /// Lists vehicle years.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors; see [`InstallerClient::lookup_locations`].
    pub async fn list_years(&self) -> Result<Vec<VehicleOption>, ClientError> {
        self.fetch_vehicle_list(VehicleKind::Year, "years", &[]).await
    }

    /// Lists makes for `year`; an empty year returns `[]` without a request.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors; see [`InstallerClient::lookup_locations`].
    pub async fn list_makes(&self, year: &str) -> Result<Vec<VehicleOption>, ClientError> {
        let year = year.trim();
        if year.is_empty() {
            tracing::debug!("no year selected; skipping makes lookup");
            return Ok(Vec::new());
        }
        self.fetch_vehicle_list(VehicleKind::Make, "makes", &[("year", year)]).await
    }

    /// Lists models for `year` and a resolved make identifier.
    ///
    /// Returns `[]` without a request when either is missing; resolve the
    /// identifier with [`installbook_core::resolve_make_id`].
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors; see [`InstallerClient::lookup_locations`].
    pub async fn list_models(
        &self,
        year: &str,
        make_id: Option<&str>,
    ) -> Result<Vec<VehicleOption>, ClientError> {
        let year = year.trim();
        let make_id = make_id.map(str::trim).filter(|id| !id.is_empty());
        let Some(make_id) = make_id.filter(|_| !year.is_empty()) else {
            tracing::debug!("year or make unresolved; skipping models lookup");
            return Ok(Vec::new());
        };
        self.fetch_vehicle_list(
            VehicleKind::Model,
            "models",
            &[("year", year), ("makeID", make_id)],
        )
        .await
    }

    /// Lists vehicle types for `model`; an empty model returns `[]` without a request.
    ///
    /// # Errors
    ///
    /// Propagates transport and status errors; see [`InstallerClient::lookup_locations`].
    pub async fn list_types(&self, model: &str) -> Result<Vec<VehicleOption>, ClientError> {
        let model = model.trim();
        if model.is_empty() {
            tracing::debug!("no model selected; skipping types lookup");
            return Ok(Vec::new());
        }
        self.fetch_vehicle_list(VehicleKind::Type, "types", &[("model", model)]).await
    }

    async fn fetch_vehicle_list(
        &self,
        kind: VehicleKind,
        segment: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<VehicleOption>, ClientError> {
        let url = format!("{}/api/vehicles/{segment}", self.base_url);
        let request = with_bearer(self.client.get(&url), &self.token).query(query);
        let payload = send_json(request, &url, &format!("vehicle {segment}")).await?;

        let options = normalize_vehicle_options(kind, payload);
        tracing::debug!(%kind, count = options.len(), "vehicle lookup complete");
        Ok(options)
    }
}
