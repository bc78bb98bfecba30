//! Year → make → model → type cascade for the vehicle step.

use std::sync::Arc;

use installbook_client::{ClientError, InstallerClient};
use installbook_core::{
    resolve_make, MakeSelection, VehicleKind, VehicleOption, VehicleSelection,
};

use crate::error::FlowError;

/// Dropdown state for the vehicle step.
///
/// Holds the most recently fetched list for each level alongside the current
/// selection. Selecting a value clears every level below it and fetches the
/// next list.
pub struct VehiclePicker {
    client: Arc<InstallerClient>,
    years: Vec<VehicleOption>,
    makes: Vec<VehicleOption>,
    models: Vec<VehicleOption>,
    types: Vec<VehicleOption>,
    selection: VehicleSelection,
}

impl VehiclePicker {
    #[must_use]
    pub fn new(client: Arc<InstallerClient>) -> Self {
        Self {
            client,
            years: Vec::new(),
            makes: Vec::new(),
            models: Vec::new(),
            types: Vec::new(),
            selection: VehicleSelection::default(),
        }
    }

    #[must_use]
    pub fn years(&self) -> &[VehicleOption] {
        &self.years
    }

    #[must_use]
    pub fn makes(&self) -> &[VehicleOption] {
        &self.makes
    }

    #[must_use]
    pub fn models(&self) -> &[VehicleOption] {
        &self.models
    }

    #[must_use]
    pub fn types(&self) -> &[VehicleOption] {
        &self.types
    }

    #[must_use]
    pub fn selection(&self) -> &VehicleSelection {
        &self.selection
    }

    /// Fetches the year list. Existing selections are kept.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::VehicleLookup`] if the request fails.
    pub async fn load_years(&mut self) -> Result<&[VehicleOption], FlowError> {
        self.years = self
            .client
            .list_years()
            .await
            .map_err(lookup_error(VehicleKind::Year))?;
        Ok(&self.years)
    }

    /// Selects a year, clears make/model/type, and fetches makes.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::VehicleLookup`] if the request fails; the year
    /// stays selected so the host can retry.
    pub async fn select_year(
        &mut self,
        year: VehicleOption,
    ) -> Result<&[VehicleOption], FlowError> {
        self.clear_below(VehicleKind::Year);
        let year_id = year.id.clone();
        self.selection.year = Some(year);

        self.makes = self
            .client
            .list_makes(&year_id)
            .await
            .map_err(lookup_error(VehicleKind::Make))?;
        Ok(&self.makes)
    }

    /// Selects a make, clears model/type, and fetches models.
    ///
    /// Free-text makes are resolved against the last-fetched makes list and
    /// stored as the matched entry; see [`resolve_make`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::VehicleLookup`] if the request fails.
    pub async fn select_make(
        &mut self,
        make: MakeSelection,
    ) -> Result<&[VehicleOption], FlowError> {
        self.clear_below(VehicleKind::Make);
        self.selection.make = resolve_make(&make, &self.makes);

        let year = self.selection.year.as_ref().map_or("", |y| y.id.as_str());
        let make_id = self.selection.make.as_ref().map(|m| m.id.as_str());
        tracing::debug!(year, make_id, "resolved make");
        self.models = self
            .client
            .list_models(year, make_id)
            .await
            .map_err(lookup_error(VehicleKind::Model))?;
        Ok(&self.models)
    }

    /// Selects a model, clears the type, and fetches types.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::VehicleLookup`] if the request fails.
    pub async fn select_model(
        &mut self,
        model: VehicleOption,
    ) -> Result<&[VehicleOption], FlowError> {
        self.clear_below(VehicleKind::Model);
        let model_id = model.id.clone();
        self.selection.model = Some(model);

        self.types = self
            .client
            .list_types(&model_id)
            .await
            .map_err(lookup_error(VehicleKind::Type))?;
        Ok(&self.types)
    }

    pub fn select_type(&mut self, vehicle_type: VehicleOption) {
        self.selection.vehicle_type = Some(vehicle_type);
    }

    /// Drops every list and selection.
    pub fn clear(&mut self) {
        self.years.clear();
        self.clear_below(VehicleKind::Year);
        self.selection.year = None;
    }

    fn clear_below(&mut self, kind: VehicleKind) {
        match kind {
            VehicleKind::Year => {
                self.makes.clear();
                self.selection.make = None;
                self.clear_below(VehicleKind::Make);
            }
            VehicleKind::Make => {
                self.models.clear();
                self.selection.model = None;
                self.clear_below(VehicleKind::Model);
            }
            VehicleKind::Model => {
                self.types.clear();
                self.selection.vehicle_type = None;
            }
            VehicleKind::Type => {}
        }
    }
}

fn lookup_error(kind: VehicleKind) -> impl FnOnce(ClientError) -> FlowError {
    move |source| FlowError::VehicleLookup { kind, source }
}
