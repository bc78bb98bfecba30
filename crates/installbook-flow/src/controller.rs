//! The booking wizard controller.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use installbook_client::{
    build_cart_request, is_valid_zipcode, CartClient, CartMetadata, CartRequest, CatalogClient,
    InstallerClient,
};
use installbook_core::{AttributeMapping, Product, VehicleKind, VehicleSelection, WidgetConfig};
use uuid::Uuid;

use crate::error::{FlowError, ValidationError};
use crate::mapping::{map_details_to_options, BookingDetails};
use crate::schedule::{self, TimeSlot};
use crate::state::{Appointment, FlowState};
use crate::step::Step;
use crate::submit::submit_sequentially;
use crate::vehicle::VehiclePicker;

/// Input that completes one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepPayload {
    /// Opt into installation.
    Intro,
    Zipcode {
        zipcode: String,
    },
    Location {
        member_id: String,
    },
    Schedule {
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
        stay_with_vehicle: bool,
    },
    Vehicle(VehicleSelection),
}

impl StepPayload {
    /// The step this payload completes.
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            StepPayload::Intro => Step::Intro,
            StepPayload::Zipcode { .. } => Step::Zipcode,
            StepPayload::Location { .. } => Step::Location,
            StepPayload::Schedule { .. } => Step::Schedule,
            StepPayload::Vehicle(_) => Step::Vehicle,
        }
    }
}

/// Result of a successful [`BookingFlow::advance`].
#[derive(Debug, Clone)]
pub enum Advance {
    /// Moved to this step.
    Moved(Step),
    /// The final step submitted the booking; the flow has been reset.
    Completed(BookingReceipt),
}

/// Line items added to the cart for one booking.
#[derive(Debug, Clone)]
pub struct BookingReceipt {
    pub booking_id: Uuid,
    /// Cart requests in the order they were submitted.
    pub line_items: Vec<CartRequest>,
}

/// Instruction for the embedding page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    /// Hide and unmount the widget.
    Unmount,
}

/// Drives one booking session from intro to cart submission.
///
/// All operations take `&mut self`, so a lookup always completes (or fails)
/// before the next input is applied.
pub struct BookingFlow {
    config: Arc<WidgetConfig>,
    installer: Arc<InstallerClient>,
    catalog: CatalogClient,
    cart: CartClient,
    picker: VehiclePicker,
    state: FlowState,
    message: Option<String>,
}

impl BookingFlow {
    /// Builds the installer, catalog, and cart clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Client`] if any configured URL is invalid or an
    /// HTTP client cannot be constructed.
    pub fn new(config: Arc<WidgetConfig>) -> Result<Self, FlowError> {
        let installer = Arc::new(InstallerClient::new(&config)?);
        let catalog = CatalogClient::new(&config)?;
        let cart = CartClient::new(&config)?;
        tracing::debug!(mode = %config.mode, sku = %config.product_sku, "booking flow ready");

        Ok(Self {
            picker: VehiclePicker::new(Arc::clone(&installer)),
            config,
            installer,
            catalog,
            cart,
            state: FlowState::default(),
            message: None,
        })
    }

    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    #[must_use]
    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    /// User-facing message from the last failed operation.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn vehicle_picker(&mut self) -> &mut VehiclePicker {
        &mut self.picker
    }

    /// Bookable dates for the schedule step, honoring the configured lead time.
    #[must_use]
    pub fn available_dates(&self, today: NaiveDate, count: usize) -> Vec<NaiveDate> {
        schedule::available_dates(today, self.config.lead_days, count)
    }

    #[must_use]
    pub fn time_slots(&self) -> &'static [TimeSlot] {
        &TimeSlot::ALL
    }

    /// Validates `payload`, merges it into the state, and moves to the next step.
    ///
    /// Completing the vehicle step submits the booking to the cart. On any
    /// error the current step is unchanged and [`BookingFlow::message`]
    /// carries the banner text.
    ///
    /// # Errors
    ///
    /// - [`FlowError::StepMismatch`] if `payload` is for another step.
    /// - [`FlowError::Validation`] for incomplete or malformed input.
    /// - [`FlowError::NotServiceable`] when no installer covers the zipcode.
    /// - [`FlowError::LocationLookup`], [`FlowError::ProductFetch`], or
    ///   [`FlowError::Submission`] when a request fails.
    pub async fn advance(&mut self, payload: StepPayload) -> Result<Advance, FlowError> {
        let result = self.try_advance(payload).await;
        self.record_outcome(&result);
        result
    }

    async fn try_advance(&mut self, payload: StepPayload) -> Result<Advance, FlowError> {
        let expected = self.state.current_step;
        let got = payload.step();
        if got != expected {
            return Err(FlowError::StepMismatch { expected, got });
        }

        match payload {
            StepPayload::Intro => self.state.include_installation = true,
            StepPayload::Zipcode { zipcode } => self.complete_zipcode(&zipcode).await?,
            StepPayload::Location { member_id } => self.complete_location(&member_id)?,
            StepPayload::Schedule {
                date,
                time,
                stay_with_vehicle,
            } => self.complete_schedule(date, time, stay_with_vehicle)?,
            StepPayload::Vehicle(selection) => {
                return self.complete_vehicle(selection).await.map(Advance::Completed);
            }
        }

        let next = expected.next().unwrap_or(expected);
        self.move_to(next);
        Ok(Advance::Moved(next))
    }

    /// Returns to the previous step, keeping everything entered so far.
    pub fn go_back(&mut self) -> Step {
        if let Some(previous) = self.state.current_step.previous() {
            self.move_to(previous);
        }
        self.message = None;
        self.state.current_step
    }

    /// Clears all answers and returns to the intro.
    pub fn reset(&mut self) {
        self.state = FlowState::default();
        self.picker.clear();
        self.message = None;
        tracing::debug!("booking flow reset");
    }

    /// Resets the flow and tells the host to unmount the widget.
    pub fn close(&mut self) -> HostSignal {
        self.reset();
        HostSignal::Unmount
    }

    /// Opts in or out of installation. Opting in moves to the zipcode step;
    /// opting out returns to the intro.
    pub fn toggle_installation(&mut self, added: bool) -> Step {
        self.state.include_installation = added;
        self.move_to(if added { Step::Zipcode } else { Step::Intro });
        self.state.current_step
    }

    /// Adds only the main product, with no booking attributes, then resets.
    ///
    /// # Errors
    ///
    /// - [`FlowError::StepMismatch`] outside the intro step.
    /// - [`FlowError::Validation`] if no main product id is configured.
    /// - [`FlowError::CartAdd`] if the cart rejects the product.
    pub async fn checkout_without_installation(&mut self) -> Result<BookingReceipt, FlowError> {
        let result = self.try_checkout_without_installation().await;
        self.record_outcome(&result);
        result
    }

    async fn try_checkout_without_installation(&mut self) -> Result<BookingReceipt, FlowError> {
        if self.state.current_step != Step::Intro {
            return Err(FlowError::StepMismatch {
                expected: Step::Intro,
                got: self.state.current_step,
            });
        }

        let product_id = self.config.product_id_th.trim();
        if product_id.is_empty() {
            return Err(ValidationError::MissingProductId.into());
        }

        let request = build_cart_request(product_id, AttributeMapping::new(), None, None);
        self.cart.add(&request).await.map_err(FlowError::CartAdd)?;

        let receipt = BookingReceipt {
            booking_id: Uuid::new_v4(),
            line_items: vec![request],
        };
        tracing::info!(booking_id = %receipt.booking_id, "checked out without installation");
        self.reset();
        Ok(receipt)
    }

    async fn complete_zipcode(&mut self, zipcode: &str) -> Result<(), FlowError> {
        let zipcode = zipcode.trim();
        if !is_valid_zipcode(zipcode) {
            return Err(ValidationError::InvalidZipcode(zipcode.to_string()).into());
        }

        if let Some(cached) = self.state.cached_locations(zipcode) {
            tracing::debug!(zipcode, count = cached.len(), "reusing installer locations");
            return Ok(());
        }

        let locations = self
            .installer
            .lookup_locations(zipcode)
            .await
            .map_err(FlowError::LocationLookup)?;
        if locations.is_empty() {
            return Err(FlowError::NotServiceable {
                zipcode: zipcode.to_string(),
            });
        }

        self.state.zipcode = zipcode.to_string();
        self.state.locations = locations;
        self.state.locations_zipcode = Some(zipcode.to_string());
        self.state.selected_location = None;
        self.state.member_id = None;
        Ok(())
    }

    fn complete_location(&mut self, member_id: &str) -> Result<(), FlowError> {
        let location = self
            .state
            .locations
            .iter()
            .find(|location| location.has_member_id(member_id))
            .cloned()
            .ok_or_else(|| ValidationError::UnknownLocation(member_id.trim().to_string()))?;

        self.state.member_id = Some(location.member_id.clone());
        self.state.selected_location = Some(location);
        Ok(())
    }

    fn complete_schedule(
        &mut self,
        date: Option<NaiveDate>,
        time: Option<TimeSlot>,
        stay_with_vehicle: bool,
    ) -> Result<(), FlowError> {
        if date.is_none() {
            return Err(ValidationError::MissingDate.into());
        }
        if time.is_none() {
            return Err(ValidationError::MissingTime.into());
        }

        self.state.appointment = Appointment {
            date,
            time,
            stay_with_vehicle,
        };
        Ok(())
    }

    async fn complete_vehicle(
        &mut self,
        selection: VehicleSelection,
    ) -> Result<BookingReceipt, FlowError> {
        let required = [
            (VehicleKind::Year, selection.year_label()),
            (VehicleKind::Make, selection.make_label()),
            (VehicleKind::Model, selection.model_label()),
        ];
        if let Some((kind, _)) = required.iter().find(|(_, label)| label.trim().is_empty()) {
            return Err(ValidationError::MissingVehicle(*kind).into());
        }
        if selection.vehicle_type.is_none() && !self.picker.types().is_empty() {
            return Err(ValidationError::MissingVehicle(VehicleKind::Type).into());
        }

        self.state.vehicle = selection;
        self.submit_booking().await
    }

    async fn submit_booking(&mut self) -> Result<BookingReceipt, FlowError> {
        let booking_id = Uuid::new_v4();
        let product = self
            .catalog
            .fetch_product_by_sku(&self.config.product_sku, &self.config.currency_code)
            .await
            .map_err(FlowError::ProductFetch)?;

        let requests = self.cart_requests(&product, booking_id);
        let delay = Duration::from_millis(self.config.cart_delay_ms);
        submit_sequentially(&self.cart, &requests, delay).await?;

        tracing::info!(
            %booking_id,
            line_items = requests.len(),
            zipcode = %self.state.zipcode,
            "booking added to cart"
        );
        self.reset();
        Ok(BookingReceipt {
            booking_id,
            line_items: requests,
        })
    }

    /// One request for the main product, linked to the installation product,
    /// followed by one per related product.
    fn cart_requests(&self, product: &Product, booking_id: Uuid) -> Vec<CartRequest> {
        let details = BookingDetails::from_state(&self.state);
        let phf = &self.config.phf_mapping;
        let metadata = self.cart_metadata(booking_id);

        let installation_id = self
            .state
            .include_installation
            .then(|| product.installation_product(self.config.variant_product.as_deref()))
            .flatten()
            .map(|installation| installation.entity_id.to_string());

        let main_id = Some(self.config.product_id_th.trim())
            .filter(|id| !id.is_empty())
            .map_or_else(|| product.entity_id.to_string(), str::to_string);

        let mut requests = vec![build_cart_request(
            main_id,
            map_details_to_options(product, &details, phf),
            installation_id,
            Some(metadata.clone()),
        )];
        requests.extend(product.related_products.iter().map(|related| {
            build_cart_request(
                related.entity_id.to_string(),
                map_details_to_options(related, &details, phf),
                None,
                Some(metadata.clone()),
            )
        }));
        requests
    }

    fn cart_metadata(&self, booking_id: Uuid) -> CartMetadata {
        let vehicle = &self.state.vehicle;
        let vehicle_summary = [
            vehicle.year_label(),
            vehicle.make_label(),
            vehicle.model_label(),
            vehicle.type_label(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
        let appointment = &self.state.appointment;

        CartMetadata {
            booking_id: Some(booking_id.to_string()),
            zipcode: Some(self.state.zipcode.clone()),
            member_id: self.state.member_id.clone(),
            vehicle: Some(vehicle_summary),
            appointment: Some(format!(
                "{} {}",
                appointment.date_value(),
                appointment.time_value()
            )),
        }
    }

    fn move_to(&mut self, step: Step) {
        let from = self.state.current_step;
        if from != step {
            tracing::info!(%from, to = %step, "booking step changed");
        }
        self.state.current_step = step;
    }

    fn record_outcome<T>(&mut self, result: &Result<T, FlowError>) {
        match result {
            Ok(_) => self.message = None,
            Err(err) => {
                tracing::warn!(
                    step = %self.state.current_step,
                    error = %err,
                    "booking step failed"
                );
                self.message = Some(err.user_message());
            }
        }
    }
}
