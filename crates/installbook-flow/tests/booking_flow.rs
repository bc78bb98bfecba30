//! End-to-end booking scenarios against a mocked installer API, storefront
//! GraphQL endpoint, and `cart.php`.

use std::sync::Arc;

use chrono::NaiveDate;
use installbook_core::{MakeSelection, VehicleOption, WidgetConfig};
use installbook_flow::{
    Advance, BookingFlow, FlowError, HostSignal, Step, StepPayload, TimeSlot, ValidationError,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> Arc<WidgetConfig> {
    let config = WidgetConfig::from_json(
        &json!({
            "token": "test-token",
            "endpoint": "/graphql",
            "mode": "local",
            "product_id_th": 100,
            "product_sku": "DASH-622",
            "currency_code": "USD",
            "programId": "7",
            "store_url": server.uri(),
            "api_base_url": server.uri(),
            "cart_delay_ms": 0
        })
        .to_string(),
    )
    .expect("valid test config");
    Arc::new(config)
}

fn option_edges(options: &[(i64, &str)]) -> Value {
    let edges: Vec<Value> = options
        .iter()
        .map(|(id, name)| json!({ "node": { "entityId": id, "displayName": name } }))
        .collect();
    json!({ "edges": edges })
}

fn product_response() -> Value {
    json!({
        "data": { "site": {
            "currency": { "display": { "symbol": "$" } },
            "product": {
                "id": "UHJvZHVjdDoxMDA=",
                "entityId": 100,
                "name": "Dash Cam",
                "sku": "DASH-622",
                "prices": { "basePrice": { "value": 199.0, "currencyCode": "USD" } },
                "productOptions": option_edges(&[
                    (375, "Vehicle Year"),
                    (376, "Vehicle Make"),
                    (377, "Vehicle Modal"),
                    (381, "Installation Date"),
                    (382, "Time"),
                    (384, "Installer Member ID"),
                    (385, "Zip Code"),
                ]),
                "relatedProducts": { "edges": [{ "node": {
                    "id": "UHJvZHVjdDoyMTk=",
                    "entityId": 219,
                    "name": "Professional Installation",
                    "sku": "INSTALL-1",
                    "prices": { "basePrice": { "value": 99.0, "currencyCode": "USD" } },
                    "productOptions": option_edges(&[(381, "Installation Date")])
                }}]}
            }
        }}
    })
}

async fn mount_locations(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "locations": [
                {
                    "lat": "34.07", "lng": "-118.40",
                    "member_id": "1001", "name": "Beverly Auto", "distance": 1.2
                },
                {
                    "latitude": 34.05, "longitude": -118.39,
                    "memberId": 1004, "name": "Rodeo Installs", "distance": "2.4"
                },
                {
                    "lat": 34.10, "lon": -118.42,
                    "id": "1007", "name": "Canyon Car Audio", "distance": "3 mi"
                }
            ]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_vehicle_cascade(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/vehicles/years"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([2022, 2023])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/makes"))
        .and(query_param("year", "2023"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "makes": [{ "makeID": "12", "make": "Toyota" }, { "makeID": "13", "make": "Honda" }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/models"))
        .and(query_param("year", "2023"))
        .and(query_param("makeID", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": ["Camry"] })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/vehicles/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

async fn mount_product(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_response()))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Drives a fresh flow through intro, zipcode 90210, member 1004, and the
/// 2025-01-01 morning appointment.
async fn flow_at_vehicle_step(server: &MockServer) -> BookingFlow {
    let mut flow = BookingFlow::new(test_config(server)).expect("flow construction");

    flow.advance(StepPayload::Intro).await.unwrap();
    flow.advance(StepPayload::Zipcode {
        zipcode: "90210".into(),
    })
    .await
    .unwrap();
    flow.advance(StepPayload::Location {
        member_id: "1004".into(),
    })
    .await
    .unwrap();
    flow.advance(StepPayload::Schedule {
        date: NaiveDate::from_ymd_opt(2025, 1, 1),
        time: Some(TimeSlot::Morning),
        stay_with_vehicle: true,
    })
    .await
    .unwrap();
    assert_eq!(flow.current_step(), Step::Vehicle);
    flow
}

async fn pick_camry(flow: &mut BookingFlow) {
    let picker = flow.vehicle_picker();
    picker.load_years().await.unwrap();
    picker
        .select_year(VehicleOption::scalar("2023"))
        .await
        .unwrap();
    let make = MakeSelection::from_value(&json!({ "makeID": "12", "make": "Toyota" })).unwrap();
    let models = picker.select_make(make).await.unwrap();
    assert_eq!(models, [VehicleOption::scalar("Camry")]);
    let types = picker
        .select_model(VehicleOption::scalar("Camry"))
        .await
        .unwrap();
    assert!(types.is_empty());
}

#[tokio::test]
async fn full_booking_maps_answers_and_submits_sequentially() {
    let server = MockServer::start().await;
    mount_locations(&server, 1).await;
    mount_vehicle_cascade(&server).await;
    mount_product(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/cart.php"))
        .and(query_param("action", "add"))
        .and(query_param("product_id", "100"))
        .and(query_param("attribute[375]", "2023"))
        .and(query_param("attribute[376]", "Toyota"))
        .and(query_param("attribute[377]", "Camry"))
        .and(query_param("attribute[381]", "2025-01-01"))
        .and(query_param("attribute[382]", "Morning"))
        .and(query_param("attribute[384]", "1004"))
        .and(query_param("attribute[385]", "90210"))
        .and(query_param("installation_id", "219"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart.php"))
        .and(query_param("product_id", "219"))
        .and(query_param("attribute[381]", "2025-01-01"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = flow_at_vehicle_step(&server).await;
    assert_eq!(flow.state().locations.len(), 3);
    assert_eq!(flow.state().member_id.as_deref(), Some("1004"));

    pick_camry(&mut flow).await;
    let selection = flow.vehicle_picker().selection().clone();
    assert_eq!(selection.make, Some(VehicleOption::new("12", "Toyota")));

    let receipt = match flow.advance(StepPayload::Vehicle(selection)).await {
        Ok(Advance::Completed(receipt)) => receipt,
        other => panic!("expected a completed booking, got: {other:?}"),
    };

    assert_eq!(receipt.line_items.len(), 2);
    let main = &receipt.line_items[0];
    let mapped: Vec<(&str, &str)> = main.attributes.iter().collect();
    assert_eq!(
        mapped,
        vec![
            ("375", "2023"),
            ("376", "Toyota"),
            ("377", "Camry"),
            ("381", "2025-01-01"),
            ("382", "Morning"),
            ("384", "1004"),
            ("385", "90210"),
        ]
    );
    assert_eq!(main.installation_id.as_deref(), Some("219"));
    let metadata = main.metadata.as_ref().unwrap();
    assert_eq!(
        metadata.booking_id.as_deref(),
        Some(receipt.booking_id.to_string().as_str())
    );
    assert_eq!(metadata.vehicle.as_deref(), Some("2023 Toyota Camry"));

    assert_eq!(flow.current_step(), Step::Intro);
    assert!(flow.state().locations.is_empty());
    assert!(flow.message().is_none());
}

#[tokio::test]
async fn back_and_forward_with_same_zipcode_reuses_locations() {
    let server = MockServer::start().await;
    mount_locations(&server, 1).await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    flow.advance(StepPayload::Intro).await.unwrap();
    flow.advance(StepPayload::Zipcode {
        zipcode: "90210".into(),
    })
    .await
    .unwrap();
    assert_eq!(flow.current_step(), Step::Location);

    assert_eq!(flow.go_back(), Step::Zipcode);
    assert_eq!(flow.state().zipcode, "90210");

    let outcome = flow
        .advance(StepPayload::Zipcode {
            zipcode: "90210".into(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, Advance::Moved(Step::Location)));
    assert_eq!(flow.state().locations.len(), 3);
}

#[tokio::test]
async fn changed_zipcode_replaces_locations_and_clears_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .and(body_partial_json(json!({ "zipcode": "10001" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "lat": 40.75, "lng": -73.99, "member_id": 2001, "name": "Midtown Mobile" },
            { "lat": 40.74, "lng": -74.00, "member_id": 2002, "name": "Chelsea Car Tech" }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount_locations(&server, 1).await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    flow.advance(StepPayload::Intro).await.unwrap();
    flow.advance(StepPayload::Zipcode {
        zipcode: "90210".into(),
    })
    .await
    .unwrap();
    flow.advance(StepPayload::Location {
        member_id: "1004".into(),
    })
    .await
    .unwrap();
    assert_eq!(flow.state().member_id.as_deref(), Some("1004"));

    flow.go_back();
    assert_eq!(flow.go_back(), Step::Zipcode);

    let outcome = flow
        .advance(StepPayload::Zipcode {
            zipcode: "10001".into(),
        })
        .await
        .unwrap();
    assert!(matches!(outcome, Advance::Moved(Step::Location)));
    assert_eq!(flow.state().zipcode, "10001");
    assert_eq!(flow.state().locations.len(), 2);
    assert_eq!(flow.state().member_id, None);
    assert!(flow.state().selected_location.is_none());
}

#[tokio::test]
async fn partial_cart_failure_stops_and_keeps_step() {
    let server = MockServer::start().await;
    mount_locations(&server, 1).await;
    mount_vehicle_cascade(&server).await;
    mount_product(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/cart.php"))
        .and(query_param("product_id", "100"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart.php"))
        .and(query_param("product_id", "219"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = flow_at_vehicle_step(&server).await;
    pick_camry(&mut flow).await;
    let selection = flow.vehicle_picker().selection().clone();

    let result = flow.advance(StepPayload::Vehicle(selection)).await;
    match result {
        Err(FlowError::Submission(err)) => {
            assert_eq!(err.added, vec!["100".to_string()]);
            assert_eq!(err.failed_product_id, "219");
        }
        other => panic!("expected Submission error, got: {other:?}"),
    }
    assert_eq!(flow.current_step(), Step::Vehicle);
    assert_eq!(
        flow.message(),
        Some("Failed to complete checkout. Please try again.")
    );
    assert_eq!(flow.state().member_id.as_deref(), Some("1004"));
}

#[tokio::test]
async fn incomplete_vehicle_is_rejected_before_any_request() {
    let server = MockServer::start().await;
    mount_locations(&server, 1).await;
    mount_product(&server, 0).await;

    let mut flow = flow_at_vehicle_step(&server).await;
    let mut selection = installbook_core::VehicleSelection {
        year: Some(VehicleOption::scalar("2023")),
        make: Some(VehicleOption::new("12", "Toyota")),
        ..Default::default()
    };

    let result = flow.advance(StepPayload::Vehicle(selection.clone())).await;
    assert!(matches!(
        result,
        Err(FlowError::Validation(ValidationError::MissingVehicle(
            installbook_core::VehicleKind::Model
        )))
    ));
    assert_eq!(flow.message(), Some("Please select a vehicle model"));
    assert_eq!(flow.current_step(), Step::Vehicle);

    selection.model = Some(VehicleOption::scalar(" "));
    assert!(flow.advance(StepPayload::Vehicle(selection)).await.is_err());
}

#[tokio::test]
async fn invalid_zipcode_is_rejected_without_lookup() {
    let server = MockServer::start().await;
    mount_locations(&server, 0).await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    flow.advance(StepPayload::Intro).await.unwrap();

    let result = flow
        .advance(StepPayload::Zipcode {
            zipcode: "9021".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(FlowError::Validation(ValidationError::InvalidZipcode(_)))
    ));
    assert_eq!(flow.message(), Some("Please enter a valid 5-digit zipcode"));
    assert_eq!(flow.current_step(), Step::Zipcode);
}

#[tokio::test]
async fn empty_lookup_is_not_serviceable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "installers": [] })))
        .mount(&server)
        .await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    flow.advance(StepPayload::Intro).await.unwrap();
    let result = flow
        .advance(StepPayload::Zipcode {
            zipcode: "00501".into(),
        })
        .await;

    assert!(matches!(result, Err(FlowError::NotServiceable { .. })));
    assert_eq!(
        flow.message(),
        Some("Sorry, installation service is not available in your area")
    );
    assert_eq!(flow.current_step(), Step::Zipcode);
}

#[tokio::test]
async fn failed_lookup_shows_retry_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    flow.advance(StepPayload::Intro).await.unwrap();
    let result = flow
        .advance(StepPayload::Zipcode {
            zipcode: "90210".into(),
        })
        .await;

    assert!(matches!(result, Err(FlowError::LocationLookup(_))));
    assert_eq!(
        flow.message(),
        Some("Failed to check zipcode. Please try again.")
    );
    assert_eq!(flow.current_step(), Step::Zipcode);
}

#[tokio::test]
async fn unknown_member_id_is_rejected() {
    let server = MockServer::start().await;
    mount_locations(&server, 1).await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    flow.advance(StepPayload::Intro).await.unwrap();
    flow.advance(StepPayload::Zipcode {
        zipcode: "90210".into(),
    })
    .await
    .unwrap();

    let result = flow
        .advance(StepPayload::Location {
            member_id: "9999".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(FlowError::Validation(ValidationError::UnknownLocation(_)))
    ));
    assert_eq!(flow.current_step(), Step::Location);
}

#[tokio::test]
async fn payload_for_another_step_is_rejected() {
    let server = MockServer::start().await;
    let mut flow = BookingFlow::new(test_config(&server)).unwrap();

    let result = flow
        .advance(StepPayload::Location {
            member_id: "1004".into(),
        })
        .await;
    assert!(matches!(
        result,
        Err(FlowError::StepMismatch {
            expected: Step::Intro,
            got: Step::Location
        })
    ));
    assert_eq!(flow.current_step(), Step::Intro);
}

#[tokio::test]
async fn checkout_without_installation_adds_only_main_product() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart.php"))
        .and(query_param("action", "add"))
        .and(query_param("product_id", "100"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    let receipt = flow.checkout_without_installation().await.unwrap();

    assert_eq!(receipt.line_items.len(), 1);
    assert!(receipt.line_items[0].attributes.is_empty());
    assert!(receipt.line_items[0].installation_id.is_none());
    assert_eq!(flow.current_step(), Step::Intro);
}

#[tokio::test]
async fn toggle_and_close_reset_the_session() {
    let server = MockServer::start().await;
    mount_locations(&server, 1).await;

    let mut flow = BookingFlow::new(test_config(&server)).unwrap();
    assert_eq!(flow.toggle_installation(true), Step::Zipcode);
    assert!(flow.state().include_installation);

    flow.advance(StepPayload::Zipcode {
        zipcode: "90210".into(),
    })
    .await
    .unwrap();
    assert_eq!(flow.toggle_installation(false), Step::Intro);
    assert!(!flow.state().include_installation);

    assert_eq!(flow.close(), HostSignal::Unmount);
    assert_eq!(flow.current_step(), Step::Intro);
    assert!(flow.state().locations.is_empty());
    assert!(flow.state().zipcode.is_empty());
}

#[tokio::test]
async fn available_dates_honor_lead_time() {
    let server = MockServer::start().await;
    let flow = BookingFlow::new(test_config(&server)).unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
    let dates = flow.available_dates(today, 2);
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        ]
    );
    assert_eq!(flow.time_slots().len(), 3);
}
