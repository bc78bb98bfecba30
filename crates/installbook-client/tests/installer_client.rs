//! Integration tests for `InstallerClient` using wiremock HTTP mocks.

use installbook_client::{ClientError, InstallerClient};
use installbook_core::{VehicleOption, WidgetConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> WidgetConfig {
    WidgetConfig::from_json(
        &json!({
            "token": "test-token",
            "mode": "local",
            "product_sku": "DASH-622",
            "programId": 77,
            "store_url": base_url,
            "api_base_url": base_url,
            "request_timeout_secs": 5
        })
        .to_string(),
    )
    .expect("valid test config")
}

fn test_client(server: &MockServer) -> InstallerClient {
    InstallerClient::new(&test_config(&server.uri())).expect("client construction should not fail")
}

// ---------------------------------------------------------------------------
// lookup_locations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_locations_posts_zipcode_and_program_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({ "zipcode": "90210", "programId": "77" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "installers": [
                { "latitude": "34.07", "longitude": "-118.40", "memberId": 1004,
                  "name": "Beverly Auto", "distance": 1.24, "city": "Beverly Hills" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let locations = test_client(&server)
        .lookup_locations("90210")
        .await
        .expect("lookup should succeed");

    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].member_id, "1004");
    assert_eq!(locations[0].distance, "1.2 mi");
    assert_eq!(locations[0].city.as_deref(), Some("Beverly Hills"));
}

#[tokio::test]
async fn lookup_locations_rejects_malformed_zipcode_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    for zipcode in ["", "1234", "123456", "12a45", " 90210"] {
        let result = client.lookup_locations(zipcode).await;
        assert!(
            matches!(result, Err(ClientError::InvalidZipcode { .. })),
            "expected InvalidZipcode for {zipcode:?}, got: {result:?}"
        );
    }
}

#[tokio::test]
async fn lookup_locations_empty_list_is_ok() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "locations": [] })))
        .mount(&server)
        .await;

    let locations = test_client(&server).lookup_locations("00000").await.unwrap();
    assert!(locations.is_empty());
}

#[tokio::test]
async fn lookup_locations_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).lookup_locations("90210").await;
    assert!(
        matches!(result, Err(ClientError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn lookup_locations_non_json_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/installers/by-zipcode"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = test_client(&server).lookup_locations("90210").await;
    assert!(
        matches!(result, Err(ClientError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// vehicle cascade
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_years_accepts_bare_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicles/years"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([2023, 2024])))
        .mount(&server)
        .await;

    let years = test_client(&server).list_years().await.unwrap();
    assert_eq!(
        years,
        vec![VehicleOption::scalar("2023"), VehicleOption::scalar("2024")]
    );
}

#[tokio::test]
async fn list_makes_sends_year_and_unwraps_object() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicles/makes"))
        .and(query_param("year", "2023"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "makeID": "12", "make": "Toyota" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let makes = test_client(&server).list_makes("2023").await.unwrap();
    assert_eq!(makes, vec![VehicleOption::new("12", "Toyota")]);
}

#[tokio::test]
async fn list_makes_without_year_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.list_makes("").await.unwrap().is_empty());
    assert!(client.list_makes("   ").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_models_sends_make_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicles/models"))
        .and(query_param("year", "2023"))
        .and(query_param("makeID", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": ["Camry", "Corolla"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let models = test_client(&server)
        .list_models("2023", Some("12"))
        .await
        .unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].label, "Camry");
}

#[tokio::test]
async fn list_models_without_resolved_make_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server);
    assert!(client.list_models("2023", None).await.unwrap().is_empty());
    assert!(client.list_models("2023", Some("")).await.unwrap().is_empty());
    assert!(client.list_models("", Some("12")).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_types_sends_model() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicles/types"))
        .and(query_param("model", "Camry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["Sedan", "Hybrid"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let types = client.list_types("Camry").await.unwrap();
    assert_eq!(types.len(), 2);
    assert!(client.list_types("").await.unwrap().is_empty());
}

#[tokio::test]
async fn vehicle_lookup_unexpected_shape_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicles/years"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let years = test_client(&server).list_years().await.unwrap();
    assert!(years.is_empty());
}
