use debris_dashboard::clients::{RequestOptions, RiskApiClient};
use debris_dashboard::config::AppConfig;
use debris_dashboard::domain::{example_objects, AnalysisRequest, HealthStatus};
use debris_dashboard::errors::ApiError;
use debris_dashboard::requests::endpoints::{EventsLoader, HealthCheck, SimulationRunner};
use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Arc<RiskApiClient> {
    let config = AppConfig::for_api(server.uri());
    Arc::new(RiskApiClient::new(&config).unwrap())
}

fn heatmap_body() -> serde_json::Value {
    json!({
        "event_count": 19,
        "heatmap": {
            "H": [[1, 2, 3], [2, 5, 2]],
            "alt_edges": [400, 600, 800],
            "inc_edges": [0, 30, 60, 90]
        },
        "analysis_id": "demo"
    })
}

#[tokio::test]
async fn test_health_check_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "timestamp": "2024-05-01T12:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let health = HealthCheck::new(client_for(&server));
    let status = health.check_health().await;

    assert_eq!(
        status,
        Some(HealthStatus {
            status: "healthy".to_string(),
            timestamp: Some("2024-05-01T12:00:00Z".to_string()),
            service: None,
        })
    );
    let state = health.handle().snapshot();
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn test_failed_health_check_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let health = HealthCheck::new(client_for(&server));
    assert!(health.check_health().await.is_none());

    let state = health.handle().snapshot();
    assert!(state.data.is_none());
    assert!(!state.loading);
    let error = state.error.expect("error recorded");
    assert_eq!(error.status, Some(503));
    assert_eq!(error.message, "API Error: 503 Service Unavailable");
}

#[tokio::test]
async fn test_detail_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/simulate"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "detail": "objects must not be empty" })),
        )
        .mount(&server)
        .await;

    let runner = SimulationRunner::new(client_for(&server));
    assert!(runner.run_simulation(None).await.is_none());

    let error = runner.handle().snapshot().error.expect("error recorded");
    assert_eq!(error.message, "objects must not be empty");
    assert_eq!(error.status, Some(422));
}

#[tokio::test]
async fn test_demo_simulation_sends_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(heatmap_body()))
        .expect(1)
        .mount(&server)
        .await;

    let runner = SimulationRunner::new(client_for(&server));
    let result = runner.run_simulation(None).await.expect("simulation result");
    assert_eq!(result.event_count, 19);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_custom_simulation_sends_request_body() {
    let server = MockServer::start().await;
    let request = AnalysisRequest {
        name: "LEO sweep".to_string(),
        objects: example_objects(),
        time_span_days: Some(30),
        simulation_steps: Some(1000),
    };
    Mock::given(method("POST"))
        .and(path("/simulate"))
        .and(header("content-type", "application/json"))
        .and(body_json(&request))
        .respond_with(ResponseTemplate::new(200).set_body_json(heatmap_body()))
        .expect(1)
        .mount(&server)
        .await;

    let runner = SimulationRunner::new(client_for(&server));
    assert!(runner.run_simulation(Some(request)).await.is_some());
}

#[tokio::test]
async fn test_malformed_heatmap_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/simulate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "event_count": 3,
            "heatmap": { "H": [[1, 2]], "alt_edges": [400, 600, 800], "inc_edges": [0, 90, 180] }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .simulate(None, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_events_default_earth_radius() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [
                { "x": 1200.0, "y": -3400.0, "z": 5200.0, "time_s": 3600.0, "vrel_km_s": 10.2 }
            ]
        })))
        .mount(&server)
        .await;

    let loader = EventsLoader::new(client_for(&server));
    let data = loader.load_events().await.expect("events");
    assert_eq!(data.events.len(), 1);
    assert_eq!(data.earth_radius_km, 6378.137);
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("content-type", "application/vnd.debris+json"))
        .and(header("x-request-id", "abc-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let options = RequestOptions::get()
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/vnd.debris+json"),
        )
        .header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("abc-123"),
        );
    let status: HealthStatus = client
        .execute("/health", options, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(status.status, "ok");
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let config = AppConfig::for_api("http://127.0.0.1:9");
    let client = RiskApiClient::new(&config).unwrap();
    let err = client.health(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_cancelled_request_resolves_promptly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "events": [], "earth_radius_km": 6378.137 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = client.events(&token).await.unwrap_err();
    assert!(matches!(err, ApiError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_invalid_analysis_id_never_hits_the_network() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let err = client
        .analysis_info("../admin", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
