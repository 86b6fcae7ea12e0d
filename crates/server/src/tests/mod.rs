// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP tests for the server router.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode as HttpStatusCode},
};
use fleetrent_domain::UserType;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        session_ttl: Duration::days(30),
    }
}

/// Sends one request and returns the status with the parsed JSON body.
///
/// Empty bodies parse as `Value::Null`.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (HttpStatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, value)
}

/// Registers an account over HTTP and returns a session token for it.
async fn sign_up(app: &Router, email: &str, user_type: UserType) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/v1/user/register",
        None,
        Some(json!({
            "email": email,
            "password": "correct-horse",
            "user_type": user_type.as_str(),
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/user/login",
        None,
        Some(json!({ "email": email, "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    body["session_token"].as_str().unwrap().to_string()
}

/// A router with a vendor, a customer, one location, and one vehicle.
struct Fleet {
    app: Router,
    vendor: String,
    customer: String,
    location_id: i64,
    vehicle_id: i64,
}

async fn setup_fleet() -> Fleet {
    let app: Router = build_router(create_test_app_state());
    let vendor: String = sign_up(&app, "vendor@fleet.test", UserType::Vendor).await;
    let customer: String = sign_up(&app, "customer@fleet.test", UserType::Customer).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/location",
        Some(&vendor),
        Some(json!({ "address": "1 Depot Road" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let location_id: i64 = body["location_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/location/{location_id}/vehicles"),
        Some(&vendor),
        Some(json!({
            "make": "Toyota",
            "model": "Corolla",
            "year": 2022,
            "doors": 4,
            "axles": 2,
            "body_type": "Sedan",
            "rent_cost_per_day": "49.99",
            "color": "Blue",
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let vehicle_id: i64 = body["vehicle"]["vehicle_id"].as_i64().unwrap();

    Fleet {
        app,
        vendor,
        customer,
        location_id,
        vehicle_id,
    }
}

#[tokio::test]
async fn test_register_login_and_whoami() {
    let app: Router = build_router(create_test_app_state());
    let token: String = sign_up(&app, "Alice@Example.com", UserType::Customer).await;

    let (status, body) = send(&app, "GET", "/api/v1/user/me", Some(&token), None).await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["user_type"], "Customer");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let app: Router = build_router(create_test_app_state());
    sign_up(&app, "a@b.test", UserType::Customer).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/user/register",
        None,
        Some(json!({ "email": "a@b.test", "password": "another-pass", "user_type": "customer" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::CONFLICT);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_bad_login_is_unauthorized() {
    let app: Router = build_router(create_test_app_state());
    sign_up(&app, "a@b.test", UserType::Customer).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/user/login",
        None,
        Some(json!({ "email": "a@b.test", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_or_bogus_token_is_unauthorized() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(&app, "GET", "/api/v1/user/me", None, None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);

    let (status, _) = send(&app, "GET", "/api/v1/user/me", Some("session_bogus"), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app: Router = build_router(create_test_app_state());
    let token: String = sign_up(&app, "a@b.test", UserType::Customer).await;

    let (status, _) = send(&app, "POST", "/api/v1/user/logout", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/v1/user/me", Some(&token), None).await;
    assert_eq!(status, HttpStatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/user/register")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: ErrorResponse = serde_json::from_slice(&body_bytes).unwrap();
    assert!(body.error);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(&app, "GET", "/api/v1/vehicle/abc", None, None).await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
}

#[tokio::test]
async fn test_customer_cannot_create_location() {
    let fleet: Fleet = setup_fleet().await;

    let (status, _) = send(
        &fleet.app,
        "POST",
        "/api/v1/location",
        Some(&fleet.customer),
        Some(json!({ "address": "2 Depot Road" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_vehicle_needs_no_session() {
    let fleet: Fleet = setup_fleet().await;

    let (status, body) = send(
        &fleet.app,
        "GET",
        &format!("/api/v1/vehicle/{}", fleet.vehicle_id),
        None,
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["make"], "Toyota");
    assert_eq!(body["status"], "Available");
    assert_eq!(body["rent_cost_per_day"], "49.99");

    let (status, _) = send(&fleet.app, "GET", "/api/v1/vehicle/9999", None, None).await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_available_only_filter() {
    let fleet: Fleet = setup_fleet().await;
    let uri: String = format!(
        "/api/v1/vehicle/{}/maintenance/start",
        fleet.vehicle_id
    );
    let (status, _) = send(&fleet.app, "POST", &uri, Some(&fleet.vendor), None).await;
    assert_eq!(status, HttpStatusCode::OK);

    let (_, all) = send(
        &fleet.app,
        "GET",
        &format!("/api/v1/location/{}/vehicles", fleet.location_id),
        Some(&fleet.customer),
        None,
    )
    .await;
    let (_, available) = send(
        &fleet.app,
        "GET",
        &format!(
            "/api/v1/location/{}/vehicles?available_only=true",
            fleet.location_id
        ),
        Some(&fleet.customer),
        None,
    )
    .await;

    assert_eq!(all["vehicles"].as_array().unwrap().len(), 1);
    assert!(available["vehicles"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rent_then_double_rent_conflicts() {
    let fleet: Fleet = setup_fleet().await;
    let uri: String = format!("/api/v1/vehicle/{}/rent", fleet.vehicle_id);

    let (status, body) = send(
        &fleet.app,
        "POST",
        &uri,
        Some(&fleet.customer),
        Some(json!({ "length_in_days": 3 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["base_cost"], "149.97");

    let (status, _) = send(
        &fleet.app,
        "POST",
        &uri,
        Some(&fleet.vendor),
        Some(json!({ "length_in_days": 1 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::CONFLICT);
}

#[tokio::test]
async fn test_rent_with_invalid_length_is_bad_request() {
    let fleet: Fleet = setup_fleet().await;

    let (status, _) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/vehicle/{}/rent", fleet.vehicle_id),
        Some(&fleet.customer),
        Some(json!({ "length_in_days": 0 })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rent_and_return_cycle() {
    let fleet: Fleet = setup_fleet().await;
    send(
        &fleet.app,
        "POST",
        &format!("/api/v1/vehicle/{}/rent", fleet.vehicle_id),
        Some(&fleet.customer),
        Some(json!({ "length_in_days": 2 })),
    )
    .await;

    let (status, body) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/vehicle/{}/return", fleet.vehicle_id),
        Some(&fleet.customer),
        Some(json!({ "location_id": fleet.location_id })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["late"], false);
    assert_eq!(body["late_fee"], "0.00");
    assert_eq!(body["total_cost"], "99.98");

    let (_, rentals) = send(
        &fleet.app,
        "GET",
        "/api/v1/user/rentals",
        Some(&fleet.customer),
        None,
    )
    .await;
    assert_eq!(rentals["rentals"].as_array().unwrap().len(), 1);

    let (_, history) = send(
        &fleet.app,
        "GET",
        &format!("/api/v1/vehicle/{}/history", fleet.vehicle_id),
        Some(&fleet.vendor),
        None,
    )
    .await;
    let actions: Vec<&str> = history["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["CreateVehicle", "RentVehicle", "ReturnVehicle"]);
}

#[tokio::test]
async fn test_relocate_status_codes() {
    let fleet: Fleet = setup_fleet().await;
    let uri: String = format!("/api/v1/vehicle/{}/relocate", fleet.vehicle_id);

    let (status, body) = send(
        &fleet.app,
        "POST",
        &uri,
        Some(&fleet.vendor),
        Some(json!({ "location_id": fleet.location_id })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::NOT_MODIFIED);
    assert_eq!(body, Value::Null);

    let (status, _) = send(
        &fleet.app,
        "POST",
        &uri,
        Some(&fleet.customer),
        Some(json!({ "location_id": fleet.location_id })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::FORBIDDEN);

    let (status, _) = send(
        &fleet.app,
        "POST",
        &uri,
        Some(&fleet.vendor),
        Some(json!({ "location_id": 9999 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_history_requires_vendor() {
    let fleet: Fleet = setup_fleet().await;

    let (status, _) = send(
        &fleet.app,
        "GET",
        &format!("/api/v1/vehicle/{}/history", fleet.vehicle_id),
        Some(&fleet.customer),
        None,
    )
    .await;

    assert_eq!(status, HttpStatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_camel_case_field_names_are_accepted() {
    let fleet: Fleet = setup_fleet().await;

    let (status, body) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/location/{}/vehicles", fleet.location_id),
        Some(&fleet.vendor),
        Some(json!({
            "make": "Ford",
            "model": "Transit",
            "year": 2021,
            "doors": 3,
            "axles": 2,
            "bodyType": "Van",
            "rentCostPerDay": 49,
            "color": "White",
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["vehicle"]["body_type"], "Van");
    assert_eq!(body["vehicle"]["rent_cost_per_day"], "49.00");

    let (status, body) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/vehicle/{}/rent", fleet.vehicle_id),
        Some(&fleet.customer),
        Some(json!({ "lengthInDays": 2 })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["length_days"], 2);

    let (status, body) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/vehicle/{}/return", fleet.vehicle_id),
        Some(&fleet.customer),
        Some(json!({ "location": fleet.location_id })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["location_id"], fleet.location_id);
}

#[tokio::test]
async fn test_relocate_accepts_location_field() {
    let fleet: Fleet = setup_fleet().await;

    let (status, body) = send(
        &fleet.app,
        "POST",
        "/api/v1/location",
        Some(&fleet.vendor),
        Some(json!({ "address": "9 Harbour Lane" })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    let target: i64 = body["location_id"].as_i64().unwrap();

    let (status, body) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/vehicle/{}/relocate", fleet.vehicle_id),
        Some(&fleet.vendor),
        Some(json!({ "location": target })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["location_id"], target);
    assert_eq!(body["from_location_id"], fleet.location_id);
}

#[tokio::test]
async fn test_fractional_numeric_rate_is_accepted() {
    let fleet: Fleet = setup_fleet().await;

    let (status, body) = send(
        &fleet.app,
        "POST",
        &format!("/api/v1/location/{}/vehicles", fleet.location_id),
        Some(&fleet.vendor),
        Some(json!({
            "make": "Honda",
            "model": "Civic",
            "year": 2020,
            "doors": 4,
            "axles": 2,
            "body_type": "Sedan",
            "rent_cost_per_day": 35.5,
            "color": "Red",
        })),
    )
    .await;
    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["vehicle"]["rent_cost_per_day"], "35.50");
}

#[tokio::test]
async fn test_register_without_user_type_creates_customer() {
    let app: Router = build_router(create_test_app_state());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/user/register",
        None,
        Some(json!({ "email": "plain@fleet.test", "password": "correct-horse" })),
    )
    .await;

    assert_eq!(status, HttpStatusCode::OK);
    assert_eq!(body["user_type"], "Customer");
}

#[test]
fn test_session_ttl_days_is_bounded() {
    let args: Args = Args::try_parse_from(["fleetrent-server"]).unwrap();
    assert_eq!(args.session_ttl_days, 30);

    let args: Args =
        Args::try_parse_from(["fleetrent-server", "--session-ttl-days", "365"]).unwrap();
    assert_eq!(args.session_ttl_days, MAX_SESSION_TTL_DAYS);

    for rejected in ["0", "366", "106751991167300"] {
        assert!(
            Args::try_parse_from(["fleetrent-server", "--session-ttl-days", rejected]).is_err(),
            "{rejected} should be rejected"
        );
    }
}
