//! API integration tests
//!
//! These run against a live server with a fresh database:
//! cargo test -- --ignored

use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Next occurrence of a weekday, at least one day out
fn next_weekday(weekday: Weekday) -> NaiveDate {
    let mut date = Local::now().date_naive() + Duration::days(1);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

/// Helper to get an authenticated operations token
async fn get_ops_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "id": "ADMIN",
            "pin": "1234"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "id": "ADMIN",
            "pin": "1234"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["profile"]["role"], "ADMIN");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "id": "ADMIN",
            "pin": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_sunday_has_no_slots() {
    let client = Client::new();
    let sunday = next_weekday(Weekday::Sun);

    let response = client
        .get(format!("{}/slots?date={}", BASE_URL, sunday))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let slots: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(slots.as_array().expect("Expected array").len(), 0);
}

#[tokio::test]
#[ignore]
async fn test_weekday_slot_grid() {
    let client = Client::new();
    let tuesday = next_weekday(Weekday::Tue);

    let response = client
        .get(format!("{}/slots?date={}", BASE_URL, tuesday))
        .send()
        .await
        .expect("Failed to send request");

    let slots: Value = response.json().await.expect("Failed to parse response");
    let labels: Vec<&str> = slots
        .as_array()
        .expect("Expected array")
        .iter()
        .map(|s| s["time_label"].as_str().unwrap())
        .collect();

    assert_eq!(labels.len(), 8);
    assert!(!labels.contains(&"12:00 - 13:00"));
    assert!(labels.contains(&"11:00 - 12:00"));
}

#[tokio::test]
#[ignore]
async fn test_drivers_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/drivers", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

/// Full happy path: booking, arrival, verification, dock call, loading
/// and checkout, with an invalid transition rejected along the way.
#[tokio::test]
#[ignore]
async fn test_full_visit_lifecycle() {
    let client = Client::new();
    let token = get_ops_token(&client).await;
    let tuesday = next_weekday(Weekday::Tue);

    // Book a slot
    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "name": "Budi Santoso",
            "phone": "081234567890",
            "license_plate": "B 1234 XYZ",
            "company": "Acme Logistics",
            "purpose": "UNLOADING",
            "do_number": "DO-7781",
            "slot_date": tuesday.to_string(),
            "slot_time": "09:00 - 10:00"
        }))
        .send()
        .await
        .expect("Failed to create booking");
    assert_eq!(response.status(), 201);

    let booking: Value = response.json().await.expect("Failed to parse booking");
    let id = booking["id"].as_str().expect("No id").to_string();
    let code = booking["booking_code"].as_str().expect("No booking code");
    assert!(code.contains("-IN-"));
    assert_eq!(booking["status"], "BOOKED");

    // Booking is findable by its code
    let response = client
        .get(format!("{}/bookings/{}", BASE_URL, code))
        .send()
        .await
        .expect("Failed to find booking");
    assert!(response.status().is_success());

    // Calling before check-in is an invalid transition
    let response = client
        .post(format!("{}/drivers/{}/call", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "caller": "ADMIN", "gate": "GATE_2" }))
        .send()
        .await
        .expect("Failed to send call request");
    assert_eq!(response.status(), 422);

    // Driver arrives at the gate
    let response = client
        .post(format!("{}/drivers/{}/confirm-arrival", BASE_URL, id))
        .json(&json!({
            "position": { "latitude": -6.2280, "longitude": 106.5444 }
        }))
        .send()
        .await
        .expect("Failed to confirm arrival");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["driver"]["status"], "AT_GATE");
    assert_eq!(body["location_check"]["valid"], true);

    // Security verifies documents
    let response = client
        .post(format!("{}/drivers/{}/verify", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "verifier": "ADMIN", "photos": [] }))
        .send()
        .await
        .expect("Failed to verify");
    assert!(response.status().is_success());

    let driver: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(driver["status"], "CHECKED_IN");
    let queue_number = driver["queue_number"].as_str().expect("No queue number");
    assert!(queue_number.contains('-'));

    // Call to dock
    let response = client
        .post(format!("{}/drivers/{}/call", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "caller": "ADMIN", "gate": "GATE_2" }))
        .send()
        .await
        .expect("Failed to call");
    assert!(response.status().is_success());

    let driver: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(driver["status"], "CALLED");
    assert_eq!(driver["gate"], "GATE_2");

    // Start loading
    let response = client
        .post(format!("{}/drivers/{}/start-loading", BASE_URL, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to start loading");
    assert!(response.status().is_success());

    // Checkout
    let response = client
        .post(format!("{}/drivers/{}/complete", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "verifier": "ADMIN", "photos": [] }))
        .send()
        .await
        .expect("Failed to complete");
    assert!(response.status().is_success());

    let driver: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(driver["status"], "COMPLETED");
    assert!(driver["exit_time"].is_string());

    // Terminal state: completing again is rejected
    let response = client
        .post(format!("{}/drivers/{}/complete", BASE_URL, id))
        .bearer_auth(&token)
        .json(&json!({ "verifier": "ADMIN", "photos": [] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_walk_in_has_no_booking_code() {
    let client = Client::new();

    let response = client
        .post(format!("{}/arrivals", BASE_URL))
        .json(&json!({
            "name": "Siti Rahma",
            "phone": "081298765432",
            "license_plate": "D 88 QQ",
            "company": "Beta Transport",
            "purpose": "LOADING"
        }))
        .send()
        .await
        .expect("Failed to create arrival");
    assert_eq!(response.status(), 201);

    let driver: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(driver["status"], "AT_GATE");
    assert_eq!(driver["entry_type"], "WALK_IN");
    assert!(driver["booking_code"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_malformed_plate_is_rejected() {
    let client = Client::new();
    let tuesday = next_weekday(Weekday::Tue);

    let response = client
        .post(format!("{}/bookings", BASE_URL))
        .json(&json!({
            "name": "Budi Santoso",
            "phone": "081234567890",
            "license_plate": "b1234xyz",
            "company": "Acme Logistics",
            "purpose": "UNLOADING",
            "do_number": "DO-7781",
            "slot_date": tuesday.to_string(),
            "slot_time": "09:00 - 10:00"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_gate_config_roundtrip() {
    let client = Client::new();
    let token = get_ops_token(&client).await;

    let response = client
        .put(format!("{}/gates/GATE_9", BASE_URL))
        .bearer_auth(&token)
        .json(&json!({
            "name": "Overflow dock",
            "capacity": 1,
            "status": "ACTIVE",
            "gate_type": "MIXED"
        }))
        .send()
        .await
        .expect("Failed to save gate");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/gates/GATE_9", BASE_URL))
        .send()
        .await
        .expect("Failed to get gate");
    let gate: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(gate["name"], "Overflow dock");

    let response = client
        .delete(format!("{}/gates/GATE_9", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete gate");
    assert_eq!(response.status(), 204);
}
