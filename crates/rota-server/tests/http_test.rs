//! Integration tests for the HTTP boundary.
//!
//! These tests start a real HTTP server and make actual requests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::http::StatusCode;
use rota_server::{AppState, StaticTokenVerifier};
use rota_store::{Course, DocumentStore, Location, MemoryStore, Profile, School, UserRole};
use rota_timetable::{Slot, WeekCalendar};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// Seed a store: one location open hours 0-3, one course (limit 1, unit 2),
/// students ada and bob, an admin root.
fn create_test_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new(School {
        id: "s1".to_string(),
        name: "Test School".to_string(),
        hours_per_day: 4,
        start_minutes: 8 * 60,
        slot_minutes: 60,
        days: vec!["mon".into(), "tue".into()],
    });
    store.upsert_location(Location {
        id: "l1".to_string(),
        name: "Main".to_string(),
        classes: vec![],
        rules: WeekCalendar::from_days(vec![0b1111, 0b1111]),
    });
    store.upsert_course(Course {
        id: "c1".to_string(),
        location_id: "l1".to_string(),
        name: "Chess".to_string(),
        room: Some("B12".to_string()),
        rules: WeekCalendar::from_days(vec![0b1111, 0b1111]),
        limit: 1,
        unit: Some(2),
    });
    for (id, email) in [("ada", "ada@example.com"), ("bob", "bob@example.com")] {
        store.upsert_profile(Profile {
            id: id.to_string(),
            name: id.to_string(),
            email: email.to_string(),
            role: UserRole::Student,
            location_id: Some("l1".to_string()),
            rules: Some(WeekCalendar::from_days(vec![0b1111, 0b1111])),
        });
    }
    store.upsert_profile(Profile {
        id: "root".to_string(),
        name: "Root".to_string(),
        email: "root@example.com".to_string(),
        role: UserRole::Admin,
        location_id: Some("l1".to_string()),
        rules: None,
    });
    Arc::new(store)
}

/// Start test HTTP server on a random port.
async fn start_test_server() -> (SocketAddr, Arc<MemoryStore>) {
    // Install ring crypto provider for reqwest (idempotent)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let store = create_test_store();
    let verifier = StaticTokenVerifier::new(HashMap::from([
        ("tok-ada".to_string(), "ada@example.com".to_string()),
        ("tok-bob".to_string(), "bob@example.com".to_string()),
        ("tok-root".to_string(), "root@example.com".to_string()),
    ]));

    let state = Arc::new(AppState::with_parts(store.clone(), Arc::new(verifier)));
    let app = rota_server::http::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind HTTP listener");
    let addr = listener
        .local_addr()
        .expect("Failed to get listener address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("HTTP server failed to run");
    });

    // Give server time to start
    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    (addr, store)
}

#[tokio::test]
async fn test_subscribe_endpoint_success() {
    let (addr, store) = start_test_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({
            "token": "tok-ada",
            "day": 0,
            "hours": [0, 2],
            "courseId": "c1"
        }))
        .send()
        .await
        .expect("Failed to send subscribe request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["rules"], json!([0b1100, 0b1111]));

    // The reservation landed in the store
    let slot = Slot::new(0, &[0, 2]).unwrap();
    assert_eq!(store.count_course_slot("c1", &slot).await.unwrap(), 1);
}

#[tokio::test]
async fn test_subscribe_endpoint_rejects_bad_token() {
    let (addr, _store) = start_test_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({
            "token": "wrong",
            "day": 0,
            "hours": [0, 2],
            "courseId": "c1"
        }))
        .send()
        .await
        .expect("Failed to send subscribe request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_subscribe_endpoint_error_codes() {
    let (addr, _store) = start_test_server().await;
    let client = reqwest::Client::new();

    // Wrong arity: invalid range
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({"token": "tok-ada", "day": 0, "hours": [0], "courseId": "c1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INVALID_RANGE");

    // Range not among the offered runs
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({"token": "tok-ada", "day": 0, "hours": [1, 3], "courseId": "c1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "SLOT_NOT_OFFERED");

    // Unknown course
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({"token": "tok-ada", "day": 0, "hours": [0, 2], "courseId": "ghost"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], "COURSE_NOT_FOUND");
}

#[tokio::test]
async fn test_full_reservation_cycle_over_http() {
    let (addr, store) = start_test_server().await;
    let client = reqwest::Client::new();
    let slot = Slot::new(0, &[0, 2]).unwrap();

    // Ada takes the only seat
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({"token": "tok-ada", "day": 0, "hours": [0, 2], "courseId": "c1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Bob is turned away
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({"token": "tok-bob", "day": 0, "hours": [0, 2], "courseId": "c1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Admin releases ada's reservation
    let reservation_id = store.reservations_for_course_slot("c1", &slot).await.unwrap()[0]
        .id
        .clone();
    let response = client
        .post(format!("http://{addr}/api/unsubscribe"))
        .json(&json!({"token": "tok-root", "subscriptionId": reservation_id}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));

    // The seat is bookable again
    let response = client
        .post(format!("http://{addr}/api/subscribe"))
        .json(&json!({"token": "tok-bob", "day": 0, "hours": [0, 2], "courseId": "c1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unsubscribe_endpoint_requires_admin() {
    let (addr, _store) = start_test_server().await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/api/unsubscribe"))
        .json(&json!({"token": "tok-ada", "subscriptionId": "whatever"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_courses_endpoint() {
    let (addr, _store) = start_test_server().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/courses?location=l1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body[0]["id"], "c1");
    assert_eq!(body[0]["name"], "Chess");
    assert_eq!(body[0]["room"], "B12");
    assert_eq!(body[0]["limit"], 1);
    assert_eq!(body[0]["unit"], 2);
    assert_eq!(body[0]["available"], json!(true));

    // Unknown location simply lists nothing
    let response = client
        .get(format!("http://{addr}/api/courses?location=l9"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_course_slots_endpoint() {
    let (addr, _store) = start_test_server().await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/api/courses/c1/slots?day=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!([
            {"hours": [0, 2], "key": "0:0,2", "time": "08:00 - 10:00", "open": true},
            {"hours": [2, 4], "key": "0:2,4", "time": "10:00 - 12:00", "open": true}
        ])
    );

    let response = client
        .get(format!("http://{addr}/api/courses/ghost/slots?day=0"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
