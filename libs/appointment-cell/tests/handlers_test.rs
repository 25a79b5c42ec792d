mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use appointment_cell::router::appointment_routes;

use common::{harness, TestHarness};

async fn app(h: &TestHarness) -> Router {
    appointment_routes(h.scheduler.clone())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn booking_body(date: &str, time: &str) -> Value {
    json!({
        "patient_name": "Ana",
        "patient_last_name": "Gomez",
        "phone": "+54 11 5555-0000",
        "email": "ana@example.com",
        "insurance_provider": "OSDE",
        "date": date,
        "time": time,
    })
}

fn post_booking(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn booking_endpoint_returns_created_with_envelope() {
    let h = harness().await;
    let response = app(&h)
        .await
        .oneshot(post_booking(&booking_body("2025-10-16", "09:00")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["appointment"]["status"], json!("pending"));
    assert_eq!(body["appointment"]["time"], json!("09:00"));
}

#[tokio::test]
async fn booking_with_invalid_email_is_a_validation_error() {
    let h = harness().await;
    let mut body = booking_body("2025-10-16", "09:00");
    body["email"] = json!("not-an-email");

    let response = app(&h).await.oneshot(post_booking(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn double_booking_maps_to_conflict() {
    let h = harness().await;
    let app = app(&h).await;

    let first = app
        .clone()
        .oneshot(post_booking(&booking_body("2025-10-16", "10:00")))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_booking(&booking_body("2025-10-16", "10:00")))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn weekend_slot_is_a_bad_request() {
    let h = harness().await;
    let response = app(&h)
        .await
        .oneshot(post_booking(&booking_body("2025-10-18", "09:00")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_update_round_trip() {
    let h = harness().await;
    let app = app(&h).await;

    let created = app
        .clone()
        .oneshot(post_booking(&booking_body("2025-10-16", "11:00")))
        .await
        .unwrap();
    let created_body = body_json(created).await;
    let id = created_body["appointment"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{id}/status"))
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "status": "confirmed" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("confirmed"));

    let fetched = app
        .oneshot(
            Request::builder()
                .uri(format!("/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let fetched_body = body_json(fetched).await;
    assert_eq!(fetched_body["data"]["status"], json!("confirmed"));
}

#[tokio::test]
async fn illegal_transition_is_a_bad_request() {
    let h = harness().await;
    let app = app(&h).await;

    let created = app
        .clone()
        .oneshot(post_booking(&booking_body("2025-10-16", "14:00")))
        .await
        .unwrap();
    let id = body_json(created).await["appointment"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    for status in ["cancelled", "confirmed"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/{id}/status"))
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "status": status }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        if status == "cancelled" {
            assert_eq!(response.status(), StatusCode::OK);
        } else {
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }
}

#[tokio::test]
async fn missing_appointment_is_not_found() {
    let h = harness().await;
    let response = app(&h)
        .await
        .oneshot(
            Request::builder()
                .uri(format!("/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn available_times_endpoint_rejects_weekends() {
    let h = harness().await;
    let response = app(&h)
        .await
        .oneshot(
            Request::builder()
                .uri("/available/times?date=2025-10-18")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn available_times_endpoint_returns_hh_mm_labels() {
    let h = harness().await;
    let response = app(&h)
        .await
        .oneshot(
            Request::builder()
                .uri("/available/times?date=2025-10-16")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let times = body["data"]["available_times"].as_array().unwrap();
    assert_eq!(times.len(), 13);
    assert_eq!(times[0], json!("09:00"));
    assert_eq!(times[12], json!("17:00"));
}

#[tokio::test]
async fn available_dates_endpoint_lists_the_horizon() {
    let h = harness().await;
    let response = app(&h)
        .await
        .oneshot(
            Request::builder()
                .uri("/available/dates")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 10);
    assert_eq!(days[0]["date"], json!("2025-10-16"));
    assert_eq!(days[0]["has_available_slots"], json!(true));
}

#[tokio::test]
async fn stats_endpoint_reports_counts() {
    let h = harness().await;
    let app = app(&h).await;

    app.clone()
        .oneshot(post_booking(&booking_body("2025-10-16", "09:00")))
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], json!(1));
    assert_eq!(body["data"]["pending"], json!(1));
}

#[tokio::test]
async fn list_endpoint_carries_pagination_metadata() {
    let h = harness().await;
    let app = app(&h).await;

    for time in ["09:00", "09:30", "10:00"] {
        app.clone()
            .oneshot(post_booking(&booking_body("2025-10-16", time)))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(
            Request::builder()
                .uri("/?page=1&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total_items"], json!(3));
    assert_eq!(body["pagination"]["total_pages"], json!(2));
}
