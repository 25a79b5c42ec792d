use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::{EmailNotifier, Notifier};
use shared_config::AppConfig;
use shared_models::appointment::{Appointment, AppointmentStatus};

fn test_config(base_url: String) -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".into(),
        clinic_name: "Test Clinic".into(),
        resend_api_key: "re_test_key".into(),
        resend_base_url: base_url,
        notify_from_email: "clinic@example.com".into(),
        insurance_seed: vec![],
    }
}

fn test_appointment() -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_name: "Ana".into(),
        patient_last_name: "Gomez".into(),
        phone: "+54 11 5555-0000".into(),
        email: "ana@example.com".into(),
        insurance_provider: "OSDE".into(),
        date: NaiveDate::from_ymd_opt(2025, 10, 16).unwrap(),
        time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        status: AppointmentStatus::Pending,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn created_email_posts_to_mail_api_with_bearer_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("authorization", "Bearer re_test_key"))
        .and(body_partial_json(serde_json::json!({
            "to": ["ana@example.com"],
            "subject": "Booking request received",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "email_1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = EmailNotifier::new(&test_config(mock_server.uri()));
    notifier.notify_created(&test_appointment()).await;
}

#[tokio::test]
async fn mail_api_failure_is_swallowed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = EmailNotifier::new(&test_config(mock_server.uri()));
    // Must return normally; failures are logged, never surfaced.
    notifier.notify_cancelled(&test_appointment()).await;
}

#[tokio::test]
async fn confirmed_email_uses_confirmation_subject() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_partial_json(serde_json::json!({
            "subject": "Appointment confirmed",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "email_2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let notifier = EmailNotifier::new(&test_config(mock_server.uri()));
    notifier.notify_confirmed(&test_appointment()).await;
}
