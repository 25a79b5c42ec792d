use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::json;
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_models::appointment::Appointment;

use crate::notifier::Notifier;

/// Sends patient emails through a Resend-compatible HTTP API.
/// Delivery errors are logged and swallowed; state transitions must never
/// depend on the mail provider being up.
pub struct EmailNotifier {
    client: Client,
    base_url: String,
    api_key: String,
    from: String,
    clinic_name: String,
}

impl EmailNotifier {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.resend_base_url.clone(),
            api_key: config.resend_api_key.clone(),
            from: config.notify_from_email.clone(),
            clinic_name: config.clinic_name.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    async fn send(&self, appointment: &Appointment, subject: &str, lead: &str) -> Result<()> {
        let url = format!("{}/emails", self.base_url);
        debug!("Sending notification email to {}", appointment.email);

        let body = format!(
            "{lead}\n\nPatient: {}\nDate: {}\nTime: {}\nInsurance: {}\n\n{}",
            appointment.patient_full_name(),
            appointment.date,
            appointment.time.format("%H:%M"),
            appointment.insurance_provider,
            self.clinic_name,
        );

        let payload = json!({
            "from": format!("{} <{}>", self.clinic_name, self.from),
            "to": [appointment.email],
            "subject": subject,
            "text": body,
        });

        let response = self
            .client
            .post(&url)
            .headers(self.headers())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("mail API error ({}): {}", status, error_text));
        }
        Ok(())
    }

    async fn send_logged(&self, appointment: &Appointment, subject: &str, lead: &str) {
        if let Err(err) = self.send(appointment, subject, lead).await {
            warn!(
                "Failed to send '{}' email for appointment {}: {}",
                subject, appointment.id, err
            );
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify_created(&self, appointment: &Appointment) {
        self.send_logged(
            appointment,
            "Booking request received",
            "We received your appointment request. It is pending confirmation.",
        )
        .await;
    }

    async fn notify_confirmed(&self, appointment: &Appointment) {
        self.send_logged(
            appointment,
            "Appointment confirmed",
            "Your appointment has been confirmed. We look forward to seeing you.",
        )
        .await;
    }

    async fn notify_cancelled(&self, appointment: &Appointment) {
        self.send_logged(
            appointment,
            "Appointment cancelled",
            "Your appointment has been cancelled. Please book a new slot if needed.",
        )
        .await;
    }
}
