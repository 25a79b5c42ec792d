use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use shared_database::StoreError;
use shared_models::appointment::{slot_time, AppointmentStatus};

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_name: String,
    pub patient_last_name: String,
    pub phone: String,
    pub email: String,
    pub insurance_provider: String,
    pub date: NaiveDate,
    #[serde(with = "slot_time")]
    pub time: NaiveTime,
    pub notes: Option<String>,
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d\s\-\+\(\)]+$").expect("valid phone pattern"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email pattern"))
}

impl BookAppointmentRequest {
    /// Field-format checks, applied before any scheduling rule.
    pub fn validate(&self) -> Result<(), SchedulingError> {
        let name = self.patient_name.trim();
        if name.is_empty() || name.len() > 50 {
            return Err(SchedulingError::Validation(
                "patient_name must be 1-50 characters".to_string(),
            ));
        }
        let last_name = self.patient_last_name.trim();
        if last_name.is_empty() || last_name.len() > 50 {
            return Err(SchedulingError::Validation(
                "patient_last_name must be 1-50 characters".to_string(),
            ));
        }
        if self.phone.trim().is_empty() || !phone_regex().is_match(&self.phone) {
            return Err(SchedulingError::Validation(
                "phone has an invalid format".to_string(),
            ));
        }
        if !email_regex().is_match(&self.email) {
            return Err(SchedulingError::Validation(
                "email has an invalid format".to_string(),
            ));
        }
        if self.insurance_provider.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "insurance_provider is required".to_string(),
            ));
        }
        if let Some(notes) = &self.notes {
            if notes.len() > 500 {
                return Err(SchedulingError::Validation(
                    "notes cannot exceed 500 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
}

/// One business day inside the booking horizon and its open slots. Fully
/// booked days are still listed so callers can tell "full" from "not
/// offered".
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_times")]
    pub available_times: Vec<NaiveTime>,
    pub has_available_slots: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateAvailability {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_times")]
    pub available_times: Vec<NaiveTime>,
}

fn serialize_times<S>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;
    let mut seq = serializer.serialize_seq(Some(times.len()))?;
    for time in times {
        seq.serialize_element(&time.format(slot_time::FORMAT).to_string())?;
    }
    seq.end()
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AppointmentStats {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub cancelled: u64,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchedulingError {
    #[error("insurance provider '{0}' is not available")]
    UnknownProvider(String),

    #[error("{date} {time} is not a bookable slot")]
    InvalidSlot { date: NaiveDate, time: NaiveTime },

    #[error("the slot {date} {time} is already taken")]
    SlotTaken { date: NaiveDate, time: NaiveTime },

    #[error("cannot query past dates")]
    PastDate,

    #[error("no appointments are available on weekends")]
    Weekend,

    #[error("appointment not found")]
    NotFound,

    #[error("illegal status transition: {from} -> {to}")]
    IllegalTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage failure: {0}")]
    Store(StoreError),
}
