use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use appointment_cell::models::BookAppointmentRequest;
use appointment_cell::services::scheduler::AppointmentScheduler;
use notification_cell::Notifier;
use shared_database::MemoryStore;
use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_utils::clock::FixedClock;

/// Wednesday; the horizon runs 2025-10-16 through 2025-10-29.
pub const TODAY: (i32, u32, u32) = (2025, 10, 15);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Created(Uuid),
    Confirmed(Uuid),
    Cancelled(Uuid),
}

/// Records every notification so tests can assert on exactly what fired.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().unwrap().clone()
    }

    pub fn cancelled_ids(&self) -> Vec<Uuid> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Notification::Cancelled(id) => Some(id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_created(&self, appointment: &Appointment) {
        self.events
            .lock()
            .unwrap()
            .push(Notification::Created(appointment.id));
    }

    async fn notify_confirmed(&self, appointment: &Appointment) {
        self.events
            .lock()
            .unwrap()
            .push(Notification::Confirmed(appointment.id));
    }

    async fn notify_cancelled(&self, appointment: &Appointment) {
        self.events
            .lock()
            .unwrap()
            .push(Notification::Cancelled(appointment.id));
    }
}

pub struct TestHarness {
    pub scheduler: Arc<AppointmentScheduler>,
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub async fn harness() -> TestHarness {
    harness_at(date(TODAY.0, TODAY.1, TODAY.2)).await
}

pub async fn harness_at(today: NaiveDate) -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    store
        .seed_providers(&[("OSDE".to_string(), "OSDE".to_string())])
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let scheduler = Arc::new(AppointmentScheduler::new(
        store.clone(),
        store.clone(),
        notifier.clone(),
        Arc::new(FixedClock::at_date(today)),
    ));

    TestHarness {
        scheduler,
        store,
        notifier,
    }
}

pub fn book_request(d: NaiveDate, t: NaiveTime) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_name: "Ana".into(),
        patient_last_name: "Gomez".into(),
        phone: "+54 11 5555-0000".into(),
        email: "ana@example.com".into(),
        insurance_provider: "OSDE".into(),
        date: d,
        time: t,
        notes: None,
    }
}

/// A raw pending record, inserted through the legacy import path so tests
/// can stage contested slots the way pre-constraint data could.
pub fn pending_record(d: NaiveDate, t: NaiveTime) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_name: "Juan".into(),
        patient_last_name: "Perez".into(),
        phone: "+54 11 4444-1234".into(),
        email: "juan@example.com".into(),
        insurance_provider: "OSDE".into(),
        date: d,
        time: t,
        status: AppointmentStatus::Pending,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
