use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use notification_cell::Notifier;
use shared_database::{AppointmentStore, InsuranceStore, StoreError};
use shared_models::appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, Pagination, PaginationMeta,
};
use shared_utils::clock::Clock;

use crate::models::{
    AppointmentStats, BookAppointmentRequest, DayAvailability, SchedulingError,
};
use crate::services::calendar::SlotCalendar;
use crate::services::lifecycle;

/// Sole writer of appointment records. Validates slots against the
/// calendar, delegates the double-booking and confirmation races to the
/// store's conditional writes, and runs the cascade-cancellation protocol
/// when a confirmation wins a contested slot.
pub struct AppointmentScheduler {
    store: Arc<dyn AppointmentStore>,
    providers: Arc<dyn InsuranceStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    calendar: SlotCalendar,
}

impl AppointmentScheduler {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        providers: Arc<dyn InsuranceStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            providers,
            notifier,
            clock,
            calendar: SlotCalendar::default(),
        }
    }

    pub fn with_calendar(mut self, calendar: SlotCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn calendar(&self) -> &SlotCalendar {
        &self.calendar
    }

    /// Book a new appointment into a free slot. The record is created as
    /// `pending`; the conflict check and the insert are one atomic unit at
    /// the store, so two racing requests for the same slot cannot both
    /// succeed.
    pub async fn book(
        &self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        info!(
            "Booking request for {} {} at {} {}",
            request.patient_name, request.patient_last_name, request.date, request.time
        );

        request.validate()?;

        // The insurance provider must exist by name.
        let provider = self
            .providers
            .find_by_name(&request.insurance_provider)
            .await
            .map_err(infra)?;
        if provider.is_none() {
            return Err(SchedulingError::UnknownProvider(
                request.insurance_provider.clone(),
            ));
        }

        // Slot legality: business day, inside the horizon, on the template.
        let today = self.clock.today();
        if !self.calendar.is_bookable_date(request.date, today)
            || !self.calendar.contains_slot(request.time)
        {
            return Err(SchedulingError::InvalidSlot {
                date: request.date,
                time: request.time,
            });
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_name: request.patient_name,
            patient_last_name: request.patient_last_name,
            phone: request.phone,
            email: request.email,
            insurance_provider: request.insurance_provider,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.insert(appointment).await.map_err(|e| match e {
            StoreError::SlotTaken { date, time } => {
                warn!("Slot {} {} lost to a competing booking", date, time);
                SchedulingError::SlotTaken { date, time }
            }
            other => infra(other),
        })?;

        // Best-effort; the notifier swallows delivery failures.
        self.notifier.notify_created(&created).await;

        info!("Appointment {} booked for {} {}", created.id, created.date, created.time);
        Ok(created)
    }

    /// Transition an appointment's status. Same-state requests succeed as a
    /// no-op with no cascade and no notification. A winning
    /// `pending -> confirmed` cascades cancellation to every other active
    /// record on the same slot.
    pub async fn set_status(
        &self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError> {
        let current = self
            .store
            .find(id)
            .await
            .map_err(infra)?
            .ok_or(SchedulingError::NotFound)?;

        if current.status == new_status {
            debug!("Appointment {} already {}, no-op", id, new_status);
            return Ok(current);
        }

        lifecycle::validate_transition(current.status, new_status)?;

        match new_status {
            AppointmentStatus::Confirmed => self.confirm(current).await,
            AppointmentStatus::Cancelled => self.cancel(current).await,
            // validate_transition admits no path back to pending.
            AppointmentStatus::Pending => Err(SchedulingError::IllegalTransition {
                from: current.status,
                to: new_status,
            }),
        }
    }

    /// Commit the target's confirmation first (compare-and-set on
    /// `pending`), then sweep competitors. The first committed confirmation
    /// is authoritative: a raced second confirm observes the cascaded
    /// `cancelled` state and fails.
    async fn confirm(&self, current: Appointment) -> Result<Appointment, SchedulingError> {
        let confirmed = self
            .store
            .transition(current.id, &[AppointmentStatus::Pending], AppointmentStatus::Confirmed)
            .await
            .map_err(|e| transition_err(e, AppointmentStatus::Confirmed))?;

        info!(
            "Appointment {} confirmed for {} {}",
            confirmed.id, confirmed.date, confirmed.time
        );

        // Cascade: every other active hold on this exact slot loses.
        let competitors = self
            .store
            .find_same_slot(confirmed.date, confirmed.time, confirmed.id)
            .await
            .map_err(infra)?;

        for competitor in competitors {
            match self
                .store
                .transition(competitor.id, &AppointmentStatus::ACTIVE, AppointmentStatus::Cancelled)
                .await
            {
                Ok(cancelled) => {
                    info!(
                        "Appointment {} cancelled by cascade from {}",
                        cancelled.id, confirmed.id
                    );
                    self.notifier.notify_cancelled(&cancelled).await;
                }
                // A concurrent actor already moved this record; the sweep
                // only needs active competitors gone.
                Err(StoreError::StatusConflict { current }) => {
                    debug!(
                        "Cascade skipped appointment {}, already {}",
                        competitor.id, current
                    );
                }
                Err(StoreError::NotFound) => {
                    debug!("Cascade skipped appointment {}, deleted concurrently", competitor.id);
                }
                Err(other) => return Err(infra(other)),
            }
        }

        self.notifier.notify_confirmed(&confirmed).await;
        Ok(confirmed)
    }

    async fn cancel(&self, current: Appointment) -> Result<Appointment, SchedulingError> {
        let cancelled = self
            .store
            .transition(current.id, &AppointmentStatus::ACTIVE, AppointmentStatus::Cancelled)
            .await
            .map_err(|e| transition_err(e, AppointmentStatus::Cancelled))?;

        info!("Appointment {} cancelled", cancelled.id);
        self.notifier.notify_cancelled(&cancelled).await;
        Ok(cancelled)
    }

    /// Administrative hard removal, any status. No cascade, no
    /// notification.
    pub async fn delete(&self, id: Uuid) -> Result<(), SchedulingError> {
        self.store.delete(id).await.map_err(|e| match e {
            StoreError::NotFound => SchedulingError::NotFound,
            other => infra(other),
        })?;
        info!("Appointment {} deleted", id);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Appointment, SchedulingError> {
        self.store
            .find(id)
            .await
            .map_err(infra)?
            .ok_or(SchedulingError::NotFound)
    }

    pub async fn list(
        &self,
        filter: AppointmentFilter,
        pagination: Pagination,
    ) -> Result<(Vec<Appointment>, PaginationMeta), SchedulingError> {
        let pagination = pagination.normalized();
        let (records, total) = self
            .store
            .query(&filter, &pagination)
            .await
            .map_err(infra)?;
        Ok((records, PaginationMeta::new(&pagination, total)))
    }

    /// The slot template minus times held by active records on `date`.
    /// Past dates and weekends are errors; a weekday beyond the 14-day
    /// horizon is not — only the enumeration path bounds the horizon, and
    /// such a query simply reports the full template.
    pub async fn available_times(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<chrono::NaiveTime>, SchedulingError> {
        if date < self.clock.today() {
            return Err(SchedulingError::PastDate);
        }
        if !SlotCalendar::is_business_day(date) {
            return Err(SchedulingError::Weekend);
        }

        let occupied = self.store.occupied_times(date).await.map_err(infra)?;
        Ok(self
            .calendar
            .slot_template()
            .iter()
            .copied()
            .filter(|slot| !occupied.contains(slot))
            .collect())
    }

    /// Every business day from tomorrow through the horizon, each with its
    /// open slots. Fully booked days are included with an empty list.
    pub async fn available_dates(&self) -> Result<Vec<DayAvailability>, SchedulingError> {
        let today = self.clock.today();
        let mut days = Vec::new();

        for date in self.calendar.horizon_dates(today) {
            let occupied = self.store.occupied_times(date).await.map_err(infra)?;
            let available_times: Vec<_> = self
                .calendar
                .slot_template()
                .iter()
                .copied()
                .filter(|slot| !occupied.contains(slot))
                .collect();
            days.push(DayAvailability {
                date,
                has_available_slots: !available_times.is_empty(),
                available_times,
            });
        }

        Ok(days)
    }

    pub async fn stats(&self) -> Result<AppointmentStats, SchedulingError> {
        let counts = self.store.count_by_status().await.map_err(infra)?;
        Ok(AppointmentStats {
            total: counts.total(),
            pending: counts.pending,
            confirmed: counts.confirmed,
            cancelled: counts.cancelled,
        })
    }
}

fn infra(err: StoreError) -> SchedulingError {
    SchedulingError::Store(err)
}

/// Store-level CAS losses surface as illegal transitions carrying the
/// freshly observed state.
fn transition_err(err: StoreError, to: AppointmentStatus) -> SchedulingError {
    match err {
        StoreError::NotFound => SchedulingError::NotFound,
        StoreError::StatusConflict { current } => {
            SchedulingError::IllegalTransition { from: current, to }
        }
        other => infra(other),
    }
}
