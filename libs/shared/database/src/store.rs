use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use shared_models::appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, Pagination, StatusCounts,
};
use shared_models::insurance::InsuranceProvider;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The conditional insert lost: an active record already holds the slot.
    #[error("slot {date} {time} already held by an active appointment")]
    SlotTaken { date: NaiveDate, time: NaiveTime },

    #[error("record not found")]
    NotFound,

    /// Compare-and-set on status observed a different current state.
    #[error("status is {current}, not one of the expected states")]
    StatusConflict { current: AppointmentStatus },

    #[error("duplicate provider name or code")]
    DuplicateProvider,

    #[error("storage failure: {0}")]
    Internal(String),
}

/// Durable storage boundary for appointments. Every method is a single
/// atomic unit from the caller's perspective; in particular `insert` and
/// `transition` carry the conditional-write guarantees the scheduler's
/// no-double-booking and first-confirmation-wins rules rest on.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Conditional insert: fails with [`StoreError::SlotTaken`] while any
    /// record with an active status holds the same (date, time). The check
    /// and the write are one critical section; callers must not pre-check
    /// and then insert.
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>, StoreError>;

    /// All active records sharing (date, time) other than `exclude`; the
    /// cascade sweep input.
    async fn find_same_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Uuid,
    ) -> Result<Vec<Appointment>, StoreError>;

    /// Compare-and-set on status: succeeds only while the current status is
    /// one of `expected`, otherwise fails with
    /// [`StoreError::StatusConflict`] carrying the freshly observed state.
    async fn transition(
        &self,
        id: Uuid,
        expected: &[AppointmentStatus],
        new_status: AppointmentStatus,
    ) -> Result<Appointment, StoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Filtered listing ordered by (date, time), plus the unpaginated
    /// match count.
    async fn query(
        &self,
        filter: &AppointmentFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<Appointment>, u64), StoreError>;

    async fn count_by_status(&self) -> Result<StatusCounts, StoreError>;

    /// Times on `date` held by active records.
    async fn occupied_times(&self, date: NaiveDate) -> Result<HashSet<NaiveTime>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct NewProvider {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
}

/// Lookup collaborator for insurance providers. Name matching is
/// case-insensitive; codes are stored uppercased.
#[async_trait]
pub trait InsuranceStore: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<InsuranceProvider>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InsuranceProvider>, StoreError>;

    /// All providers sorted by name.
    async fn list(&self) -> Result<Vec<InsuranceProvider>, StoreError>;

    /// Fails with [`StoreError::DuplicateProvider`] when the name or code
    /// is already registered.
    async fn create(&self, provider: NewProvider) -> Result<InsuranceProvider, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        update: ProviderUpdate,
    ) -> Result<InsuranceProvider, StoreError>;

    async fn remove(&self, id: Uuid) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
