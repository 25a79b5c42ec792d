use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, Pagination, StatusCounts,
};
use shared_models::insurance::InsuranceProvider;

use crate::store::{AppointmentStore, InsuranceStore, NewProvider, ProviderUpdate, StoreError};

/// In-process store. Both tables live behind one `RwLock` each, so every
/// trait call is a single critical section: the conditional insert and the
/// status compare-and-set cannot interleave with a competing writer.
#[derive(Default)]
pub struct MemoryStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
    providers: RwLock<HashMap<Uuid, InsuranceProvider>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed providers at startup, skipping names already present.
    pub async fn seed_providers(&self, seed: &[(String, String)]) {
        let mut providers = self.providers.write().await;
        for (name, code) in seed {
            let exists = providers
                .values()
                .any(|p| p.name.eq_ignore_ascii_case(name));
            if exists {
                continue;
            }
            let now = Utc::now();
            let provider = InsuranceProvider {
                id: Uuid::new_v4(),
                name: name.clone(),
                code: code.to_uppercase(),
                created_at: now,
                updated_at: now,
            };
            debug!("Seeded insurance provider {}", provider.name);
            providers.insert(provider.id, provider);
        }
    }

    /// Import a record as-is, bypassing the active-slot uniqueness check.
    /// Intended for migrating data written before the constraint existed;
    /// such data can legitimately hold several active records on one slot,
    /// which the scheduler resolves at confirmation time.
    pub async fn import(&self, appointment: Appointment) -> Appointment {
        let mut table = self.appointments.write().await;
        table.insert(appointment.id, appointment.clone());
        appointment
    }
}

fn matches_filter(appointment: &Appointment, filter: &AppointmentFilter) -> bool {
    if let Some(status) = filter.status {
        if appointment.status != status {
            return false;
        }
    }
    // Range filter takes precedence over the single-date filter.
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        return appointment.date >= start && appointment.date <= end;
    }
    if let Some(date) = filter.date {
        return appointment.date == date;
    }
    true
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert(&self, appointment: Appointment) -> Result<Appointment, StoreError> {
        let mut table = self.appointments.write().await;

        // Uniqueness over active statuses, checked under the write lock.
        let conflict = table.values().any(|existing| {
            existing.date == appointment.date
                && existing.time == appointment.time
                && existing.status.is_active()
        });
        if conflict {
            return Err(StoreError::SlotTaken {
                date: appointment.date,
                time: appointment.time,
            });
        }

        table.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn find_same_slot(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        exclude: Uuid,
    ) -> Result<Vec<Appointment>, StoreError> {
        let table = self.appointments.read().await;
        let mut records: Vec<Appointment> = table
            .values()
            .filter(|a| a.date == date && a.time == time && a.status.is_active() && a.id != exclude)
            .cloned()
            .collect();
        records.sort_by_key(|a| a.created_at);
        Ok(records)
    }

    async fn transition(
        &self,
        id: Uuid,
        expected: &[AppointmentStatus],
        new_status: AppointmentStatus,
    ) -> Result<Appointment, StoreError> {
        let mut table = self.appointments.write().await;
        let record = table.get_mut(&id).ok_or(StoreError::NotFound)?;

        if !expected.contains(&record.status) {
            return Err(StoreError::StatusConflict {
                current: record.status,
            });
        }

        record.status = new_status;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut table = self.appointments.write().await;
        table.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn query(
        &self,
        filter: &AppointmentFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<Appointment>, u64), StoreError> {
        let table = self.appointments.read().await;
        let mut matches: Vec<Appointment> = table
            .values()
            .filter(|a| matches_filter(a, filter))
            .cloned()
            .collect();
        matches.sort_by_key(|a| (a.date, a.time, a.created_at));

        let total = matches.len() as u64;
        let page: Vec<Appointment> = matches
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit as usize)
            .collect();
        Ok((page, total))
    }

    async fn count_by_status(&self) -> Result<StatusCounts, StoreError> {
        let table = self.appointments.read().await;
        let mut counts = StatusCounts::default();
        for appointment in table.values() {
            match appointment.status {
                AppointmentStatus::Pending => counts.pending += 1,
                AppointmentStatus::Confirmed => counts.confirmed += 1,
                AppointmentStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }

    async fn occupied_times(&self, date: NaiveDate) -> Result<HashSet<NaiveTime>, StoreError> {
        let table = self.appointments.read().await;
        Ok(table
            .values()
            .filter(|a| a.date == date && a.status.is_active())
            .map(|a| a.time)
            .collect())
    }
}

#[async_trait]
impl InsuranceStore for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<InsuranceProvider>, StoreError> {
        let providers = self.providers.read().await;
        Ok(providers
            .values()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<InsuranceProvider>, StoreError> {
        Ok(self.providers.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<InsuranceProvider>, StoreError> {
        let providers = self.providers.read().await;
        let mut all: Vec<InsuranceProvider> = providers.values().cloned().collect();
        all.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(all)
    }

    async fn create(&self, provider: NewProvider) -> Result<InsuranceProvider, StoreError> {
        let mut providers = self.providers.write().await;
        let code = provider.code.to_uppercase();

        let duplicate = providers
            .values()
            .any(|p| p.name.eq_ignore_ascii_case(&provider.name) || p.code == code);
        if duplicate {
            return Err(StoreError::DuplicateProvider);
        }

        let now = Utc::now();
        let record = InsuranceProvider {
            id: Uuid::new_v4(),
            name: provider.name,
            code,
            created_at: now,
            updated_at: now,
        };
        providers.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        update: ProviderUpdate,
    ) -> Result<InsuranceProvider, StoreError> {
        let mut providers = self.providers.write().await;

        if !providers.contains_key(&id) {
            return Err(StoreError::NotFound);
        }

        let new_code = update.code.as_ref().map(|c| c.to_uppercase());
        let duplicate = providers.values().any(|p| {
            p.id != id
                && (update
                    .name
                    .as_ref()
                    .is_some_and(|n| p.name.eq_ignore_ascii_case(n))
                    || new_code.as_ref().is_some_and(|c| &p.code == c))
        });
        if duplicate {
            return Err(StoreError::DuplicateProvider);
        }

        let record = providers.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(code) = new_code {
            record.code = code;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn remove(&self, id: Uuid) -> Result<(), StoreError> {
        let mut providers = self.providers.write().await;
        providers.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.providers.read().await.len() as u64)
    }
}
