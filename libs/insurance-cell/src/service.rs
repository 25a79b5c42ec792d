use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use shared_database::{InsuranceStore, NewProvider, ProviderUpdate, StoreError};
use shared_models::insurance::{InsuranceProvider, InsuranceStats};

use crate::models::{CreateProviderRequest, UpdateProviderRequest};

/// Administration of the accepted insurance providers ("obras sociales").
/// The scheduler only ever reads this set; writes arrive through the
/// administrative endpoints here.
pub struct InsuranceService {
    store: Arc<dyn InsuranceStore>,
}

impl InsuranceService {
    pub fn new(store: Arc<dyn InsuranceStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<InsuranceProvider>, StoreError> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<InsuranceProvider, StoreError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(StoreError::NotFound)
    }

    pub async fn create(
        &self,
        request: CreateProviderRequest,
    ) -> Result<InsuranceProvider, StoreError> {
        let provider = self
            .store
            .create(NewProvider {
                name: request.name.trim().to_string(),
                code: request.code.trim().to_string(),
            })
            .await?;
        info!("Insurance provider {} created", provider.name);
        Ok(provider)
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateProviderRequest,
    ) -> Result<InsuranceProvider, StoreError> {
        let provider = self
            .store
            .update(
                id,
                ProviderUpdate {
                    name: request.name,
                    code: request.code,
                },
            )
            .await?;
        info!("Insurance provider {} updated", provider.name);
        Ok(provider)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.store.remove(id).await?;
        info!("Insurance provider {} deleted", id);
        Ok(())
    }

    pub async fn stats(&self) -> Result<InsuranceStats, StoreError> {
        Ok(InsuranceStats {
            total: self.store.count().await?,
        })
    }
}
