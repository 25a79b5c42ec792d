use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Insurance provider ("obra social") accepted by the clinic. Bookings
/// reference providers by name; both name and code are unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceProvider {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsuranceStats {
    pub total: u64,
}
