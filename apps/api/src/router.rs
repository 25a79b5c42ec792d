use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::scheduler::AppointmentScheduler;
use insurance_cell::router::insurance_routes;
use insurance_cell::service::InsuranceService;

pub fn create_router(
    scheduler: Arc<AppointmentScheduler>,
    insurance: Arc<InsuranceService>,
) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/appointments", appointment_routes(scheduler))
        .nest("/insurance", insurance_routes(insurance))
}
