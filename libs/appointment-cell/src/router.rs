use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::services::scheduler::AppointmentScheduler;

pub fn appointment_routes(scheduler: Arc<AppointmentScheduler>) -> Router {
    Router::new()
        // Public booking surface
        .route("/", post(handlers::book_appointment))
        .route("/available/times", get(handlers::get_available_times))
        .route("/available/dates", get(handlers::get_available_dates))
        // Administrative surface
        .route("/", get(handlers::list_appointments))
        .route("/stats", get(handlers::get_appointment_stats))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/status", put(handlers::update_appointment_status))
        .route("/{appointment_id}", delete(handlers::delete_appointment))
        .with_state(scheduler)
}
