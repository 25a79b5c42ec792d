use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers;
use crate::service::InsuranceService;

pub fn insurance_routes(service: Arc<InsuranceService>) -> Router {
    Router::new()
        .route("/", get(handlers::list_providers))
        .route("/", post(handlers::create_provider))
        .route("/stats", get(handlers::get_provider_stats))
        .route("/{provider_id}", get(handlers::get_provider))
        .route("/{provider_id}", put(handlers::update_provider))
        .route("/{provider_id}", delete(handlers::delete_provider))
        .with_state(service)
}
