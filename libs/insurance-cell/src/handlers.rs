use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_database::StoreError;
use shared_models::error::AppError;

use crate::models::{CreateProviderRequest, UpdateProviderRequest};
use crate::service::InsuranceService;

fn map_err(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound => AppError::NotFound("Insurance provider not found".to_string()),
        StoreError::DuplicateProvider => {
            AppError::Conflict("A provider with that name or code already exists".to_string())
        }
        other => AppError::Database(other.to_string()),
    }
}

#[axum::debug_handler]
pub async fn list_providers(
    State(service): State<Arc<InsuranceService>>,
) -> Result<Json<Value>, AppError> {
    let providers = service.list().await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": providers,
    })))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(service): State<Arc<InsuranceService>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let provider = service.get(provider_id).await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": provider,
    })))
}

#[axum::debug_handler]
pub async fn create_provider(
    State(service): State<Arc<InsuranceService>>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate().map_err(AppError::ValidationError)?;
    let provider = service.create(request).await.map_err(map_err)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Insurance provider created successfully",
            "data": provider,
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_provider(
    State(service): State<Arc<InsuranceService>>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<UpdateProviderRequest>,
) -> Result<Json<Value>, AppError> {
    let provider = service.update(provider_id, request).await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "message": "Insurance provider updated successfully",
        "data": provider,
    })))
}

#[axum::debug_handler]
pub async fn delete_provider(
    State(service): State<Arc<InsuranceService>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete(provider_id).await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "message": "Insurance provider deleted successfully",
    })))
}

#[axum::debug_handler]
pub async fn get_provider_stats(
    State(service): State<Arc<InsuranceService>>,
) -> Result<Json<Value>, AppError> {
    let stats = service.stats().await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": stats,
    })))
}
