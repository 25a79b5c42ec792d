use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::appointment::{AppointmentFilter, AppointmentStatus, Pagination};
use shared_models::error::AppError;

use crate::models::{BookAppointmentRequest, DateAvailability, SchedulingError, UpdateStatusRequest};
use crate::services::scheduler::AppointmentScheduler;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ListQueryParams {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AvailableTimesQuery {
    pub date: NaiveDate,
}

fn map_err(err: SchedulingError) -> AppError {
    match err {
        SchedulingError::UnknownProvider(_)
        | SchedulingError::InvalidSlot { .. }
        | SchedulingError::PastDate
        | SchedulingError::Weekend => AppError::BadRequest(err.to_string()),
        SchedulingError::SlotTaken { .. } => AppError::Conflict(err.to_string()),
        SchedulingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        SchedulingError::IllegalTransition { .. } => AppError::BadRequest(err.to_string()),
        SchedulingError::Validation(msg) => AppError::ValidationError(msg),
        SchedulingError::Store(e) => AppError::Database(e.to_string()),
    }
}

// ==============================================================================
// HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let appointment = scheduler.book(request).await.map_err(map_err)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment booked successfully",
            "appointment": appointment,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Query(params): Query<ListQueryParams>,
) -> Result<Json<Value>, AppError> {
    let filter = AppointmentFilter {
        status: params.status,
        date: params.date,
        start_date: params.start_date,
        end_date: params.end_date,
    };
    let defaults = Pagination::default();
    let pagination = Pagination {
        page: params.page.unwrap_or(defaults.page),
        limit: params.limit.unwrap_or(defaults.limit),
    };

    let (appointments, meta) = scheduler.list(filter, pagination).await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": appointments,
        "pagination": meta,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let appointment = scheduler.get(appointment_id).await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": appointment,
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Path(appointment_id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = scheduler
        .set_status(appointment_id, request.status)
        .await
        .map_err(map_err)?;

    let message = match request.status {
        AppointmentStatus::Confirmed => "Appointment confirmed successfully",
        AppointmentStatus::Pending => "Appointment marked as pending successfully",
        AppointmentStatus::Cancelled => "Appointment cancelled successfully",
    };

    Ok(Json(json!({
        "success": true,
        "message": message,
        "data": appointment,
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    scheduler.delete(appointment_id).await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "message": "Appointment deleted successfully",
    })))
}

#[axum::debug_handler]
pub async fn get_available_times(
    State(scheduler): State<Arc<AppointmentScheduler>>,
    Query(query): Query<AvailableTimesQuery>,
) -> Result<Json<Value>, AppError> {
    let available_times = scheduler
        .available_times(query.date)
        .await
        .map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": DateAvailability {
            date: query.date,
            available_times,
        },
    })))
}

#[axum::debug_handler]
pub async fn get_available_dates(
    State(scheduler): State<Arc<AppointmentScheduler>>,
) -> Result<Json<Value>, AppError> {
    let days = scheduler.available_dates().await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": days,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment_stats(
    State(scheduler): State<Arc<AppointmentScheduler>>,
) -> Result<Json<Value>, AppError> {
    let stats = scheduler.stats().await.map_err(map_err)?;

    Ok(Json(json!({
        "success": true,
        "data": stats,
    })))
}
