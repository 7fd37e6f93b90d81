//! Appointment CRUD handlers.
//!
//! Every mutation is local-first: the write commits to the local store and
//! an outbox intent is enqueued for the remote; the response never waits on
//! the network.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{Appointment, CreateAppointmentRequest, UpdateAppointmentRequest};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
    pub total: usize,
}

/// GET /api/v1/appointments
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<AppointmentListResponse>, ApiError> {
    let appointments = state.repos().appointments.list().await?;
    let total = appointments.len();
    Ok(Json(AppointmentListResponse {
        appointments,
        total,
    }))
}

/// GET /api/v1/appointments/:id
pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, ApiError> {
    let appointment = state
        .repos()
        .appointments
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Appointment {} not found", id)))?;
    Ok(Json(appointment))
}

/// POST /api/v1/appointments
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    request.validate()?;

    let appointment = Appointment::new(request);
    let repos = state.repos();
    repos.appointments.create(&appointment).await?;
    state.sync.enqueue_create(&appointment).await?;

    info!(
        id = %appointment.id,
        client = %appointment.client_name,
        date = %appointment.date,
        time = %appointment.time,
        "Appointment booked"
    );
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// PUT /api/v1/appointments/:id (partial-field body)
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    request.validate()?;

    let repos = state.repos();
    let mut appointment = repos
        .appointments
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Appointment {} not found", id)))?;

    appointment.apply_update(request)?;

    if !repos.appointments.update(&appointment).await? {
        return Err(ApiError::NotFound(format!("Appointment {} not found", id)));
    }
    state.sync.enqueue_update(&appointment).await?;

    info!(id = %appointment.id, status = %appointment.status, "Appointment updated");
    Ok(Json(appointment))
}

/// DELETE /api/v1/appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repos = state.repos();
    if !repos.appointments.delete(&id).await? {
        return Err(ApiError::NotFound(format!("Appointment {} not found", id)));
    }
    state.sync.enqueue_delete(&id).await?;

    info!(id = %id, "Appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/appointments/refresh
///
/// Pulls the remote collection in (when configured) and returns the merged
/// list. Safe to call with no remote: it degrades to a plain list.
pub async fn refresh_appointments(
    State(state): State<AppState>,
) -> Result<Json<AppointmentListResponse>, ApiError> {
    let appointments = state.sync.refresh().await?;
    let total = appointments.len();
    Ok(Json(AppointmentListResponse {
        appointments,
        total,
    }))
}
