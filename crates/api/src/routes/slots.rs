//! Slot availability handler.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::services::availability::available_slots;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub date: String,
    pub available_slots: Vec<String>,
}

/// GET /api/v1/available-slots/:date
pub async fn get_available_slots(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<AvailableSlotsResponse>, ApiError> {
    if shared::validation::validate_iso_date(&date).is_err() {
        return Err(ApiError::Validation(
            "Date must be in YYYY-MM-DD format".into(),
        ));
    }

    let booked = state.repos().appointments.list_by_date(&date).await?;
    let slots = available_slots(&date, &booked);
    Ok(Json(AvailableSlotsResponse {
        date,
        available_slots: slots,
    }))
}
