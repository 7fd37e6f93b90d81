//! Service catalog handler.

use axum::Json;
use domain::models::{service_catalog, SalonService};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListResponse {
    pub services: Vec<SalonService>,
}

/// GET /api/v1/services
///
/// The catalog is static; prices and durations change with a deploy, not
/// at runtime.
pub async fn list_services() -> Json<ServiceListResponse> {
    Json(ServiceListResponse {
        services: service_catalog(),
    })
}
