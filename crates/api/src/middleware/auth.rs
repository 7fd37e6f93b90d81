//! Bearer-key authentication for the admin API.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

/// Requires `Authorization: Bearer <key>` matching the configured API key.
/// When no key is configured the check is skipped entirely.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let expected = &state.config.server.api_key;
    if expected.is_empty() {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(key) if key == expected => Ok(next.run(request).await),
        Some(_) => Err(ApiError::Unauthorized("Invalid API key".into())),
        None => Err(ApiError::Unauthorized("Missing Authorization header".into())),
    }
}
