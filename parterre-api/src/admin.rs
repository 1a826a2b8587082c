use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;

use parterre_booking::AdminSelection;

use crate::error::AppError;
use crate::session::{grant_admin, is_admin, revoke_admin};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// POST /v1/admin/session
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Json(request): Json<AdminLoginRequest>,
) -> Result<(SignedCookieJar, StatusCode), AppError> {
    if request.password != state.admin_password {
        return Err(AppError::AuthorizationError("invalid password".to_string()));
    }
    Ok((grant_admin(jar), StatusCode::NO_CONTENT))
}

/// DELETE /v1/admin/session
pub async fn logout(jar: SignedCookieJar) -> (SignedCookieJar, StatusCode) {
    (revoke_admin(jar), StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AdminSeatBatch {
    pub selections: Vec<AdminSelection>,
}

/// POST /v1/shows/{show_id}/admin/seats
pub async fn set_seat_statuses(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    jar: SignedCookieJar,
    Json(request): Json<AdminSeatBatch>,
) -> Result<StatusCode, AppError> {
    if !is_admin(&jar) {
        return Err(AppError::AuthorizationError(
            "admin session required".to_string(),
        ));
    }

    state
        .service
        .set_seat_statuses(&show_id, &request.selections)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
