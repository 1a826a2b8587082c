use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parterre_catalog::pricing::format_price;

use crate::error::AppError;
use crate::session::session_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BasketLineResponse {
    pub show_id: String,
    pub show_label: String,
    pub seat_id: String,
    pub seat_label: String,
    pub section_title: String,
    pub has_child_on_lap: bool,
    pub locked_until: DateTime<Utc>,
    pub unit_amount_cents: i64,
    pub formatted_price: String,
}

#[derive(Debug, Serialize)]
pub struct BasketResponse {
    pub lines: Vec<BasketLineResponse>,
    pub total_cents: i64,
    pub formatted_total: String,
}

/// GET /v1/basket
pub async fn get_basket(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<BasketResponse>, AppError> {
    let lines = match session_id(&jar) {
        Some(session_id) => state.service.basket(&session_id).await?,
        None => Vec::new(),
    };

    let total_cents: i64 = lines.iter().map(|line| line.unit_amount_cents).sum();
    let lines = lines
        .into_iter()
        .map(|line| BasketLineResponse {
            show_id: line.show.id.clone(),
            show_label: line.show.label(),
            seat_id: line.seat.id.clone(),
            seat_label: line.seat.label(),
            section_title: line.seat.section.title().to_string(),
            has_child_on_lap: line.lock.has_child_on_lap,
            locked_until: line.lock.locked_until,
            unit_amount_cents: line.unit_amount_cents,
            formatted_price: format_price(line.unit_amount_cents),
        })
        .collect();

    Ok(Json(BasketResponse {
        lines,
        total_cents,
        formatted_total: format_price(total_cents),
    }))
}

/// DELETE /v1/basket/shows/{show_id}/seats/{seat_id}
pub async fn remove_seat(
    State(state): State<AppState>,
    Path((show_id, seat_id)): Path<(String, String)>,
    jar: SignedCookieJar,
) -> Result<StatusCode, AppError> {
    if let Some(session_id) = session_id(&jar) {
        state
            .service
            .remove_seat(&session_id, &show_id, &seat_id)
            .await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ChildOnLapRequest {
    pub has_child_on_lap: bool,
}

/// PUT /v1/basket/shows/{show_id}/seats/{seat_id}/child-on-lap
pub async fn set_child_on_lap(
    State(state): State<AppState>,
    Path((show_id, seat_id)): Path<(String, String)>,
    jar: SignedCookieJar,
    Json(request): Json<ChildOnLapRequest>,
) -> Result<StatusCode, AppError> {
    let session_id = session_id(&jar)
        .ok_or_else(|| AppError::NotFoundError(format!("seat {seat_id} is not in the basket")))?;
    state
        .service
        .set_child_on_lap(&session_id, &show_id, &seat_id, request.has_child_on_lap)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub redirect_url: String,
}

/// POST /v1/basket/checkout
pub async fn begin_checkout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<Json<CheckoutResponse>, AppError> {
    let session_id =
        session_id(&jar).ok_or_else(|| AppError::BadRequest("basket is empty".to_string()))?;

    let checkout = state
        .service
        .begin_checkout(&session_id, &state.checkout_urls)
        .await?;

    Ok(Json(CheckoutResponse {
        redirect_url: checkout.redirect_url,
    }))
}
