use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use serde::{Deserialize, Serialize};

use parterre_core::reservation::UnavailabilityReason;

use crate::error::AppError;
use crate::session::ensure_session_id;
use crate::state::AppState;

/// Public availability entry. Deliberately thinner than the resolver's
/// output: the owning session id and lock expiry stay server-side.
#[derive(Debug, Serialize)]
pub struct UnavailableSeatResponse {
    pub seat_id: String,
    pub reason: &'static str,
}

/// GET /v1/shows/{show_id}/availability
///
/// Advisory snapshot for rendering the seat map; selection re-validates at
/// write time. Also mints the session cookie on first visit.
pub async fn availability(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<Vec<UnavailableSeatResponse>>), AppError> {
    let (jar, _session_id) = ensure_session_id(jar);
    let unavailable = state
        .service
        .unavailable_seats(&show_id)
        .await?
        .into_iter()
        .map(|seat| UnavailableSeatResponse {
            seat_id: seat.seat_id,
            reason: match seat.reason {
                UnavailabilityReason::Locked { .. } => "locked",
                UnavailabilityReason::Purchased { .. } => "purchased",
            },
        })
        .collect();
    Ok((jar, Json(unavailable)))
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub seats: Vec<String>,
}

/// POST /v1/shows/{show_id}/selection
pub async fn submit_selection(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
    jar: SignedCookieJar,
    Json(request): Json<SelectionRequest>,
) -> Result<(SignedCookieJar, StatusCode), AppError> {
    let (jar, session_id) = ensure_session_id(jar);
    state
        .service
        .submit_selection(&show_id, &session_id, &request.seats)
        .await?;
    Ok((jar, StatusCode::NO_CONTENT))
}
