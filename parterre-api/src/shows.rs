use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use parterre_catalog::Seat;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShowResponse {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub label: String,
}

/// GET /v1/shows
pub async fn list_shows(State(state): State<AppState>) -> Json<Vec<ShowResponse>> {
    let shows = state
        .catalog
        .shows()
        .iter()
        .map(|show| ShowResponse {
            id: show.id.clone(),
            title: show.title.clone(),
            date: show.date,
            label: show.label(),
        })
        .collect();
    Json(shows)
}

/// GET /v1/shows/{show_id}/seats
pub async fn list_seats(
    State(state): State<AppState>,
    Path(show_id): Path<String>,
) -> Result<Json<Vec<Seat>>, AppError> {
    let seats = state.catalog.list_seats(&show_id)?;
    Ok(Json(seats.to_vec()))
}
