use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use parterre_booking::BookingError;
use parterre_catalog::CatalogError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    AuthorizationError(String),
    NotFoundError(String),
    /// Conflicts carry the contested seat ids so the client can resync and
    /// clear its stale selection.
    ConflictError {
        message: String,
        seat_ids: Vec<String>,
    },
    BadGateway(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError { message, seat_ids } => (
                StatusCode::CONFLICT,
                json!({ "error": message, "seats": seat_ids }),
            ),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, json!({ "error": msg })),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::ShowNotFound(_)
            | BookingError::SeatNotFound(_)
            | BookingError::SeatNotInBasket(_)
            | BookingError::NoSeatsForRef(_) => AppError::NotFoundError(message),

            BookingError::SeatNotSellable(_)
            | BookingError::EmptySelection
            | BookingError::EmptyBasket
            | BookingError::BookingClosed => AppError::BadRequest(message),

            BookingError::SeatsConflict { seat_ids }
            | BookingError::StaleAdminView { seat_ids } => {
                AppError::ConflictError { message, seat_ids }
            }

            BookingError::Payment(_) => AppError::BadGateway(message),

            BookingError::Store(_) => AppError::InternalServerError(message),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::NotFoundError(err.to_string())
    }
}
