use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;

use parterre_booking::BookingError;
use parterre_core::reservation::CustomerDetails;

use crate::error::AppError;
use crate::state::AppState;
use crate::stripe::verify_webhook_signature;

const SIGNATURE_TOLERANCE_MINUTES: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    #[serde(rename = "type")]
    pub type_: String,
    pub data: StripeEventData,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: StripeCheckoutObject,
}

#[derive(Debug, Deserialize)]
pub struct StripeCheckoutObject {
    pub id: String,
    pub customer_details: Option<StripeCustomerDetails>,
}

#[derive(Debug, Deserialize)]
pub struct StripeCustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// POST /v1/webhooks/stripe
///
/// The only path that turns locks into purchases. The payload is untrusted
/// until its signature checks out, and the provider redelivers, so the
/// settlement underneath is idempotent.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: String,
) -> Result<Json<serde_json::Value>, AppError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing stripe-signature header".to_string()))?;

    verify_webhook_signature(
        payload.as_bytes(),
        signature,
        &state.webhook_secret,
        Duration::minutes(SIGNATURE_TOLERANCE_MINUTES),
        Utc::now(),
    )
    .map_err(|err| AppError::BadRequest(format!("webhook signature rejected: {err}")))?;

    let event: StripeEvent = serde_json::from_str(&payload)
        .map_err(|err| AppError::BadRequest(format!("malformed webhook payload: {err}")))?;

    if event.type_ == "checkout.session.completed" {
        let object = event.data.object;
        let customer = CustomerDetails {
            name: object
                .customer_details
                .as_ref()
                .and_then(|details| details.name.clone())
                .unwrap_or_default(),
            email: object
                .customer_details
                .as_ref()
                .and_then(|details| details.email.clone())
                .unwrap_or_default(),
        };

        match state.service.confirm_settlement(&object.id, &customer).await {
            Ok(_) => {}
            // Unknown reference: replay or foreign session. Acknowledge so
            // the provider stops redelivering.
            Err(BookingError::NoSeatsForRef(checkout_ref)) => {
                tracing::warn!(
                    checkout_ref = %checkout_ref,
                    "settlement for unknown checkout reference"
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(Json(json!({ "received": true })))
}
