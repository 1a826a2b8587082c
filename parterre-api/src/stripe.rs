use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use parterre_core::payment::{
    CheckoutUrls, LineItem, PaymentError, PaymentGateway, ProviderCheckout,
};

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

/// Stripe Checkout over the plain REST API: one form-encoded create call,
/// hosted payment page, settlement by webhook.
pub struct StripeCheckout {
    http: reqwest::Client,
    secret_key: String,
}

impl StripeCheckout {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

#[async_trait]
impl PaymentGateway for StripeCheckout {
    async fn create_checkout_session(
        &self,
        items: &[LineItem],
        currency: &str,
        expires_at: DateTime<Utc>,
        urls: &CheckoutUrls,
    ) -> Result<ProviderCheckout, PaymentError> {
        let mut params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("expires_at".to_string(), expires_at.timestamp().to_string()),
            ("success_url".to_string(), urls.success_url.clone()),
            ("cancel_url".to_string(), urls.cancel_url.clone()),
        ];
        for (i, item) in items.iter().enumerate() {
            params.push((
                format!("line_items[{i}][quantity]"),
                item.quantity.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][currency]"),
                currency.to_lowercase(),
            ));
            params.push((
                format!("line_items[{i}][price_data][unit_amount]"),
                item.unit_amount_cents.to_string(),
            ));
            params.push((
                format!("line_items[{i}][price_data][product_data][name]"),
                item.description.clone(),
            ));
        }

        let response = self
            .http
            .post(CHECKOUT_SESSIONS_URL)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|err| PaymentError::Unreachable(err.to_string()))?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Rejected(body));
        }

        let session: CheckoutSessionResponse = response
            .json()
            .await
            .map_err(|err| PaymentError::Rejected(err.to_string()))?;

        let redirect_url = session.url.ok_or_else(|| {
            PaymentError::Rejected("checkout session has no redirect url".to_string())
        })?;

        Ok(ProviderCheckout {
            id: session.id,
            redirect_url,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("malformed signature header")]
    Malformed,

    #[error("signature timestamp outside tolerance")]
    ExpiredTimestamp,

    #[error("no matching signature")]
    NoMatch,
}

/// Verifies a `Stripe-Signature` header: HMAC-SHA256 over `"{t}.{payload}"`
/// with the endpoint secret, a tolerance window on `t` against replays, and
/// constant-time comparison of every `v1` candidate.
pub fn verify_webhook_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    tolerance: Duration,
    now: DateTime<Utc>,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => timestamp = value.parse().ok(),
            (Some("v1"), Some(value)) => {
                if let Ok(bytes) = hex::decode(value) {
                    candidates.push(bytes);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;
    if candidates.is_empty() {
        return Err(SignatureError::Malformed);
    }

    if (now.timestamp() - timestamp).abs() > tolerance.num_seconds() {
        return Err(SignatureError::ExpiredTimestamp);
    }

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_| SignatureError::Malformed)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    for candidate in &candidates {
        if mac.clone().verify_slice(candidate).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    fn sign(payload: &[u8], timestamp: i64) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        format!(
            "t={},v1={}",
            timestamp,
            hex::encode(mac.finalize().into_bytes())
        )
    }

    #[test]
    fn test_valid_signature_passes() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = Utc::now();
        let header = sign(payload, now.timestamp());
        assert!(
            verify_webhook_signature(payload, &header, SECRET, Duration::minutes(5), now).is_ok()
        );
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let now = Utc::now();
        let header = sign(br#"{"id":"evt_1"}"#, now.timestamp());
        let result = verify_webhook_signature(
            br#"{"id":"evt_2"}"#,
            &header,
            SECRET,
            Duration::minutes(5),
            now,
        );
        assert!(matches!(result, Err(SignatureError::NoMatch)));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = Utc::now();
        let header = sign(payload, now.timestamp());
        let result =
            verify_webhook_signature(payload, &header, "whsec_other", Duration::minutes(5), now);
        assert!(matches!(result, Err(SignatureError::NoMatch)));
    }

    #[test]
    fn test_stale_timestamp_is_rejected() {
        let payload = br#"{"id":"evt_1"}"#;
        let now = Utc::now();
        let header = sign(payload, (now - Duration::minutes(10)).timestamp());
        let result = verify_webhook_signature(payload, &header, SECRET, Duration::minutes(5), now);
        assert!(matches!(result, Err(SignatureError::ExpiredTimestamp)));
    }

    #[test]
    fn test_header_without_signature_is_malformed() {
        let result = verify_webhook_signature(
            b"{}",
            "t=12345",
            SECRET,
            Duration::minutes(5),
            Utc::now(),
        );
        assert!(matches!(result, Err(SignatureError::Malformed)));
    }
}
