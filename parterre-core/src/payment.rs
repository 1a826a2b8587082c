use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub unit_amount_cents: i64,
    pub quantity: u32,
}

/// Where the provider sends the buyer back after the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

/// What the provider hands back for a created checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCheckout {
    /// Opaque reference; locks get stamped with it and the settlement
    /// webhook carries it back.
    pub id: String,
    pub redirect_url: String,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider rejected the request: {0}")]
    Rejected(String),

    #[error("payment provider unreachable: {0}")]
    Unreachable(String),
}

/// The external payment collaborator. Confirmation arrives asynchronously
/// through the provider's webhook, never through this trait.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        items: &[LineItem],
        currency: &str,
        expires_at: DateTime<Utc>,
        urls: &CheckoutUrls,
    ) -> Result<ProviderCheckout, PaymentError>;
}
