use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub stripe: StripeConfig,
    pub business_rules: BusinessRules,
    pub shows: Vec<ShowConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Signs the session and admin cookies. At least 32 bytes.
    pub cookie_secret: String,
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// One configured performance; the runtime never creates or destroys shows.
#[derive(Debug, Deserialize, Clone)]
pub struct ShowConfig {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// How long a plain selection holds its seats.
    #[serde(default = "default_selection_hold")]
    pub selection_hold_minutes: i64,

    /// How long seats stay held once checkout begins. Also the payment
    /// session's expiry, so the lock never outlives the payment window.
    #[serde(default = "default_checkout_hold")]
    pub checkout_hold_minutes: i64,

    /// Gate for the whole checkout path, e.g. between seasons.
    #[serde(default = "default_booking_open")]
    pub booking_open: bool,

    #[serde(default = "default_base_seat_cents")]
    pub base_seat_cents: i64,

    #[serde(default = "default_child_surcharge_cents")]
    pub child_on_lap_surcharge_cents: i64,

    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_selection_hold() -> i64 {
    15
}

fn default_checkout_hold() -> i64 {
    45
}

fn default_booking_open() -> bool {
    true
}

fn default_base_seat_cents() -> i64 {
    1050
}

fn default_child_surcharge_cents() -> i64 {
    500
}

fn default_currency() -> String {
    "EUR".to_string()
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            selection_hold_minutes: default_selection_hold(),
            checkout_hold_minutes: default_checkout_hold(),
            booking_open: default_booking_open(),
            base_seat_cents: default_base_seat_cents(),
            child_on_lap_surcharge_cents: default_child_surcharge_cents(),
            currency: default_currency(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PARTERRE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rule_defaults_match_the_house_rules() {
        let rules = BusinessRules::default();
        assert_eq!(rules.selection_hold_minutes, 15);
        assert_eq!(rules.checkout_hold_minutes, 45);
        assert!(rules.booking_open);
        assert_eq!(rules.base_seat_cents, 1050);
        assert_eq!(rules.currency, "EUR");
    }
}
