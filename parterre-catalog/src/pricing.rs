use serde::{Deserialize, Serialize};

use crate::seat::Seat;

/// Ticket pricing knobs, all configuration-driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Flat price per seat, in cents.
    pub base_seat_cents: i64,

    /// Flat surcharge when a seat's lock carries the child-on-lap
    /// modifier, in cents.
    pub child_on_lap_surcharge_cents: i64,

    /// ISO currency code handed to the payment provider.
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_seat_cents: 1050,
            child_on_lap_surcharge_cents: 500,
            currency: "EUR".to_string(),
        }
    }
}

/// Prices one seat given its attributes and line-item modifiers. A trait so
/// per-attribute pricing can be introduced without touching the checkout
/// protocol.
pub trait SeatPricer: Send + Sync {
    fn currency(&self) -> &str;

    fn quote(&self, seat: &Seat, has_child_on_lap: bool) -> i64;
}

/// Every seat costs the same flat base price.
pub struct FlatPricer {
    config: PricingConfig,
}

impl FlatPricer {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }
}

impl SeatPricer for FlatPricer {
    fn currency(&self) -> &str {
        &self.config.currency
    }

    fn quote(&self, _seat: &Seat, has_child_on_lap: bool) -> i64 {
        let mut cents = self.config.base_seat_cents;
        if has_child_on_lap {
            cents += self.config.child_on_lap_surcharge_cents;
        }
        cents
    }
}

/// French display format, e.g. `10,50 €`.
pub fn format_price(cents: i64) -> String {
    format!("{},{:02} €", cents / 100, (cents % 100).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seat::SectionKind;

    fn any_seat() -> Seat {
        Seat {
            id: Seat::compose_id(SectionKind::Orchestra, "C", 12, false),
            num: 12,
            row: "C".to_string(),
            section: SectionKind::Orchestra,
            is_bis: false,
            is_security: false,
            has_restricted_view: false,
            is_wheelchair_accessible: false,
        }
    }

    #[test]
    fn test_flat_pricing() {
        let pricer = FlatPricer::new(PricingConfig::default());
        assert_eq!(pricer.quote(&any_seat(), false), 1050);
        assert_eq!(pricer.currency(), "EUR");
    }

    #[test]
    fn test_child_on_lap_surcharge() {
        let pricer = FlatPricer::new(PricingConfig::default());
        assert_eq!(pricer.quote(&any_seat(), true), 1550);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1050), "10,50 €");
        assert_eq!(format_price(500), "5,00 €");
        assert_eq!(format_price(2), "0,02 €");
    }
}
