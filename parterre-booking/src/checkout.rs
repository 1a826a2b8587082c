use chrono::{Duration, Utc};

use parterre_catalog::{Seat, Show};
use parterre_core::payment::{CheckoutUrls, LineItem, ProviderCheckout};
use parterre_core::reservation::{CustomerDetails, SeatLock, SettlementOutcome};

use crate::error::BookingError;
use crate::service::ReservationService;

/// One priced basket entry: a live lock joined with its catalog data.
#[derive(Debug, Clone)]
pub struct BasketLine {
    pub show: Show,
    pub seat: Seat,
    pub lock: SeatLock,
    pub unit_amount_cents: i64,
}

impl BasketLine {
    /// Payment line-item description, e.g.
    /// `La Nuit des Etoiles - 18/09/2026 20:30 | Orchestre: C12`.
    pub fn description(&self) -> String {
        format!(
            "{} | {}: {}",
            self.show.label(),
            self.seat.section.title(),
            self.seat.label()
        )
    }
}

impl ReservationService {
    /// The session's live basket: its unexpired locks, priced.
    pub async fn basket(&self, session_id: &str) -> Result<Vec<BasketLine>, BookingError> {
        let now = Utc::now();
        let locks = self.store.locks_for_session(session_id, now).await?;

        let mut lines = Vec::with_capacity(locks.len());
        for lock in locks {
            let show = self.catalog.show(&lock.show_id)?.clone();
            let seat = self.catalog.seat(&lock.seat_id)?.clone();
            let unit_amount_cents = self.pricer.quote(&seat, lock.has_child_on_lap);
            lines.push(BasketLine {
                show,
                seat,
                lock,
                unit_amount_cents,
            });
        }
        Ok(lines)
    }

    /// Hands the basket to the payment provider and extends every held
    /// lock to cover the payment window.
    ///
    /// The provider session is created first; locks are only stamped after
    /// it exists, so a provider failure leaves no state behind. The lock
    /// expiry equals the payment session's expiry.
    pub async fn begin_checkout(
        &self,
        session_id: &str,
        urls: &CheckoutUrls,
    ) -> Result<ProviderCheckout, BookingError> {
        if !self.rules.booking_open {
            return Err(BookingError::BookingClosed);
        }

        let lines = self.basket(session_id).await?;
        if lines.is_empty() {
            return Err(BookingError::EmptyBasket);
        }

        let locked_until = Utc::now() + Duration::minutes(self.rules.checkout_hold_minutes);

        let items: Vec<LineItem> = lines
            .iter()
            .map(|line| LineItem {
                description: line.description(),
                unit_amount_cents: line.unit_amount_cents,
                quantity: 1,
            })
            .collect();

        let checkout = self
            .gateway
            .create_checkout_session(&items, self.pricer.currency(), locked_until, urls)
            .await?;

        let stamped = self
            .store
            .stamp_checkout(session_id, &checkout.id, locked_until)
            .await?;

        tracing::info!(
            session_id,
            checkout_ref = %checkout.id,
            seats = stamped,
            "checkout started"
        );

        Ok(checkout)
    }

    /// Converts the locks stamped with `checkout_ref` into a permanent
    /// purchase. Driven by the provider's webhook, not the buyer's browser,
    /// and safe to receive more than once for the same reference.
    pub async fn confirm_settlement(
        &self,
        checkout_ref: &str,
        customer: &CustomerDetails,
    ) -> Result<SettlementOutcome, BookingError> {
        match self.store.settle_checkout(checkout_ref, customer).await? {
            SettlementOutcome::NoSeatsForRef => {
                Err(BookingError::NoSeatsForRef(checkout_ref.to_string()))
            }
            SettlementOutcome::AlreadySettled => {
                tracing::info!(checkout_ref, "duplicate settlement notification ignored");
                Ok(SettlementOutcome::AlreadySettled)
            }
            SettlementOutcome::Settled { seats } => {
                tracing::info!(checkout_ref, seats = seats.len(), "checkout settled");
                Ok(SettlementOutcome::Settled { seats })
            }
        }
    }
}
