use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use parterre_core::reservation::{UnavailabilityReason, UnavailableSeat};

use crate::error::BookingError;
use crate::service::ReservationService;

impl ReservationService {
    /// The seats of a show a customer cannot select right now, with the
    /// reason. Computed fresh on every call because correctness depends on
    /// wall-clock expiry; the result is advisory for rendering only and the
    /// locking protocol re-validates at write time.
    pub async fn unavailable_seats(
        &self,
        show_id: &str,
    ) -> Result<Vec<UnavailableSeat>, BookingError> {
        self.catalog.show(show_id)?;
        self.unavailable_seats_at(show_id, Utc::now()).await
    }

    pub(crate) async fn unavailable_seats_at(
        &self,
        show_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<UnavailableSeat>, BookingError> {
        let locks = self.store.locks_for_show(show_id).await?;
        let purchased = self.store.purchased_seats_for_show(show_id).await?;

        let mut by_seat: BTreeMap<String, UnavailabilityReason> = BTreeMap::new();

        for lock in locks {
            if lock.is_active(now) {
                by_seat.insert(
                    lock.seat_id,
                    UnavailabilityReason::Locked {
                        session_id: lock.session_id,
                        locked_until: lock.locked_until,
                    },
                );
            }
        }

        // A purchase always wins over a leaked lock row on the same seat.
        for seat in purchased {
            by_seat.insert(
                seat.seat_id,
                UnavailabilityReason::Purchased {
                    purchase_id: seat.purchase_id,
                },
            );
        }

        Ok(by_seat
            .into_iter()
            .map(|(seat_id, reason)| UnavailableSeat { seat_id, reason })
            .collect())
    }
}
