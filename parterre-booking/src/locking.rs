use chrono::{DateTime, Duration, Utc};

use parterre_core::error::StoreError;
use parterre_core::reservation::{PurchasedSeat, SeatLock};

use crate::error::BookingError;
use crate::service::ReservationService;

/// The selected seats another party already claims: locked by a different
/// session and unexpired, or purchased. Order follows the selection.
fn contested_seats(
    selected: &[String],
    locks: &[SeatLock],
    purchased: &[PurchasedSeat],
    session_id: &str,
    now: DateTime<Utc>,
) -> Vec<String> {
    selected
        .iter()
        .filter(|seat_id| {
            let locked_by_other = locks.iter().any(|lock| {
                lock.seat_id == **seat_id && lock.session_id != session_id && lock.is_active(now)
            });
            let is_purchased = purchased.iter().any(|seat| seat.seat_id == **seat_id);
            locked_by_other || is_purchased
        })
        .cloned()
        .collect()
}

impl ReservationService {
    /// Replaces the session's claim on a show with the given selection.
    ///
    /// All or nothing: if any selected seat is claimed by someone else the
    /// whole batch is rejected and nothing is written. On success every
    /// selected seat is exclusively locked to the session until
    /// `now + selection_hold`.
    pub async fn submit_selection(
        &self,
        show_id: &str,
        session_id: &str,
        selected_seat_ids: &[String],
    ) -> Result<(), BookingError> {
        self.catalog.show(show_id)?;

        let mut selected: Vec<String> = Vec::with_capacity(selected_seat_ids.len());
        for seat_id in selected_seat_ids {
            if !selected.contains(seat_id) {
                selected.push(seat_id.clone());
            }
        }
        if selected.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        for seat_id in &selected {
            let seat = self.catalog.seat(seat_id)?;
            if seat.is_security {
                return Err(BookingError::SeatNotSellable(seat_id.clone()));
            }
        }

        let now = Utc::now();
        let seat_locks = self.store.locks_for_seats(show_id, &selected).await?;
        let purchased = self.store.purchased_seats_for_show(show_id).await?;

        let contested = contested_seats(&selected, &seat_locks, &purchased, session_id, now);
        if !contested.is_empty() {
            return Err(BookingError::SeatsConflict {
                seat_ids: contested,
            });
        }

        // Clear every snapshot row before re-inserting: at this point each
        // one is either this session's own lock or an expired leftover.
        // Compare-and-delete against the exact row read: one that changed
        // in between is left alone and the insert below arbitrates.
        for lock in &seat_locks {
            self.store.delete_lock_if_unchanged(lock).await?;
        }

        let locked_until = now + Duration::minutes(self.rules.selection_hold_minutes);
        let fresh: Vec<SeatLock> = selected
            .iter()
            .map(|seat_id| SeatLock {
                show_id: show_id.to_string(),
                seat_id: seat_id.clone(),
                session_id: session_id.to_string(),
                locked_until,
                checkout_ref: None,
                has_child_on_lap: false,
            })
            .collect();

        match self.store.insert_locks(&fresh).await {
            Ok(()) => {
                tracing::debug!(show_id, session_id, seats = selected.len(), "seats locked");
                Ok(())
            }
            Err(StoreError::UniqueViolation) => {
                // Lost a race between the read and the insert. Re-read so
                // the conflict names the seats that are actually contested.
                let locks_now = self.store.locks_for_seats(show_id, &selected).await?;
                let purchased_now = self.store.purchased_seats_for_show(show_id).await?;
                let mut contested =
                    contested_seats(&selected, &locks_now, &purchased_now, session_id, Utc::now());
                if contested.is_empty() {
                    contested = selected;
                }
                Err(BookingError::SeatsConflict {
                    seat_ids: contested,
                })
            }
            Err(other) => Err(other.into()),
        }
    }

    /// Drops one seat from the session's basket. Only the owner's row can
    /// match, so no conflict check is needed; removing an already-gone seat
    /// is a no-op.
    pub async fn remove_seat(
        &self,
        session_id: &str,
        show_id: &str,
        seat_id: &str,
    ) -> Result<(), BookingError> {
        self.store
            .delete_lock_for_session(session_id, show_id, seat_id)
            .await?;
        Ok(())
    }

    /// Toggles the child-on-lap billing modifier on one held seat.
    pub async fn set_child_on_lap(
        &self,
        session_id: &str,
        show_id: &str,
        seat_id: &str,
        has_child_on_lap: bool,
    ) -> Result<(), BookingError> {
        let updated = self
            .store
            .set_child_on_lap(session_id, show_id, seat_id, has_child_on_lap)
            .await?;
        if !updated {
            return Err(BookingError::SeatNotInBasket(seat_id.to_string()));
        }
        Ok(())
    }
}
