use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;

use parterre_core::reservation::{AdminBatchOutcome, AdminOp, Purchase, SeatStatus};

use crate::error::BookingError;
use crate::service::ReservationService;

/// One seat of an admin batch, with the status the admin's screen showed
/// when they acted. A mismatch with the current status means the screen is
/// stale and the whole batch must be refused.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSelection {
    pub seat_id: String,
    pub expected: SeatStatus,
}

impl ReservationService {
    /// Privileged status toggles, bypassing payment and session ownership:
    /// available seats become box-office purchases, locked seats are freed
    /// whoever holds them, purchased seats are released (garbage-collecting
    /// the purchase when its last seat goes).
    ///
    /// All or nothing, twice over: classification mismatches reject the
    /// batch before any write, and the store re-checks every row inside the
    /// transaction so a concurrent booking rolls the whole batch back.
    pub async fn set_seat_statuses(
        &self,
        show_id: &str,
        selections: &[AdminSelection],
    ) -> Result<(), BookingError> {
        self.catalog.show(show_id)?;
        if selections.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        for selection in selections {
            self.catalog.seat(&selection.seat_id)?;
        }

        let now = Utc::now();
        let locks = self.store.locks_for_show(show_id).await?;
        let purchased = self.store.purchased_seats_for_show(show_id).await?;

        let active_locks: HashMap<&str, _> = locks
            .iter()
            .filter(|lock| lock.is_active(now))
            .map(|lock| (lock.seat_id.as_str(), lock))
            .collect();
        let purchased_by_seat: HashMap<&str, _> = purchased
            .iter()
            .map(|seat| (seat.seat_id.as_str(), seat))
            .collect();

        let mut contested = Vec::new();
        let mut ops = Vec::new();
        let mut seen = Vec::new();

        for selection in selections {
            if seen.contains(&selection.seat_id) {
                continue;
            }
            seen.push(selection.seat_id.clone());

            let current = if purchased_by_seat.contains_key(selection.seat_id.as_str()) {
                SeatStatus::Purchased
            } else if active_locks.contains_key(selection.seat_id.as_str()) {
                SeatStatus::Locked
            } else {
                SeatStatus::Available
            };

            if current != selection.expected {
                contested.push(selection.seat_id.clone());
                continue;
            }

            match current {
                SeatStatus::Available => ops.push(AdminOp::MarkPurchased {
                    show_id: show_id.to_string(),
                    seat_id: selection.seat_id.clone(),
                }),
                SeatStatus::Locked => ops.push(AdminOp::ReleaseLock {
                    lock: (*active_locks[selection.seat_id.as_str()]).clone(),
                }),
                SeatStatus::Purchased => ops.push(AdminOp::ReleasePurchase {
                    show_id: show_id.to_string(),
                    seat_id: selection.seat_id.clone(),
                    purchase_id: purchased_by_seat[selection.seat_id.as_str()]
                        .purchase_id
                        .clone(),
                }),
            }
        }

        if !contested.is_empty() {
            return Err(BookingError::StaleAdminView {
                seat_ids: contested,
            });
        }

        let purchase = Purchase::box_office();
        match self.store.apply_admin_batch(&purchase, &ops, now).await? {
            AdminBatchOutcome::Applied => {
                tracing::info!(show_id, ops = ops.len(), "admin seat statuses applied");
                Ok(())
            }
            AdminBatchOutcome::Contested { seat_ids } => {
                Err(BookingError::StaleAdminView { seat_ids })
            }
        }
    }
}
