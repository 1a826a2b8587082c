use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::reservation::{
    AdminBatchOutcome, AdminOp, CustomerDetails, Purchase, PurchasedSeat, SeatLock,
    SettlementOutcome,
};

/// The durable reservation store. One handle is constructed at startup and
/// passed into every protocol operation; all cross-request coordination
/// happens through its conditional writes and unique keys.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Locks over the given seats of a show, any session, any expiry.
    async fn locks_for_seats(
        &self,
        show_id: &str,
        seat_ids: &[String],
    ) -> Result<Vec<SeatLock>, StoreError>;

    /// Every lock row of a show, any session, any expiry.
    async fn locks_for_show(&self, show_id: &str) -> Result<Vec<SeatLock>, StoreError>;

    /// The session's live basket: its locks with `locked_until > now`.
    async fn locks_for_session(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<SeatLock>, StoreError>;

    /// Locks stamped with a checkout reference, any expiry.
    async fn locks_for_checkout_ref(
        &self,
        checkout_ref: &str,
    ) -> Result<Vec<SeatLock>, StoreError>;

    async fn purchased_seats_for_show(
        &self,
        show_id: &str,
    ) -> Result<Vec<PurchasedSeat>, StoreError>;

    async fn purchase(&self, purchase_id: &str) -> Result<Option<Purchase>, StoreError>;

    /// Inserts fresh lock rows, all or nothing. A `(show_id, seat_id)`
    /// already held by anyone fails the whole batch with
    /// [`StoreError::UniqueViolation`]; callers must treat that as a lost
    /// race, never upsert over it.
    async fn insert_locks(&self, locks: &[SeatLock]) -> Result<(), StoreError>;

    /// Compare-and-delete: removes the lock only while `(show_id, seat_id,
    /// session_id, locked_until)` still match the snapshot that was read.
    /// Returns whether a row was deleted.
    async fn delete_lock_if_unchanged(&self, lock: &SeatLock) -> Result<bool, StoreError>;

    /// Owner-scoped removal of one basket seat.
    async fn delete_lock_for_session(
        &self,
        session_id: &str,
        show_id: &str,
        seat_id: &str,
    ) -> Result<bool, StoreError>;

    /// Owner-scoped modifier update. Returns whether a row matched.
    async fn set_child_on_lap(
        &self,
        session_id: &str,
        show_id: &str,
        seat_id: &str,
        has_child_on_lap: bool,
    ) -> Result<bool, StoreError>;

    /// Stamps every lock of the session with the checkout reference and the
    /// extended expiry, in one statement. Returns the number of stamped
    /// rows. Same-owner last-write-wins is fine here; seat ownership is
    /// never in question.
    async fn stamp_checkout(
        &self,
        session_id: &str,
        checkout_ref: &str,
        locked_until: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    /// The settlement transaction: insert the purchase keyed by
    /// `checkout_ref`, insert one purchased seat per stamped lock, delete
    /// the stamped locks. All or nothing, idempotent per reference.
    async fn settle_checkout(
        &self,
        checkout_ref: &str,
        customer: &CustomerDetails,
    ) -> Result<SettlementOutcome, StoreError>;

    /// Applies an admin status batch in one transaction. `purchase` backs
    /// any `MarkPurchased` ops and is only inserted when one is present.
    /// Any conditioned write that misses rolls the whole batch back.
    async fn apply_admin_batch(
        &self,
        purchase: &Purchase,
        ops: &[AdminOp],
        now: DateTime<Utc>,
    ) -> Result<AdminBatchOutcome, StoreError>;
}
