use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A temporary claim on one seat of one show, owned by a browsing session.
///
/// At most one lock exists per `(show_id, seat_id)` at a time; the store's
/// composite primary key enforces it. A lock whose `locked_until` is in the
/// past is logically gone even while the row is still present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatLock {
    pub show_id: String,
    pub seat_id: String,
    pub session_id: String,
    pub locked_until: DateTime<Utc>,
    /// Set once checkout begins; settlement finds the basket through it.
    pub checkout_ref: Option<String>,
    /// Billing modifier on the line item, not a state transition.
    pub has_child_on_lap: bool,
}

impl SeatLock {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.locked_until > now
    }
}

/// A completed transaction. `id` is the payment provider's checkout session
/// id, or `admin-<uuid>` for box-office purchases issued without payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Purchase {
    pub const ADMIN_ID_PREFIX: &'static str = "admin-";

    /// Synthetic purchase record backing admin seat allocations.
    pub fn box_office() -> Self {
        Self {
            id: format!("{}{}", Self::ADMIN_ID_PREFIX, Uuid::new_v4()),
            name: "Guichet".to_string(),
            email: "guichet@parterre.local".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasedSeat {
    pub show_id: String,
    pub seat_id: String,
    pub purchase_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

/// Why a seat cannot be selected right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnavailabilityReason {
    Locked {
        session_id: String,
        locked_until: DateTime<Utc>,
    },
    Purchased {
        purchase_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnavailableSeat {
    pub seat_id: String,
    #[serde(flatten)]
    pub reason: UnavailabilityReason,
}

/// Seat state as classified by the availability resolver. Also the
/// vocabulary of the admin override's expected-status checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Locked,
    Purchased,
}

/// Result of running the settlement transaction for a checkout reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Locks were converted into a purchase.
    Settled { seats: Vec<PurchasedSeat> },
    /// A purchase for this reference already exists; duplicate
    /// notification, nothing reprocessed.
    AlreadySettled,
    /// Neither locks nor a purchase reference this id.
    NoSeatsForRef,
}

/// One conditioned write of an admin status batch. Every condition captures
/// the state the admin's screen was classified against; a miss at apply
/// time means a concurrent booking won and the batch must roll back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminOp {
    /// available -> purchased, under the batch's synthetic purchase.
    MarkPurchased { show_id: String, seat_id: String },
    /// locked -> available, conditioned on the exact lock row observed.
    ReleaseLock { lock: SeatLock },
    /// purchased -> available; the purchase row is garbage-collected once
    /// its last seat is released.
    ReleasePurchase {
        show_id: String,
        seat_id: String,
        purchase_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminBatchOutcome {
    Applied,
    /// Rolled back; these seats changed under the admin's feet.
    Contested { seat_ids: Vec<String> },
}
