use parterre_catalog::CatalogError;
use parterre_core::error::StoreError;
use parterre_core::payment::PaymentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("show not found: {0}")]
    ShowNotFound(String),

    #[error("seat not found: {0}")]
    SeatNotFound(String),

    #[error("seat {0} is not in the basket")]
    SeatNotInBasket(String),

    #[error("seat {0} cannot be sold")]
    SeatNotSellable(String),

    #[error("no seats selected")]
    EmptySelection,

    #[error("basket is empty")]
    EmptyBasket,

    #[error("booking is closed")]
    BookingClosed,

    /// The whole selection batch was rejected; these seats are claimed by
    /// someone else. The caller should refresh availability before letting
    /// the user retry.
    #[error("seats are no longer available: {}", .seat_ids.join(", "))]
    SeatsConflict { seat_ids: Vec<String> },

    /// The admin acted on a stale screen; nothing was applied.
    #[error("seat statuses changed since the last refresh: {}", .seat_ids.join(", "))]
    StaleAdminView { seat_ids: Vec<String> },

    /// A settlement notification referenced a checkout nobody started.
    #[error("no seats found for checkout reference {0}")]
    NoSeatsForRef(String),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CatalogError> for BookingError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ShowNotFound(id) => BookingError::ShowNotFound(id),
            CatalogError::SeatNotFound(id) => BookingError::SeatNotFound(id),
        }
    }
}
