pub mod admin;
pub mod availability;
pub mod checkout;
pub mod error;
pub mod locking;
pub mod service;

pub use admin::AdminSelection;
pub use checkout::BasketLine;
pub use error::BookingError;
pub use service::ReservationService;
