pub mod error;
pub mod payment;
pub mod repository;
pub mod reservation;

pub use error::StoreError;
pub use repository::ReservationStore;
