pub mod app_config;
pub mod database;
pub mod reservation_repo;

pub use app_config::{BusinessRules, Config};
pub use database::DbClient;
pub use reservation_repo::SqliteReservationStore;
