pub mod catalog;
pub mod plan;
pub mod pricing;
pub mod seat;
pub mod show;
pub mod venue;

pub use catalog::{Catalog, CatalogError};
pub use seat::{Seat, SeatAttributes, SectionKind};
pub use show::Show;
