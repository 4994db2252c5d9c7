//! Charging station catalog.
//!
//! Holds approved stations, pending owner registrations and reviews, and
//! hands the planner immutable snapshots of the station list.

mod error;
mod file;
mod store;

pub use error::CatalogError;
pub use file::{CatalogData, CatalogFile};
pub use store::{InMemoryCatalog, StationCatalog};
