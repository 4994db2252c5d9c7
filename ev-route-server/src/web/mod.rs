//! Web layer for the EV route planner.
//!
//! Provides HTTP endpoints for trip planning and the station catalog.

mod dto;
mod routes;
mod state;
pub mod templates;

#[cfg(test)]
mod routes_tests;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, Planner};
pub use templates::*;
