//! Domain types for the EV route planner.
//!
//! Value types here enforce their invariants at construction time where the
//! data comes from users. Station records loaded from storage are taken as
//! stored and checked by the code that relies on them.

mod coordinate;
mod error;
mod registration;
mod review;
mod route;
mod station;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use error::DomainError;
pub use registration::{PendingRegistration, RegistrationId, StationDetails};
pub use review::Review;
pub use route::RouteSummary;
pub use station::{Station, StationId};
