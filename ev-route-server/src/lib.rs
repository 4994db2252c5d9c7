//! Electric vehicle trip planner server.
//!
//! Given an origin, a destination and a vehicle's range, the planner fetches
//! the driving route, works out how many charging stops the trip needs and
//! picks catalog stations close to the route, with energy, time and cost
//! estimates for each stop.
//!
//! Station owners submit registrations that admins approve into the catalog;
//! drivers can review stations.

pub mod auth;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod geo;
pub mod planner;
pub mod routing;
pub mod web;
