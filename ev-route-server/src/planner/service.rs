//! The trip planning pipeline.
//!
//! Validates a request, resolves the route, works out how many charging stops
//! the trip needs, then picks and prices stations along the way. Successful
//! plans are cached per request for a short time; failures never are.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::catalog::StationCatalog;
use crate::domain::RouteSummary;
use crate::routing::{RouteError, RouteSource};

use super::config::PlannerConfig;
use super::cost;
use super::error::PlanError;
use super::matcher::match_stations;
use super::plan::{TripPlan, TripRequest};
use super::stops::stops_needed;

/// Cache key built from the exact request fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    origin: String,
    destination: String,
    range_bits: u64,
    battery_percent: i32,
}

impl From<&TripRequest> for PlanKey {
    fn from(request: &TripRequest) -> Self {
        Self {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            range_bits: request.vehicle_range_miles.to_bits(),
            battery_percent: request.battery_percent,
        }
    }
}

/// Plans trips against a route source and a station catalog.
///
/// The service owns its result cache, so each instance starts cold.
pub struct RoutePlanningService<R, C> {
    routes: R,
    catalog: C,
    cache: TtlCache<PlanKey, Arc<TripPlan>>,
    config: PlannerConfig,
}

impl<R: RouteSource, C: StationCatalog> RoutePlanningService<R, C> {
    /// Create a service with a cache sized from `config`.
    pub fn new(routes: R, catalog: C, config: PlannerConfig) -> Self {
        let cache = TtlCache::new(&config.cache_config());
        Self::with_cache(routes, catalog, cache, config)
    }

    /// Create a service using the given cache.
    pub fn with_cache(
        routes: R,
        catalog: C,
        cache: TtlCache<PlanKey, Arc<TripPlan>>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            routes,
            catalog,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Approximate number of cached plans.
    pub fn cached_plans(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Drop all cached plans, e.g. after the catalog changes.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Plan a trip using the configured route deadline.
    pub async fn plan(&self, request: &TripRequest) -> Result<Arc<TripPlan>, PlanError> {
        self.plan_within(request, self.config.route_timeout).await
    }

    /// Plan a trip, giving the route source at most `deadline` to answer.
    pub async fn plan_within(
        &self,
        request: &TripRequest,
        deadline: Duration,
    ) -> Result<Arc<TripPlan>, PlanError> {
        request.validate()?;

        let key = PlanKey::from(request);
        if let Some(plan) = self.cache.get(&key).await {
            debug!(origin = %request.origin, destination = %request.destination, "plan cache hit");
            return Ok(plan);
        }

        let route = self.resolve_route(request, deadline).await?;
        debug!(
            distance_miles = route.distance_miles,
            points = route.polyline.len(),
            "route resolved"
        );

        let plan = Arc::new(self.build_plan(request, route).await?);
        self.cache.insert(key, Arc::clone(&plan)).await;

        Ok(plan)
    }

    async fn resolve_route(
        &self,
        request: &TripRequest,
        deadline: Duration,
    ) -> Result<RouteSummary, RouteError> {
        let lookup = self.routes.resolve(&request.origin, &request.destination);

        let route = match tokio::time::timeout(deadline, lookup).await {
            Ok(Ok(route)) => route,
            Ok(Err(e)) => {
                warn!(origin = %request.origin, destination = %request.destination, error = %e, "route lookup failed");
                return Err(e);
            }
            Err(_) => {
                warn!(origin = %request.origin, destination = %request.destination, ?deadline, "route lookup timed out");
                return Err(RouteError::Timeout(deadline));
            }
        };

        check_route(&route)?;
        Ok(route)
    }

    async fn build_plan(
        &self,
        request: &TripRequest,
        route: RouteSummary,
    ) -> Result<TripPlan, PlanError> {
        let config = &self.config;

        let needed = stops_needed(
            route.distance_miles,
            request.vehicle_range_miles,
            request.battery_percent,
            config.safety_buffer,
        )
        .map_err(|e| PlanError::Internal(e.to_string()))?;
        debug!(needed, "charging stops planned");

        let stations = self.catalog.all().await;
        let matches = match_stations(&stations, &route.polyline, config.max_distance_miles);
        debug!(
            catalog = stations.len(),
            matched = matches.len(),
            "stations matched"
        );

        // Invalid stations drop out here, before the option window is cut
        let mut stops = cost::estimate(
            &matches,
            request.vehicle_range_miles,
            config.safety_buffer,
            config.energy_per_mile_kwh,
        );
        stops.truncate(needed as usize + config.extra_options);

        let required = stops.len().min(needed as usize);
        let totals = cost::aggregate(&stops[..required]);

        Ok(TripPlan {
            trip_energy_kwh: route.distance_miles * config.energy_per_mile_kwh,
            route,
            charging_stops_needed: needed,
            stops,
            total_estimated_energy_kwh: totals.energy_kwh,
            total_estimated_cost: totals.cost,
            total_charging_hours: totals.charging_hours,
        })
    }
}

/// Reject routes the planner cannot work with.
fn check_route(route: &RouteSummary) -> Result<(), RouteError> {
    if route.polyline.len() < 2 {
        return Err(RouteError::InvalidRoute(
            "polyline must have at least two points",
        ));
    }
    if !route.distance_miles.is_finite() || route.distance_miles < 0.0 {
        return Err(RouteError::InvalidRoute(
            "distance must be a non-negative number",
        ));
    }
    if !route.duration_hours.is_finite() || route.duration_hours < 0.0 {
        return Err(RouteError::InvalidRoute(
            "duration must be a non-negative number",
        ));
    }
    Ok(())
}
