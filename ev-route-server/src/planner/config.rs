//! Tunables for trip planning.

use std::time::Duration;

use crate::cache::CacheConfig;

/// Configuration parameters for the planning pipeline.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Fraction of the full range usable per charging stop.
    pub safety_buffer: f64,

    /// Energy the vehicle uses per mile (kWh).
    pub energy_per_mile_kwh: f64,

    /// Maximum straight-line distance from the route for a station to be
    /// considered (miles).
    pub max_distance_miles: f64,

    /// Station options returned beyond the number of stops needed.
    pub extra_options: usize,

    /// How long a computed plan is served from cache.
    pub cache_ttl: Duration,

    /// Maximum number of cached plans.
    pub cache_capacity: u64,

    /// Deadline for resolving a route when the caller gives none.
    pub route_timeout: Duration,
}

impl PlannerConfig {
    /// Set the safety buffer.
    pub fn with_safety_buffer(mut self, buffer: f64) -> Self {
        self.safety_buffer = buffer;
        self
    }

    /// Set the maximum lateral distance from the route.
    pub fn with_max_distance(mut self, miles: f64) -> Self {
        self.max_distance_miles = miles;
        self
    }

    /// Set the cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the route deadline.
    pub fn with_route_timeout(mut self, timeout: Duration) -> Self {
        self.route_timeout = timeout;
        self
    }

    /// Cache settings derived from this config.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self.cache_ttl,
            max_capacity: self.cache_capacity,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            safety_buffer: 0.8,
            energy_per_mile_kwh: super::cost::DEFAULT_ENERGY_PER_MILE_KWH,
            max_distance_miles: 5.0,
            extra_options: 2,
            cache_ttl: Duration::from_secs(5 * 60),
            cache_capacity: 1000,
            route_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlannerConfig::default();

        assert_eq!(config.safety_buffer, 0.8);
        assert_eq!(config.energy_per_mile_kwh, 0.3);
        assert_eq!(config.max_distance_miles, 5.0);
        assert_eq!(config.extra_options, 2);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.route_timeout, Duration::from_secs(30));
    }

    #[test]
    fn custom_config() {
        let config = PlannerConfig::default()
            .with_safety_buffer(0.7)
            .with_max_distance(2.5)
            .with_cache_ttl(Duration::from_millis(50))
            .with_route_timeout(Duration::from_secs(1));

        assert_eq!(config.safety_buffer, 0.7);
        assert_eq!(config.max_distance_miles, 2.5);
        assert_eq!(config.route_timeout, Duration::from_secs(1));

        let cache = config.cache_config();
        assert_eq!(cache.ttl, Duration::from_millis(50));
        assert_eq!(cache.max_capacity, 1000);
    }
}
