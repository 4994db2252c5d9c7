//! Application state for the web layer.

use std::sync::Arc;

use crate::auth::Authenticator;
use crate::catalog::InMemoryCatalog;
use crate::planner::{PlannerConfig, RoutePlanningService};
use crate::routing::RouteBackend;

/// The planning service as configured for the server.
pub type Planner = RoutePlanningService<RouteBackend, InMemoryCatalog>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Trip planner (owns the plan cache)
    pub planner: Arc<Planner>,

    /// Station catalog, shared with the planner
    pub catalog: InMemoryCatalog,

    /// Bearer token verification
    pub auth: Arc<Authenticator>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        routes: RouteBackend,
        catalog: InMemoryCatalog,
        config: PlannerConfig,
        auth: Authenticator,
    ) -> Self {
        Self {
            planner: Arc::new(RoutePlanningService::new(routes, catalog.clone(), config)),
            catalog,
            auth: Arc::new(auth),
        }
    }
}
