use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use ev_route_server::auth::Authenticator;
use ev_route_server::catalog::{CatalogFile, InMemoryCatalog};
use ev_route_server::config::Config;
use ev_route_server::planner::PlannerConfig;
use ev_route_server::routing::{FixtureRouteSource, OsrmClient, OsrmConfig, RouteBackend};
use ev_route_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ev_route_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.using_dev_secret {
        warn!("EV_ROUTE_JWT_SECRET not set, using the development secret");
    }

    let catalog = InMemoryCatalog::load(CatalogFile::new(config.data_path.clone()))?;

    let routes = match &config.fixtures_path {
        Some(path) => {
            info!(?path, "serving routes from fixtures");
            RouteBackend::Fixture(FixtureRouteSource::from_file(path)?)
        }
        None => {
            let osrm = match &config.osrm_url {
                Some(url) => OsrmConfig::new(url),
                None => OsrmConfig::default(),
            };
            info!(url = %osrm.base_url, "routing with OSRM");
            RouteBackend::Osrm(OsrmClient::new(osrm)?)
        }
    };

    let auth = Authenticator::new(config.jwt_secret.as_bytes());
    let state = AppState::new(routes, catalog, PlannerConfig::default(), auth);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("EV trip planner listening on http://{}", config.addr);
    info!("  POST /routes/plan                   - Plan a trip (token)");
    info!("  GET  /stations[?lat&lng&radius]     - List or search stations");
    info!("  POST /stations/:id/reviews          - Review a station (token)");
    info!("  POST /registrations                 - Register a station (token)");
    info!("  POST /registrations/:id/approve     - Approve a registration (admin)");

    axum::serve(listener, app).await?;
    Ok(())
}
