//! HTTP route handlers.

use askama::Template;
use axum::body::Bytes;
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::de::DeserializeOwned;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::auth::{AuthError, Claims};
use crate::catalog::{CatalogError, StationCatalog};
use crate::domain::{Coordinate, PendingRegistration, RegistrationId, StationDetails, StationId};
use crate::planner::PlanError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<std::path::Path>) -> Router {
    let public = Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/stations", get(list_stations))
        .route("/stations/:id", get(get_station))
        .route("/stations/:id/reviews", get(list_reviews));

    let authenticated = Router::new()
        .route("/routes/plan", post(plan_route))
        .route("/stations/:id/reviews", post(add_review))
        .route("/registrations", post(submit_registration))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let admin = Router::new()
        .route("/stations/:id", delete(delete_station))
        .route("/registrations", get(list_registrations))
        .route("/registrations/:id/approve", post(approve_registration))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Require a valid bearer token; the claims are passed on to the handler.
async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.auth.authenticate(request.headers())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Require a valid bearer token with the admin role.
async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state.auth.authenticate(request.headers())?;
    if !claims.is_admin() {
        return Err(AuthError::Forbidden.into());
    }
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the planning form.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let template = IndexTemplate {
        station_count: state.catalog.len().await,
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Parse a JSON body, logging it on failure.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Plan a trip with charging stops.
async fn plan_route(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: PlanRouteRequest = parse_json(&body)?;
    let trip = req.to_trip_request();

    let plan = state.planner.plan(&trip).await?;
    info!(
        user = %claims.sub,
        origin = %trip.origin,
        destination = %trip.destination,
        stops = plan.charging_stops_needed,
        "trip planned"
    );

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = PlanResultsTemplate {
            plan: PlanView::from_plan(&trip, &plan),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        Ok(Json(PlanRouteResponse::from_plan(&trip, &plan)).into_response())
    }
}

/// List stations, or those within a radius when `lat` and `lng` are given.
async fn list_stations(
    State(state): State<AppState>,
    Query(query): Query<StationQuery>,
) -> Result<Response, AppError> {
    match (query.lat, query.lng) {
        (None, None) => {
            let stations = state.catalog.all().await;
            Ok(Json(stations.to_vec()).into_response())
        }
        (Some(lat), Some(lng)) => {
            let center = Coordinate::new(lat, lng).map_err(|e| AppError::BadRequest {
                message: e.to_string(),
            })?;
            let radius = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_MILES);
            if !radius.is_finite() || radius < 0.0 {
                return Err(AppError::BadRequest {
                    message: format!("radius must be a non-negative number, got {radius}"),
                });
            }

            let nearby: Vec<NearbyStationResult> = state
                .catalog
                .nearby(&center, radius)
                .await
                .into_iter()
                .map(|(station, distance)| NearbyStationResult {
                    station,
                    distance: round2(distance),
                })
                .collect();
            Ok(Json(nearby).into_response())
        }
        _ => Err(AppError::BadRequest {
            message: "lat and lng must be given together".to_string(),
        }),
    }
}

/// Get one station.
async fn get_station(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = StationId::new(id);
    let station = state
        .catalog
        .get_by_id(&id)
        .await
        .ok_or(CatalogError::StationNotFound(id))?;
    Ok(Json(station).into_response())
}

/// Remove a station (admin only).
async fn delete_station(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let removed = state.catalog.remove(&StationId::new(id)).await?;
    state.planner.invalidate_cache();
    info!(admin = %claims.sub, station = %removed.id, "station deleted");
    Ok(Json(removed).into_response())
}

/// List a station's reviews.
async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let reviews = state.catalog.reviews_for(&StationId::new(id)).await?;
    Ok(Json(reviews).into_response())
}

/// Review a station.
async fn add_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: ReviewRequest = parse_json(&body)?;
    let review = state
        .catalog
        .add_review(&StationId::new(id), &claims.sub, req.rating, &req.comment)
        .await?;
    // Cached plans carry station ratings
    state.planner.invalidate_cache();
    Ok((StatusCode::CREATED, Json(review)).into_response())
}

/// Submit a station for approval.
async fn submit_registration(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> Result<Response, AppError> {
    let details: StationDetails = parse_json(&body)?;
    let registration = state
        .catalog
        .submit_registration(&claims.sub, details)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)).into_response())
}

/// List registrations awaiting approval (admin only).
async fn list_registrations(State(state): State<AppState>) -> Json<Vec<PendingRegistration>> {
    Json(state.catalog.pending().await)
}

/// Approve a registration, creating the station (admin only).
async fn approve_registration(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let station = state.catalog.approve(&RegistrationId::new(id)).await?;
    state.planner.invalidate_cache();
    info!(admin = %claims.sub, station = %station.id, "station approved");
    Ok((StatusCode::CREATED, Json(station)).into_response())
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Unauthorized { message: String },
    Forbidden { message: String },
    NotFound { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InvalidRequest(message) => AppError::BadRequest { message },
            PlanError::RouteUnavailable(_) => AppError::BadGateway {
                message: e.to_string(),
            },
            PlanError::Internal(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Forbidden => AppError::Forbidden {
                message: e.to_string(),
            },
            _ => AppError::Unauthorized {
                message: e.to_string(),
            },
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::StationNotFound(_) | CatalogError::RegistrationNotFound(_) => {
                AppError::NotFound {
                    message: e.to_string(),
                }
            }
            CatalogError::Invalid(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            CatalogError::Persist { .. } => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized { message } => (StatusCode::UNAUTHORIZED, message),
            AppError::Forbidden { message } => (StatusCode::FORBIDDEN, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
