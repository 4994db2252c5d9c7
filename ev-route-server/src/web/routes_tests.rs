//! Router tests driven through `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::auth::{Authenticator, Role};
use crate::catalog::InMemoryCatalog;
use crate::domain::{Coordinate, RouteSummary, Station, StationId};
use crate::planner::PlannerConfig;
use crate::routing::{FixtureRouteSource, RouteBackend};

const SECRET: &[u8] = b"router-test-secret";

fn coord(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

fn station(id: &str, lat: f64, lng: f64) -> Station {
    Station {
        id: StationId::new(id),
        name: format!("Station {id}"),
        address: String::new(),
        location: coord(lat, lng),
        power_kw: 50.0,
        cost_per_kwh: 0.35,
        connector: "CCS".to_string(),
        verified: true,
        rating: None,
        review_count: 0,
    }
}

/// 450 miles due north along longitude -100.
fn test_route() -> RouteSummary {
    RouteSummary {
        distance_miles: 450.0,
        duration_hours: 7.5,
        polyline: (0..=20)
            .map(|i| coord(30.0 + f64::from(i) * 0.3, -100.0))
            .collect(),
    }
}

fn setup_app() -> (Router, AppState) {
    let routes = RouteBackend::Fixture(FixtureRouteSource::new().with_route(
        "Laredo",
        "Amarillo",
        test_route(),
    ));
    let catalog = InMemoryCatalog::new(vec![
        station("s1", 30.3, -100.0),
        station("s2", 31.2, -99.99),
        // About 29 miles off the route
        station("s3", 33.0, -99.5),
    ]);
    let state = AppState::new(
        routes,
        catalog,
        PlannerConfig::default(),
        Authenticator::new(SECRET),
    );
    (create_router(state.clone(), "static"), state)
}

fn token(state: &AppState, role: Role) -> String {
    let subject = match role {
        Role::User => "user-1",
        Role::Owner => "owner-1",
        Role::Admin => "admin-1",
    };
    state.auth.issue(subject, role).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn read_json(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).unwrap()
}

fn plan_body(battery: i64) -> Value {
    json!({
        "origin": "Laredo",
        "destination": "Amarillo",
        "evRange": 250,
        "batteryPercent": battery
    })
}

#[tokio::test]
async fn health_check() {
    let (app, _) = setup_app();
    let response = send(&app, request("GET", "/health", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, b"ok");
}

#[tokio::test]
async fn index_page_renders() {
    let (app, _) = setup_app();
    let response = send(&app, request("GET", "/", None, None)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(read_body(response).await).unwrap();
    assert!(html.contains("3 charging stations"));
}

#[tokio::test]
async fn plan_requires_token() {
    let (app, _) = setup_app();
    let response = send(&app, request("POST", "/routes/plan", None, Some(plan_body(80)))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"], "authorization required");
}

#[tokio::test]
async fn plan_rejects_bad_token() {
    let (app, _) = setup_app();
    let other = Authenticator::new(b"some-other-secret")
        .issue("user-1", Role::User)
        .unwrap();

    let response = send(
        &app,
        request("POST", "/routes/plan", Some(&other), Some(plan_body(80))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn plan_trip() {
    let (app, state) = setup_app();
    let token = token(&state, Role::User);

    let response = send(
        &app,
        request("POST", "/routes/plan", Some(&token), Some(plan_body(80))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["route"]["chargingStops"], 2);
    assert_eq!(body["route"]["distance"], 450.0);
    assert_eq!(body["route"]["estimatedEnergy"], 135.0);
    assert_eq!(body["route"]["totalEnergy"], 120.0);
    assert_eq!(body["route"]["totalCost"], 42.0);

    let stations = body["stations"].as_array().unwrap();
    let ids: Vec<&str> = stations.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
    for s in stations {
        assert!(s["distanceFromRoute"].as_f64().unwrap() <= 5.0);
    }
}

#[tokio::test]
async fn plan_defaults_battery_percent() {
    let (app, state) = setup_app();
    let token = token(&state, Role::User);
    let body = json!({"origin": "Laredo", "destination": "Amarillo", "evRange": 250});

    let response = send(&app, request("POST", "/routes/plan", Some(&token), Some(body))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["route"]["chargingStops"], 2);
}

#[tokio::test]
async fn plan_as_html_fragment() {
    let (app, state) = setup_app();
    let token = token(&state, Role::User);

    let mut req = request("POST", "/routes/plan", Some(&token), Some(plan_body(80)));
    req.headers_mut()
        .insert(header::ACCEPT, "text/html".parse().unwrap());

    let response = send(&app, req).await;
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));

    let html = String::from_utf8(read_body(response).await).unwrap();
    assert!(html.contains("Station s1"));
    assert!(html.contains("Laredo"));
}

#[tokio::test]
async fn plan_rejects_invalid_battery() {
    let (app, state) = setup_app();
    let token = token(&state, Role::User);

    let response = send(
        &app,
        request("POST", "/routes/plan", Some(&token), Some(plan_body(150))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("battery"));
}

#[tokio::test]
async fn plan_rejects_malformed_json() {
    let (app, state) = setup_app();
    let token = token(&state, Role::User);

    let req = Request::builder()
        .method("POST")
        .uri("/routes/plan")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from("{\"origin\": "))
        .unwrap();

    let response = send(&app, req).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn unknown_route_is_bad_gateway() {
    let (app, state) = setup_app();
    let token = token(&state, Role::User);
    let body = json!({"origin": "Laredo", "destination": "Nowhere", "evRange": 250});

    let response = send(&app, request("POST", "/routes/plan", Some(&token), Some(body))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn list_and_get_stations() {
    let (app, _) = setup_app();

    let response = send(&app, request("GET", "/stations", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().unwrap().len(), 3);

    let response = send(&app, request("GET", "/stations/s2", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["name"], "Station s2");

    let response = send(&app, request("GET", "/stations/missing", None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn nearby_stations() {
    let (app, _) = setup_app();

    let response = send(
        &app,
        request("GET", "/stations?lat=30.3&lng=-100.0&radius=70", None, None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0]["id"], "s1");
    assert_eq!(found[0]["distance"], 0.0);
    assert_eq!(found[1]["id"], "s2");

    let response = send(&app, request("GET", "/stations?lat=30.3", None, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, request("GET", "/stations?lat=95&lng=0", None, None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_requires_admin() {
    let (app, state) = setup_app();
    let user = token(&state, Role::User);
    let admin = token(&state, Role::Admin);

    let response = send(&app, request("DELETE", "/stations/s1", None, None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, request("DELETE", "/stations/s1", Some(&user), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, request("DELETE", "/stations/s1", Some(&admin), None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, request("GET", "/stations/s1", None, None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn registration_approval_flow() {
    let (app, state) = setup_app();
    let owner = token(&state, Role::Owner);
    let admin = token(&state, Role::Admin);

    let details = json!({
        "name": "Canyon Chargers",
        "address": "1 Canyon Rd",
        "location": {"lat": 35.0, "lng": -101.9},
        "powerKw": 150,
        "costPerKwh": 0.42,
        "connector": "CCS"
    });
    let response = send(
        &app,
        request("POST", "/registrations", Some(&owner), Some(details)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let registration = read_json(response).await;
    assert_eq!(registration["ownerId"], "owner-1");
    let reg_id = registration["id"].as_str().unwrap().to_string();

    // Listing is admin only
    let response = send(&app, request("GET", "/registrations", Some(&owner), None)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(&app, request("GET", "/registrations", Some(&admin), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().unwrap().len(), 1);

    let uri = format!("/registrations/{reg_id}/approve");
    let response = send(&app, request("POST", &uri, Some(&admin), None)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let station = read_json(response).await;
    assert_eq!(station["verified"], true);
    let station_id = station["id"].as_str().unwrap();

    let response = send(&app, request("GET", &format!("/stations/{station_id}"), None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Approving twice fails
    let response = send(&app, request("POST", &uri, Some(&admin), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_registration_rejected() {
    let (app, state) = setup_app();
    let owner = token(&state, Role::Owner);

    let details = json!({
        "name": "No Power",
        "location": {"lat": 35.0, "lng": -101.9},
        "powerKw": 0,
        "costPerKwh": 0.42
    });
    let response = send(
        &app,
        request("POST", "/registrations", Some(&owner), Some(details)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.catalog.pending().await.is_empty());
}

#[tokio::test]
async fn reviews_update_station_rating() {
    let (app, state) = setup_app();
    let user = token(&state, Role::User);

    let response = send(
        &app,
        request(
            "POST",
            "/stations/s1/reviews",
            Some(&user),
            Some(json!({"rating": 5, "comment": "quick"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, request("GET", "/stations/s1", None, None)).await;
    let station = read_json(response).await;
    assert_eq!(station["rating"], 5.0);
    assert_eq!(station["reviewCount"], 1);

    let response = send(&app, request("GET", "/stations/s1/reviews", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let reviews = read_json(response).await;
    assert_eq!(reviews[0]["comment"], "quick");
    assert_eq!(reviews[0]["userId"], "user-1");
}

#[tokio::test]
async fn review_validation() {
    let (app, state) = setup_app();
    let user = token(&state, Role::User);

    let response = send(
        &app,
        request("POST", "/stations/s1/reviews", None, Some(json!({"rating": 4}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        request(
            "POST",
            "/stations/s1/reviews",
            Some(&user),
            Some(json!({"rating": 9})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        request(
            "POST",
            "/stations/nope/reviews",
            Some(&user),
            Some(json!({"rating": 4})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_signed_in_role_may_register_a_station() {
    let (app, state) = setup_app();
    let user = token(&state, Role::User);

    let details = json!({
        "name": "Driveway Charger",
        "location": {"lat": 35.1, "lng": -101.8},
        "powerKw": 7.2,
        "costPerKwh": 0.2
    });
    let response = send(
        &app,
        request("POST", "/registrations", Some(&user), Some(details)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(read_json(response).await["ownerId"], "user-1");

    let pending = state.catalog.pending().await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].owner_id, "user-1");
}
