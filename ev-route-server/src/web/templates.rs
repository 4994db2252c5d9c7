//! Askama templates for the web frontend.

use askama::Template;

use crate::planner::{StopPlan, TripPlan, TripRequest};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with the trip planning form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub station_count: usize,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Plan results fragment.
#[derive(Template)]
#[template(path = "plan_results.html")]
pub struct PlanResultsTemplate {
    pub plan: PlanView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Trip plan view model for templates.
#[derive(Debug, Clone)]
pub struct PlanView {
    pub origin: String,
    pub destination: String,
    pub distance: String,
    pub duration: String,
    pub charging_stops: u32,
    pub trip_energy: String,
    pub total_energy: String,
    pub total_cost: String,
    pub total_charging_time: String,
    pub stops: Vec<StopView>,
}

impl PlanView {
    pub fn from_plan(request: &TripRequest, plan: &TripPlan) -> Self {
        let needed = plan.charging_stops_needed as usize;
        Self {
            origin: request.origin.clone(),
            destination: request.destination.clone(),
            distance: format!("{:.0}", plan.route.distance_miles),
            duration: format_hours(plan.route.duration_hours),
            charging_stops: plan.charging_stops_needed,
            trip_energy: format!("{:.1}", plan.trip_energy_kwh),
            total_energy: format!("{:.1}", plan.total_estimated_energy_kwh),
            total_cost: format!("{:.2}", plan.total_estimated_cost),
            total_charging_time: format_hours(plan.total_charging_hours),
            stops: plan
                .stops
                .iter()
                .enumerate()
                .map(|(i, stop)| StopView::from_stop(stop, i < needed))
                .collect(),
        }
    }

    /// Whether the trip can be driven on the current charge.
    pub fn no_stops_needed(&self) -> bool {
        self.charging_stops == 0
    }
}

/// Charging stop view model for templates.
#[derive(Debug, Clone)]
pub struct StopView {
    pub name: String,
    pub address: String,
    pub connector: String,
    pub power: String,
    pub distance_from_route: String,
    pub charging_time: String,
    pub cost: String,
    pub rating: Option<String>,
    /// Counted in the trip totals (as opposed to an extra option)
    pub required: bool,
}

impl StopView {
    pub fn from_stop(stop: &StopPlan, required: bool) -> Self {
        let station = &stop.station;
        Self {
            name: station.name.clone(),
            address: station.address.clone(),
            connector: station.connector.clone(),
            power: format!("{:.0} kW", station.power_kw),
            distance_from_route: format!("{:.1} mi", stop.distance_from_route_miles),
            charging_time: format_hours(stop.estimated_charging_hours),
            cost: format!("{:.2}", stop.estimated_charging_cost),
            rating: station
                .rating
                .map(|r| format!("{:.1} ({})", r, station.review_count)),
            required,
        }
    }
}

/// Format hours as e.g. "1h 12m" or "45m".
fn format_hours(hours: f64) -> String {
    let total_mins = (hours * 60.0).round().max(0.0) as u64;
    let (h, m) = (total_mins / 60, total_mins % 60);
    if h == 0 {
        format!("{m}m")
    } else {
        format!("{h}h {m}m")
    }
}
