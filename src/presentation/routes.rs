// Page router
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    battery_disposal, current_scene, health_check, map_ready, planner_page, submit_trip,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(planner_page).post(submit_trip))
        .route("/battery-disposal", get(battery_disposal))
        .route("/healthz", get(health_check))
        .route("/api/map/ready", post(map_ready))
        .route("/api/scene", get(current_scene))
        .with_state(state)
}
