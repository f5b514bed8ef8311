// HTTP request handlers
use crate::infrastructure::leaflet_scene::LeafletScene;
use crate::presentation::app_state::{AppState, PlannerPage};
use crate::presentation::pages::{PlannerPageView, render_disposal_page, render_planner_page};
use crate::presentation::summary_view::{stop_rows, summary_fields};
use crate::presentation::trip_form::TripForm;
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn battery_disposal() -> Html<String> {
    Html(render_disposal_page())
}

/// Planner page with the current form, result and error line
pub async fn planner_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = state.planner.lock().await;
    Html(render(&state, &page, None))
}

/// Form submission: validate, run one backend round trip, re-render
pub async fn submit_trip(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TripForm>,
) -> impl IntoResponse {
    // Phase 1 under the lock: validate and mark the submission in flight.
    let request = {
        let mut page = state.planner.lock().await;

        if page.session.is_loading() {
            tracing::warn!("Rejected submission while another request is in flight");
            let message = "A route request is already in progress. Please wait for it to finish.";
            return (StatusCode::CONFLICT, Html(render(&state, &page, Some(message))));
        }

        page.form = form;
        let request = match page.form.submit(&state.charger_preferences) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "Trip form rejected");
                page.session.reject_input(e.to_string());
                return (StatusCode::UNPROCESSABLE_ENTITY, Html(render(&state, &page, None)));
            }
        };

        if let Err(e) = page.session.begin_submission() {
            let message = e.to_string();
            return (StatusCode::CONFLICT, Html(render(&state, &page, Some(&message))));
        }
        request
    };

    // Phase 2 without the lock: the network call. If the client disconnects
    // this future is dropped here and the guard releases the submission.
    let guard = InFlightGuard::new(state.clone());
    let outcome = state.gateway.submit_route(&request).await;

    let mut page = state.planner.lock().await;
    guard.disarm();
    page.session.settle(outcome);
    let status = if page.session.error().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Html(render(&state, &page, None)))
}

/// Readiness signal from the browser's mapping library. Returns the scene
/// to draw.
pub async fn map_ready(State(state): State<Arc<AppState>>) -> Json<Option<LeafletScene>> {
    let mut page = state.planner.lock().await;
    page.session.attach_map(LeafletScene::default());
    tracing::debug!(state = ?page.session.map().state(), "Map widget attached");
    Json(page.session.map().surface().cloned())
}

/// Current scene, `null` until the map library has signalled readiness
pub async fn current_scene(State(state): State<Arc<AppState>>) -> Json<Option<LeafletScene>> {
    let page = state.planner.lock().await;
    Json(page.session.map().surface().cloned())
}

/// Cancels the in-flight submission unless disarmed once the outcome is in.
struct InFlightGuard {
    state: Option<Arc<AppState>>,
}

impl InFlightGuard {
    fn new(state: Arc<AppState>) -> Self {
        Self { state: Some(state) }
    }

    fn disarm(mut self) {
        self.state = None;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let Some(state) = self.state.take() else {
            return;
        };
        tracing::warn!("Route submission abandoned before the backend answered");

        if let Ok(mut page) = state.planner.try_lock() {
            page.session.cancel();
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    state.planner.lock().await.session.cancel();
                });
            }
            Err(e) => tracing::error!(error = %e, "No runtime to release the abandoned submission"),
        }
    }
}

fn render(state: &AppState, page: &PlannerPage, flash: Option<&str>) -> String {
    let result = page.session.result();
    let view = PlannerPageView {
        form: &page.form,
        charger_preferences: &state.charger_preferences,
        summary: summary_fields(result),
        stops: stop_rows(result),
        error: flash.or(page.session.error()),
        notice: page.session.notice(),
        loading: page.session.is_loading(),
        tile_url: &state.map_settings.tile_url,
        attribution: &state.map_settings.attribution,
    };
    render_planner_page(&view)
}
