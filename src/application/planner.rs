// Planner session - One route-submission round trip at a time
use crate::application::map_view::{MapDefaults, MapState, MapSurface, MapView};
use crate::application::normalizer::{backend_status, detect_shape, normalize};
use crate::application::route_gateway::{GatewayError, RawBackendResponse};
use crate::domain::route::RouteResult;
use thiserror::Error;

const CANCELLED_MESSAGE: &str =
    "The previous route request was cancelled before the optimizer answered. Please submit again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("a route request is already in progress")]
    InFlight,
}

/// State behind the planner page: the current result, the error line,
/// the loading flag and the map.
pub struct PlannerSession<S: MapSurface> {
    result: Option<RouteResult>,
    error: Option<String>,
    notice: Option<String>,
    in_flight: bool,
    map: MapView<S>,
}

impl<S: MapSurface> PlannerSession<S> {
    pub fn new(map_defaults: MapDefaults) -> Self {
        Self {
            result: None,
            error: None,
            notice: None,
            in_flight: false,
            map: MapView::new(map_defaults),
        }
    }

    pub fn result(&self) -> Option<&RouteResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Backend message of the last successful plan.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn map(&self) -> &MapView<S> {
        &self.map
    }

    /// Mark a submission as started. Clears the previous result so it never
    /// shows while the request is pending.
    pub fn begin_submission(&mut self) -> Result<(), PlanError> {
        if self.in_flight {
            return Err(PlanError::InFlight);
        }
        self.in_flight = true;
        self.result = None;
        self.error = None;
        self.notice = None;
        self.map.update(None);
        Ok(())
    }

    /// Apply the outcome of the round trip started by `begin_submission`.
    pub fn settle(&mut self, outcome: Result<RawBackendResponse, GatewayError>) {
        self.in_flight = false;

        let raw = match outcome {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "Route submission failed");
                self.error = Some(err.user_message());
                return;
            }
        };

        let status = backend_status(&raw);
        if status.success == Some(false) {
            tracing::warn!(message = ?status.message, "Backend could not plan the trip");
            self.error = Some(
                status
                    .message
                    .unwrap_or_else(|| "The route optimizer could not plan this trip.".to_string()),
            );
            return;
        }

        let result = normalize(&raw);
        tracing::info!(
            shape = ?detect_shape(&raw),
            stops = result.charging_stops.len(),
            "Route planned"
        );
        self.map.update(Some(&result));
        self.result = Some(result);
        self.notice = status.message;
    }

    /// Client-side validation failure; no request was sent.
    pub fn reject_input(&mut self, message: String) {
        self.error = Some(message);
    }

    /// End an in-flight submission whose caller went away before the
    /// backend answered. The result stays cleared.
    pub fn cancel(&mut self) {
        if !self.in_flight {
            return;
        }
        self.in_flight = false;
        self.error = Some(CANCELLED_MESSAGE.to_string());
    }

    /// Bind a freshly created map widget. A widget that replaces an earlier
    /// one (page reload) gets the current result redrawn on it.
    pub fn attach_map(&mut self, surface: S) {
        if self.map.state() != MapState::Uninitialized {
            tracing::debug!("Map widget recreated, rebuilding scene");
            self.map.dispose();
            self.map.update(self.result.as_ref());
        }
        self.map.on_library_ready(surface);
    }
}
