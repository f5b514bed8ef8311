// Application state for HTTP handlers
use crate::application::map_view::MapDefaults;
use crate::application::planner::PlannerSession;
use crate::application::route_gateway::RouteGateway;
use crate::infrastructure::config::MapSettings;
use crate::infrastructure::leaflet_scene::LeafletScene;
use crate::presentation::trip_form::TripForm;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The planner page: last submitted form values plus the session behind it.
pub struct PlannerPage {
    pub form: TripForm,
    pub session: PlannerSession<LeafletScene>,
}

pub struct AppState {
    pub gateway: Arc<dyn RouteGateway>,
    pub charger_preferences: Vec<String>,
    pub map_settings: MapSettings,
    pub planner: Mutex<PlannerPage>,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn RouteGateway>,
        charger_preferences: Vec<String>,
        map_settings: MapSettings,
        map_defaults: MapDefaults,
    ) -> Self {
        let form = TripForm {
            charger_preference: charger_preferences.first().cloned().unwrap_or_default(),
            ..TripForm::default()
        };
        Self {
            gateway,
            charger_preferences,
            map_settings,
            planner: Mutex::new(PlannerPage {
                form,
                session: PlannerSession::new(map_defaults),
            }),
        }
    }
}
