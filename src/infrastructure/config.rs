// Configuration - Server, backend and map settings
use crate::application::map_view::MapDefaults;
use crate::domain::route::Coordinate;
use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub map: MapSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// `/optimize-route` on older backends, `/api/v1/optimize-route` on newer ones.
    pub path: String,
    #[serde(default)]
    pub field_mapping: FieldMapping,
    #[serde(default = "default_charger_preferences")]
    pub charger_preferences: Vec<String>,
}

/// Wire names for each trip field. An empty name leaves the field out of
/// the request body.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FieldMapping {
    pub vehicle: String,
    pub range_km: String,
    pub current_charge_percent: String,
    pub start: String,
    pub destination: String,
    pub charger_preference: String,
    pub waypoints: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            vehicle: "ev_type".to_string(),
            range_km: "range_full_charge".to_string(),
            current_charge_percent: "current_charge_percent".to_string(),
            start: "start_location".to_string(),
            destination: "end_location".to_string(),
            charger_preference: "charging_preference".to_string(),
            waypoints: "waypoints".to_string(),
        }
    }
}

fn default_charger_preferences() -> Vec<String> {
    ["any", "standard", "fast", "level2", "dc_fast"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    pub default_lat: f64,
    pub default_lon: f64,
    pub default_zoom: u8,
    pub tile_url: String,
    #[serde(default)]
    pub attribution: String,
}

impl MapSettings {
    pub fn defaults(&self) -> anyhow::Result<MapDefaults> {
        let center = Coordinate::new(self.default_lat, self.default_lon).with_context(|| {
            format!(
                "invalid default map center ({}, {})",
                self.default_lat, self.default_lon
            )
        })?;
        Ok(MapDefaults {
            center,
            zoom: self.default_zoom,
        })
    }
}

/// Reads `config/planner.toml`; `PLANNER__SECTION__KEY` variables override it.
pub fn load_planner_config() -> anyhow::Result<PlannerConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/planner"))
        .add_source(config::Environment::with_prefix("PLANNER").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> PlannerConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    const MINIMAL: &str = r#"
[server]
bind_addr = "127.0.0.1:8080"

[backend]
base_url = "http://localhost:8000"
path = "/api/v1/optimize-route"

[map]
default_lat = 20.5937
default_lon = 78.9629
default_zoom = 5
tile_url = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
"#;

    #[test]
    fn test_defaults_fill_missing_backend_tables() {
        let config = parse(MINIMAL);
        assert_eq!(config.backend.field_mapping, FieldMapping::default());
        assert_eq!(
            config.backend.charger_preferences,
            vec!["any", "standard", "fast", "level2", "dc_fast"]
        );
        assert_eq!(config.map.defaults().unwrap().zoom, 5);
    }

    #[test]
    fn test_partial_field_mapping_keeps_other_defaults() {
        let toml = format!(
            "{}\n[backend.field_mapping]\nvehicle = \"vehicle_model\"\nwaypoints = \"\"\n",
            MINIMAL
        );
        let config = parse(&toml);
        let mapping = &config.backend.field_mapping;
        assert_eq!(mapping.vehicle, "vehicle_model");
        assert_eq!(mapping.waypoints, "");
        assert_eq!(mapping.start, "start_location");
    }

    #[test]
    fn test_invalid_default_center_is_rejected() {
        let config = parse(&MINIMAL.replace("default_lat = 20.5937", "default_lat = 120.0"));
        assert!(config.map.defaults().is_err());
    }
}
