// Result normalizer - Reconciles every known backend response shape into RouteResult
use crate::application::route_gateway::RawBackendResponse;
use crate::domain::route::{ChargingStop, Coordinate, Cost, RouteResult};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Backend response contracts seen so far, in probe order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `route_summary` (camelCase) + `route_details`
    RouteSummary,
    /// `summary` (snake_case) + `charging_locations`
    Summary,
    /// camelCase fields on the root object
    Flat,
}

/// Success flag and message the backend attaches next to the route data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackendStatus {
    pub success: Option<bool>,
    pub message: Option<String>,
}

struct SummaryKeys {
    distance_km: &'static [&'static str],
    duration_minutes: &'static [&'static str],
    duration_seconds: &'static [&'static str],
    driving_minutes: &'static [&'static str],
    charging_minutes: &'static [&'static str],
    stop_count: &'static [&'static str],
    energy_kwh: &'static [&'static str],
    final_charge_percent: &'static [&'static str],
}

const CAMEL_KEYS: SummaryKeys = SummaryKeys {
    distance_km: &["totalDistanceKm"],
    duration_minutes: &["totalDurationMinutes"],
    duration_seconds: &["totalDurationSeconds"],
    driving_minutes: &["totalDrivingMinutes", "drivingMinutes"],
    charging_minutes: &["totalChargingMinutes", "chargingMinutes"],
    stop_count: &["estimatedChargingStops", "chargingStopCount"],
    energy_kwh: &["totalEnergyConsumptionKwh", "energyConsumedKwh"],
    final_charge_percent: &["finalChargePercent"],
};

const SNAKE_KEYS: SummaryKeys = SummaryKeys {
    distance_km: &["total_distance_km"],
    duration_minutes: &["total_duration_minutes"],
    duration_seconds: &["total_duration_s"],
    driving_minutes: &["driving_time_minutes", "total_driving_minutes"],
    charging_minutes: &["charging_time_minutes", "total_charging_minutes"],
    stop_count: &["charging_stops_count", "estimated_charging_stops"],
    energy_kwh: &["energy_consumed_kwh", "total_energy_consumption_kwh"],
    final_charge_percent: &["final_charge_percent"],
};

impl SummaryKeys {
    fn any_present(&self, obj: &Map<String, Value>) -> bool {
        [
            self.distance_km,
            self.duration_minutes,
            self.driving_minutes,
            self.charging_minutes,
            self.stop_count,
            self.energy_kwh,
            self.final_charge_percent,
        ]
        .iter()
        .flat_map(|keys| keys.iter())
        .any(|key| obj.contains_key(*key))
    }

    fn read_into(&self, obj: &Map<String, Value>, result: &mut RouteResult) {
        result.total_distance_km = first_number(obj, self.distance_km);
        result.total_duration_minutes = first_number(obj, self.duration_minutes)
            .or_else(|| first_number(obj, self.duration_seconds).map(|s| s / 60.0));
        result.driving_minutes = first_number(obj, self.driving_minutes);
        result.charging_minutes = first_number(obj, self.charging_minutes);
        result.charging_stop_count = self.stop_count.iter().find_map(|k| coerce_count(obj.get(*k)));
        result.energy_consumed_kwh = first_number(obj, self.energy_kwh);
        result.final_charge_percent = first_number(obj, self.final_charge_percent);
    }
}

struct ShapeMatcher {
    shape: ResponseShape,
    matches: fn(&Map<String, Value>) -> bool,
    extract: fn(&Map<String, Value>) -> RouteResult,
}

static MATCHERS: [ShapeMatcher; 3] = [
    ShapeMatcher {
        shape: ResponseShape::RouteSummary,
        matches: |root: &Map<String, Value>| root.get("route_summary").is_some_and(Value::is_object),
        extract: extract_route_summary,
    },
    ShapeMatcher {
        shape: ResponseShape::Summary,
        matches: |root: &Map<String, Value>| root.get("summary").is_some_and(Value::is_object),
        extract: extract_summary,
    },
    ShapeMatcher {
        shape: ResponseShape::Flat,
        matches: |root: &Map<String, Value>| CAMEL_KEYS.any_present(root),
        extract: extract_flat,
    },
];

fn matching(raw: &RawBackendResponse) -> Option<(&ShapeMatcher, &Map<String, Value>)> {
    let root = raw.body.as_object()?;
    MATCHERS
        .iter()
        .find(|m| (m.matches)(root))
        .map(|m| (m, root))
}

/// Which known contract `raw` follows, if any.
pub fn detect_shape(raw: &RawBackendResponse) -> Option<ResponseShape> {
    matching(raw).map(|(m, _)| m.shape)
}

/// Convert any known response shape into a `RouteResult`.
///
/// Unknown shapes produce an all-absent result rather than an error.
pub fn normalize(raw: &RawBackendResponse) -> RouteResult {
    match matching(raw) {
        Some((matcher, root)) => {
            let result = (matcher.extract)(root);
            tracing::debug!(
                shape = ?matcher.shape,
                stops = result.charging_stops.len(),
                path_points = result.route_geometry.len(),
                "Normalized backend response"
            );
            result
        }
        None => {
            tracing::warn!(status = raw.status, "Backend response matched no known shape");
            RouteResult::default()
        }
    }
}

pub fn backend_status(raw: &RawBackendResponse) -> BackendStatus {
    let Some(root) = raw.body.as_object() else {
        return BackendStatus::default();
    };
    BackendStatus {
        success: root.get("success").and_then(Value::as_bool),
        message: non_empty_string(root.get("message")),
    }
}

fn extract_route_summary(root: &Map<String, Value>) -> RouteResult {
    let mut result = RouteResult::default();
    if let Some(summary) = root.get("route_summary").and_then(Value::as_object) {
        CAMEL_KEYS.read_into(summary, &mut result);
    }

    let details = root.get("route_details").and_then(Value::as_object);
    if let Some(details) = details {
        result.route_geometry = path(details.get("route_geometry"));
        if result.total_distance_km.is_none() {
            result.total_distance_km = coerce_number(details.get("total_distance_km"));
        }
        if result.total_duration_minutes.is_none() {
            result.total_duration_minutes =
                coerce_number(details.get("total_duration_s")).map(|s| s / 60.0);
        }
    }

    let coords: Vec<Option<Coordinate>> = details
        .and_then(|d| d.get("charging_locations_coords"))
        .and_then(Value::as_array)
        .map(|items| items.iter().map(coordinate).collect())
        .unwrap_or_default();

    result.charging_stops = match root.get("charging_stations").and_then(Value::as_array) {
        Some(stations) => stations
            .iter()
            .enumerate()
            .map(|(idx, station)| {
                let mut stop = charging_stop(station);
                if stop.coordinate.is_none() {
                    stop.coordinate = coords.get(idx).copied().flatten();
                }
                stop
            })
            .collect(),
        None => coords.into_iter().map(ChargingStop::at).collect(),
    };

    finish(result)
}

fn extract_summary(root: &Map<String, Value>) -> RouteResult {
    let mut result = RouteResult::default();
    if let Some(summary) = root.get("summary").and_then(Value::as_object) {
        SNAKE_KEYS.read_into(summary, &mut result);
    }
    result.charging_stops = stops(root.get("charging_locations"));
    result.route_geometry = path(root.get("route_geometry"));
    finish(result)
}

fn extract_flat(root: &Map<String, Value>) -> RouteResult {
    let mut result = RouteResult::default();
    CAMEL_KEYS.read_into(root, &mut result);
    result.charging_stops = stops(root.get("chargingStops"));
    result.route_geometry = path(root.get("routeGeometry"));
    finish(result)
}

fn finish(mut result: RouteResult) -> RouteResult {
    if result.charging_stop_count.is_none() && !result.charging_stops.is_empty() {
        result.charging_stop_count = u32::try_from(result.charging_stops.len()).ok();
    }
    result
}

fn stops(value: Option<&Value>) -> Vec<ChargingStop> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().map(charging_stop).collect())
        .unwrap_or_default()
}

fn charging_stop(value: &Value) -> ChargingStop {
    let Some(obj) = value.as_object() else {
        return ChargingStop::at(coordinate(value));
    };

    let position = ["coordinates", "location", "position"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(coordinate))
        .or_else(|| coordinate(value));

    ChargingStop {
        name: ["name", "title"].iter().find_map(|k| non_empty_string(obj.get(*k))),
        address: non_empty_string(obj.get("address")),
        connector_types: [
            "connector_types",
            "connectorTypes",
            "connection_types",
            "connections",
        ]
        .iter()
        .find_map(|k| connector_types(obj.get(*k))),
        power_kw: first_number(obj, &["power_kw", "powerKw", "max_power_kw"]),
        recommended_charge_minutes: first_number(
            obj,
            &[
                "recommended_charge_minutes",
                "recommendedChargeMinutes",
                "charge_time_minutes",
                "chargeTimeMinutes",
            ],
        ),
        cost: cost(obj),
        coordinate: position,
    }
}

fn connector_types(value: Option<&Value>) -> Option<BTreeSet<String>> {
    let items = value?.as_array()?;
    let types: BTreeSet<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(o) => ["type", "title", "name", "connection_type"]
                .iter()
                .find_map(|k| non_empty_string(o.get(*k))),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();
    (!types.is_empty()).then_some(types)
}

fn cost(obj: &Map<String, Value>) -> Cost {
    let free_flag = ["is_free", "isFree"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_bool));
    if free_flag == Some(true) {
        return Cost::Free;
    }

    let currency = non_empty_string(obj.get("currency"));
    match obj.get("cost") {
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("free") => Cost::Free,
        Some(Value::Object(o)) => match coerce_number(o.get("amount")) {
            Some(amount) => Cost::Amount {
                amount,
                currency: non_empty_string(o.get("currency")).or(currency),
            },
            None => Cost::Unspecified,
        },
        other => match coerce_number(other) {
            Some(amount) => Cost::Amount { amount, currency },
            None => Cost::Unspecified,
        },
    }
}

fn path(value: Option<&Value>) -> Vec<Coordinate> {
    let points: Vec<Coordinate> = value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(coordinate).collect())
        .unwrap_or_default();
    if points.len() < 2 { Vec::new() } else { points }
}

fn coordinate(value: &Value) -> Option<Coordinate> {
    match value {
        Value::Object(o) => {
            let lat = first_number(o, &["lat", "latitude"])?;
            let lon = first_number(o, &["lon", "lng", "longitude"])?;
            Coordinate::new(lat, lon)
        }
        Value::Array(pair) if pair.len() == 2 => {
            Coordinate::new(coerce_number(pair.first())?, coerce_number(pair.get(1))?)
        }
        _ => None,
    }
}

fn first_number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| coerce_number(obj.get(*k)))
}

/// Numbers and numeric strings become `Some`; everything else, including
/// non-finite values, is absent.
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn coerce_count(value: Option<&Value>) -> Option<u32> {
    let n = coerce_number(value)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as u32)
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(body: Value) -> RawBackendResponse {
        RawBackendResponse { status: 200, body }
    }

    fn geometry() -> Value {
        json!([
            {"lat": 12.9716, "lon": 77.5946},
            {"lat": 12.9165, "lon": 79.1325},
            {"lat": 13.0827, "lon": 80.2707}
        ])
    }

    fn hosur(with_coordinates: bool) -> Value {
        let mut stop = json!({
            "name": "Hosur Plaza",
            "address": "NH 44, Hosur",
            "connector_types": ["CCS2", "Type 2"],
            "power_kw": 60,
            "recommended_charge_minutes": 30,
            "cost": {"amount": 450, "currency": "INR"}
        });
        if with_coordinates {
            stop["coordinates"] = json!({"lat": 12.7409, "lon": 77.8253});
        }
        stop
    }

    fn vellore(with_coordinates: bool) -> Value {
        let mut stop = json!({
            "name": "Vellore Hub",
            "address": "Katpadi Road",
            "power_kw": "50",
            "recommended_charge_minutes": 30,
            "is_free": true
        });
        if with_coordinates {
            stop["coordinates"] = json!({"lat": 12.9165, "lon": 79.1325});
        }
        stop
    }

    fn flat_sample() -> Value {
        json!({
            "totalDistanceKm": 350.0,
            "totalDurationMinutes": 410,
            "totalDrivingMinutes": 350,
            "totalChargingMinutes": 60,
            "estimatedChargingStops": 2,
            "totalEnergyConsumptionKwh": 52.5,
            "finalChargePercent": 22.5,
            "routeGeometry": geometry(),
            "chargingStops": [hosur(true), vellore(true)]
        })
    }

    fn summary_sample() -> Value {
        json!({
            "summary": {
                "total_distance_km": 350.0,
                "total_duration_minutes": 410,
                "driving_time_minutes": 350,
                "charging_time_minutes": 60,
                "charging_stops_count": 2,
                "energy_consumed_kwh": 52.5,
                "final_charge_percent": 22.5
            },
            "charging_locations": [hosur(true), vellore(true)],
            "route_geometry": geometry()
        })
    }

    fn route_summary_sample() -> Value {
        json!({
            "success": true,
            "message": "Route optimized successfully!",
            "route_summary": {
                "totalDistanceKm": 350.0,
                "totalDurationMinutes": 410,
                "totalDrivingMinutes": 350,
                "totalChargingMinutes": 60,
                "estimatedChargingStops": 2,
                "totalEnergyConsumptionKwh": 52.5,
                "finalChargePercent": 22.5
            },
            "route_details": {
                "total_distance_km": 350.0,
                "total_duration_s": 24600,
                "route_geometry": geometry(),
                "charging_locations_coords": [
                    {"lat": 12.7409, "lon": 77.8253},
                    {"lat": 12.9165, "lon": 79.1325}
                ]
            },
            "charging_stations": [hosur(false), vellore(false)]
        })
    }

    #[test]
    fn test_all_known_shapes_normalize_to_same_result() {
        let flat = normalize(&raw(flat_sample()));
        let summary = normalize(&raw(summary_sample()));
        let route_summary = normalize(&raw(route_summary_sample()));

        assert_eq!(flat, summary);
        assert_eq!(summary, route_summary);

        assert_eq!(flat.total_distance_km, Some(350.0));
        assert_eq!(flat.charging_stop_count, Some(2));
        assert_eq!(flat.route_geometry.len(), 3);
        assert_eq!(flat.charging_stop_coordinates().count(), 2);
    }

    #[test]
    fn test_shapes_are_probed_in_priority_order() {
        assert_eq!(detect_shape(&raw(route_summary_sample())), Some(ResponseShape::RouteSummary));
        assert_eq!(detect_shape(&raw(summary_sample())), Some(ResponseShape::Summary));
        assert_eq!(detect_shape(&raw(flat_sample())), Some(ResponseShape::Flat));

        // route_summary wins even when flat keys are also present
        let mut mixed = route_summary_sample();
        mixed["totalDistanceKm"] = json!(1.0);
        assert_eq!(detect_shape(&raw(mixed.clone())), Some(ResponseShape::RouteSummary));
        assert_eq!(normalize(&raw(mixed)).total_distance_km, Some(350.0));
    }

    #[test]
    fn test_unknown_shape_yields_empty_result() {
        let result = normalize(&raw(json!({"routes": [], "status": "OK"})));
        assert_eq!(result, RouteResult::default());

        assert_eq!(normalize(&raw(Value::Null)), RouteResult::default());
        assert_eq!(normalize(&raw(json!([1, 2, 3]))), RouteResult::default());
    }

    #[test]
    fn test_null_and_non_numeric_values_become_absent() {
        let result = normalize(&raw(json!({
            "summary": {
                "total_distance_km": null,
                "total_duration_minutes": "soon",
                "driving_time_minutes": true,
                "charging_time_minutes": {},
                "charging_stops_count": "two",
                "energy_consumed_kwh": "",
                "final_charge_percent": "NaN"
            }
        })));

        assert_eq!(result.total_distance_km, None);
        assert_eq!(result.total_duration_minutes, None);
        assert_eq!(result.driving_minutes, None);
        assert_eq!(result.charging_minutes, None);
        assert_eq!(result.charging_stop_count, None);
        assert_eq!(result.energy_consumed_kwh, None);
        assert_eq!(result.final_charge_percent, None);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let result = normalize(&raw(json!({
            "totalDistanceKm": " 120.5 ",
            "estimatedChargingStops": "0"
        })));
        assert_eq!(result.total_distance_km, Some(120.5));
        assert_eq!(result.charging_stop_count, Some(0));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let response = raw(route_summary_sample());
        assert_eq!(normalize(&response), normalize(&response));
    }

    #[test]
    fn test_duration_seconds_fallback_is_converted_to_minutes() {
        let result = normalize(&raw(json!({
            "summary": {"total_distance_km": 10, "total_duration_s": 4500}
        })));
        assert_eq!(result.total_duration_minutes, Some(75.0));
    }

    #[test]
    fn test_single_point_geometry_is_not_drawable() {
        let result = normalize(&raw(json!({
            "totalDistanceKm": 0,
            "routeGeometry": [{"lat": 12.0, "lon": 77.0}, {"lat": "bad", "lon": 1}]
        })));
        assert!(result.route_geometry.is_empty());
        assert!(!result.has_drawable_path());
    }

    #[test]
    fn test_coordinate_variants_are_accepted() {
        let result = normalize(&raw(json!({
            "totalDistanceKm": 5,
            "routeGeometry": [
                {"lat": 1.0, "lng": 2.0},
                {"latitude": 3.0, "longitude": 4.0},
                [5.0, 6.0]
            ]
        })));
        assert_eq!(result.route_geometry.len(), 3);
        assert_eq!(result.route_geometry[2], Coordinate::new(5.0, 6.0).unwrap());
    }

    #[test]
    fn test_connector_types_absent_or_object_list() {
        let result = normalize(&raw(json!({
            "summary": {"total_distance_km": 1},
            "charging_locations": [
                {"name": "A"},
                {"name": "B", "connection_types": [{"type": "CCS2"}, {"title": "CHAdeMO"}]},
                {"name": "C", "connector_types": []}
            ]
        })));

        let stops = &result.charging_stops;
        assert_eq!(stops[0].connector_types, None);
        let b: Vec<&str> = stops[1]
            .connector_types
            .as_ref()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(b, vec!["CCS2", "CHAdeMO"]);
        assert_eq!(stops[2].connector_types, None);
    }

    #[test]
    fn test_cost_variants() {
        let result = normalize(&raw(json!({
            "summary": {"total_distance_km": 1},
            "charging_locations": [
                {"name": "A", "cost": 12.5, "currency": "EUR"},
                {"name": "B", "cost": "Free"},
                {"name": "C", "cost": "ask at counter"},
                {"name": "D", "is_free": true, "cost": 99}
            ]
        })));

        let costs: Vec<&Cost> = result.charging_stops.iter().map(|s| &s.cost).collect();
        assert_eq!(
            costs,
            vec![
                &Cost::Amount { amount: 12.5, currency: Some("EUR".to_string()) },
                &Cost::Free,
                &Cost::Unspecified,
                &Cost::Free,
            ]
        );
    }

    #[test]
    fn test_stop_count_falls_back_to_listed_stops() {
        let result = normalize(&raw(json!({
            "route_summary": {"totalDistanceKm": 10},
            "route_details": {
                "charging_locations_coords": [{"lat": 1, "lon": 1}]
            }
        })));
        assert_eq!(result.charging_stop_count, Some(1));
        assert_eq!(result.charging_stops[0].name, None);
        assert_eq!(result.charging_stop_coordinates().count(), 1);
    }

    #[test]
    fn test_backend_status_is_read_from_root() {
        let status = backend_status(&raw(json!({
            "success": false,
            "message": "Could not geocode start address: Atlantis"
        })));
        assert_eq!(status.success, Some(false));
        assert_eq!(
            status.message.as_deref(),
            Some("Could not geocode start address: Atlantis")
        );
        assert_eq!(backend_status(&raw(Value::Null)), BackendStatus::default());
    }
}
