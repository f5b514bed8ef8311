// Normalized route result consumed by the summary and map views
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Returns `None` unless both values are finite and inside WGS84 ranges.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

/// Axis-aligned lat/lon box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn covering<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bounds = Bounds {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lon = bounds.south_west.lon.min(p.lon);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lon = bounds.north_east.lon.max(p.lon);
        }
        Some(bounds)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cost {
    Amount { amount: f64, currency: Option<String> },
    Free,
    Unspecified,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargingStop {
    pub name: Option<String>,
    pub address: Option<String>,
    /// `None` when the backend sent no connector information at all.
    pub connector_types: Option<BTreeSet<String>>,
    pub power_kw: Option<f64>,
    pub recommended_charge_minutes: Option<f64>,
    pub cost: Cost,
    pub coordinate: Option<Coordinate>,
}

impl ChargingStop {
    pub fn at(coordinate: Option<Coordinate>) -> Self {
        Self {
            name: None,
            address: None,
            connector_types: None,
            power_kw: None,
            recommended_charge_minutes: None,
            cost: Cost::Unspecified,
            coordinate,
        }
    }
}

/// All numeric fields are finite or `None`; all durations are minutes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteResult {
    pub total_distance_km: Option<f64>,
    pub total_duration_minutes: Option<f64>,
    pub driving_minutes: Option<f64>,
    pub charging_minutes: Option<f64>,
    pub charging_stop_count: Option<u32>,
    pub energy_consumed_kwh: Option<f64>,
    pub final_charge_percent: Option<f64>,
    /// Route order.
    pub charging_stops: Vec<ChargingStop>,
    /// Empty, or at least two points.
    pub route_geometry: Vec<Coordinate>,
}

impl RouteResult {
    pub fn has_drawable_path(&self) -> bool {
        self.route_geometry.len() >= 2
    }

    /// Located charging stops with their 1-based position along the route.
    pub fn charging_stop_coordinates(&self) -> impl Iterator<Item = (usize, Coordinate)> + '_ {
        self.charging_stops
            .iter()
            .enumerate()
            .filter_map(|(idx, stop)| stop.coordinate.map(|c| (idx + 1, c)))
    }

    /// Bounding box of the path plus every located charging stop.
    pub fn bounds(&self) -> Option<Bounds> {
        let stops: Vec<Coordinate> = self.charging_stop_coordinates().map(|(_, c)| c).collect();
        Bounds::covering(self.route_geometry.iter().chain(stops.iter()))
    }
}
