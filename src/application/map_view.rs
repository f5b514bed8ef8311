// Map view - Overlay lifecycle over an opaque drawing surface
use crate::domain::route::{Bounds, Coordinate, RouteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
    /// 1-based position of the stop along the route.
    Charging { sequence: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub label: String,
}

/// Drawing capabilities of the external mapping widget.
///
/// The widget has no transactional overlay API; callers sequence
/// clear and redraw themselves.
pub trait MapSurface: Send {
    fn init(&mut self, center: Coordinate, zoom: u8);
    fn draw_path(&mut self, path: &[Coordinate]);
    fn set_markers(&mut self, markers: &[Marker]);
    fn clear_overlays(&mut self);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn reset_view(&mut self, center: Coordinate, zoom: u8);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapDefaults {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapState {
    /// Mapping library not ready yet; no surface exists.
    Uninitialized,
    /// Surface exists, default view, no overlays.
    Idle,
    /// Surface exists with a path and markers.
    RouteDrawn,
}

/// Owns the single drawing surface of one mounted map.
pub struct MapView<S: MapSurface> {
    surface: Option<S>,
    state: MapState,
    defaults: MapDefaults,
    pending: Option<RouteResult>,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(defaults: MapDefaults) -> Self {
        Self {
            surface: None,
            state: MapState::Uninitialized,
            defaults,
            pending: None,
        }
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Construct the surface once the mapping library is available.
    ///
    /// Only the first call has an effect. A result that arrived before
    /// readiness is drawn immediately.
    pub fn on_library_ready(&mut self, mut surface: S) {
        if self.surface.is_some() {
            tracing::debug!("Map surface already initialized, ignoring ready signal");
            return;
        }

        surface.init(self.defaults.center, self.defaults.zoom);
        self.surface = Some(surface);
        self.state = MapState::Idle;
        tracing::info!(zoom = self.defaults.zoom, "Map surface initialized");

        if let Some(pending) = self.pending.take() {
            self.update(Some(&pending));
        }
    }

    /// Redraw for a new result. `None` or a result without a drawable
    /// path returns the map to the default view.
    pub fn update(&mut self, result: Option<&RouteResult>) {
        let Some(surface) = self.surface.as_mut() else {
            self.pending = result.cloned();
            return;
        };

        surface.clear_overlays();

        match result.filter(|r| r.has_drawable_path()) {
            Some(route) => {
                let markers = route_markers(route);
                surface.draw_path(&route.route_geometry);
                surface.set_markers(&markers);
                if let Some(bounds) = route.bounds() {
                    surface.fit_bounds(bounds);
                }
                self.state = MapState::RouteDrawn;
                tracing::debug!(
                    path_points = route.route_geometry.len(),
                    markers = markers.len(),
                    "Route drawn"
                );
            }
            None => {
                surface.reset_view(self.defaults.center, self.defaults.zoom);
                self.state = MapState::Idle;
            }
        }
    }

    /// Clear overlays and release the surface.
    pub fn dispose(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.clear_overlays();
        }
        self.pending = None;
        self.state = MapState::Uninitialized;
    }
}

fn route_markers(route: &RouteResult) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(route.charging_stops.len() + 2);

    if let (Some(first), Some(last)) = (route.route_geometry.first(), route.route_geometry.last()) {
        markers.push(Marker {
            kind: MarkerKind::Start,
            position: *first,
            label: "Start".to_string(),
        });
        markers.push(Marker {
            kind: MarkerKind::End,
            position: *last,
            label: "Destination".to_string(),
        });
    }

    for (sequence, position) in route.charging_stop_coordinates() {
        let name = route.charging_stops[sequence - 1]
            .name
            .as_deref()
            .unwrap_or("Charging stop");
        markers.push(Marker {
            kind: MarkerKind::Charging { sequence },
            position,
            label: format!("{}. {}", sequence, name),
        });
    }

    markers
}
