// Leaflet surface - Records overlay commands as a scene the browser widget replays
use crate::application::map_view::{MapSurface, Marker, MarkerKind};
use crate::domain::route::{Bounds, Coordinate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMarker {
    pub kind: &'static str,
    pub sequence: Option<usize>,
    pub position: [f64; 2],
    pub label: String,
}

/// Current overlay set of the planner map in Leaflet's `[lat, lng]` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafletScene {
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub path: Vec<[f64; 2]>,
    pub markers: Vec<SceneMarker>,
    pub fit_bounds: Option<[[f64; 2]; 2]>,
    /// Bumped on every mutation so the page can skip redundant redraws.
    pub revision: u64,
}

fn latlng(c: &Coordinate) -> [f64; 2] {
    [c.lat, c.lon]
}

impl LeafletScene {
    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl MapSurface for LeafletScene {
    fn init(&mut self, center: Coordinate, zoom: u8) {
        self.center = Some(latlng(&center));
        self.zoom = Some(zoom);
        self.touch();
    }

    fn draw_path(&mut self, path: &[Coordinate]) {
        self.path = path.iter().map(latlng).collect();
        self.touch();
    }

    fn set_markers(&mut self, markers: &[Marker]) {
        self.markers = markers
            .iter()
            .map(|m| {
                let (kind, sequence) = match m.kind {
                    MarkerKind::Start => ("start", None),
                    MarkerKind::End => ("end", None),
                    MarkerKind::Charging { sequence } => ("charging", Some(sequence)),
                };
                SceneMarker {
                    kind,
                    sequence,
                    position: latlng(&m.position),
                    label: m.label.clone(),
                }
            })
            .collect();
        self.touch();
    }

    fn clear_overlays(&mut self) {
        self.path.clear();
        self.markers.clear();
        self.fit_bounds = None;
        self.touch();
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.fit_bounds = Some([latlng(&bounds.south_west), latlng(&bounds.north_east)]);
        self.touch();
    }

    fn reset_view(&mut self, center: Coordinate, zoom: u8) {
        self.center = Some(latlng(&center));
        self.zoom = Some(zoom);
        self.touch();
    }
}
