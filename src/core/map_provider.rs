use crate::domain::model::Coordinate;
use serde::{Deserialize, Serialize};

/// Order in which a provider exchanges the two components of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    LatLng,
    LngLat,
}

/// The map backend the question is shown on. Chosen once in the rule set.
///
/// Stored answers are always `[latitude, longitude]`; the provider order only
/// applies to positions handed to the map, such as answer markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    #[default]
    Google,
    AMap,
}

impl MapProvider {
    pub fn axis_order(&self) -> AxisOrder {
        match self {
            MapProvider::Google => AxisOrder::LatLng,
            MapProvider::AMap => AxisOrder::LngLat,
        }
    }

    pub fn to_provider_pair(&self, coord: &Coordinate) -> [f64; 2] {
        match self.axis_order() {
            AxisOrder::LatLng => [coord.latitude(), coord.longitude()],
            AxisOrder::LngLat => [coord.longitude(), coord.latitude()],
        }
    }
}

/// Initial center and zoom of the interactive map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

impl MapView {
    /// Build the view from the interaction's customization args. A missing
    /// or invalid center falls back to `[0, 0]`, an unparsable zoom to 0.
    pub fn from_args(latitude: Option<f64>, longitude: Option<f64>, zoom: Option<&str>) -> Self {
        let center = match (latitude, longitude) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).unwrap_or_default(),
            _ => Coordinate::default(),
        };
        let zoom = zoom.and_then(|z| z.trim().parse::<u8>().ok()).unwrap_or(0);

        Self { center, zoom }
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::from_args(None, None, None)
    }
}
