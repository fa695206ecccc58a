//! The primitives a map library must offer for the facade to drive it.
//!
//! Implementations: `HeadlessMap` (in-memory) and the MapLibre binding in the
//! web viewer. All calls happen on the thread that renders the map.

use foundation::LngLatBounds;

use crate::layer::{LayerSpec, Visibility};
use crate::raster::RasterSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map instance has not finished loading.
    NotReady,
    LayerNotFound(String),
    /// Anything the underlying library rejected.
    Backend(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::NotReady => write!(f, "map is not ready"),
            MapError::LayerNotFound(id) => write!(f, "layer not found: {id}"),
            MapError::Backend(msg) => write!(f, "map error: {msg}"),
        }
    }
}

impl std::error::Error for MapError {}

pub trait MapSurface {
    fn add_raster_source(&mut self, id: &str, source: &RasterSource) -> Result<(), MapError>;

    fn add_geojson_source(&mut self, id: &str, data: &serde_json::Value) -> Result<(), MapError>;

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<(), MapError>;

    fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<(), MapError>;

    /// `padding` is in screen pixels on every side.
    fn fit_bounds(&mut self, bounds: &LngLatBounds, padding: u32) -> Result<(), MapError>;

    fn zoom(&self) -> Result<f64, MapError>;

    /// Currently visible area.
    fn bounds(&self) -> Result<LngLatBounds, MapError>;
}
