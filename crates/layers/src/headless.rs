use std::collections::BTreeMap;

use foundation::LngLatBounds;

use crate::layer::{LayerSpec, Visibility};
use crate::raster::RasterSource;
use crate::surface::{MapError, MapSurface};

#[derive(Debug, Clone, PartialEq)]
pub enum HeadlessSource {
    Raster(RasterSource),
    GeoJson(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessLayer {
    pub spec: LayerSpec,
    pub visibility: Visibility,
}

/// In-memory map with the same failure rules as a real style: duplicate
/// source or layer ids and layers on unknown sources are rejected.
///
/// `fit_bounds` moves the view to the requested box and keeps the zoom.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    view: LngLatBounds,
    zoom: f64,
    sources: BTreeMap<String, HeadlessSource>,
    layers: Vec<HeadlessLayer>,
    fits: Vec<(LngLatBounds, u32)>,
}

impl HeadlessMap {
    pub fn new(view: LngLatBounds, zoom: f64) -> Self {
        Self {
            view,
            zoom,
            sources: BTreeMap::new(),
            layers: Vec::new(),
            fits: Vec::new(),
        }
    }

    pub fn source(&self, id: &str) -> Option<&HeadlessSource> {
        self.sources.get(id)
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn layer(&self, id: &str) -> Option<&HeadlessLayer> {
        self.layers.iter().find(|l| l.spec.id == id)
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[HeadlessLayer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn fit_requests(&self) -> &[(LngLatBounds, u32)] {
        &self.fits
    }

    fn add_source(&mut self, id: &str, source: HeadlessSource) -> Result<(), MapError> {
        if self.sources.contains_key(id) {
            return Err(MapError::Backend(format!("source {id:?} already exists")));
        }
        self.sources.insert(id.to_string(), source);
        Ok(())
    }
}

impl Default for HeadlessMap {
    /// Whole world at zoom 2, like a fresh viewer.
    fn default() -> Self {
        Self::new(LngLatBounds::new(-180.0, -85.0, 180.0, 85.0), 2.0)
    }
}

impl MapSurface for HeadlessMap {
    fn add_raster_source(&mut self, id: &str, source: &RasterSource) -> Result<(), MapError> {
        self.add_source(id, HeadlessSource::Raster(source.clone()))
    }

    fn add_geojson_source(&mut self, id: &str, data: &serde_json::Value) -> Result<(), MapError> {
        self.add_source(id, HeadlessSource::GeoJson(data.clone()))
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<(), MapError> {
        if self.layer(&layer.id).is_some() {
            return Err(MapError::Backend(format!("layer {:?} already exists", layer.id)));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(MapError::Backend(format!(
                "layer {:?} refers to unknown source {:?}",
                layer.id, layer.source
            )));
        }
        self.layers.push(HeadlessLayer {
            spec: layer.clone(),
            visibility: Visibility::Visible,
        });
        Ok(())
    }

    fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<(), MapError> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.spec.id == layer_id)
            .ok_or_else(|| MapError::LayerNotFound(layer_id.to_string()))?;
        layer.visibility = visibility;
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: &LngLatBounds, padding: u32) -> Result<(), MapError> {
        self.fits.push((*bounds, padding));
        self.view = *bounds;
        Ok(())
    }

    fn zoom(&self) -> Result<f64, MapError> {
        Ok(self.zoom)
    }

    fn bounds(&self) -> Result<LngLatBounds, MapError> {
        Ok(self.view)
    }
}
