use std::collections::{BTreeMap, BTreeSet};

use foundation::{AnnotationId, LngLat, LngLatBounds};
use tracing::{debug, warn};

use crate::layer::{LayerKeys, LayerSpec, Visibility};
use crate::raster::{BaseMap, RasterSource};
use crate::surface::{MapError, MapSurface};
use crate::symbology::CirclePaint;
use crate::vector::point_source_data;

/// Stable add/toggle interface over one live map instance.
///
/// The facade keeps its own record of the sources and layers it created, so
/// existence checks never depend on the library's query API. It owns the map
/// for the lifetime of one mount; dropping it forgets every layer.
#[derive(Debug)]
pub struct MapFacade<S> {
    surface: S,
    ready: bool,
    sources: BTreeSet<String>,
    /// Layers created through this facade and their last applied visibility.
    layers: BTreeMap<String, Visibility>,
    point_paint: CirclePaint,
}

impl<S: MapSurface> MapFacade<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            ready: false,
            sources: BTreeSet::new(),
            layers: BTreeMap::new(),
            point_paint: CirclePaint::default(),
        }
    }

    /// Called once the library reports the map as loaded.
    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn has_source(&self, source_id: &str) -> bool {
        self.sources.contains(source_id)
    }

    pub fn has_layer(&self, layer_id: &str) -> bool {
        self.layers.contains_key(layer_id)
    }

    pub fn ensure_base_layer(&mut self, base: &BaseMap) -> Result<bool, MapError> {
        let spec = LayerSpec::raster(base.id.clone(), base.id.clone());
        self.ensure_raster(&base.id, &spec, &base.source())
    }

    /// Add the raster source and layer for `id` unless they already exist.
    /// Returns whether anything was created.
    pub fn ensure_raster_layer(
        &mut self,
        id: &AnnotationId,
        tile_url_template: &str,
    ) -> Result<bool, MapError> {
        let keys = LayerKeys::for_annotation(id);
        let spec = LayerSpec::raster(keys.raster_layer, keys.raster_source.clone());
        self.ensure_raster(&keys.raster_source, &spec, &RasterSource::new(tile_url_template))
    }

    /// Add the control-point source and circle layer for `id` unless they
    /// already exist. Returns whether anything was created.
    pub fn ensure_point_layer(
        &mut self,
        id: &AnnotationId,
        points: &[LngLat],
    ) -> Result<bool, MapError> {
        self.check_ready()?;
        let keys = LayerKeys::for_annotation(id);
        let mut created = false;

        if !self.sources.contains(&keys.point_source) {
            let data = point_source_data(id, points);
            self.surface.add_geojson_source(&keys.point_source, &data)?;
            self.sources.insert(keys.point_source.clone());
            created = true;
        }
        if !self.layers.contains_key(&keys.point_layer) {
            let spec = LayerSpec::circle(
                keys.point_layer.clone(),
                keys.point_source,
                self.point_paint.clone(),
            );
            self.surface.add_layer(&spec)?;
            self.layers.insert(keys.point_layer, Visibility::Visible);
            created = true;
        }
        if !created {
            debug!(%id, "point layer already present");
        }
        Ok(created)
    }

    /// Last visibility applied to a layer this facade created.
    pub fn layer_visibility(&self, layer_id: &str) -> Option<Visibility> {
        self.layers.get(layer_id).copied()
    }

    /// Show or hide both layers of `id`, all or nothing.
    ///
    /// Fails with `LayerNotFound` (and touches nothing) if the raster layer
    /// was never created; a missing point layer is skipped. If the raster
    /// change fails, the point layer is put back to its previous visibility.
    pub fn set_visibility(
        &mut self,
        id: &AnnotationId,
        visibility: Visibility,
    ) -> Result<(), MapError> {
        self.check_ready()?;
        let keys = LayerKeys::for_annotation(id);
        if !self.layers.contains_key(&keys.raster_layer) {
            debug!(layer = %keys.raster_layer, "visibility change on missing layer ignored");
            return Err(MapError::LayerNotFound(keys.raster_layer));
        }

        let points_before = self.layers.get(&keys.point_layer).copied();
        if points_before.is_some() {
            self.surface.set_visibility(&keys.point_layer, visibility)?;
        }
        if let Err(err) = self.surface.set_visibility(&keys.raster_layer, visibility) {
            if let Some(before) = points_before {
                if let Err(undo) = self.surface.set_visibility(&keys.point_layer, before) {
                    warn!(layer = %keys.point_layer, "could not restore visibility: {undo}");
                }
            }
            return Err(err);
        }

        self.layers.insert(keys.raster_layer, visibility);
        if points_before.is_some() {
            self.layers.insert(keys.point_layer, visibility);
        }
        Ok(())
    }

    /// Best-effort camera move. Dropped while the map is loading; library
    /// failures are logged, never returned.
    pub fn fit_to_bounds(&mut self, bounds: &LngLatBounds, padding: u32) {
        if !self.ready {
            debug!(?bounds, "map not ready; fit request dropped");
            return;
        }
        if let Err(err) = self.surface.fit_bounds(bounds, padding) {
            warn!("fit to bounds failed: {err}");
        }
    }

    /// Visible area and zoom of the map.
    pub fn viewport(&self) -> Result<(LngLatBounds, f64), MapError> {
        self.check_ready()?;
        Ok((self.surface.bounds()?, self.surface.zoom()?))
    }

    fn ensure_raster(
        &mut self,
        source_id: &str,
        spec: &LayerSpec,
        source: &RasterSource,
    ) -> Result<bool, MapError> {
        self.check_ready()?;
        let mut created = false;

        if !self.sources.contains(source_id) {
            self.surface.add_raster_source(source_id, source)?;
            self.sources.insert(source_id.to_string());
            created = true;
        }
        if !self.layers.contains_key(&spec.id) {
            self.surface.add_layer(spec)?;
            self.layers.insert(spec.id.clone(), Visibility::Visible);
            created = true;
        }
        if !created {
            debug!(source = source_id, "raster layer already present");
        }
        Ok(created)
    }

    fn check_ready(&self) -> Result<(), MapError> {
        if self.ready {
            Ok(())
        } else {
            Err(MapError::NotReady)
        }
    }
}
