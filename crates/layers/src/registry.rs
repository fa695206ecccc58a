use std::collections::BTreeMap;

use annotations::FeatureCollection;
use foundation::{AnnotationId, GeometryError, LngLat, LngLatBounds, bounding_box_of};
use tracing::{debug, warn};

use crate::facade::MapFacade;
use crate::layer::Visibility;
use crate::raster::TileTemplate;
use crate::surface::{MapError, MapSurface};

pub const DEFAULT_FIT_PADDING: u32 = 20;

/// What the registry knows about one annotation's layers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerState {
    pub exists: bool,
    pub visibility: Visibility,
    pub bounds: Option<LngLatBounds>,
}

impl Default for LayerState {
    fn default() -> Self {
        Self {
            exists: false,
            visibility: Visibility::Hidden,
            bounds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerError {
    Geometry(GeometryError),
    /// The annotation has no feature collection to build layers from.
    MissingGeometry,
    Map(MapError),
}

impl std::fmt::Display for LayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerError::Geometry(err) => write!(f, "cannot place layer: {err}"),
            LayerError::MissingGeometry => {
                write!(f, "annotation body does not contain a valid FeatureCollection")
            }
            LayerError::Map(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayerError::Geometry(err) => Some(err),
            LayerError::Map(err) => Some(err),
            LayerError::MissingGeometry => None,
        }
    }
}

impl From<GeometryError> for LayerError {
    fn from(err: GeometryError) -> Self {
        LayerError::Geometry(err)
    }
}

impl From<MapError> for LayerError {
    fn from(err: MapError) -> Self {
        LayerError::Map(err)
    }
}

/// Per-annotation layer lifecycle: absent, then visible/hidden forever.
///
/// States are never removed; they live as long as the map they describe.
#[derive(Debug, Clone)]
pub struct LayerRegistry {
    states: BTreeMap<AnnotationId, LayerState>,
    tiles: TileTemplate,
    fit_padding: u32,
}

impl Default for LayerRegistry {
    fn default() -> Self {
        Self::new(TileTemplate::default(), DEFAULT_FIT_PADDING)
    }
}

impl LayerRegistry {
    pub fn new(tiles: TileTemplate, fit_padding: u32) -> Self {
        Self {
            states: BTreeMap::new(),
            tiles,
            fit_padding,
        }
    }

    pub fn tiles(&self) -> &TileTemplate {
        &self.tiles
    }

    pub fn state(&self, id: &AnnotationId) -> Option<&LayerState> {
        self.states.get(id)
    }

    /// Current visibility, `None` until the layer has been created.
    pub fn visibility(&self, id: &AnnotationId) -> Option<Visibility> {
        self.states
            .get(id)
            .filter(|s| s.exists)
            .map(|s| s.visibility)
    }

    pub fn bounds(&self, id: &AnnotationId) -> Option<LngLatBounds> {
        self.states.get(id).and_then(|s| s.bounds)
    }

    /// Ids whose layers are on the map, in id order.
    pub fn materialized(&self) -> impl Iterator<Item = &AnnotationId> + '_ {
        self.states
            .iter()
            .filter(|(_, s)| s.exists)
            .map(|(id, _)| id)
    }

    /// Envelope of the collection's point features, stored for `id`.
    /// Nothing is stored on error.
    pub fn compute_and_store_bounds(
        &mut self,
        id: &AnnotationId,
        features: &FeatureCollection,
    ) -> Result<LngLatBounds, GeometryError> {
        let bounds = bounding_box_of(features.points())?;
        self.states.entry(id.clone()).or_default().bounds = Some(bounds);
        Ok(bounds)
    }

    /// Create the layers of `id` (visible) on first call, flip visibility on
    /// every later call. Repeated toggles yield visible, hidden, visible, ...
    ///
    /// `features` is only needed for the first call, and again when `map` no
    /// longer has the layers (a new map instance): they are then created
    /// afresh. Creation failures leave the layer absent.
    pub fn toggle<S: MapSurface>(
        &mut self,
        map: &mut MapFacade<S>,
        id: &AnnotationId,
        features: Option<&FeatureCollection>,
    ) -> Result<Visibility, LayerError> {
        match self.visibility(id) {
            Some(current) => self.flip(map, id, current, features),
            None => self.materialize(map, id, features),
        }
    }

    fn flip<S: MapSurface>(
        &mut self,
        map: &mut MapFacade<S>,
        id: &AnnotationId,
        current: Visibility,
        features: Option<&FeatureCollection>,
    ) -> Result<Visibility, LayerError> {
        let next = current.toggled();
        match map.set_visibility(id, next) {
            Ok(()) => {}
            Err(MapError::LayerNotFound(layer)) => {
                warn!(%id, %layer, "layer missing from map; loading it again");
                if let Some(state) = self.states.get_mut(id) {
                    state.exists = false;
                    state.visibility = Visibility::Hidden;
                }
                return self.materialize(map, id, features);
            }
            Err(err) => return Err(err.into()),
        }
        if let Some(state) = self.states.get_mut(id) {
            state.visibility = next;
        }
        debug!(%id, visibility = next.as_layout_value(), "layer toggled");
        Ok(next)
    }

    fn materialize<S: MapSurface>(
        &mut self,
        map: &mut MapFacade<S>,
        id: &AnnotationId,
        features: Option<&FeatureCollection>,
    ) -> Result<Visibility, LayerError> {
        if !map.is_ready() {
            debug!(%id, "map not ready; toggle dropped");
            return Err(MapError::NotReady.into());
        }
        let Some(features) = features else {
            warn!(%id, "annotation body does not contain a valid FeatureCollection");
            return Err(LayerError::MissingGeometry);
        };
        let bounds = self
            .compute_and_store_bounds(id, features)
            .inspect_err(|err| warn!(%id, "not loading layer: {err}"))?;
        let points: Vec<LngLat> = features.points().collect();

        map.ensure_raster_layer(id, &self.tiles.for_annotation(id))?;
        map.ensure_point_layer(id, &points)?;
        map.set_visibility(id, Visibility::Visible)?;

        let state = self.states.entry(id.clone()).or_default();
        state.exists = true;
        state.visibility = Visibility::Visible;

        map.fit_to_bounds(&bounds, self.fit_padding);
        debug!(%id, ?bounds, "layer created");
        Ok(Visibility::Visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessMap;

    fn ready_map() -> MapFacade<HeadlessMap> {
        let mut map = MapFacade::new(HeadlessMap::default());
        map.mark_ready();
        map
    }

    fn triangle() -> FeatureCollection {
        FeatureCollection::from_points([
            LngLat::new(4.5, 52.25),
            LngLat::new(5.0, 52.5),
            LngLat::new(4.75, 52.75),
        ])
    }

    fn id(s: &str) -> AnnotationId {
        AnnotationId::parse(s).unwrap()
    }

    #[test]
    fn first_toggle_creates_layers_and_fits() {
        let mut map = ready_map();
        let mut reg = LayerRegistry::default();
        let a = id("tri");
        let fc = triangle();

        assert_eq!(reg.toggle(&mut map, &a, Some(&fc)), Ok(Visibility::Visible));

        let bounds = reg.bounds(&a).unwrap();
        assert_eq!(bounds, LngLatBounds::new(4.5, 52.25, 5.0, 52.75));
        for p in fc.points() {
            assert!(bounds.contains(p));
        }
        let surface = map.surface();
        assert_eq!(surface.layer_count(), 2);
        assert_eq!(surface.source_count(), 2);
        assert_eq!(
            surface.layer("tms-layer-tri").unwrap().visibility,
            Visibility::Visible
        );
        assert_eq!(surface.fit_requests(), &[(bounds, DEFAULT_FIT_PADDING)]);
        assert_eq!(reg.materialized().collect::<Vec<_>>(), vec![&a]);
    }

    #[test]
    fn toggles_alternate_without_recreating() {
        let mut map = ready_map();
        let mut reg = LayerRegistry::default();
        let a = id("tri");
        let fc = triangle();

        let seq: Vec<Visibility> = (0..4)
            .map(|_| reg.toggle(&mut map, &a, Some(&fc)).unwrap())
            .collect();
        assert_eq!(
            seq,
            vec![
                Visibility::Visible,
                Visibility::Hidden,
                Visibility::Visible,
                Visibility::Hidden
            ]
        );
        assert_eq!(map.surface().layer_count(), 2);
        assert_eq!(map.surface().fit_requests().len(), 1);
        assert_eq!(
            map.surface().layer("points-layer-tri").unwrap().visibility,
            Visibility::Hidden
        );
    }

    #[test]
    fn toggle_pair_restores_state() {
        let mut map = ready_map();
        let mut reg = LayerRegistry::default();
        let a = id("tri");
        reg.toggle(&mut map, &a, Some(&triangle())).unwrap();
        let before = reg.visibility(&a);
        reg.toggle(&mut map, &a, None).unwrap();
        reg.toggle(&mut map, &a, None).unwrap();
        assert_eq!(reg.visibility(&a), before);
    }

    #[test]
    fn empty_geometry_leaves_layer_absent() {
        let mut map = ready_map();
        let mut reg = LayerRegistry::default();
        let a = id("empty");
        let empty = FeatureCollection::default();

        assert_eq!(
            reg.toggle(&mut map, &a, Some(&empty)),
            Err(LayerError::Geometry(GeometryError::Empty))
        );
        assert_eq!(reg.visibility(&a), None);
        assert!(reg.state(&a).is_none());
        assert_eq!(map.surface().layer_count(), 0);
    }

    #[test]
    fn missing_body_and_unready_map_are_reported() {
        let mut reg = LayerRegistry::default();
        let a = id("x");

        let mut loading = MapFacade::new(HeadlessMap::default());
        assert_eq!(
            reg.toggle(&mut loading, &a, Some(&triangle())),
            Err(LayerError::Map(MapError::NotReady))
        );

        let mut map = ready_map();
        assert_eq!(
            reg.toggle(&mut map, &a, None),
            Err(LayerError::MissingGeometry)
        );
        assert_eq!(reg.visibility(&a), None);
    }

    #[test]
    fn toggle_on_new_map_recreates_layers() {
        let mut reg = LayerRegistry::default();
        let a = id("tri");
        let fc = triangle();
        let mut first = ready_map();
        reg.toggle(&mut first, &a, Some(&fc)).unwrap();

        let mut second = ready_map();
        assert_eq!(reg.toggle(&mut second, &a, Some(&fc)), Ok(Visibility::Visible));
        assert_eq!(second.surface().layer_count(), 2);
        assert_eq!(second.surface().fit_requests().len(), 1);
        assert_eq!(reg.toggle(&mut second, &a, Some(&fc)), Ok(Visibility::Hidden));
        assert_eq!(
            second.surface().layer("tms-layer-tri").unwrap().visibility,
            Visibility::Hidden
        );
    }

    #[test]
    fn new_map_without_geometry_forgets_layer() {
        let mut reg = LayerRegistry::default();
        let a = id("tri");
        let mut first = ready_map();
        reg.toggle(&mut first, &a, Some(&triangle())).unwrap();

        let mut second = ready_map();
        assert_eq!(
            reg.toggle(&mut second, &a, None),
            Err(LayerError::MissingGeometry)
        );
        assert_eq!(reg.visibility(&a), None);
        assert_eq!(second.surface().layer_count(), 0);
    }

    #[test]
    fn failed_flip_keeps_state_in_step_with_map() {
        let mut map = ready_map();
        let mut reg = LayerRegistry::default();
        let a = id("tri");
        reg.toggle(&mut map, &a, Some(&triangle())).unwrap();

        let mut unloaded = MapFacade::new(HeadlessMap::default());
        assert_eq!(
            reg.toggle(&mut unloaded, &a, None),
            Err(LayerError::Map(MapError::NotReady))
        );
        assert_eq!(reg.visibility(&a), Some(Visibility::Visible));
        assert_eq!(map.layer_visibility("tms-layer-tri"), Some(Visibility::Visible));
    }
}
