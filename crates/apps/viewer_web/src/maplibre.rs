//! MapLibre GL JS behind the `MapSurface` primitives.
//!
//! Style objects cross the boundary as JSON text and are parsed on the JS
//! side; `maplibregl` must be loaded on the page.

use foundation::LngLatBounds;
use layers::{LayerSpec, MapError, MapSurface, RasterSource, Visibility};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = "
export function allmaps_map_create(container, lng, lat, zoom) {
    return new maplibregl.Map({
        container,
        style: { version: 8, sources: {}, layers: [] },
        center: [lng, lat],
        zoom,
    });
}

export function allmaps_map_on_load(map, callback) {
    map.on('load', () => callback());
}

export function allmaps_map_add_source(map, id, json) {
    map.addSource(id, JSON.parse(json));
}

export function allmaps_map_add_layer(map, json) {
    map.addLayer(JSON.parse(json));
}

export function allmaps_map_set_layout(map, layer, name, value) {
    map.setLayoutProperty(layer, name, value);
}

export function allmaps_map_fit_bounds(map, west, south, east, north, padding) {
    map.fitBounds([[west, south], [east, north]], { padding });
}

export function allmaps_map_zoom(map) {
    return map.getZoom();
}

export function allmaps_map_bounds(map) {
    const b = map.getBounds();
    return JSON.stringify([b.getWest(), b.getSouth(), b.getEast(), b.getNorth()]);
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn allmaps_map_create(container: &str, lng: f64, lat: f64, zoom: f64) -> Result<JsValue, JsValue>;

    fn allmaps_map_on_load(map: &JsValue, callback: &Closure<dyn FnMut()>);

    #[wasm_bindgen(catch)]
    fn allmaps_map_add_source(map: &JsValue, id: &str, json: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn allmaps_map_add_layer(map: &JsValue, json: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn allmaps_map_set_layout(
        map: &JsValue,
        layer: &str,
        name: &str,
        value: &str,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn allmaps_map_fit_bounds(
        map: &JsValue,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        padding: u32,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn allmaps_map_zoom(map: &JsValue) -> Result<f64, JsValue>;

    #[wasm_bindgen(catch)]
    fn allmaps_map_bounds(map: &JsValue) -> Result<String, JsValue>;
}

fn backend(err: JsValue) -> MapError {
    MapError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// One `maplibregl.Map` instance.
pub struct MapLibreSurface {
    map: JsValue,
}

impl MapLibreSurface {
    pub fn create(container: &str, center: [f64; 2], zoom: f64) -> Result<Self, JsValue> {
        let map = allmaps_map_create(container, center[0], center[1], zoom)?;
        Ok(Self { map })
    }

    /// Register `callback` for the map's `load` event.
    pub fn on_load(&self, callback: &Closure<dyn FnMut()>) {
        allmaps_map_on_load(&self.map, callback);
    }

    fn add_source_json(&mut self, id: &str, source: &serde_json::Value) -> Result<(), MapError> {
        allmaps_map_add_source(&self.map, id, &source.to_string()).map_err(backend)
    }
}

impl MapSurface for MapLibreSurface {
    fn add_raster_source(&mut self, id: &str, source: &RasterSource) -> Result<(), MapError> {
        self.add_source_json(id, &source.to_style_json())
    }

    fn add_geojson_source(&mut self, id: &str, data: &serde_json::Value) -> Result<(), MapError> {
        let source = serde_json::json!({ "type": "geojson", "data": data });
        self.add_source_json(id, &source)
    }

    fn add_layer(&mut self, layer: &LayerSpec) -> Result<(), MapError> {
        allmaps_map_add_layer(&self.map, &layer.to_style_json().to_string()).map_err(backend)
    }

    fn set_visibility(&mut self, layer_id: &str, visibility: Visibility) -> Result<(), MapError> {
        allmaps_map_set_layout(&self.map, layer_id, "visibility", visibility.as_layout_value())
            .map_err(backend)
    }

    fn fit_bounds(&mut self, bounds: &LngLatBounds, padding: u32) -> Result<(), MapError> {
        let [[west, south], [east, north]] = bounds.corners();
        allmaps_map_fit_bounds(&self.map, west, south, east, north, padding).map_err(backend)
    }

    fn zoom(&self) -> Result<f64, MapError> {
        allmaps_map_zoom(&self.map).map_err(backend)
    }

    fn bounds(&self) -> Result<LngLatBounds, MapError> {
        let json = allmaps_map_bounds(&self.map).map_err(backend)?;
        let [west, south, east, north]: [f64; 4] =
            serde_json::from_str(&json).map_err(|e| MapError::Backend(e.to_string()))?;
        Ok(LngLatBounds::new(west, south, east, north))
    }
}
