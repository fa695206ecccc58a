use foundation::AnnotationId;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const DEFAULT_TILE_TEMPLATE: &str = "https://allmaps.xyz/maps/{id}/{z}/{x}/{y}.png";
pub const TILE_SIZE: u32 = 256;

/// Tiled raster source as the map library expects it.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSource {
    pub tiles: Vec<String>,
    pub tile_size: u32,
    pub attribution: Option<String>,
}

impl RasterSource {
    pub fn new(tile_url: impl Into<String>) -> Self {
        Self {
            tiles: vec![tile_url.into()],
            tile_size: TILE_SIZE,
            attribution: None,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    pub fn to_style_json(&self) -> serde_json::Value {
        let mut v = json!({
            "type": "raster",
            "tiles": self.tiles,
            "tileSize": self.tile_size,
        });
        if let Some(attribution) = &self.attribution {
            v["attribution"] = json!(attribution);
        }
        v
    }
}

/// Per-annotation tile URL template.
///
/// `{id}` is replaced by the short annotation id; `{z}`, `{x}` and `{y}` are
/// left for the tile loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileTemplate(String);

impl TileTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn for_annotation(&self, id: &AnnotationId) -> String {
        self.0.replace("{id}", id.as_str())
    }
}

impl Default for TileTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_TEMPLATE)
    }
}

/// The background layer installed once the map has loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseMap {
    pub id: String,
    pub tiles: String,
    pub attribution: String,
}

impl BaseMap {
    pub fn source(&self) -> RasterSource {
        RasterSource::new(self.tiles.clone()).with_attribution(self.attribution.clone())
    }
}

impl Default for BaseMap {
    fn default() -> Self {
        Self {
            id: "osm-tiles".to_string(),
            tiles: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; OpenStreetMap contributors".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_keeps_tile_placeholders() {
        let id = AnnotationId::parse("a38b4ed7ea01a36a").unwrap();
        assert_eq!(
            TileTemplate::default().for_annotation(&id),
            "https://allmaps.xyz/maps/a38b4ed7ea01a36a/{z}/{x}/{y}.png"
        );
    }

    #[test]
    fn raster_source_json() {
        let v = BaseMap::default().source().to_style_json();
        assert_eq!(v["type"], "raster");
        assert_eq!(v["tileSize"], 256);
        assert_eq!(v["tiles"][0], "https://tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert_eq!(v["attribution"], "&copy; OpenStreetMap contributors");

        let bare = RasterSource::new("https://t/{z}/{x}/{y}.png").to_style_json();
        assert!(bare.get("attribution").is_none());
    }
}
