use foundation::AnnotationId;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::symbology::CirclePaint;

pub const RASTER_PREFIX: &str = "tms-layer-";
pub const POINT_SOURCE_PREFIX: &str = "points-source-";
pub const POINT_LAYER_PREFIX: &str = "points-layer-";

/// Layout visibility of a style layer. There is no third state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    #[serde(rename = "none")]
    Hidden,
}

impl Visibility {
    pub fn toggled(self) -> Self {
        match self {
            Visibility::Visible => Visibility::Hidden,
            Visibility::Hidden => Visibility::Visible,
        }
    }

    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }

    /// Value of the `visibility` layout property.
    pub fn as_layout_value(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "none",
        }
    }

    pub fn from_layout_value(value: &str) -> Option<Self> {
        match value {
            "visible" => Some(Visibility::Visible),
            "none" => Some(Visibility::Hidden),
            _ => None,
        }
    }
}

/// Map ids derived from one annotation id.
///
/// The raster pair shares one id for source and layer; points use their own
/// prefixes, so the two never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerKeys {
    pub raster_source: String,
    pub raster_layer: String,
    pub point_source: String,
    pub point_layer: String,
}

impl LayerKeys {
    pub fn for_annotation(id: &AnnotationId) -> Self {
        let raster = format!("{RASTER_PREFIX}{id}");
        Self {
            raster_source: raster.clone(),
            raster_layer: raster,
            point_source: format!("{POINT_SOURCE_PREFIX}{id}"),
            point_layer: format!("{POINT_LAYER_PREFIX}{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Raster,
    Circle(CirclePaint),
}

/// A style layer bound to a source, as handed to the map library.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
}

impl LayerSpec {
    pub fn raster(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind: LayerKind::Raster,
        }
    }

    pub fn circle(id: impl Into<String>, source: impl Into<String>, paint: CirclePaint) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            kind: LayerKind::Circle(paint),
        }
    }

    pub fn to_style_json(&self) -> serde_json::Value {
        match &self.kind {
            LayerKind::Raster => json!({
                "id": self.id,
                "type": "raster",
                "source": self.source,
            }),
            LayerKind::Circle(paint) => json!({
                "id": self.id,
                "type": "circle",
                "source": self.source,
                "paint": paint.to_style_json(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn visibility_alternates() {
        let v = Visibility::Visible;
        assert_eq!(v.toggled(), Visibility::Hidden);
        assert_eq!(v.toggled().toggled(), v);
        assert_eq!(Visibility::Hidden.as_layout_value(), "none");
        assert_eq!(Visibility::from_layout_value("visible"), Some(Visibility::Visible));
        assert_eq!(Visibility::from_layout_value("hidden"), None);
    }

    #[test]
    fn visibility_serializes_as_layout_value() {
        for v in [Visibility::Visible, Visibility::Hidden] {
            assert_eq!(serde_json::to_value(v).unwrap(), json!(v.as_layout_value()));
        }
        let hidden: Visibility = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(hidden, Visibility::Hidden);
    }

    #[test]
    fn derived_keys_do_not_collide() {
        let id = AnnotationId::parse("abc").unwrap();
        let keys = LayerKeys::for_annotation(&id);
        assert_eq!(keys.raster_source, "tms-layer-abc");
        assert_eq!(keys.raster_layer, "tms-layer-abc");
        assert_eq!(keys.point_source, "points-source-abc");
        assert_eq!(keys.point_layer, "points-layer-abc");
        assert_ne!(keys.raster_source, keys.point_source);
    }

    #[test]
    fn circle_layer_style_json() {
        let spec = LayerSpec::circle("points-layer-a", "points-source-a", CirclePaint::default());
        assert_eq!(
            spec.to_style_json(),
            json!({
                "id": "points-layer-a",
                "type": "circle",
                "source": "points-source-a",
                "paint": { "circle-radius": 5.0, "circle-color": ["get", "color"] },
            })
        );
    }
}
