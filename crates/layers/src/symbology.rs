use serde_json::json;

/// Fill color given to every control point of a georeferenced map.
pub const POINT_COLOR: &str = "#A020F0";

/// Paint of a circle layer; the color is read per feature from a property.
#[derive(Debug, Clone, PartialEq)]
pub struct CirclePaint {
    pub radius: f64,
    pub color_property: String,
}

impl CirclePaint {
    pub fn new(radius: f64, color_property: impl Into<String>) -> Self {
        Self {
            radius,
            color_property: color_property.into(),
        }
    }

    pub fn to_style_json(&self) -> serde_json::Value {
        json!({
            "circle-radius": self.radius,
            "circle-color": ["get", self.color_property],
        })
    }
}

impl Default for CirclePaint {
    fn default() -> Self {
        Self::new(5.0, "color")
    }
}
