use foundation::{AnnotationId, LngLat};
use serde_json::json;

use crate::symbology::POINT_COLOR;

/// GeoJSON data for the control-point layer of one annotation.
///
/// Each point carries the `color` the circle paint reads and a stable
/// `<id>-point-<index>` id.
pub fn point_source_data(id: &AnnotationId, points: &[LngLat]) -> serde_json::Value {
    let features: Vec<serde_json::Value> = points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [p.lng, p.lat] },
                "properties": {
                    "color": POINT_COLOR,
                    "id": format!("{id}-point-{index}"),
                },
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_get_color_and_indexed_ids() {
        let id = AnnotationId::parse("abc").unwrap();
        let data = point_source_data(&id, &[LngLat::new(1.0, 2.0), LngLat::new(3.0, 4.0)]);

        assert_eq!(data["type"], "FeatureCollection");
        let features = data["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["geometry"]["coordinates"], json!([3.0, 4.0]));
        assert_eq!(features[1]["properties"]["id"], "abc-point-1");
        assert_eq!(features[0]["properties"]["color"], "#A020F0");
    }
}
