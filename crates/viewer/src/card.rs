use annotations::Annotation;
use foundation::AnnotationId;
use layers::{LayerState, TileTemplate, Visibility};
use serde::Serialize;

use crate::links::JosmLinks;

/// One entry of the layer list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerCard {
    pub id: String,
    pub annotation_url: String,
    pub tms_url: String,
    pub josm_tms_url: Option<String>,
    /// Only known once the layer has been loaded and its bounds computed.
    pub josm_zoom_url: Option<String>,
    pub manifest_url: Option<String>,
    /// `None` while the layer has never been loaded.
    pub visibility: Option<Visibility>,
}

impl LayerCard {
    pub fn new(
        id: &AnnotationId,
        annotation: &Annotation,
        tiles: &TileTemplate,
        josm: Option<&JosmLinks>,
        state: Option<&LayerState>,
    ) -> Self {
        let tms_url = tiles.for_annotation(id);
        let bounds = state.and_then(|s| s.bounds);
        Self {
            id: id.to_string(),
            annotation_url: annotation.id.clone(),
            josm_tms_url: josm
                .and_then(|j| j.imagery(id.as_str(), &tms_url).ok())
                .map(|u| u.to_string()),
            josm_zoom_url: josm
                .zip(bounds)
                .and_then(|(j, b)| j.load_and_zoom(&b).ok())
                .map(|u| u.to_string()),
            manifest_url: annotation.manifest.clone(),
            visibility: state.filter(|s| s.exists).map(|s| s.visibility),
            tms_url,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_some_and(Visibility::is_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::LngLatBounds;

    fn annotation() -> Annotation {
        Annotation {
            id: "https://annotations.allmaps.org/maps/abc".to_string(),
            target: None,
            body: None,
            manifest: Some("https://example.test/manifest.json".to_string()),
        }
    }

    #[test]
    fn unloaded_card_has_no_zoom_link() {
        let a = annotation();
        let id = a.annotation_id().unwrap();
        let josm = JosmLinks::new("http://localhost:8111").unwrap();
        let card = LayerCard::new(&id, &a, &TileTemplate::default(), Some(&josm), None);

        assert_eq!(card.id, "abc");
        assert_eq!(card.tms_url, "https://allmaps.xyz/maps/abc/{z}/{x}/{y}.png");
        let josm_tms = card.josm_tms_url.as_deref().unwrap();
        assert!(josm_tms.starts_with("http://localhost:8111/imagery?title=abc"));
        assert_eq!(card.josm_zoom_url, None);
        assert_eq!(card.manifest_url.as_deref(), Some("https://example.test/manifest.json"));
        assert!(!card.is_visible());
    }

    #[test]
    fn loaded_card_links_to_bounds() {
        let a = annotation();
        let id = a.annotation_id().unwrap();
        let josm = JosmLinks::new("http://localhost:8111").unwrap();
        let state = LayerState {
            exists: true,
            visibility: Visibility::Hidden,
            bounds: Some(LngLatBounds::new(1.0, 2.0, 3.0, 4.0)),
        };
        let card = LayerCard::new(&id, &a, &TileTemplate::default(), Some(&josm), Some(&state));

        assert_eq!(
            card.josm_zoom_url.as_deref(),
            Some("http://localhost:8111/load_and_zoom?left=1&bottom=2&right=3&top=4")
        );
        assert_eq!(card.visibility, Some(Visibility::Hidden));
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["visibility"], "none");
    }
}
