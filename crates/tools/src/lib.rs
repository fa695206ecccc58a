//! Helpers for the `georef` command line viewer.

use std::fmt::Write;

use foundation::LngLatBounds;
use viewer::LayerCard;

#[derive(Debug, Clone, PartialEq)]
pub enum BboxError {
    /// Not exactly four comma separated values.
    Arity(usize),
    Number(String),
    /// min greater than max on some axis.
    Inverted,
}

impl std::fmt::Display for BboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BboxError::Arity(n) => write!(f, "bbox needs 4 values (minLng,minLat,maxLng,maxLat), got {n}"),
            BboxError::Number(s) => write!(f, "bbox value is not a number: {s:?}"),
            BboxError::Inverted => write!(f, "bbox minimum exceeds maximum"),
        }
    }
}

impl std::error::Error for BboxError {}

/// Parse `minLng,minLat,maxLng,maxLat`.
pub fn parse_bbox(s: &str) -> Result<LngLatBounds, BboxError> {
    let values = s
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BboxError::Number(part.to_string()))
        })
        .collect::<Result<Vec<f64>, _>>()?;
    let [min_lng, min_lat, max_lng, max_lat] = values[..] else {
        return Err(BboxError::Arity(values.len()));
    };
    if min_lng > max_lng || min_lat > max_lat {
        return Err(BboxError::Inverted);
    }
    Ok(LngLatBounds::new(min_lng, min_lat, max_lng, max_lat))
}

/// Plain-text layer list, one block per card.
pub fn render_cards(cards: &[LayerCard]) -> String {
    if cards.is_empty() {
        return "No annotations loaded.\n".to_string();
    }
    let mut out = String::new();
    for card in cards {
        let state = match card.visibility {
            Some(v) => v.as_layout_value(),
            None => "not loaded",
        };
        let _ = writeln!(out, "Annotation ID: {} [{state}]", card.id);
        let _ = writeln!(out, "  tiles:    {}", card.tms_url);
        if let Some(url) = &card.josm_tms_url {
            let _ = writeln!(out, "  josm tms: {url}");
        }
        if let Some(url) = &card.josm_zoom_url {
            let _ = writeln!(out, "  josm zoom: {url}");
        }
        if let Some(url) = &card.manifest_url {
            let _ = writeln!(out, "  manifest: {url}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use layers::Visibility;
    use pretty_assertions::assert_eq;

    #[test]
    fn bbox_parses_west_south_east_north() {
        assert_eq!(
            parse_bbox("4.5, 52.25,5,52.75"),
            Ok(LngLatBounds::new(4.5, 52.25, 5.0, 52.75))
        );
    }

    #[test]
    fn bbox_errors() {
        assert_eq!(parse_bbox("1,2,3"), Err(BboxError::Arity(3)));
        assert_eq!(parse_bbox("1,2,x,4"), Err(BboxError::Number("x".to_string())));
        assert_eq!(parse_bbox("1,2,3,NaN"), Err(BboxError::Number("NaN".to_string())));
        assert_eq!(parse_bbox("3,2,1,4"), Err(BboxError::Inverted));
    }

    #[test]
    fn cards_render_loaded_state_and_links() {
        let card = LayerCard {
            id: "abc".to_string(),
            annotation_url: "https://annotations.allmaps.org/maps/abc".to_string(),
            tms_url: "https://allmaps.xyz/maps/abc/{z}/{x}/{y}.png".to_string(),
            josm_tms_url: None,
            josm_zoom_url: None,
            manifest_url: Some("https://example.test/m".to_string()),
            visibility: Some(Visibility::Visible),
        };
        assert_eq!(
            render_cards(&[card]),
            "Annotation ID: abc [visible]\n  tiles:    https://allmaps.xyz/maps/abc/{z}/{x}/{y}.png\n  manifest: https://example.test/m\n"
        );
        assert_eq!(render_cards(&[]), "No annotations loaded.\n");
    }
}
