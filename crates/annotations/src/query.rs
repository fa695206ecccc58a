use foundation::LngLatBounds;

pub const DEFAULT_ENDPOINT: &str = "https://annotations.allmaps.org/maps";
pub const DEFAULT_LIMIT: u32 = 20;

/// Fetches are skipped at or below this zoom level; wider viewports make the
/// intersects query unbounded.
pub const MIN_FETCH_ZOOM: f64 = 5.0;

/// A single viewport-bounded annotations request.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportQuery {
    pub bounds: LngLatBounds,
    pub limit: u32,
}

impl ViewportQuery {
    pub fn new(bounds: LngLatBounds, limit: u32) -> Self {
        Self { bounds, limit }
    }

    /// `south,west,north,east`, the order the service expects.
    pub fn intersects_param(&self) -> String {
        let b = &self.bounds;
        format!("{},{},{},{}", b.min_lat, b.min_lng, b.max_lat, b.max_lng)
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!(
            "{}?limit={}&intersects={}",
            endpoint.trim_end_matches('/'),
            self.limit,
            self.intersects_param()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_lat_lng_axis_order() {
        let q = ViewportQuery::new(LngLatBounds::new(4.5, 52.25, 5.0, 52.5), 20);
        assert_eq!(
            q.url(DEFAULT_ENDPOINT),
            "https://annotations.allmaps.org/maps?limit=20&intersects=52.25,4.5,52.5,5"
        );
    }

    #[test]
    fn trailing_slash_on_endpoint_is_dropped() {
        let q = ViewportQuery::new(LngLatBounds::new(-1.0, -2.0, 1.0, 2.0), 5);
        assert_eq!(
            q.url("http://localhost:8080/maps/"),
            "http://localhost:8080/maps?limit=5&intersects=-2,-1,2,1"
        );
    }
}
