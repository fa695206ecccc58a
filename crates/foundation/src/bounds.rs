/// A geographic position in WGS84 degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn is_finite(&self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

/// Axis-aligned longitude/latitude box.
///
/// No antimeridian handling: a box that crosses 180° is simply wide.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LngLatBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl LngLatBounds {
    pub const fn new(min_lng: f64, min_lat: f64, max_lng: f64, max_lat: f64) -> Self {
        Self {
            min_lng,
            min_lat,
            max_lng,
            max_lat,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: LngLat) -> bool {
        p.lng >= self.min_lng
            && p.lng <= self.max_lng
            && p.lat >= self.min_lat
            && p.lat <= self.max_lat
    }

    /// `[[west, south], [east, north]]`, the corner-pair form map libraries take.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lng, self.min_lat], [self.max_lng, self.max_lat]]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// No point geometry to enclose.
    Empty,
    /// A coordinate was NaN or infinite.
    NonFinite,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryError::Empty => write!(f, "geometry contains no points"),
            GeometryError::NonFinite => write!(f, "geometry contains a non-finite coordinate"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Smallest box enclosing every point, in a single pass.
pub fn bounding_box_of<I>(points: I) -> Result<LngLatBounds, GeometryError>
where
    I: IntoIterator<Item = LngLat>,
{
    let mut out: Option<LngLatBounds> = None;
    for p in points {
        if !p.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        out = Some(match out {
            None => LngLatBounds::new(p.lng, p.lat, p.lng, p.lat),
            Some(b) => LngLatBounds::new(
                b.min_lng.min(p.lng),
                b.min_lat.min(p.lat),
                b.max_lng.max(p.lng),
                b.max_lat.max(p.lat),
            ),
        });
    }
    out.ok_or(GeometryError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        let none: Vec<LngLat> = Vec::new();
        assert_eq!(bounding_box_of(none), Err(GeometryError::Empty));
    }

    #[test]
    fn single_point_is_degenerate_box() {
        let b = bounding_box_of([LngLat::new(4.9, 52.37)]).unwrap();
        assert_eq!(b, LngLatBounds::new(4.9, 52.37, 4.9, 52.37));
    }

    #[test]
    fn encloses_every_input_point() {
        let pts = [
            LngLat::new(4.88, 52.36),
            LngLat::new(4.93, 52.38),
            LngLat::new(4.90, 52.35),
            LngLat::new(-0.1, 51.5),
        ];
        let b = bounding_box_of(pts).unwrap();
        assert!(b.min_lng <= b.max_lng);
        assert!(b.min_lat <= b.max_lat);
        for p in pts {
            assert!(b.contains(p), "{p:?} outside {b:?}");
        }
        assert_eq!(b, LngLatBounds::new(-0.1, 51.5, 4.93, 52.38));
    }

    #[test]
    fn non_finite_coordinate_is_rejected() {
        let pts = [LngLat::new(1.0, 2.0), LngLat::new(f64::NAN, 0.0)];
        assert_eq!(bounding_box_of(pts), Err(GeometryError::NonFinite));
    }

    #[test]
    fn corners_are_west_south_then_east_north() {
        let b = LngLatBounds::new(-1.0, -2.0, 3.0, 4.0);
        assert_eq!(b.corners(), [[-1.0, -2.0], [3.0, 4.0]]);
    }
}
