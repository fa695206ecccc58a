//! Georeference annotation records as served by the annotations API.
//!
//! Only the fields the viewer reads are modelled; everything else in the
//! payload is ignored on decode.

use foundation::{AnnotationId, IdError, LngLat};
use serde::{Deserialize, Serialize};

/// Response body of a viewport query: `{ "items": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPage {
    #[serde(default)]
    pub items: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Full identifier URL, e.g. `https://annotations.allmaps.org/maps/<id>`.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,
    /// Source document of the map. Not part of the API payload; filled in
    /// after a fetch by walking the `partOf` chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

impl Annotation {
    pub fn annotation_id(&self) -> Result<AnnotationId, IdError> {
        AnnotationId::parse(&self.id)
    }

    /// The body, if it is a GeoJSON feature collection.
    pub fn feature_collection(&self) -> Option<&FeatureCollection> {
        match self.body.as_ref()? {
            Body::FeatureCollection(fc) => Some(fc),
            Body::Other(_) => None,
        }
    }

    pub fn source(&self) -> Option<&SourceResource> {
        self.target.as_ref()?.source.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceResource>,
}

/// The image the annotation georeferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "partOf", default, skip_serializing_if = "Vec::is_empty")]
    pub part_of: Vec<PartOf>,
}

/// One containing resource (canvas, manifest, collection, ...), possibly
/// itself part of further resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartOf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "partOf", default, skip_serializing_if = "Vec::is_empty")]
    pub part_of: Vec<PartOf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    FeatureCollection(FeatureCollection),
    Other(serde_json::Value),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureCollectionType {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: FeatureCollectionType,
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_points(points: impl IntoIterator<Item = LngLat>) -> Self {
        Self {
            kind: FeatureCollectionType::FeatureCollection,
            features: points.into_iter().map(Feature::point).collect(),
        }
    }

    /// Point geometries in feature order; other geometry kinds are skipped.
    pub fn points(&self) -> impl Iterator<Item = LngLat> + '_ {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref()?.as_point())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub properties: serde_json::Value,
}

impl Feature {
    pub fn point(p: LngLat) -> Self {
        Self {
            geometry: Some(Geometry::Point {
                coordinates: vec![p.lng, p.lat],
            }),
            properties: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// `[lng, lat]`, optionally followed by an altitude.
    Point { coordinates: Vec<f64> },
    #[serde(other)]
    Other,
}

impl Geometry {
    pub fn as_point(&self) -> Option<LngLat> {
        match self {
            Geometry::Point { coordinates } => match coordinates.as_slice() {
                [lng, lat, ..] => Some(LngLat::new(*lng, *lat)),
                _ => None,
            },
            Geometry::Other => None,
        }
    }
}
