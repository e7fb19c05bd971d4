use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::{Geometry, GeometryType};

/// Unique identifier for a catalogue feature
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared feature type, as exposed to the map client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    Point,
    Line,
    Polygon,
    /// Multi-part or otherwise unclassified geometry.
    Other,
}

impl FeatureType {
    /// Whether a geometry variant is admissible under this declared type.
    pub fn admits(&self, geometry: &Geometry) -> bool {
        match (self, geometry.geometry_type()) {
            (FeatureType::Point, GeometryType::Point) => true,
            (FeatureType::Line, GeometryType::LineString) => true,
            (FeatureType::Polygon, GeometryType::Polygon) => true,
            (FeatureType::Other, _) => true,
            _ => false,
        }
    }
}

/// Catalogue feature record.
///
/// The feature store exclusively owns these; the spatial index holds only
/// `(id, bounding box)` back-references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier
    pub id: FeatureId,

    /// Display name
    pub name: String,

    /// Declared feature type
    #[serde(rename = "type")]
    pub kind: FeatureType,

    /// Styling/grouping category
    pub category: String,

    /// Geometry, well-formed for the declared type
    pub geometry: Geometry,

    /// Free-form feature attributes
    pub attributes: HashMap<String, serde_json::Value>,

    /// CRS EPSG code, identical across the whole catalogue
    pub crs: u32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a feature. The store assigns the id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub category: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
    /// Declared CRS of the draft geometry. `None` means the engine CRS.
    #[serde(default)]
    pub crs: Option<u32>,
}

impl FeatureDraft {
    pub fn new(
        name: impl Into<String>,
        kind: FeatureType,
        category: impl Into<String>,
        geometry: Geometry,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            category: category.into(),
            geometry,
            attributes: HashMap::new(),
            crs: None,
        }
    }

    /// Set a single attribute value
    pub fn attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Declare the CRS of the draft geometry
    pub fn with_crs(mut self, crs: u32) -> Self {
        self.crs = Some(crs);
        self
    }
}

/// Descriptive update for an existing feature. Geometry is updated through
/// its own operation so the bounding box and index entry stay in step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub category: String,
    /// Replacement attribute map; `None` leaves stored attributes untouched.
    #[serde(default)]
    pub attributes: Option<HashMap<String, serde_json::Value>>,
}

/// Exact-match listing filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureFilter {
    #[serde(rename = "type")]
    pub kind: Option<FeatureType>,
    pub category: Option<String>,
}

impl FeatureFilter {
    pub fn matches(&self, feature: &Feature) -> bool {
        if let Some(kind) = self.kind {
            if feature.kind != kind {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if &feature.category != category {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_type_admits_geometry() {
        let point = Geometry::point(1.0, 2.0);
        let line = Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]]);

        assert!(FeatureType::Point.admits(&point));
        assert!(!FeatureType::Point.admits(&line));
        assert!(FeatureType::Line.admits(&line));
        assert!(FeatureType::Other.admits(&point));
        assert!(FeatureType::Other.admits(&line));
    }

    #[test]
    fn test_feature_type_serde_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&FeatureType::Polygon).unwrap(), "\"polygon\"");
        let parsed: FeatureType = serde_json::from_str("\"line\"").unwrap();
        assert_eq!(parsed, FeatureType::Line);
    }

    #[test]
    fn test_filter_matches_exactly() {
        let filter = FeatureFilter {
            kind: Some(FeatureType::Point),
            category: Some("poi".to_string()),
        };
        let draft = FeatureDraft::new("cafe", FeatureType::Point, "poi", Geometry::point(0.0, 0.0));
        let now = Utc::now();
        let feature = Feature {
            id: FeatureId(1),
            name: draft.name,
            kind: draft.kind,
            category: draft.category,
            geometry: draft.geometry,
            attributes: draft.attributes,
            crs: 4326,
            created_at: now,
            updated_at: now,
        };

        assert!(filter.matches(&feature));

        let other_category = FeatureFilter {
            kind: None,
            category: Some("road".to_string()),
        };
        assert!(!other_category.matches(&feature));
    }
}
