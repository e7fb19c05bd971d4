use async_trait::async_trait;

use geocat_core::error::Result;
use geocat_core::models::{
    Feature, FeatureDraft, FeatureFilter, FeatureId, FeatureInfo, Geometry,
};

/// Port for the feature catalogue.
///
/// Every mutation keeps the record map and the spatial index consistent as
/// one logical unit; no caller observes a feature present in one and absent
/// in the other.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Create a feature from a validated draft, assigning a fresh id
    async fn create(&self, draft: FeatureDraft) -> Result<Feature>;

    /// Retrieve a feature by id
    async fn get(&self, id: FeatureId) -> Result<Feature>;

    /// Replace a feature's geometry, recomputing its bounding box and
    /// index entry
    async fn update_geometry(&self, id: FeatureId, geometry: Geometry) -> Result<Feature>;

    /// Update a feature's descriptive attributes (name, type, category,
    /// attribute map)
    async fn update_attributes(&self, id: FeatureId, info: FeatureInfo) -> Result<Feature>;

    /// Delete a feature from the store and the index
    async fn delete(&self, id: FeatureId) -> Result<()>;

    /// List features matching the exact-match filter, insertion order
    async fn list(&self, filter: &FeatureFilter) -> Result<Vec<Feature>>;

    /// Distinct categories across the catalogue, sorted
    async fn categories(&self) -> Result<Vec<String>>;

    /// Export the whole catalogue as a GeoJSON FeatureCollection,
    /// ascending id order
    async fn export(&self) -> Result<geojson::FeatureCollection>;

    /// Features lying entirely within the query geometry
    async fn spatial_within(&self, query: &Geometry) -> Result<Vec<Feature>>;

    /// Features intersecting the query geometry
    async fn spatial_intersects(&self, query: &Geometry) -> Result<Vec<Feature>>;

    /// Polygon features whose area exceeds `min_area`, measured in the
    /// configured distance mode
    async fn spatial_area(&self, min_area: f64) -> Result<Vec<Feature>>;

    /// The k features nearest to a point origin with their exact
    /// distances, optionally restricted to a category before ranking.
    /// `k = None` uses the configured default limit.
    async fn spatial_nearest(
        &self,
        origin: &Geometry,
        k: Option<usize>,
        category: Option<&str>,
    ) -> Result<Vec<(Feature, f64)>>;
}
