//! In-memory feature store.
//!
//! The canonical in-process implementation of [`FeatureStore`]; a
//! database-backed implementation can replace it behind the same port.
//!
//! `RwLock::unwrap()` is intentional. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an
//! unrecoverable state.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use geojson::feature::Id;

use geocat_core::config::EngineSettings;
use geocat_core::error::{GeocatError, Result};
use geocat_core::models::{
    DistanceMode, Feature, FeatureDraft, FeatureFilter, FeatureId, FeatureInfo, FeatureType,
    Geometry,
};
use geocat_geo::index::SpatialIndex;
use geocat_geo::{bounding_box, predicates, validate_geometry};

use crate::ports::FeatureStore;

/// In-memory implementation of [`FeatureStore`].
///
/// One lock guards the record map, the insertion order, and the spatial
/// index, so every mutation updates store and index atomically with
/// respect to readers.
#[derive(Clone)]
pub struct MemoryFeatureStore {
    settings: EngineSettings,
    inner: Arc<RwLock<StoreInner>>,
}

struct StoreInner {
    features: HashMap<FeatureId, Feature>,
    order: Vec<FeatureId>,
    index: SpatialIndex,
    next_id: u64,
}

impl MemoryFeatureStore {
    /// Create an empty store with default settings
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    /// Create an empty store with explicit engine settings
    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            settings,
            inner: Arc::new(RwLock::new(StoreInner {
                features: HashMap::new(),
                order: Vec::new(),
                index: SpatialIndex::with_rebuild_threshold(settings.index_rebuild_threshold),
                next_id: 1,
            })),
        }
    }

    /// The settings this store was built with
    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    fn check_crs(&self, declared: Option<u32>) -> Result<()> {
        match declared {
            Some(crs) if crs != self.settings.crs => Err(GeocatError::CrsMismatch {
                expected: self.settings.crs,
                actual: crs,
            }),
            _ => Ok(()),
        }
    }

    fn check_kind(kind: FeatureType, geometry: &Geometry) -> Result<()> {
        if kind.admits(geometry) {
            Ok(())
        } else {
            Err(GeocatError::InvalidGeometry {
                reason: format!(
                    "{:?} geometry does not match declared feature type",
                    geometry.geometry_type()
                ),
            })
        }
    }
}

impl Default for MemoryFeatureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureStore for MemoryFeatureStore {
    async fn create(&self, draft: FeatureDraft) -> Result<Feature> {
        self.check_crs(draft.crs)?;
        validate_geometry(&draft.geometry)?;
        Self::check_kind(draft.kind, &draft.geometry)?;
        let bbox = bounding_box(&draft.geometry)?;

        let mut inner = self.inner.write().unwrap();
        let id = FeatureId(inner.next_id);
        inner.next_id += 1;

        let now = Utc::now();
        let feature = Feature {
            id,
            name: draft.name,
            kind: draft.kind,
            category: draft.category,
            geometry: draft.geometry,
            attributes: draft.attributes,
            crs: self.settings.crs,
            created_at: now,
            updated_at: now,
        };

        inner.features.insert(id, feature.clone());
        inner.order.push(id);
        inner.index.insert(id, bbox);

        tracing::debug!(id = %id, "created feature");
        Ok(feature)
    }

    async fn get(&self, id: FeatureId) -> Result<Feature> {
        let inner = self.inner.read().unwrap();
        inner.features.get(&id).cloned().ok_or(GeocatError::FeatureNotFound { id })
    }

    async fn update_geometry(&self, id: FeatureId, geometry: Geometry) -> Result<Feature> {
        validate_geometry(&geometry)?;
        let bbox = bounding_box(&geometry)?;

        let mut inner = self.inner.write().unwrap();
        let feature =
            inner.features.get_mut(&id).ok_or(GeocatError::FeatureNotFound { id })?;
        Self::check_kind(feature.kind, &geometry)?;

        feature.geometry = geometry;
        feature.updated_at = Utc::now();
        let feature = feature.clone();
        inner.index.update(id, bbox);

        tracing::debug!(id = %id, "updated feature geometry");
        Ok(feature)
    }

    async fn update_attributes(&self, id: FeatureId, info: FeatureInfo) -> Result<Feature> {
        let mut inner = self.inner.write().unwrap();
        let feature =
            inner.features.get_mut(&id).ok_or(GeocatError::FeatureNotFound { id })?;
        // A kind change must still agree with the stored geometry
        Self::check_kind(info.kind, &feature.geometry)?;

        feature.name = info.name;
        feature.kind = info.kind;
        feature.category = info.category;
        if let Some(attributes) = info.attributes {
            feature.attributes = attributes;
        }
        feature.updated_at = Utc::now();

        Ok(feature.clone())
    }

    async fn delete(&self, id: FeatureId) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.features.remove(&id).is_none() {
            return Err(GeocatError::FeatureNotFound { id });
        }
        inner.order.retain(|other| *other != id);
        inner.index.remove(id);

        tracing::debug!(id = %id, "deleted feature");
        Ok(())
    }

    async fn list(&self, filter: &FeatureFilter) -> Result<Vec<Feature>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.features.get(id))
            .filter(|f| filter.matches(f))
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().unwrap();
        let distinct: BTreeSet<String> =
            inner.features.values().map(|f| f.category.clone()).collect();
        Ok(distinct.into_iter().collect())
    }

    async fn export(&self) -> Result<geojson::FeatureCollection> {
        let inner = self.inner.read().unwrap();

        let mut ids: Vec<FeatureId> = inner.features.keys().copied().collect();
        ids.sort_unstable();

        let mut features = Vec::with_capacity(ids.len());
        for id in ids {
            let f = &inner.features[&id];
            let geometry = geojson::Geometry::from_json_value(f.geometry.to_geojson())
                .map_err(|e| GeocatError::Serialization(e.to_string()))?;

            let mut properties = geojson::JsonObject::new();
            properties.insert("name".to_string(), serde_json::Value::String(f.name.clone()));
            properties.insert(
                "type".to_string(),
                serde_json::to_value(f.kind)
                    .map_err(|e| GeocatError::Serialization(e.to_string()))?,
            );
            properties
                .insert("category".to_string(), serde_json::Value::String(f.category.clone()));
            properties.insert(
                "attributes".to_string(),
                serde_json::to_value(&f.attributes)
                    .map_err(|e| GeocatError::Serialization(e.to_string()))?,
            );

            features.push(geojson::Feature {
                bbox: None,
                geometry: Some(geometry),
                id: Some(Id::Number(f.id.0.into())),
                properties: Some(properties),
                foreign_members: None,
            });
        }

        Ok(geojson::FeatureCollection { bbox: None, features, foreign_members: None })
    }

    async fn spatial_within(&self, query: &Geometry) -> Result<Vec<Feature>> {
        validate_geometry(query)?;
        let query_bbox = bounding_box(query)?;

        let inner = self.inner.read().unwrap();
        // locate() returns candidates in ascending id order
        Ok(inner
            .index
            .locate(&query_bbox)
            .into_iter()
            .filter_map(|id| inner.features.get(&id))
            .filter(|f| predicates::within(&f.geometry, query))
            .cloned()
            .collect())
    }

    async fn spatial_intersects(&self, query: &Geometry) -> Result<Vec<Feature>> {
        validate_geometry(query)?;
        let query_bbox = bounding_box(query)?;

        let inner = self.inner.read().unwrap();
        Ok(inner
            .index
            .locate(&query_bbox)
            .into_iter()
            .filter_map(|id| inner.features.get(&id))
            .filter(|f| predicates::intersects(&f.geometry, query))
            .cloned()
            .collect())
    }

    async fn spatial_area(&self, min_area: f64) -> Result<Vec<Feature>> {
        let geodesic = self.settings.distance_mode == DistanceMode::Geodesic;

        let inner = self.inner.read().unwrap();
        let mut ids: Vec<FeatureId> = inner.features.keys().copied().collect();
        ids.sort_unstable();

        let mut out = Vec::new();
        for id in ids {
            let f = &inner.features[&id];
            if !matches!(f.geometry, Geometry::Polygon { .. }) {
                continue;
            }
            // Stored geometry was validated at insert, so this cannot fail
            // on well-formedness; propagate anyway rather than guessing.
            if predicates::area(&f.geometry, geodesic)? > min_area {
                out.push(f.clone());
            }
        }
        Ok(out)
    }

    async fn spatial_nearest(
        &self,
        origin: &Geometry,
        k: Option<usize>,
        category: Option<&str>,
    ) -> Result<Vec<(Feature, f64)>> {
        let Geometry::Point { coordinates } = origin else {
            return Err(GeocatError::invalid_geometry("nearest query origin must be a Point"));
        };
        validate_geometry(origin)?;

        let k = k.unwrap_or(self.settings.nearest_limit);
        if k == 0 {
            return Ok(Vec::new());
        }
        let mode = self.settings.distance_mode;

        let inner = self.inner.read().unwrap();
        // Broad phase: every candidate, ordered by envelope distance.
        let candidates = inner.index.nearest_with_distance(*coordinates, inner.index.len());

        let mut best: Vec<(f64, FeatureId)> = Vec::new();
        for (id, box_distance) in candidates {
            // Envelope distance lower-bounds the exact planar distance, so
            // once the k-th exact distance is below the next envelope
            // distance no later candidate can change the result. Geodesic
            // exact distances are in metres while envelope distances are in
            // degrees, so that mode refines every candidate.
            if mode == DistanceMode::Planar && best.len() >= k && best[k - 1].0 < box_distance {
                break;
            }

            let Some(feature) = inner.features.get(&id) else { continue };
            if let Some(category) = category {
                if feature.category != category {
                    continue;
                }
            }
            let Some(exact) = predicates::distance(origin, &feature.geometry, mode) else {
                continue;
            };

            best.push((exact, id));
            best.sort_by(|a, b| {
                a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1))
            });
            best.truncate(k);
        }

        Ok(best
            .into_iter()
            .filter_map(|(distance, id)| {
                inner.features.get(&id).map(|f| (f.clone(), distance))
            })
            .collect())
    }
}
