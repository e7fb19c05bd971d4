//! Broad-phase spatial index over feature bounding boxes.
//!
//! The tree holds `(id, bounding box)` back-references only; geometry data
//! stays with the owning store. Queries return candidate supersets that the
//! exact predicates confirm or reject.

use std::collections::HashMap;

use rstar::{RTree, RTreeObject, AABB};

use geocat_core::models::{BoundingBox, FeatureId};

const DEFAULT_REBUILD_THRESHOLD: usize = 1024;

/// Index entry: a feature id and the bounding box it was inserted with.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub id: FeatureId,
    pub bbox: BoundingBox,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min_x, self.bbox.min_y],
            [self.bbox.max_x, self.bbox.max_y],
        )
    }
}

/// R-tree over feature bounding boxes.
///
/// A side map from id to box lets removal reconstruct the exact entry, so
/// mutations stay logarithmic. Incremental inserts and removals keep the
/// tree balanced; once the accumulated mutation count crosses the rebuild
/// threshold the tree is bulk-reloaded for a predictable worst case.
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
    boxes: HashMap<FeatureId, BoundingBox>,
    mutations: usize,
    rebuild_threshold: usize,
}

impl SpatialIndex {
    /// Create a new empty spatial index
    pub fn new() -> Self {
        Self::with_rebuild_threshold(DEFAULT_REBUILD_THRESHOLD)
    }

    /// Create an empty index with a custom bulk-rebuild threshold
    pub fn with_rebuild_threshold(rebuild_threshold: usize) -> Self {
        Self {
            tree: RTree::new(),
            boxes: HashMap::new(),
            mutations: 0,
            rebuild_threshold: rebuild_threshold.max(1),
        }
    }

    /// Bulk-load an index from existing entries
    pub fn from_entries(entries: Vec<(FeatureId, BoundingBox)>) -> Self {
        let boxes: HashMap<FeatureId, BoundingBox> = entries.into_iter().collect();
        let indexed: Vec<IndexEntry> =
            boxes.iter().map(|(&id, &bbox)| IndexEntry { id, bbox }).collect();
        Self {
            tree: RTree::bulk_load(indexed),
            boxes,
            mutations: 0,
            rebuild_threshold: DEFAULT_REBUILD_THRESHOLD,
        }
    }

    /// Insert or replace the entry for a feature
    pub fn insert(&mut self, id: FeatureId, bbox: BoundingBox) {
        if let Some(old) = self.boxes.insert(id, bbox) {
            self.tree.remove(&IndexEntry { id, bbox: old });
        }
        self.tree.insert(IndexEntry { id, bbox });
        self.note_mutation();
    }

    /// Remove the entry for a feature, returning its box if present
    pub fn remove(&mut self, id: FeatureId) -> Option<BoundingBox> {
        let bbox = self.boxes.remove(&id)?;
        self.tree.remove(&IndexEntry { id, bbox });
        self.note_mutation();
        Some(bbox)
    }

    /// Replace the entry for a feature after a geometry mutation
    pub fn update(&mut self, id: FeatureId, bbox: BoundingBox) {
        self.insert(id, bbox);
    }

    /// Candidate ids whose boxes overlap the query box, ascending id order.
    ///
    /// A superset of the exact answer: the narrow phase confirms each
    /// candidate against the real geometry.
    pub fn locate(&self, query: &BoundingBox) -> Vec<FeatureId> {
        let envelope = AABB::from_corners(
            [query.min_x, query.min_y],
            [query.max_x, query.max_y],
        );
        let mut ids: Vec<FeatureId> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The k nearest entries to a point by box distance, ties by ascending
    /// id, together with that distance.
    pub fn nearest_with_distance(&self, point: [f64; 2], k: usize) -> Vec<(FeatureId, f64)> {
        let mut entries: Vec<(FeatureId, f64)> =
            self.boxes.iter().map(|(&id, bbox)| (id, bbox.distance_to(point))).collect();
        entries.sort_by(|a, b| {
            a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0))
        });
        entries.truncate(k);
        entries
    }

    /// The k nearest candidate ids to a point by box distance.
    pub fn nearest(&self, point: [f64; 2], k: usize) -> Vec<FeatureId> {
        self.nearest_with_distance(point, k).into_iter().map(|(id, _)| id).collect()
    }

    /// Get the total number of entries in the index
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    fn note_mutation(&mut self) {
        self.mutations += 1;
        if self.mutations >= self.rebuild_threshold {
            let entries: Vec<IndexEntry> =
                self.boxes.iter().map(|(&id, &bbox)| IndexEntry { id, bbox }).collect();
            self.tree = RTree::bulk_load(entries);
            self.mutations = 0;
            tracing::debug!(entries = self.tree.size(), "rebuilt spatial index");
        }
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
