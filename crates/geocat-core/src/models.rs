pub mod feature;
pub mod geometry;
pub mod route;

pub use feature::{Feature, FeatureDraft, FeatureFilter, FeatureId, FeatureInfo, FeatureType};
pub use geometry::{BoundingBox, DistanceMode, Geometry, GeometryType};
pub use route::{EdgeId, NodeId, RoadEdge, RoutePath, RouteStep};
