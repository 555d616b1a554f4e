//! Feature Engineering Engine
//!
//! Reduces a raw telemetry table to a fixed-order feature vector and builds
//! the healthy baseline profile it is compared against.

mod baseline;
mod features;
mod schema;
mod statistics;

pub use baseline::{build_baseline, BaselineProfile};
pub use features::{build_feature_vector, FeatureSlot, FeatureValue, FeatureVector, FeatureVectorBuilder};
pub use schema::{FeatureSchema, CANONICAL_FEATURES, FEATURE_DIMENSION};
pub use statistics::ColumnStatistics;
