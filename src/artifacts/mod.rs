//! Model artifact data model
//!
//! A bundle is a topology document, a list of weight specs and one
//! contiguous weight buffer. On the wire the topology and a weights manifest
//! travel in a JSON payload while the bytes live in separate weight files.

mod manifest;
mod model;

pub use manifest::{basename, path_count, ModelJson, WeightGroup, WeightsManifest};
pub use model::{ModelArtifacts, ModelArtifactsInfo, SaveResult, WeightSpec};
