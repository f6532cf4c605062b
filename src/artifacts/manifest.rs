//! Weights manifest and the model JSON payload

use super::model::{ModelArtifacts, WeightSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A set of weight files that together hold the bytes of `weights`.
///
/// The files are read in `paths` order and their bytes concatenated to form
/// the data for the group's weights, also in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGroup {
    /// File references, relative to the model JSON (e.g. `./model.weights.bin`)
    pub paths: Vec<String>,

    /// Specs of the weights stored in this group
    pub weights: Vec<WeightSpec>,
}

impl WeightGroup {
    /// Create a group from its paths and weight specs
    pub fn new(paths: Vec<String>, weights: Vec<WeightSpec>) -> Self {
        Self { paths, weights }
    }
}

/// Ordered list of weight groups
pub type WeightsManifest = Vec<WeightGroup>;

/// Total number of file references across all groups
pub fn path_count(manifest: &[WeightGroup]) -> usize {
    manifest.iter().map(|group| group.paths.len()).sum()
}

/// Final `/`-separated segment of a file reference.
///
/// ```
/// use pesos::artifacts::basename;
///
/// assert_eq!(basename("./dir1/model.weights.1.bin"), "model.weights.1.bin");
/// assert_eq!(basename("model.json"), "model.json");
/// ```
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// On-the-wire shape of the model JSON payload.
///
/// `modelTopology` is optional here so that its absence can be reported with
/// the offending file name instead of a generic parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_topology: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights_manifest: Option<WeightsManifest>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_defined_metadata: Option<Map<String, Value>>,
}

impl ModelJson {
    /// Build the payload for `artifacts`, attaching `manifest` when given
    pub fn from_artifacts(artifacts: &ModelArtifacts, manifest: Option<WeightsManifest>) -> Self {
        Self {
            model_topology: artifacts.model_topology.clone(),
            weights_manifest: manifest,
            format: artifacts.format.clone(),
            generated_by: artifacts.generated_by.clone(),
            converted_by: artifacts.converted_by.clone(),
            user_defined_metadata: artifacts.user_defined_metadata.clone(),
        }
    }

    /// Weight specs of every group, concatenated in manifest order
    pub fn weight_specs(&self) -> Option<Vec<WeightSpec>> {
        self.weights_manifest.as_ref().map(|manifest| {
            manifest
                .iter()
                .flat_map(|group| group.weights.iter().cloned())
                .collect()
        })
    }
}
