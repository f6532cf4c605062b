//! In-memory model artifact bundle

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Description of a single weight inside the weight buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSpec {
    /// Weight name (e.g., "dense/kernel")
    pub name: String,

    /// Weight shape
    pub shape: Vec<usize>,

    /// Data type (e.g., "float32", "int32")
    pub dtype: String,

    /// Optional fields (quantization, group, ...) carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WeightSpec {
    /// Create a spec with no optional fields
    pub fn new(name: impl Into<String>, shape: Vec<usize>, dtype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shape,
            dtype: dtype.into(),
            extra: Map::new(),
        }
    }

    /// Attach an optional field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Topology, weight specs and weight bytes of one model.
///
/// `weight_specs` and `weight_data` travel together; `model_topology` may be
/// present on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelArtifacts {
    /// Opaque topology document
    pub model_topology: Option<Value>,

    /// Weight specs in buffer order
    pub weight_specs: Option<Vec<WeightSpec>>,

    /// Contiguous weight bytes
    pub weight_data: Option<Vec<u8>>,

    /// Format tag (e.g., "layers-model")
    pub format: Option<String>,

    /// Library that generated the artifacts
    pub generated_by: Option<String>,

    /// Converter that produced the artifacts
    pub converted_by: Option<String>,

    /// Caller metadata stored alongside the topology
    pub user_defined_metadata: Option<Map<String, Value>>,
}

impl ModelArtifacts {
    /// Bundle with topology, specs and weight bytes
    pub fn new(topology: Value, weight_specs: Vec<WeightSpec>, weight_data: Vec<u8>) -> Self {
        Self {
            model_topology: Some(topology),
            weight_specs: Some(weight_specs),
            weight_data: Some(weight_data),
            ..Default::default()
        }
    }

    /// Bundle holding only a topology
    pub fn topology_only(topology: Value) -> Self {
        Self {
            model_topology: Some(topology),
            ..Default::default()
        }
    }

    /// Set the format tag
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the generator tag
    pub fn with_generated_by(mut self, generated_by: impl Into<String>) -> Self {
        self.generated_by = Some(generated_by.into());
        self
    }

    /// Set the converter tag
    pub fn with_converted_by(mut self, converted_by: impl Into<String>) -> Self {
        self.converted_by = Some(converted_by.into());
        self
    }

    /// Add a user-defined metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.user_defined_metadata
            .get_or_insert_with(Map::new)
            .insert(key.into(), value);
        self
    }

    /// Weight bytes, if any were supplied and the buffer is non-empty
    pub fn non_empty_weight_data(&self) -> Option<&[u8]> {
        self.weight_data.as_deref().filter(|data| !data.is_empty())
    }

    /// Size metrics for this bundle, timestamped now.
    ///
    /// Topology and spec sizes are the lengths of their compact JSON
    /// serialization. Spec and data sizes are 0 when no weight data is held.
    pub fn info(&self) -> Result<ModelArtifactsInfo> {
        let model_topology_bytes = match &self.model_topology {
            Some(topology) => json_len(topology)?,
            None => 0,
        };

        let (weight_specs_bytes, weight_data_bytes) = match &self.weight_data {
            Some(data) => {
                let specs_bytes = match &self.weight_specs {
                    Some(specs) => json_len(specs)?,
                    None => 0,
                };
                (specs_bytes, data.len())
            }
            None => (0, 0),
        };

        Ok(ModelArtifactsInfo {
            date_saved: Utc::now(),
            model_topology_bytes,
            weight_specs_bytes,
            weight_data_bytes,
        })
    }
}

fn json_len<T: Serialize + ?Sized>(value: &T) -> Result<usize> {
    serde_json::to_vec(value)
        .map(|bytes| bytes.len())
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))
}

/// Size and timestamp metrics of a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifactsInfo {
    /// When the metrics were captured
    pub date_saved: DateTime<Utc>,

    /// Length of the serialized topology
    pub model_topology_bytes: usize,

    /// Length of the serialized weight specs
    pub weight_specs_bytes: usize,

    /// Length of the weight buffer
    pub weight_data_bytes: usize,
}

/// Outcome of a save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub model_artifacts_info: ModelArtifactsInfo,

    /// Non-fatal problems reported by the sink
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}
