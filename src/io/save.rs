//! Artifact saving: one JSON payload plus at most one binary payload

use super::format::SaveConfig;
use super::sink::{ByteSink, DirectorySink};
use crate::artifacts::{ModelArtifacts, ModelJson, SaveResult, WeightGroup};
use crate::{Error, Result};
use std::path::Path;

/// Writes model artifacts to a [`ByteSink`]
///
/// # Example
///
/// ```
/// use pesos::artifacts::{ModelArtifacts, WeightSpec};
/// use pesos::io::{ArtifactSaver, MemorySink, SaveConfig};
/// use serde_json::json;
///
/// # tokio_test_block_on(async {
/// let artifacts = ModelArtifacts::new(
///     json!({"class_name": "Sequential"}),
///     vec![WeightSpec::new("dense/bias", vec![1], "float32")],
///     vec![0u8; 4],
/// );
///
/// let mut saver = ArtifactSaver::with_config(MemorySink::new(), SaveConfig::new("my-model"));
/// let result = saver.save(&artifacts).await.unwrap();
/// assert_eq!(result.model_artifacts_info.weight_data_bytes, 4);
/// assert_eq!(saver.sink().names(), vec!["my-model.json", "my-model.weights.bin"]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug)]
pub struct ArtifactSaver<S> {
    sink: S,
    config: SaveConfig,
}

impl<S: ByteSink> ArtifactSaver<S> {
    /// Saver using the default `model` prefix
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SaveConfig::default())
    }

    /// Saver with explicit configuration
    pub fn with_config(sink: S, config: SaveConfig) -> Self {
        Self { sink, config }
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Save `artifacts` as `{prefix}.json` and, when there are weight bytes,
    /// `{prefix}.weights.bin`.
    ///
    /// Each payload is put and then committed exactly once. Sink failures are
    /// returned unchanged.
    pub async fn save(&mut self, artifacts: &ModelArtifacts) -> Result<SaveResult> {
        let model_artifacts_info = artifacts.info()?;

        let weight_data = artifacts.non_empty_weight_data();
        let manifest = weight_data.map(|_| {
            vec![WeightGroup::new(
                vec![self.config.weights_manifest_path()],
                artifacts.weight_specs.clone().unwrap_or_default(),
            )]
        });

        let payload = ModelJson::from_artifacts(artifacts, manifest);
        let json = if self.config.pretty {
            serde_json::to_vec_pretty(&payload)
        } else {
            serde_json::to_vec(&payload)
        }
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;

        let json_name = self.config.json_file_name();
        self.emit(&json_name, json).await?;

        if let Some(data) = weight_data {
            let weights_name = self.config.weights_file_name();
            self.emit(&weights_name, data.to_vec()).await?;
        }

        tracing::info!(
            prefix = %self.config.name_prefix,
            topology_bytes = model_artifacts_info.model_topology_bytes,
            weight_specs_bytes = model_artifacts_info.weight_specs_bytes,
            weight_data_bytes = model_artifacts_info.weight_data_bytes,
            "saved model artifacts"
        );

        Ok(SaveResult {
            model_artifacts_info,
            errors: None,
        })
    }

    async fn emit(&mut self, name: &str, bytes: Vec<u8>) -> Result<()> {
        tracing::debug!(name, bytes = bytes.len(), "emitting payload");
        self.sink.put(name, bytes).await?;
        self.sink.commit(name).await
    }
}

/// Save artifacts as files in `dir`, creating it if needed
pub async fn save_to_dir(
    artifacts: &ModelArtifacts,
    dir: impl AsRef<Path>,
    config: SaveConfig,
) -> Result<SaveResult> {
    let sink = DirectorySink::create(dir.as_ref()).await?;
    ArtifactSaver::with_config(sink, config).save(artifacts).await
}
