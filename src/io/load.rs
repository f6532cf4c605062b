//! Artifact loading: match weight files to the manifest and merge their bytes

use super::format::PayloadKind;
use super::source::{ByteSource, DiskFile};
use crate::artifacts::{basename, path_count, ModelArtifacts, ModelJson, WeightGroup};
use crate::{Error, Result};
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Reassembles model artifacts from a model JSON file and its weight files.
///
/// Weight files are matched to manifest paths by basename, so the order in
/// which they are supplied does not matter.
///
/// # Example
///
/// ```
/// use pesos::io::{ArtifactLoader, ByteSource, ProvidedFile};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let json = r#"{
///     "modelTopology": {"class_name": "Sequential"},
///     "weightsManifest": [{
///         "paths": ["./a.bin", "./b.bin"],
///         "weights": [{"name": "w", "shape": [2], "dtype": "int32"}]
///     }]
/// }"#;
/// let files: Vec<Box<dyn ByteSource>> = vec![
///     Box::new(ProvidedFile::new("model.json", json)),
///     Box::new(ProvidedFile::new("b.bin", vec![5u8, 6, 7, 8])),
///     Box::new(ProvidedFile::new("a.bin", vec![1u8, 2, 3, 4])),
/// ];
///
/// let artifacts = ArtifactLoader::new(files).unwrap().load().await.unwrap();
/// assert_eq!(artifacts.weight_data.unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
/// # });
/// ```
pub struct ArtifactLoader {
    json: Box<dyn ByteSource>,
    weights: Vec<Box<dyn ByteSource>>,
}

impl std::fmt::Debug for ArtifactLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactLoader")
            .field("json", &self.json.basename())
            .field(
                "weights",
                &self.weights.iter().map(|w| w.basename()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ArtifactLoader {
    /// Loader over `files`; the first file is the model JSON and the rest
    /// are weight files.
    ///
    /// Fails if `files` is empty.
    pub fn new(files: Vec<Box<dyn ByteSource>>) -> Result<Self> {
        let mut files = files.into_iter();
        let json = files.next().ok_or(Error::NoFilesProvided)?;
        Ok(Self::from_parts(json, files.collect()))
    }

    /// Loader with the model JSON already singled out
    pub fn from_parts(json: Box<dyn ByteSource>, weights: Vec<Box<dyn ByteSource>>) -> Self {
        Self { json, weights }
    }

    /// Loader that picks the model JSON by its `.json` extension.
    ///
    /// Exactly one `.json` file must be present.
    pub fn classify_by_extension(files: Vec<Box<dyn ByteSource>>) -> Result<Self> {
        if files.is_empty() {
            return Err(Error::NoFilesProvided);
        }

        let (mut json, weights): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|f| PayloadKind::from_file_name(f.basename()) == PayloadKind::ModelJson);

        match json.len() {
            0 => Err(Error::NoModelJson),
            1 => Ok(Self::from_parts(json.remove(0), weights)),
            _ => Err(Error::AmbiguousModelJson(
                json.iter().map(|f| f.basename().to_string()).collect(),
            )),
        }
    }

    /// Loader over files on disk, classified by extension
    pub fn from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let files: Vec<Box<dyn ByteSource>> = paths
            .into_iter()
            .map(|p| Box::new(DiskFile::new(p)) as Box<dyn ByteSource>)
            .collect();
        Self::classify_by_extension(files)
    }

    /// Basename of the model JSON file
    pub fn json_basename(&self) -> &str {
        self.json.basename()
    }

    /// Number of weight files supplied
    pub fn weight_file_count(&self) -> usize {
        self.weights.len()
    }

    /// Read the model JSON and, if it carries a weights manifest, merge the
    /// weight files into one buffer in manifest order.
    pub async fn load(&self) -> Result<ModelArtifacts> {
        let json_name = self.json.basename();
        let bytes = self.json.read_all().await?;
        let payload: ModelJson = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Serialization(format!("Failed to parse model JSON {json_name}: {e}"))
        })?;

        let weight_specs = payload.weight_specs();
        let ModelJson {
            model_topology,
            weights_manifest,
            format,
            generated_by,
            converted_by,
            user_defined_metadata,
        } = payload;

        let model_topology = model_topology.ok_or_else(|| Error::MissingModelTopology {
            file: json_name.to_string(),
        })?;

        let mut artifacts = ModelArtifacts {
            model_topology: Some(model_topology),
            format,
            generated_by,
            converted_by,
            user_defined_metadata,
            ..Default::default()
        };

        let Some(manifest) = weights_manifest else {
            tracing::info!(file = json_name, "loaded model topology without weights manifest");
            return Ok(artifacts);
        };

        let names: Vec<&str> = self.weights.iter().map(|w| w.basename()).collect();
        let order = resolve_manifest_paths(&manifest, &names)?;

        let contents = try_join_all(self.weights.iter().map(|w| w.read_all())).await?;
        let weight_data = concat_in_order(contents, &order);

        tracing::info!(
            file = json_name,
            groups = manifest.len(),
            weight_files = order.len(),
            weight_data_bytes = weight_data.len(),
            "loaded model artifacts"
        );

        artifacts.weight_specs = weight_specs;
        artifacts.weight_data = Some(weight_data);
        Ok(artifacts)
    }
}

/// Map every manifest path to the index of the supplied file with the same
/// basename, in manifest order.
///
/// Checks, in order: the number of manifest paths equals the number of
/// supplied files; no two manifest paths share a basename; every manifest
/// basename is supplied.
pub fn resolve_manifest_paths(manifest: &[WeightGroup], supplied: &[&str]) -> Result<Vec<usize>> {
    let required = path_count(manifest);
    if required != supplied.len() {
        return Err(Error::FileCountMismatch {
            manifest: required,
            provided: supplied.len(),
        });
    }

    let by_name: HashMap<&str, usize> = supplied
        .iter()
        .enumerate()
        .map(|(i, name)| (*name, i))
        .collect();

    let mut seen = HashSet::with_capacity(required);
    let mut order = Vec::with_capacity(required);
    for path in manifest.iter().flat_map(|group| group.paths.iter()) {
        let name = basename(path);
        if !seen.insert(name) {
            return Err(Error::DuplicateBasename(name.to_string()));
        }
        let index = by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::MissingWeightFile(name.to_string()))?;
        order.push(index);
    }

    Ok(order)
}

/// Concatenate `contents` following `order`, a permutation of its indices.
///
/// Each shard is released as soon as it has been copied; a single shard is
/// moved without copying.
fn concat_in_order(mut contents: Vec<Vec<u8>>, order: &[usize]) -> Vec<u8> {
    if let [only] = order {
        return std::mem::take(&mut contents[*only]);
    }

    let total: usize = order.iter().map(|&i| contents[i].len()).sum();
    let mut weight_data = Vec::with_capacity(total);
    for &i in order {
        let shard = std::mem::take(&mut contents[i]);
        weight_data.extend_from_slice(&shard);
    }
    weight_data
}

/// Load artifacts from files on disk, picking the model JSON by extension
pub async fn load_from_paths<I, P>(paths: I) -> Result<ModelArtifacts>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    ArtifactLoader::from_paths(paths)?.load().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::WeightSpec;
    use crate::io::ProvidedFile;
    use async_trait::async_trait;
    use serde_json::json;

    fn group(paths: &[&str]) -> WeightGroup {
        WeightGroup::new(paths.iter().map(|p| p.to_string()).collect(), vec![])
    }

    #[test]
    fn test_resolve_follows_manifest_order() {
        let manifest = vec![group(&["./a.bin", "./b.bin"]), group(&["./c.bin"])];
        let order = resolve_manifest_paths(&manifest, &["c.bin", "a.bin", "b.bin"]).unwrap();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_resolve_count_mismatch() {
        let manifest = vec![group(&["./model.weights.1.bin"])];
        let err = resolve_manifest_paths(&manifest, &["model.weights.2.bin", "model.weights.1.bin"])
            .unwrap_err();
        assert!(matches!(
            err,
            Error::FileCountMismatch {
                manifest: 1,
                provided: 2
            }
        ));
    }

    #[test]
    fn test_resolve_duplicate_across_groups() {
        let manifest = vec![group(&["./x/shard.bin"]), group(&["./y/shard.bin"])];
        let err = resolve_manifest_paths(&manifest, &["shard.bin", "other.bin"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate file basename found in weights manifest: 'shard.bin'"
        );
    }

    #[test]
    fn test_resolve_missing_file() {
        let manifest = vec![group(&["./one.bin", "./two.bin"])];
        let err = resolve_manifest_paths(&manifest, &["one.bin", "three.bin"]).unwrap_err();
        assert_eq!(err.to_string(), "Weight file with basename 'two.bin' is not provided.");
    }

    #[test]
    fn test_concat_in_order_follows_permutation() {
        let contents = vec![vec![5u8, 6], vec![], vec![1u8, 2, 3], vec![4u8]];
        assert_eq!(
            concat_in_order(contents, &[2, 3, 0, 1]),
            vec![1, 2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn test_concat_in_order_single_and_empty() {
        assert_eq!(concat_in_order(vec![vec![7u8, 8, 9]], &[0]), vec![7, 8, 9]);
        assert!(concat_in_order(vec![], &[]).is_empty());
    }

    #[test]
    fn test_resolve_empty_manifest() {
        assert!(resolve_manifest_paths(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_new_requires_a_file() {
        let err = ArtifactLoader::new(vec![]).unwrap_err();
        assert!(matches!(err, Error::NoFilesProvided));
        assert!(err.to_string().contains("at least 1 file"));
    }

    #[test]
    fn test_classify_by_extension() {
        let files: Vec<Box<dyn ByteSource>> = vec![
            Box::new(ProvidedFile::new("model.weights.bin", vec![0u8])),
            Box::new(ProvidedFile::new("model.json", "{}")),
        ];
        let loader = ArtifactLoader::classify_by_extension(files).unwrap();
        assert_eq!(loader.json_basename(), "model.json");
        assert_eq!(loader.weight_file_count(), 1);
    }

    #[test]
    fn test_classify_requires_single_json() {
        let none: Vec<Box<dyn ByteSource>> = vec![Box::new(ProvidedFile::new("a.bin", vec![0u8]))];
        assert!(matches!(
            ArtifactLoader::classify_by_extension(none),
            Err(Error::NoModelJson)
        ));

        let two: Vec<Box<dyn ByteSource>> = vec![
            Box::new(ProvidedFile::new("a.json", "{}")),
            Box::new(ProvidedFile::new("b.json", "{}")),
        ];
        match ArtifactLoader::classify_by_extension(two) {
            Err(Error::AmbiguousModelJson(names)) => assert_eq!(names, vec!["a.json", "b.json"]),
            other => panic!("expected ambiguity error, got {other:?}"),
        }

        assert!(matches!(
            ArtifactLoader::classify_by_extension(vec![]),
            Err(Error::NoFilesProvided)
        ));
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let files: Vec<Box<dyn ByteSource>> =
            vec![Box::new(ProvidedFile::new("model.json", "{ invalid json }"))];
        let err = ArtifactLoader::new(files).unwrap().load().await.unwrap_err();
        assert!(matches!(err, Error::Serialization(ref msg) if msg.contains("model.json")));
    }

    #[tokio::test]
    async fn test_load_restores_metadata() {
        let json = json!({
            "modelTopology": {"a": 1},
            "format": "graph-model",
            "generatedBy": "gen 1.0",
            "convertedBy": "conv 2.0",
            "userDefinedMetadata": {"k": "v"}
        });
        let files: Vec<Box<dyn ByteSource>> =
            vec![Box::new(ProvidedFile::new("m.json", json.to_string()))];
        let artifacts = ArtifactLoader::new(files).unwrap().load().await.unwrap();

        assert_eq!(artifacts.format.as_deref(), Some("graph-model"));
        assert_eq!(artifacts.generated_by.as_deref(), Some("gen 1.0"));
        assert_eq!(artifacts.converted_by.as_deref(), Some("conv 2.0"));
        assert_eq!(artifacts.user_defined_metadata.unwrap()["k"], json!("v"));
    }

    struct BrokenFile;

    #[async_trait]
    impl ByteSource for BrokenFile {
        fn basename(&self) -> &str {
            "model.weights.bin"
        }

        async fn read_all(&self) -> Result<Vec<u8>> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "truncated",
            )))
        }
    }

    #[tokio::test]
    async fn test_load_read_failure_aborts() {
        let json = json!({
            "modelTopology": {},
            "weightsManifest": [{
                "paths": ["./model.weights.bin"],
                "weights": [WeightSpec::new("w", vec![1], "float32")]
            }]
        });
        let files: Vec<Box<dyn ByteSource>> = vec![
            Box::new(ProvidedFile::new("model.json", json.to_string())),
            Box::new(BrokenFile),
        ];
        let err = ArtifactLoader::new(files).unwrap().load().await.unwrap_err();
        assert!(
            matches!(err, Error::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
        );
    }
}
