//! Payload naming and save configuration

/// Default file name prefix for saved artifacts
pub const DEFAULT_NAME_PREFIX: &str = "model";

/// Kind of payload a file carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Topology + weights manifest
    ModelJson,

    /// Raw weight bytes
    WeightData,
}

impl PayloadKind {
    /// File name suffix used when saving this payload kind
    pub fn suffix(&self) -> &str {
        match self {
            PayloadKind::ModelJson => "json",
            PayloadKind::WeightData => "weights.bin",
        }
    }

    /// Classify a file by its extension; anything that is not JSON is weight data
    pub fn from_file_name(name: &str) -> Self {
        let is_json = name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("json"));
        if is_json {
            PayloadKind::ModelJson
        } else {
            PayloadKind::WeightData
        }
    }
}

/// Configuration for saving artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConfig {
    /// Prefix of every produced file name
    pub name_prefix: String,

    /// Whether to pretty-print the JSON payload
    pub pretty: bool,
}

impl SaveConfig {
    /// Create new save config with a file name prefix
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
            pretty: false,
        }
    }

    /// Enable/disable pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Name of the JSON payload, `{prefix}.json`
    pub fn json_file_name(&self) -> String {
        self.file_name(PayloadKind::ModelJson)
    }

    /// Name of the binary payload, `{prefix}.weights.bin`
    pub fn weights_file_name(&self) -> String {
        self.file_name(PayloadKind::WeightData)
    }

    /// Path of the binary payload as written into the manifest
    pub fn weights_manifest_path(&self) -> String {
        format!("./{}", self.weights_file_name())
    }

    fn file_name(&self, kind: PayloadKind) -> String {
        format!("{}.{}", self.name_prefix, kind.suffix())
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_suffix() {
        assert_eq!(PayloadKind::ModelJson.suffix(), "json");
        assert_eq!(PayloadKind::WeightData.suffix(), "weights.bin");
    }

    #[test]
    fn test_payload_from_file_name() {
        assert_eq!(PayloadKind::from_file_name("model.json"), PayloadKind::ModelJson);
        assert_eq!(PayloadKind::from_file_name("MODEL.JSON"), PayloadKind::ModelJson);
        assert_eq!(
            PayloadKind::from_file_name("model.weights.bin"),
            PayloadKind::WeightData
        );
        assert_eq!(PayloadKind::from_file_name("json"), PayloadKind::WeightData);
        assert_eq!(
            PayloadKind::from_file_name("group1-shard1of2"),
            PayloadKind::WeightData
        );
    }

    #[test]
    fn test_save_config_default_names() {
        let config = SaveConfig::default();
        assert_eq!(config.json_file_name(), "model.json");
        assert_eq!(config.weights_file_name(), "model.weights.bin");
        assert_eq!(config.weights_manifest_path(), "./model.weights.bin");
        assert!(!config.pretty);
    }

    #[test]
    fn test_save_config_explicit_prefix() {
        let config = SaveConfig::new("test-model").with_pretty(true);
        assert_eq!(config.json_file_name(), "test-model.json");
        assert_eq!(config.weights_file_name(), "test-model.weights.bin");
        assert_eq!(config.weights_manifest_path(), "./test-model.weights.bin");
        assert!(config.pretty);
    }
}
