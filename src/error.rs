//! Error types for Pesos

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Loading model artifacts requires at least 1 file, but got 0.")]
    NoFilesProvided,

    #[error("modelTopology field is missing from file {file}")]
    MissingModelTopology { file: String },

    #[error(
        "Mismatch in the number of files in weights manifest ({manifest}) \
         and the number of weight files provided ({provided})."
    )]
    FileCountMismatch { manifest: usize, provided: usize },

    #[error("Duplicate file basename found in weights manifest: '{0}'")]
    DuplicateBasename(String),

    #[error("Weight file with basename '{0}' is not provided.")]
    MissingWeightFile(String),

    #[error("No model JSON file (*.json) found among the provided files")]
    NoModelJson,

    #[error("Expected exactly one model JSON file, found {}: {}", .0.len(), .0.join(", "))]
    AmbiguousModelJson(Vec<String>),

    #[error("Byte sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
