//! # Pesos: Model Artifact Transport
//!
//! Pesos moves a model artifact bundle (topology, weight specs and one
//! contiguous weight buffer) to and from a set of named files.
//!
//! ## Architecture
//!
//! - **artifacts**: Bundle, weight spec and weights manifest types
//! - **io**: `ArtifactSaver` / `ArtifactLoader` over byte sink and byte source traits
//! - **config**: CLI arguments and YAML save defaults

pub mod artifacts;
pub mod config;
pub mod io;

pub mod error;

// Re-export commonly used types
pub use artifacts::{ModelArtifacts, ModelArtifactsInfo, SaveResult, WeightGroup, WeightSpec};
pub use error::{Error, Result};
pub use io::{ArtifactLoader, ArtifactSaver};
