//! Artifact I/O - saving bundles to sinks and loading them from files
//!
//! Saving produces `{prefix}.json` (topology + weights manifest) and
//! `{prefix}.weights.bin` (raw weight bytes). Loading accepts any number of
//! weight files in any order and stitches them back together following the
//! manifest.

mod format;
mod load;
mod save;
mod sink;
mod source;


pub use format::{PayloadKind, SaveConfig, DEFAULT_NAME_PREFIX};
pub use load::{load_from_paths, resolve_manifest_paths, ArtifactLoader};
pub use save::{save_to_dir, ArtifactSaver};
pub use sink::{ByteSink, DirectorySink, MemorySink};
pub use source::{ByteSource, DiskFile, ProvidedFile};
