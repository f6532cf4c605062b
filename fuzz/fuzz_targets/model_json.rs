#![no_main]

use libfuzzer_sys::fuzz_target;
use pesos::io::{ArtifactLoader, ByteSource, ProvidedFile};

/// Fuzz target for model JSON handling
///
/// Arbitrary bytes offered as the only file must never panic the loader.

fuzz_target!(|data: &[u8]| {
    let files: Vec<Box<dyn ByteSource>> = vec![Box::new(ProvidedFile::new("model.json", data))];
    let Ok(loader) = ArtifactLoader::new(files) else {
        return;
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    if let Ok(artifacts) = rt.block_on(loader.load()) {
        // Without weight files only an empty manifest can succeed
        assert!(artifacts.model_topology.is_some());
        assert!(artifacts.weight_data.as_ref().map_or(true, Vec::is_empty));
    }
});
