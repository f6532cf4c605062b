#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pesos::artifacts::{basename, WeightGroup};
use pesos::io::resolve_manifest_paths;
use pesos::Error;
use std::collections::HashSet;

/// Fuzz target for manifest path resolution
///
/// Arbitrary manifests and supplied file names must either resolve to
/// supplied files with matching basenames or fail with a matching error.

#[derive(Arbitrary, Debug)]
struct MatchInput {
    groups: Vec<Vec<String>>,
    supplied: Vec<String>,
}

fuzz_target!(|input: MatchInput| {
    let manifest: Vec<WeightGroup> = input
        .groups
        .into_iter()
        .map(|paths| WeightGroup::new(paths, vec![]))
        .collect();
    let supplied: Vec<&str> = input.supplied.iter().map(String::as_str).collect();

    match resolve_manifest_paths(&manifest, &supplied) {
        Ok(order) => {
            // Invariant 1: one entry per manifest path
            let paths: Vec<&String> = manifest.iter().flat_map(|g| g.paths.iter()).collect();
            assert_eq!(order.len(), paths.len());

            // Invariant 2: each entry points at a file with the same basename
            for (path, &i) in paths.iter().zip(&order) {
                assert_eq!(basename(path), supplied[i]);
            }

            // Invariant 3: no manifest basename is used twice
            let unique: HashSet<&str> = paths.iter().map(|p| basename(p)).collect();
            assert_eq!(unique.len(), paths.len());
        }
        Err(Error::FileCountMismatch { manifest: m, provided }) => {
            assert_ne!(m, provided);
            assert_eq!(provided, supplied.len());
        }
        Err(Error::DuplicateBasename(_)) | Err(Error::MissingWeightFile(_)) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
});
