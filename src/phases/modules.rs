//! Phase 2: Module Index
//!
//! Turns the repository's module document into a `ModuleIndex`: for every
//! module stream, its NSVC mapped to the package paths of its RPM artifacts.
//!
//! ## Process
//!
//! 1.  **Decode**: Decompress the artifact and decode it as UTF-8.
//! 2.  **Parse**: Validate every YAML document and upgrade the streams to the
//!     canonical layout (`modulemd::parse_streams`). Any structural failure
//!     aborts the run.
//! 3.  **Index**: Rebuild each artifact NEVRA into a `Packages/` path. Paths
//!     keep their declaration order and are not deduplicated here; the
//!     classifier deduplicates per partition.

use std::path::Path;

use log::{info, warn};

use super::ModuleIndex;
use crate::error::{Error, Result};
use crate::modulemd::{self, ModuleStream, SubdocumentFailure};
use crate::nevra;
use crate::repodata;

/// Executes Phase 2 of the pipeline.
pub fn execute(modules_path: &Path) -> Result<ModuleIndex> {
    let bytes = repodata::read_compressed(modules_path)?;
    let text = decode(bytes)?;
    let streams = modulemd::parse_streams(&text)?;
    let index = build_index(&streams)?;
    info!(
        "Module metadata defines {} module streams ({} artifact entries)",
        index.len(),
        index.values().map(Vec::len).sum::<usize>()
    );
    Ok(index)
}

/// Decode the decompressed module document as UTF-8.
pub fn decode(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::ModuleParse {
        failures: vec![SubdocumentFailure {
            index: 0,
            document: None,
            message: format!("module metadata is not valid UTF-8: {}", e),
        }],
    })
}

/// Build the NSVC -> package path index from parsed streams.
///
/// Streams sharing an NSVC (the same build listed once per architecture)
/// have their artifact lists concatenated under the one key.
pub fn build_index(streams: &[ModuleStream]) -> Result<ModuleIndex> {
    let mut index = ModuleIndex::new();

    for stream in streams {
        let paths = stream
            .rpm_artifacts
            .iter()
            .map(|artifact| nevra::package_path(artifact))
            .collect::<Result<Vec<_>>>()?;

        let nsvc = stream.nsvc();
        match index.get_mut(&nsvc) {
            Some(existing) => {
                warn!(
                    "Module {} is listed more than once; merging its artifacts",
                    nsvc
                );
                existing.extend(paths);
            }
            None => {
                index.insert(nsvc, paths);
            }
        }
    }

    Ok(index)
}
