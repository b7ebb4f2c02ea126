//! # Error Handling
//!
//! This module defines the centralized error type for `grobisplitter`. It
//! uses `thiserror` to derive a single `Error` enum covering every failure
//! the split pipeline can report.
//!
//! The variants follow the order in which the pipeline can fail:
//!
//! - Target directory preconditions (checked before any other work).
//! - Repository metadata reading (`repomd.xml`, primary index).
//! - Module document parsing and NEVRA reconstruction.
//! - Package existence validation.
//! - Materialization of the partitions on disk.
//! - Invocation of the external metadata builder.
//!
//! A repository without module metadata is *not* an error; the orchestrator
//! reports it as `SplitOutcome::NotModular`.

use std::path::PathBuf;

use thiserror::Error;

use crate::modulemd::SubdocumentFailure;
use crate::phases::validate::MissingPackage;

/// Main error type for grobisplitter operations
#[derive(Error, Debug)]
pub enum Error {
    /// The target path exists but is not a directory.
    #[error("Target must be a directory: {}", path.display())]
    TargetNotDirectory { path: PathBuf },

    /// The target does not exist and its parent directory is missing.
    #[error("Target parent directory does not exist: {}", path.display())]
    TargetParentMissing { path: PathBuf },

    /// The target directory already has entries in it.
    #[error("Target must be empty: {}", path.display())]
    TargetNotEmpty { path: PathBuf },

    /// Repository metadata could not be located or read.
    #[error("Repository metadata error: {message}")]
    Metadata { message: String },

    /// The module document failed structural validation.
    ///
    /// Every failing subdocument is listed so one run shows all of them.
    #[error("Module metadata parsing failed with {} failure(s):{}", failures.len(), format_failures(failures))]
    ModuleParse { failures: Vec<SubdocumentFailure> },

    /// A module artifact is not a `name-epoch:version-release.arch` string.
    #[error("Invalid NEVRA '{nevra}': {reason}")]
    InvalidNevra { nevra: String, reason: String },

    /// Package files referenced by the metadata are missing on disk.
    #[error("Package files were missing! ({} missing)", missing.len())]
    MissingPackages { missing: Vec<MissingPackage> },

    /// A partition directory already exists in the target.
    ///
    /// This happens when two partition keys map to the same directory name,
    /// e.g. a module literally named `non_modular`.
    #[error("Partition directory already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    /// Placing a package file into its partition failed.
    #[error("Failed to {action} '{}' -> '{}': {source}", src.display(), dst.display())]
    Materialize {
        action: String,
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external metadata builder could not be started.
    #[error("Failed to run '{command}' for {}: {message}", dir.display())]
    Regenerate {
        command: String,
        dir: PathBuf,
        message: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_failures(failures: &[SubdocumentFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  - {}", f))
        .collect::<String>()
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
