//! Phase 6: Metadata Regeneration
//!
//! Runs the external repository metadata builder (`createrepo_c` by default)
//! once per partition directory created in Phase 5, asking it to skip the
//! sqlite database.
//!
//! The builder's own failures are not inspected beyond a warning: a
//! non-zero exit status is logged and the next directory is processed. Only
//! a command that cannot be started at all is an error.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

use crate::defaults::CREATEREPO_NO_DATABASE_FLAG;
use crate::error::{Error, Result};

/// What Phase 6 ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegenerateReport {
    /// Directories the builder ran against.
    pub processed: Vec<PathBuf>,
    /// Directories where the builder exited unsuccessfully.
    pub failed: Vec<PathBuf>,
}

/// Run the metadata builder against a single directory.
///
/// Returns whether the builder exited successfully.
pub fn run(command: &str, dir: &Path) -> Result<bool> {
    let status = Command::new(command)
        .arg(dir)
        .arg(CREATEREPO_NO_DATABASE_FLAG)
        .status()
        .map_err(|e| Error::Regenerate {
            command: command.to_string(),
            dir: dir.to_path_buf(),
            message: e.to_string(),
        })?;

    if !status.success() {
        warn!(
            "'{}' exited with {} for {}",
            command,
            status,
            dir.display()
        );
    }
    Ok(status.success())
}

/// Executes Phase 6 of the pipeline.
pub fn execute(command: &str, directories: &[PathBuf]) -> Result<RegenerateReport> {
    let mut report = RegenerateReport::default();

    for dir in directories {
        if !run(command, dir)? {
            report.failed.push(dir.clone());
        }
        report.processed.push(dir.clone());
    }

    info!(
        "Regenerated metadata for {} partitions ({} failed)",
        report.processed.len(),
        report.failed.len()
    );
    Ok(report)
}
