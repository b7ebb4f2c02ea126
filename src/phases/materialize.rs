//! Phase 5: Materialization
//!
//! Reproduces each partition as a subdirectory of the target directory.
//!
//! ## Process
//!
//! 1.  **Target Checks (`prepare_target`)**: Run before any other phase. The
//!     target must be absent or an empty directory.
//!
//! 2.  **Create Target (`ensure_target`)**: An absent target is only created
//!     once the repository is known to be modular.
//!
//! 3.  **Partition Directories**: `<target>/<key>` is created for every
//!     partition. An existing directory means two keys collided and is fatal.
//!
//! 4.  **Placement**: Every package is placed at `<target>/<key>/<file name>`
//!     with the selected `Action`. `Copy` is best-effort and silently skips a
//!     missing source; `Hardlink` and `Symlink` fail on it.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use super::PartitionMap;
use crate::error::{Error, Result};
use crate::nevra;

/// How package files are placed into partition directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Action {
    /// Create a hard link to the source file
    #[default]
    Hardlink,
    /// Create a symbolic link to the absolute source path
    Symlink,
    /// Copy the file content, skipping missing sources
    Copy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Hardlink => "hardlink",
            Action::Symlink => "symlink",
            Action::Copy => "copy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of placing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed,
    /// `Copy` found no source file and skipped it.
    SkippedMissing,
}

/// What Phase 5 created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Partition directories, in creation order.
    pub directories: Vec<PathBuf>,
    pub placed: usize,
    pub skipped: usize,
}

/// Check the target directory before any work starts.
///
/// Returns the absolute target path. An existing target must be an empty
/// directory; an absent one must have an existing parent so it can be
/// created later by `ensure_target`.
pub fn prepare_target(target: &Path) -> Result<PathBuf> {
    let target = std::path::absolute(target)?;

    if target.exists() {
        if !target.is_dir() {
            return Err(Error::TargetNotDirectory { path: target });
        }
        if fs::read_dir(&target)?.next().is_some() {
            return Err(Error::TargetNotEmpty { path: target });
        }
    } else if let Some(parent) = target.parent() {
        if !parent.is_dir() {
            return Err(Error::TargetParentMissing {
                path: parent.to_path_buf(),
            });
        }
    }

    Ok(target)
}

/// Create the target directory if it does not exist yet.
pub fn ensure_target(target: &Path) -> Result<()> {
    if !target.exists() {
        fs::create_dir(target)?;
        debug!("Created target directory {}", target.display());
    }
    Ok(())
}

/// Place one file at `dst` using `action`.
pub fn place(action: Action, src: &Path, dst: &Path) -> Result<Placement> {
    let fail = |source: io::Error| Error::Materialize {
        action: action.to_string(),
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };

    match action {
        Action::Copy => {
            if !src.exists() {
                // Missing files were already reported by validation, if it ran.
                debug!("Skipping missing {}", src.display());
                return Ok(Placement::SkippedMissing);
            }
            fs::copy(src, dst).map_err(fail)?;
        }
        Action::Hardlink => fs::hard_link(src, dst).map_err(fail)?,
        Action::Symlink => {
            // A dangling link would be created without complaint otherwise.
            fs::metadata(src).map_err(fail)?;
            symlink(src, dst).map_err(fail)?;
        }
    }

    Ok(Placement::Placed)
}

#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

fn progress_bar(total: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    bar
}

/// Executes Phase 5 of the pipeline.
///
/// Partitions are processed one after another; the first fatal error stops
/// the remaining work.
pub fn execute(
    partitions: &PartitionMap,
    source_root: &Path,
    target: &Path,
    action: Action,
    show_progress: bool,
) -> Result<MaterializeReport> {
    let mut report = MaterializeReport::default();
    let bar = progress_bar(partitions.package_count(), show_progress);

    for partition in partitions {
        let dir = target.join(partition.key.as_str());
        fs::create_dir(&dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::DestinationExists { path: dir.clone() },
            _ => Error::Io(e),
        })?;
        bar.set_message(partition.key.to_string());

        for path in &partition.packages {
            let src = source_root.join(path);
            let dst = dir.join(nevra::file_name(path));
            match place(action, &src, &dst) {
                Ok(Placement::Placed) => report.placed += 1,
                Ok(Placement::SkippedMissing) => report.skipped += 1,
                Err(e) => {
                    bar.abandon();
                    return Err(e);
                }
            }
            bar.inc(1);
        }

        debug!(
            "{}: {} packages placed in {}",
            partition.key,
            partition.len(),
            dir.display()
        );
        report.directories.push(dir);
    }

    bar.finish_and_clear();
    info!(
        "Materialized {} partitions into {} ({} placed, {} skipped, action: {})",
        report.directories.len(),
        target.display(),
        report.placed,
        report.skipped,
        action
    );
    Ok(report)
}
