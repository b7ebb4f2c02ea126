//! Orchestrator for the complete split operation
//!
//! This module coordinates all phases to provide a clean API for splitting a
//! repository. Configuration arrives as an explicit `SplitOptions` value and
//! nothing is read from ambient state.

use std::path::{Path, PathBuf};

use log::{info, warn};

use super::materialize::{Action, MaterializeReport};
use super::regenerate::RegenerateReport;
use super::{phase1, phase2, phase3, phase4, phase5, phase6, PartitionMap};
use crate::defaults::DEFAULT_CREATEREPO_COMMAND;
use crate::error::{Error, Result};

/// Options for one split run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOptions {
    /// Root of the repository to split
    pub repository: PathBuf,
    /// Destination root; `None` classifies without writing anything
    pub target: Option<PathBuf>,
    /// Placement strategy for package files
    pub action: Action,
    /// Do not check that package files exist before materializing
    pub skip_missing: bool,
    /// Run the metadata builder on every created partition
    pub create_repos: bool,
    /// Metadata builder executable
    pub createrepo_command: String,
    /// Draw a progress bar while materializing
    pub show_progress: bool,
}

impl SplitOptions {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self {
            repository: repository.into(),
            target: None,
            action: Action::default(),
            skip_missing: false,
            create_repos: false,
            createrepo_command: DEFAULT_CREATEREPO_COMMAND.to_string(),
            show_progress: false,
        }
    }
}

/// Result of a successful split run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub partitions: PartitionMap,
    /// Absolute target directory, when one was given
    pub target: Option<PathBuf>,
    pub materialized: Option<MaterializeReport>,
    pub regenerated: Option<RegenerateReport>,
}

/// What a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The repository has no module metadata; nothing was done.
    NotModular { repository: PathBuf },
    Split(SplitSummary),
}

/// Execute the complete split operation
///
/// 0. Check the target directory
/// 1. Read the repository metadata (stop here if it has no modules)
/// 2. Build the module index
/// 3. Classify every package
/// 4. Validate that package files exist (unless skipped)
/// 5. Materialize the partitions (if a target is given)
/// 6. Regenerate metadata per partition (if requested)
pub fn execute_split(options: &SplitOptions) -> Result<SplitOutcome> {
    // Target checks come first so a bad target fails before any real work.
    let target = options
        .target
        .as_deref()
        .map(phase5::prepare_target)
        .transpose()?;

    // Phase 1: Discovery
    let info = phase1::execute(&options.repository)?;
    let Some(modules_path) = info.modules.as_deref() else {
        info!("{} has no module metadata", info.root.display());
        return Ok(SplitOutcome::NotModular {
            repository: info.root,
        });
    };

    // Phase 2: Module Index
    let module_index = phase2::execute(modules_path)?;

    // Phase 3: Classification
    let packages = phase1::load_package_index(&info)?;
    let partitions = phase3::execute(&packages, &module_index);

    // Phase 4: Validation
    if options.skip_missing {
        info!("Skipping package existence check");
    } else {
        let report = phase4::execute(&info.root, &partitions);
        if !report.is_ok() {
            return Err(Error::MissingPackages {
                missing: report.missing,
            });
        }
        info!("All {} package paths exist", report.checked);
    }

    let Some(target) = target else {
        if options.create_repos {
            warn!("--create-repos has no effect without a target directory");
        }
        return Ok(SplitOutcome::Split(SplitSummary {
            partitions,
            target: None,
            materialized: None,
            regenerated: None,
        }));
    };

    // Phase 5: Materialization
    phase5::ensure_target(&target)?;
    let materialized = phase5::execute(
        &partitions,
        &info.root,
        &target,
        options.action,
        options.show_progress,
    )?;

    // Phase 6: Regeneration
    let regenerated = if options.create_repos {
        Some(phase6::execute(
            &options.createrepo_command,
            &materialized.directories,
        )?)
    } else {
        None
    };

    Ok(SplitOutcome::Split(SplitSummary {
        partitions,
        target: Some(target),
        materialized: Some(materialized),
        regenerated,
    }))
}

/// Classify a repository without touching the filesystem.
///
/// Convenience wrapper for inspection: no target, validation as requested.
pub fn classify_repository(repository: &Path, skip_missing: bool) -> Result<SplitOutcome> {
    let options = SplitOptions {
        skip_missing,
        ..SplitOptions::new(repository)
    };
    execute_split(&options)
}
