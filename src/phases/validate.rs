//! Phase 4: Validation
//!
//! Confirms that every classified package path resolves to a file under the
//! repository root. All missing entries are collected before the report is
//! returned, so a single run surfaces every problem.
//!
//! The caller decides what a failed report means; the orchestrator turns it
//! into `Error::MissingPackages` unless validation was skipped.

use std::fmt;
use std::path::Path;

use log::debug;

use super::PartitionMap;

/// A package path that does not exist on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPackage {
    /// Key of the partition that owns the path.
    pub partition: String,
    /// Repository-relative package path.
    pub path: String,
}

impl fmt::Display for MissingPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path {} from mod {} did not exist", self.path, self.partition)
    }
}

/// Outcome of checking a partition map against the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of (partition, path) pairs checked.
    pub checked: usize,
    pub missing: Vec<MissingPackage>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Executes Phase 4 of the pipeline.
pub fn execute(repo_root: &Path, partitions: &PartitionMap) -> ValidationReport {
    let mut report = ValidationReport::default();

    for partition in partitions {
        for path in &partition.packages {
            report.checked += 1;
            if !repo_root.join(path).exists() {
                let missing = MissingPackage {
                    partition: partition.key.to_string(),
                    path: path.clone(),
                };
                debug!("{}", missing);
                report.missing.push(missing);
            }
        }
    }

    report
}
