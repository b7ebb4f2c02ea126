//! Phase 3: Classification
//!
//! Assigns every package of the repository to a partition.
//!
//! ## Process
//!
//! 1.  **Claimed Set**: The union of every module's package paths.
//! 2.  **Non-modular Set**: Every package of the primary index whose location
//!     is not in the claimed set. It is computed once, after all module lists
//!     are known, so it can never overlap a module partition.
//! 3.  **Merge**: One partition per module NSVC plus the `non_modular`
//!     partition.

use std::collections::HashSet;

use log::{debug, info};

use super::{ModuleIndex, Partition, PartitionKey, PartitionMap};
use crate::repodata::PackageRecord;

/// Executes Phase 3 of the pipeline.
pub fn execute(packages: &[PackageRecord], modules: &ModuleIndex) -> PartitionMap {
    let claimed = claimed_packages(modules);
    let non_modular = non_modular_packages(packages, &claimed);

    let mut partitions = PartitionMap::new();
    for (nsvc, paths) in modules {
        let partition = Partition::new(PartitionKey::Module(nsvc.clone()), paths.iter().cloned());
        debug!("{}: {} packages", nsvc, partition.len());
        partitions.push(partition);
    }
    let non_modular = Partition::new(PartitionKey::NonModular, non_modular);
    info!(
        "Classified {} packages: {} claimed by {} modules, {} non-modular",
        packages.len(),
        claimed.len(),
        modules.len(),
        non_modular.len()
    );
    partitions.push(non_modular);

    partitions
}

/// Every package path claimed by at least one module.
pub fn claimed_packages(modules: &ModuleIndex) -> HashSet<&str> {
    modules
        .values()
        .flat_map(|paths| paths.iter().map(String::as_str))
        .collect()
}

/// Locations of the packages no module claims, in index order.
pub fn non_modular_packages(packages: &[PackageRecord], claimed: &HashSet<&str>) -> Vec<String> {
    packages
        .iter()
        .filter(|package| !claimed.contains(package.location.as_str()))
        .map(|package| {
            debug!("{} is not claimed by any module", package.nevra());
            package.location.clone()
        })
        .collect()
}
