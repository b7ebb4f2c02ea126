//! Phase 1: Discovery
//!
//! This is the first phase of the split pipeline. It reads the repository's
//! `repodata/repomd.xml` and resolves where the package index and the module
//! document live.
//!
//! ## Process
//!
//! 1.  **Locate Artifacts (`execute`)**: Resolve the primary, filelists and
//!     modules entries of `repomd.xml`. Missing required artifacts are fatal;
//!     a missing modules entry is reported through `RepoInfo::modules`.
//!
//! 2.  **Load Packages (`load_package_index`)**: Read every package location
//!     from the primary index. This is deferred until the repository is known
//!     to be modular, since a module-less repository is not processed at all.

use std::path::Path;

use log::info;

use crate::error::Result;
use crate::repodata::{self, PackageIndex, RepoInfo};

/// Executes Phase 1 of the pipeline.
pub fn execute(repository: &Path) -> Result<RepoInfo> {
    let info = repodata::read_repomd(repository)?;
    info!(
        "Read repository metadata from {} (modules: {})",
        info.repomd.display(),
        if info.is_modular() { "yes" } else { "no" }
    );
    Ok(info)
}

/// Loads the package index listed in the repository's metadata.
pub fn load_package_index(info: &RepoInfo) -> Result<PackageIndex> {
    let packages = repodata::load_packages(&info.primary)?;
    info!("Repository lists {} packages", packages.len());
    Ok(packages)
}
