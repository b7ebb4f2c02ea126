//! Default values and fixed names for grobisplitter.
//!
//! This module provides centralized constants used across the pipeline,
//! ensuring the repository layout conventions are spelled out in one place.

/// Partition key (and directory name) for packages claimed by no module.
pub const NON_MODULAR_KEY: &str = "non_modular";

/// Subdirectory that module artifacts are expected to live under.
pub const PACKAGES_DIR: &str = "Packages";

/// Directory holding the repository metadata.
pub const REPODATA_DIR: &str = "repodata";

/// Index file that lists the other metadata artifacts.
pub const REPOMD_FILENAME: &str = "repomd.xml";

/// External command used to regenerate repository metadata.
///
/// Can be overridden by the `--createrepo-cmd` CLI flag or the
/// `GROBISPLITTER_CREATEREPO` environment variable.
pub const DEFAULT_CREATEREPO_COMMAND: &str = "createrepo_c";

/// Flag passed to the metadata builder to skip the sqlite database.
pub const CREATEREPO_NO_DATABASE_FLAG: &str = "--no-database";
