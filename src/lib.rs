//! # Grobisplitter Library
//!
//! This library splits a modular RPM repository into one sub-repository per
//! module build, plus a `non_modular` pool for packages no module claims. It
//! is used by the `grobisplitter` command-line tool but can be called
//! directly through [`phases::orchestrator::execute_split`].
//!
//! ## Quick Example
//!
//! ```
//! use grobisplitter::modulemd;
//! use grobisplitter::nevra;
//!
//! let yaml = r#"
//! document: modulemd
//! version: 2
//! data:
//!   name: app
//!   stream: main
//!   version: 1
//!   context: c0
//!   artifacts:
//!     rpms:
//!       - a-0:1-1.x86_64
//! "#;
//! let streams = modulemd::parse_streams(yaml).unwrap();
//! assert_eq!(streams[0].nsvc(), "app:main:1:c0");
//!
//! let path = nevra::package_path(&streams[0].rpm_artifacts[0]).unwrap();
//! assert_eq!(path, "Packages/a-1-1.x86_64.rpm");
//! ```
//!
//! ## Core Concepts
//!
//! - **Repository metadata (`repodata`)**: Reads `repomd.xml` and the primary
//!   package index.
//! - **Module documents (`modulemd`)**: Parses the modulemd YAML stream into
//!   module streams.
//! - **NEVRA (`nevra`)**: Rebuilds package file paths from module artifacts.
//! - **Phases (`phases`)**: The pipeline that classifies packages into
//!   partitions and writes them out.
//!
//! ## Execution Flow
//!
//! 1.  **Discovery**: Locate the metadata artifacts.
//! 2.  **Module Index**: Map each module NSVC to its package paths.
//! 3.  **Classification**: Assign every package to a module or `non_modular`.
//! 4.  **Validation**: Check that every package file exists.
//! 5.  **Materialization**: Copy or link each partition into the target.
//! 6.  **Regeneration**: Optionally run `createrepo_c` per partition.

pub mod defaults;
pub mod error;
pub mod modulemd;
pub mod nevra;
pub mod output;
pub mod phases;
pub mod repodata;

#[cfg(test)]
mod nevra_proptest;
