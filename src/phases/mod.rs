//! Implementation of the phases of the split operation.
//!
//! ## Overview
//!
//! The split operation follows these phases, strictly in order:
//! 1. Discovery - Read `repomd.xml` and locate the metadata artifacts
//! 2. Module Index - Parse the module document into NSVC -> package paths
//! 3. Classification - Assign every package to a module or to `non_modular`
//! 4. Validation - Check that every classified package file exists
//! 5. Materialization - Copy or link each partition into the target directory
//! 6. Regeneration - Optionally run the metadata builder per partition
//!
//! The target directory is checked before Phase 1 so that a bad target is
//! reported before any metadata is read.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::defaults::NON_MODULAR_KEY;

// Phase modules
pub mod classify;
pub mod discovery;
pub mod materialize;
pub mod modules;
pub mod orchestrator;
pub mod regenerate;
pub mod validate;

// Numbered aliases matching the phase list above
pub use classify as phase3;
pub use discovery as phase1;
pub use materialize as phase5;
pub use modules as phase2;
pub use regenerate as phase6;
pub use validate as phase4;

/// Module NSVC -> package paths it claims, in declaration order.
pub type ModuleIndex = BTreeMap<String, Vec<String>>;

/// Identifies one output partition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionKey {
    /// A module build, keyed by its NSVC string
    Module(String),
    /// Packages claimed by no module
    NonModular,
}

impl PartitionKey {
    /// Key as used for the partition directory name.
    pub fn as_str(&self) -> &str {
        match self {
            PartitionKey::Module(nsvc) => nsvc,
            PartitionKey::NonModular => NON_MODULAR_KEY,
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One partition and the package paths it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: PartitionKey,
    /// Repository-relative package paths, without duplicates.
    pub packages: Vec<String>,
}

impl Partition {
    /// Create a partition, dropping repeated paths but keeping first-seen order.
    pub fn new<I>(key: PartitionKey, packages: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let packages = packages
            .into_iter()
            .filter(|path| seen.insert(path.clone()))
            .collect();
        Self { key, packages }
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Final classification result: every partition with its package set.
///
/// Built once per run and read-only afterwards. Module partitions come first,
/// in the order they were added, followed by the non-modular partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionMap {
    partitions: Vec<Partition>,
}

impl PartitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, partition: Partition) {
        self.partitions.push(partition);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Partition> {
        self.partitions.iter()
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Look a partition up by its directory name.
    pub fn get(&self, key: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.key.as_str() == key)
    }

    pub fn non_modular(&self) -> Option<&Partition> {
        self.partitions
            .iter()
            .find(|p| p.key == PartitionKey::NonModular)
    }

    /// Number of (partition, package) pairs across the map.
    pub fn package_count(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }
}

impl<'a> IntoIterator for &'a PartitionMap {
    type Item = &'a Partition;
    type IntoIter = std::slice::Iter<'a, Partition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for PartitionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.partitions.len()))?;
        for partition in &self.partitions {
            map.serialize_entry(partition.key.as_str(), &partition.packages)?;
        }
        map.end()
    }
}
