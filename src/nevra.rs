//! NEVRA parsing and package path reconstruction
//!
//! Module documents list their artifacts as `name-epoch:version-release.arch`
//! strings. The repository stores the matching package at
//! `Packages/name-version-release.arch.rpm`, so the path is rebuilt by
//! splitting the NEVRA from the right and dropping the epoch.

use std::fmt;
use std::str::FromStr;

use crate::defaults::PACKAGES_DIR;
use crate::error::{Error, Result};

/// A parsed `name-epoch:version-release.arch` package identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nevra {
    pub name: String,
    pub epoch: u32,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl Nevra {
    /// Parse a NEVRA string.
    ///
    /// The string is split on its last two hyphens into name, `epoch:version`
    /// and `release.arch`. The epoch is mandatory: an identifier without one
    /// is reported as an error rather than skipped.
    pub fn parse(nevra: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidNevra {
            nevra: nevra.to_string(),
            reason: reason.to_string(),
        };

        let mut fields = nevra.rsplitn(3, '-');
        let release_arch = fields.next().unwrap_or_default();
        let (epoch_version, name) = match (fields.next(), fields.next()) {
            (Some(ev), Some(n)) => (ev, n),
            _ => return Err(invalid("expected name-epoch:version-release.arch")),
        };

        if name.is_empty() {
            return Err(invalid("empty package name"));
        }

        let (epoch, version) = epoch_version
            .split_once(':')
            .ok_or_else(|| invalid("missing epoch separator ':'"))?;
        let epoch = epoch
            .parse::<u32>()
            .map_err(|_| invalid("epoch is not a number"))?;
        if version.is_empty() {
            return Err(invalid("empty version"));
        }

        let (release, arch) = release_arch
            .rsplit_once('.')
            .ok_or_else(|| invalid("missing architecture"))?;
        if release.is_empty() || arch.is_empty() {
            return Err(invalid("empty release or architecture"));
        }

        Ok(Self {
            name: name.to_string(),
            epoch,
            version: version.to_string(),
            release: release.to_string(),
            arch: arch.to_string(),
        })
    }

    /// Package file name, `name-version-release.arch.rpm`.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.{}.rpm",
            self.name, self.version, self.release, self.arch
        )
    }

    /// Repository-relative location of the package, under `Packages/`.
    pub fn package_path(&self) -> String {
        format!("{}/{}", PACKAGES_DIR, self.file_name())
    }
}

impl FromStr for Nevra {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Nevra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }
}

/// Convert a NEVRA string straight to its repository-relative path.
pub fn package_path(nevra: &str) -> Result<String> {
    Ok(Nevra::parse(nevra)?.package_path())
}

/// Final component of a repository-relative path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a package file name back into `(name, version, release.arch)`.
///
/// Returns `None` when the name lacks the `.rpm` suffix or the two
/// hyphen-delimited trailing fields.
pub fn split_file_name(file_name: &str) -> Option<(&str, &str, &str)> {
    let stem = file_name.strip_suffix(".rpm")?;
    let mut fields = stem.rsplitn(3, '-');
    let release_arch = fields.next()?;
    let version = fields.next()?;
    let name = fields.next()?;
    Some((name, version, release_arch))
}
