//! # Repository Metadata Reading
//!
//! Reads the `repodata/` directory of a local RPM repository:
//!
//! - `repomd.xml` is the index of the other metadata artifacts. The
//!   `primary` and `filelists` entries are required, `modules` is optional
//!   and its absence means the repository is not modular.
//! - The primary index lists every package and its repository-relative
//!   location.
//!
//! Artifacts may be compressed with gzip, xz, zstd or bzip2 (detected from
//! the magic bytes) or plain. XML is parsed with `xot`.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use log::debug;
use xot::{NameId, Node, Xot};
use xz2::read::XzDecoder;

use crate::defaults::{REPODATA_DIR, REPOMD_FILENAME};
use crate::error::{Error, Result};

/// Namespace of `repomd.xml`.
pub const REPO_NS: &str = "http://linux.duke.edu/metadata/repo";
/// Namespace of the primary package index.
pub const COMMON_NS: &str = "http://linux.duke.edu/metadata/common";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const XZ_MAGIC: [u8; 6] = [0xfd, b'7', b'z', b'X', b'Z', 0x00];
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];
const BZIP2_MAGIC: [u8; 3] = [b'B', b'Z', b'h'];
const ZCK_MAGIC: [u8; 5] = [0x00, b'Z', b'C', b'K', b'1'];

/// Locations of the metadata artifacts of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Absolute repository root.
    pub root: PathBuf,
    pub repomd: PathBuf,
    pub primary: PathBuf,
    pub filelists: PathBuf,
    /// Compressed module document, if the repository is modular.
    pub modules: Option<PathBuf>,
}

impl RepoInfo {
    pub fn is_modular(&self) -> bool {
        self.modules.is_some()
    }
}

/// One package of the primary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub arch: String,
    pub epoch: String,
    pub version: String,
    pub release: String,
    /// Repository-relative path of the package file.
    pub location: String,
}

impl PackageRecord {
    /// `name-epoch:version-release.arch`, the form module artifacts use.
    pub fn nevra(&self) -> String {
        format!(
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }
}

/// All packages of a repository, in primary index order.
pub type PackageIndex = Vec<PackageRecord>;

fn metadata_error(message: impl Into<String>) -> Error {
    Error::Metadata {
        message: message.into(),
    }
}

fn parse_xml(xot: &mut Xot, text: &str, path: &Path) -> Result<Node> {
    let root = xot
        .parse(text)
        .map_err(|e| metadata_error(format!("Failed to parse '{}': {}", path.display(), e)))?;
    xot.document_element(root)
        .map_err(|e| metadata_error(format!("Failed to parse '{}': {}", path.display(), e)))
}

fn is_element(xot: &Xot, node: Node, name: NameId) -> bool {
    xot.element(node).is_some_and(|element| element.name() == name)
}

fn child_element(xot: &Xot, node: Node, name: NameId) -> Option<Node> {
    xot.children(node).find(|child| is_element(xot, *child, name))
}

/// Reads `repodata/repomd.xml` and resolves the artifact locations.
///
/// The primary and filelists artifacts must be listed and present on disk.
pub fn read_repomd(repo_root: &Path) -> Result<RepoInfo> {
    let root = fs::canonicalize(repo_root).map_err(|e| {
        metadata_error(format!(
            "Cannot access repository '{}': {}",
            repo_root.display(),
            e
        ))
    })?;
    let repomd = root.join(REPODATA_DIR).join(REPOMD_FILENAME);
    let text = fs::read_to_string(&repomd)
        .map_err(|e| metadata_error(format!("Cannot read '{}': {}", repomd.display(), e)))?;

    let mut xot = Xot::new();
    let document = parse_xml(&mut xot, &text, &repomd)?;
    let repo_ns = xot.add_namespace(REPO_NS);
    let data_name = xot.add_name_ns("data", repo_ns);
    let location_name = xot.add_name_ns("location", repo_ns);
    let type_attr = xot.add_name("type");
    let href_attr = xot.add_name("href");

    let mut primary = None;
    let mut filelists = None;
    let mut modules = None;

    for data in xot
        .children(document)
        .filter(|node| is_element(&xot, *node, data_name))
    {
        let Some(kind) = xot.get_attribute(data, type_attr) else {
            continue;
        };
        let href = child_element(&xot, data, location_name)
            .and_then(|location| xot.get_attribute(location, href_attr))
            .ok_or_else(|| {
                metadata_error(format!(
                    "'{}' entry in {} has no location",
                    kind,
                    repomd.display()
                ))
            })?;
        let path = root.join(href);
        debug!("repomd lists {} at {}", kind, path.display());
        match kind {
            "primary" => primary = Some(path),
            "filelists" => filelists = Some(path),
            "modules" => modules = Some(path),
            _ => {}
        }
    }

    let primary = require_artifact("primary", primary, &repomd)?;
    let filelists = require_artifact("filelists", filelists, &repomd)?;
    if let Some(modules) = &modules {
        if !modules.is_file() {
            return Err(metadata_error(format!(
                "modules metadata listed in {} is missing: {}",
                repomd.display(),
                modules.display()
            )));
        }
    }

    Ok(RepoInfo {
        root,
        repomd,
        primary,
        filelists,
        modules,
    })
}

fn require_artifact(kind: &str, path: Option<PathBuf>, repomd: &Path) -> Result<PathBuf> {
    let path = path.ok_or_else(|| {
        metadata_error(format!("{} does not list {} metadata", repomd.display(), kind))
    })?;
    if !path.is_file() {
        return Err(metadata_error(format!(
            "{} metadata listed in {} is missing: {}",
            kind,
            repomd.display(),
            path.display()
        )));
    }
    Ok(path)
}

/// Compression of a metadata artifact, detected from its leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Xz,
    Zstd,
    Bzip2,
    Zchunk,
    Plain,
}

impl Compression {
    pub fn detect(raw: &[u8]) -> Self {
        if raw.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else if raw.starts_with(&XZ_MAGIC) {
            Compression::Xz
        } else if raw.starts_with(&ZSTD_MAGIC) {
            Compression::Zstd
        } else if raw.starts_with(&BZIP2_MAGIC) {
            Compression::Bzip2
        } else if raw.starts_with(&ZCK_MAGIC) {
            Compression::Zchunk
        } else {
            Compression::Plain
        }
    }
}

/// Reads a metadata artifact, decompressing gzip, xz, zstd or bzip2 data.
///
/// zchunk artifacts are rejected; createrepo_c always writes a plain
/// compressed sibling next to them.
pub fn read_compressed(path: &Path) -> Result<Vec<u8>> {
    let raw = fs::read(path)
        .map_err(|e| metadata_error(format!("Cannot read '{}': {}", path.display(), e)))?;

    let compression = Compression::detect(&raw);
    let mut decoded = Vec::new();
    let result = match compression {
        Compression::Plain => return Ok(raw),
        Compression::Zchunk => {
            return Err(metadata_error(format!(
                "Unsupported compression 'zchunk' for {}",
                path.display()
            )))
        }
        Compression::Gzip => MultiGzDecoder::new(raw.as_slice()).read_to_end(&mut decoded),
        Compression::Xz => {
            XzDecoder::new_multi_decoder(raw.as_slice()).read_to_end(&mut decoded)
        }
        Compression::Zstd => zstd::stream::read::Decoder::new(raw.as_slice())
            .and_then(|mut decoder| decoder.read_to_end(&mut decoded)),
        Compression::Bzip2 => MultiBzDecoder::new(raw.as_slice()).read_to_end(&mut decoded),
    };

    result.map_err(|e| {
        metadata_error(format!(
            "Failed to decompress '{}' ({:?}): {}",
            path.display(),
            compression,
            e
        ))
    })?;
    debug!(
        "Decompressed {} ({:?}, {} bytes)",
        path.display(),
        compression,
        decoded.len()
    );
    Ok(decoded)
}

/// Loads every package record from the primary index.
pub fn load_packages(primary: &Path) -> Result<PackageIndex> {
    let bytes = read_compressed(primary)?;
    let text = String::from_utf8(bytes).map_err(|e| {
        metadata_error(format!("'{}' is not valid UTF-8: {}", primary.display(), e))
    })?;
    parse_primary(&text, primary)
}

fn parse_primary(text: &str, path: &Path) -> Result<PackageIndex> {
    let mut xot = Xot::new();
    let document = parse_xml(&mut xot, text, path)?;
    let ns = xot.add_namespace(COMMON_NS);
    let package_name = xot.add_name_ns("package", ns);
    let name_name = xot.add_name_ns("name", ns);
    let arch_name = xot.add_name_ns("arch", ns);
    let version_name = xot.add_name_ns("version", ns);
    let location_name = xot.add_name_ns("location", ns);
    let epoch_attr = xot.add_name("epoch");
    let ver_attr = xot.add_name("ver");
    let rel_attr = xot.add_name("rel");
    let href_attr = xot.add_name("href");

    let text_of = |node: Node, name: NameId| -> Option<String> {
        child_element(&xot, node, name)
            .and_then(|child| xot.text_content_str(child))
            .map(|s| s.trim().to_string())
    };

    let mut packages = Vec::new();
    for (position, package) in xot
        .children(document)
        .filter(|node| is_element(&xot, *node, package_name))
        .enumerate()
    {
        let missing = |what: &str| {
            metadata_error(format!(
                "package #{} in '{}' has no {}",
                position,
                path.display(),
                what
            ))
        };

        let name = text_of(package, name_name).ok_or_else(|| missing("name"))?;
        let arch = text_of(package, arch_name).ok_or_else(|| missing("arch"))?;
        let version = child_element(&xot, package, version_name).ok_or_else(|| missing("version"))?;
        let location = child_element(&xot, package, location_name)
            .and_then(|node| xot.get_attribute(node, href_attr))
            .ok_or_else(|| missing("location"))?;

        packages.push(PackageRecord {
            name,
            arch,
            epoch: xot
                .get_attribute(version, epoch_attr)
                .unwrap_or("0")
                .to_string(),
            version: xot
                .get_attribute(version, ver_attr)
                .unwrap_or_default()
                .to_string(),
            release: xot
                .get_attribute(version, rel_attr)
                .unwrap_or_default()
                .to_string(),
            location: location.to_string(),
        });
    }

    debug!("Loaded {} packages from {}", packages.len(), path.display());
    Ok(packages)
}
