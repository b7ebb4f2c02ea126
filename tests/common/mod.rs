//! Shared test utilities for integration and E2E tests.
//!
//! The fixture writes a small but real repository layout: `repodata/` with
//! `repomd.xml`, a primary index, a filelists stub, an optional module
//! document, and one file per package under `Packages/`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = RepoFixture::new().with_scenario();
//!     fixture.command().arg(fixture.path()).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::{Pkg, RepoFixture};
}

/// One package of the fixture repository.
#[derive(Debug, Clone)]
pub struct Pkg {
    pub name: &'static str,
    pub epoch: &'static str,
    pub version: &'static str,
    pub release: &'static str,
    pub arch: &'static str,
}

impl Pkg {
    pub const fn new(
        name: &'static str,
        epoch: &'static str,
        version: &'static str,
        release: &'static str,
        arch: &'static str,
    ) -> Self {
        Self {
            name,
            epoch,
            version,
            release,
            arch,
        }
    }

    /// `name-epoch:version-release.arch`, as listed in module artifacts.
    pub fn nevra(&self) -> String {
        format!(
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}-{}-{}.{}.rpm",
            self.name, self.version, self.release, self.arch
        )
    }

    pub fn location(&self) -> String {
        format!("Packages/{}", self.file_name())
    }
}

/// The end-to-end scenario: module `app:main:1:c0` claims `a` and `b`, `c`
/// belongs to no module.
#[allow(dead_code)]
pub const SCENARIO: [Pkg; 3] = [
    Pkg::new("a", "0", "1.0", "1", "x86_64"),
    Pkg::new("b", "0", "2.0", "1", "noarch"),
    Pkg::new("c", "0", "3.0", "1", "x86_64"),
];

/// A temporary repository built on disk.
pub struct RepoFixture {
    temp_dir: assert_fs::TempDir,
    packages: Vec<Pkg>,
    modules: Option<String>,
    gzip: bool,
}

impl RepoFixture {
    /// Create an empty fixture; nothing is written until `build`.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            packages: Vec::new(),
            modules: None,
            gzip: true,
        }
    }

    /// Add packages to the primary index.
    pub fn with_packages(mut self, packages: &[Pkg]) -> Self {
        self.packages.extend_from_slice(packages);
        self
    }

    /// Use this YAML as the module document.
    pub fn with_modules(mut self, yaml: impl Into<String>) -> Self {
        self.modules = Some(yaml.into());
        self
    }

    /// Write metadata artifacts uncompressed.
    #[allow(dead_code)]
    pub fn plain(mut self) -> Self {
        self.gzip = false;
        self
    }

    /// The `app:main:1:c0` scenario, fully built.
    #[allow(dead_code)]
    pub fn scenario() -> Self {
        Self::new()
            .with_packages(&SCENARIO)
            .with_modules(module_stream("app", "main", 1, "c0", &SCENARIO[..2]))
            .build()
    }

    /// Write repodata and package files.
    pub fn build(self) -> Self {
        let repo = self.repo();
        std::fs::create_dir_all(repo.join("repodata")).expect("Failed to create repodata");
        std::fs::create_dir_all(repo.join("Packages")).expect("Failed to create Packages");

        for pkg in &self.packages {
            std::fs::write(repo.join(pkg.location()), pkg.nevra())
                .expect("Failed to write package file");
        }

        let primary = self.write_artifact("primary.xml", primary_xml(&self.packages));
        let filelists = self.write_artifact("filelists.xml", FILELISTS_XML.to_string());
        let modules = self
            .modules
            .clone()
            .map(|yaml| self.write_artifact("modules.yaml", yaml));

        let mut data = vec![("primary", primary), ("filelists", filelists)];
        if let Some(modules) = modules {
            data.push(("modules", modules));
        }
        std::fs::write(repo.join("repodata/repomd.xml"), repomd_xml(&data))
            .expect("Failed to write repomd.xml");
        self
    }

    fn write_artifact(&self, name: &str, content: String) -> String {
        let href = if self.gzip {
            format!("repodata/{}.gz", name)
        } else {
            format!("repodata/{}", name)
        };
        let bytes = if self.gzip {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(content.as_bytes())
                .expect("Failed to compress artifact");
            encoder.finish().expect("Failed to compress artifact")
        } else {
            content.into_bytes()
        };
        std::fs::write(self.repo().join(&href), bytes).expect("Failed to write artifact");
        href
    }

    /// Root of the repository.
    pub fn repo(&self) -> PathBuf {
        self.temp_dir.path().join("repo")
    }

    /// Path for a split target; not created.
    #[allow(dead_code)]
    pub fn target(&self) -> PathBuf {
        self.temp_dir.path().join("split")
    }

    /// The temporary directory containing the repository and the target.
    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command running in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("grobisplitter");
        cmd.current_dir(self.path())
            .env_remove("GROBISPLITTER_TARGET")
            .env_remove("GROBISPLITTER_CREATEREPO")
            .env_remove("RUST_LOG");
        cmd
    }
}

impl Default for RepoFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A modulemd v2 stream document claiming `packages`.
#[allow(dead_code)]
pub fn module_stream(name: &str, stream: &str, version: u64, context: &str, packages: &[Pkg]) -> String {
    let mut yaml = format!(
        "---\ndocument: modulemd\nversion: 2\ndata:\n  name: {}\n  stream: {}\n  version: {}\n  context: {}\n  arch: x86_64\n  summary: test module\n  artifacts:\n    rpms:\n",
        name, stream, version, context
    );
    for pkg in packages {
        yaml.push_str(&format!("      - {}\n", pkg.nevra()));
    }
    yaml
}

const FILELISTS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<filelists xmlns="http://linux.duke.edu/metadata/filelists" packages="0">
</filelists>
"#;

fn primary_xml(packages: &[Pkg]) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata xmlns=\"http://linux.duke.edu/metadata/common\" xmlns:rpm=\"http://linux.duke.edu/metadata/rpm\" packages=\"{}\">\n",
        packages.len()
    );
    for pkg in packages {
        xml.push_str(&format!(
            "<package type=\"rpm\">\n  <name>{}</name>\n  <arch>{}</arch>\n  <version epoch=\"{}\" ver=\"{}\" rel=\"{}\"/>\n  <location href=\"{}\"/>\n</package>\n",
            pkg.name,
            pkg.arch,
            pkg.epoch,
            pkg.version,
            pkg.release,
            pkg.location()
        ));
    }
    xml.push_str("</metadata>\n");
    xml
}

fn repomd_xml(data: &[(&str, String)]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<repomd xmlns=\"http://linux.duke.edu/metadata/repo\" xmlns:rpm=\"http://linux.duke.edu/metadata/rpm\">\n  <revision>1</revision>\n",
    );
    for (kind, href) in data {
        xml.push_str(&format!(
            "  <data type=\"{}\">\n    <location href=\"{}\"/>\n  </data>\n",
            kind, href
        ));
    }
    xml.push_str("</repomd>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_writes_layout() {
        let fixture = RepoFixture::scenario();
        let repo = fixture.repo();
        assert!(repo.join("repodata/repomd.xml").is_file());
        assert!(repo.join("repodata/modules.yaml.gz").is_file());
        assert!(repo.join("Packages/a-1.0-1.x86_64.rpm").is_file());
    }

    #[test]
    fn test_pkg_names() {
        let pkg = Pkg::new("a", "0", "1.0", "1", "x86_64");
        assert_eq!(pkg.nevra(), "a-0:1.0-1.x86_64");
        assert_eq!(pkg.location(), "Packages/a-1.0-1.x86_64.rpm");
    }
}
