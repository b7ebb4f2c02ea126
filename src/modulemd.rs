//! # Module Document Schema and Parsing
//!
//! This module reads the modulemd YAML stream shipped in a repository's
//! `modules` metadata artifact. Only the parts of the schema needed to
//! partition a repository are modelled: the module stream identity
//! (name, stream, version, context, arch) and its RPM artifacts.
//!
//! ## Key Components
//!
//! - **`ModuleDocument`**: One YAML document of the stream. Module streams
//!   are kept. Defaults, translations and obsoletes documents are accepted
//!   but carry nothing the splitter needs.
//!
//! - **`ModuleStream`**: The canonical shape of a module stream. Version 1
//!   and version 2 streams are normalized into it, so later stages only ever
//!   see a single dialect.
//!
//! - **`SubdocumentFailure`**: A structural problem with one document. All
//!   failures are collected before parsing gives up, so a malformed file is
//!   reported in full.
//!
//! ## Parsing
//!
//! `parse` walks every document of the stream, checks the `document` and
//! `version` keys, and deserializes the `data` block of module streams
//! straight from the YAML text. Any failure makes the whole parse fail with
//! `Error::ModuleParse`.

use std::fmt;

use log::debug;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use crate::error::{Error, Result};

/// Document type tag of a module stream.
pub const DOC_MODULE_STREAM: &str = "modulemd";
/// Document type tag of module defaults.
pub const DOC_DEFAULTS: &str = "modulemd-defaults";
/// Document type tag of module translations.
pub const DOC_TRANSLATIONS: &str = "modulemd-translations";
/// Document type tag of module obsoletes.
pub const DOC_OBSOLETES: &str = "modulemd-obsoletes";

/// A structural failure in one document of the module stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubdocumentFailure {
    /// Zero-based position of the document in the YAML stream.
    pub index: usize,
    /// The `document:` tag, when it could be read.
    pub document: Option<String>,
    pub message: String,
}

impl fmt::Display for SubdocumentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(doc) => write!(f, "document #{} ({}): {}", self.index, doc, self.message),
            None => write!(f, "document #{}: {}", self.index, self.message),
        }
    }
}

/// Artifacts block shared by both stream versions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Artifacts {
    /// NEVRA strings of the RPMs built for this stream.
    #[serde(default)]
    pub rpms: Vec<String>,
}

/// The `data` block of a module stream document.
///
/// Versions 1 and 2 of the format share every field read here. They differ
/// in blocks the splitter ignores, such as dependencies and profiles, and in
/// how a missing context is spelled.
///
/// Plain scalars are read with their original spelling, so `stream: 1.10`
/// stays `"1.10"`.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamData {
    pub name: String,
    pub stream: String,
    #[serde(default, deserialize_with = "scalar_u64")]
    pub version: u64,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub artifacts: Option<Artifacts>,
}

#[derive(Deserialize)]
struct StreamBody {
    data: StreamData,
}

/// Canonical module stream, upgraded to the version 2 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStream {
    pub name: String,
    pub stream: String,
    pub version: u64,
    pub context: Option<String>,
    pub arch: Option<String>,
    /// NEVRA strings in declaration order.
    pub rpm_artifacts: Vec<String>,
}

impl ModuleStream {
    /// `name:stream:version:context`, or `name:stream:version` without a context.
    pub fn nsvc(&self) -> String {
        match &self.context {
            Some(context) => format!(
                "{}:{}:{}:{}",
                self.name, self.stream, self.version, context
            ),
            None => format!("{}:{}:{}", self.name, self.stream, self.version),
        }
    }
}

impl ModuleStream {
    /// Normalize a stream read from a document of the given format version.
    pub fn from_data(data: StreamData, format_version: u64) -> Self {
        let context = match format_version {
            // v1 streams predate contexts being mandatory; an empty one means none.
            1 => data.context.filter(|c| !c.is_empty()),
            _ => data.context,
        };
        Self {
            name: data.name,
            stream: data.stream,
            version: data.version,
            context,
            arch: data.arch,
            rpm_artifacts: data.artifacts.map(|a| a.rpms).unwrap_or_default(),
        }
    }
}

/// One parsed document of the module YAML stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleDocument {
    Stream(ModuleStream),
    Defaults { module: String },
    Translations { module: String },
    Obsoletes { module: String },
}

/// Parses a modulemd YAML stream.
///
/// Every document is validated; when any of them fails, or the stream holds
/// no documents at all, the whole parse fails with `Error::ModuleParse`
/// listing every failure.
pub fn parse(yaml_content: &str) -> Result<Vec<ModuleDocument>> {
    let mut documents = Vec::new();
    let mut failures = Vec::new();

    // Every document is read twice: once as a generic value to check its
    // header, once typed so plain scalars keep their original spelling.
    let headers = serde_yaml::Deserializer::from_str(yaml_content);
    let bodies = serde_yaml::Deserializer::from_str(yaml_content);

    for (index, (header, body)) in headers.zip(bodies).enumerate() {
        let value = match Value::deserialize(header) {
            Ok(value) => value,
            Err(e) => {
                failures.push(SubdocumentFailure {
                    index,
                    document: None,
                    message: format!("invalid YAML: {}", e),
                });
                // Document boundaries after a syntax error are unreliable.
                break;
            }
        };

        // Stray `---` separators produce empty documents.
        if value.is_null() {
            continue;
        }

        match parse_document(value, body) {
            Ok(doc) => documents.push(doc),
            Err((document, message)) => failures.push(SubdocumentFailure {
                index,
                document,
                message,
            }),
        }
    }

    if failures.is_empty() && documents.is_empty() {
        failures.push(SubdocumentFailure {
            index: 0,
            document: None,
            message: "module metadata contains no documents".to_string(),
        });
    }

    if !failures.is_empty() {
        return Err(Error::ModuleParse { failures });
    }

    debug!("Parsed {} module metadata documents", documents.len());
    Ok(documents)
}

/// Parses a modulemd YAML stream and keeps only the module streams.
pub fn parse_streams(yaml_content: &str) -> Result<Vec<ModuleStream>> {
    Ok(parse(yaml_content)?
        .into_iter()
        .filter_map(|doc| match doc {
            ModuleDocument::Stream(stream) => Some(stream),
            _ => None,
        })
        .collect())
}

type DocumentError = (Option<String>, String);

fn parse_document(
    value: Value,
    body: serde_yaml::Deserializer<'_>,
) -> std::result::Result<ModuleDocument, DocumentError> {
    let Value::Mapping(map) = value else {
        return Err((None, "expected a YAML mapping".to_string()));
    };

    let document = match map.get("document") {
        Some(Value::String(doc)) => doc.clone(),
        Some(_) => return Err((None, "`document` must be a string".to_string())),
        None => return Err((None, "missing `document` key".to_string())),
    };
    let fail = |message: String| (Some(document.clone()), message);

    let version = match map.get("version") {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| fail(format!("invalid `version`: {}", n)))?,
        Some(_) => return Err(fail("`version` must be an integer".to_string())),
        None => return Err(fail("missing `version` key".to_string())),
    };

    let data = map
        .get("data")
        .ok_or_else(|| fail("missing `data` block".to_string()))?;

    match (document.as_str(), version) {
        (DOC_MODULE_STREAM, 1 | 2) => StreamBody::deserialize(body)
            .map(|body| ModuleDocument::Stream(ModuleStream::from_data(body.data, version)))
            .map_err(|e| fail(e.to_string())),
        (DOC_DEFAULTS, 1) => module_name(data)
            .map(|module| ModuleDocument::Defaults { module })
            .map_err(fail),
        (DOC_TRANSLATIONS, 1) => module_name(data)
            .map(|module| ModuleDocument::Translations { module })
            .map_err(fail),
        (DOC_OBSOLETES, 1) => module_name(data)
            .map(|module| ModuleDocument::Obsoletes { module })
            .map_err(fail),
        (DOC_MODULE_STREAM | DOC_DEFAULTS | DOC_TRANSLATIONS | DOC_OBSOLETES, v) => {
            Err(fail(format!("unsupported document version {}", v)))
        }
        (other, _) => Err(fail(format!("unknown document type '{}'", other))),
    }
}

fn module_name(data: &Value) -> std::result::Result<String, String> {
    match data.get("module") {
        Some(Value::String(module)) => Ok(module.clone()),
        Some(_) => Err("`module` must be a string".to_string()),
        None => Err("missing `module` key".to_string()),
    }
}

// Versions are integers but some generators quote them.
fn scalar_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| serde::de::Error::custom(format!("invalid version {}", n))),
        Value::String(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid version '{}'", s))),
        other => Err(serde::de::Error::custom(format!(
            "expected an integer version, found {:?}",
            other
        ))),
    }
}
