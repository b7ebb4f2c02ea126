//! # Output Configuration
//!
//! This module controls how the CLI prints its results: whether colors and
//! emojis are used, and whether the partition summary is printed as a tree
//! or as JSON.
//!
//! ## Respecting User Preferences
//!
//! Color detection honours the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::borrow::Cow;
use std::env;
use std::io;

use ptree::{Style, TreeItem};

use crate::error::Result;
use crate::phases::PartitionMap;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` forces colors on, `--color=never` forces them off and
    /// anything else detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Whether progress bars should be drawn on stderr.
    pub fn interactive(&self) -> bool {
        console::Term::stderr().is_term()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain marker otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Format of the partition summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Tree of partitions with package counts
    #[default]
    Text,
    /// Full partition map as a JSON object
    Json,
}

/// Partition map rendered as a JSON object, key -> package paths.
pub fn partitions_json(partitions: &PartitionMap) -> Result<String> {
    Ok(serde_json::to_string_pretty(partitions)?)
}

/// Tree node for the text summary
#[derive(Debug, Clone)]
pub struct SummaryNode {
    label: String,
    children: Vec<SummaryNode>,
}

impl SummaryNode {
    /// One child per partition, labelled with its package count.
    pub fn from_partitions(root_label: impl Into<String>, partitions: &PartitionMap) -> Self {
        let children = partitions
            .iter()
            .map(|partition| SummaryNode {
                label: format!(
                    "{} ({} package{})",
                    partition.key,
                    partition.len(),
                    if partition.len() == 1 { "" } else { "s" }
                ),
                children: vec![],
            })
            .collect();
        Self {
            label: root_label.into(),
            children,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[SummaryNode] {
        &self.children
    }
}

impl TreeItem for SummaryNode {
    type Child = SummaryNode;

    fn write_self<W: io::Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::{Partition, PartitionKey};

    fn partitions() -> PartitionMap {
        let mut map = PartitionMap::new();
        map.push(Partition::new(
            PartitionKey::Module("app:main:1:c0".to_string()),
            vec!["Packages/a.rpm".to_string(), "Packages/b.rpm".to_string()],
        ));
        map.push(Partition::new(
            PartitionKey::NonModular,
            vec!["Packages/c.rpm".to_string()],
        ));
        map
    }

    #[test]
    fn test_color_always() {
        let config = OutputConfig::from_env_and_flag("always");
        assert!(config.use_color);
    }

    #[test]
    fn test_color_never() {
        let config = OutputConfig::from_env_and_flag("never");
        assert!(!config.use_color);
    }

    #[test]
    fn test_emoji_helper() {
        assert_eq!(emoji(&OutputConfig::with_color(), "📦", "[PART]"), "📦");
        assert_eq!(emoji(&OutputConfig::without_color(), "📦", "[PART]"), "[PART]");
    }

    #[test]
    fn test_summary_tree_labels() {
        let tree = SummaryNode::from_partitions("repo", &partitions());
        assert_eq!(tree.label(), "repo");
        let labels: Vec<_> = tree.children().iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["app:main:1:c0 (2 packages)", "non_modular (1 package)"]);
    }

    #[test]
    fn test_summary_tree_renders() {
        let tree = SummaryNode::from_partitions("repo", &partitions());
        let mut buf = Vec::new();
        ptree::write_tree(&tree, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("repo"));
        assert!(text.contains("non_modular (1 package)"));
    }

    #[test]
    fn test_partitions_json() {
        let json = partitions_json(&partitions()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["non_modular"][0], "Packages/c.rpm");
        assert_eq!(value["app:main:1:c0"].as_array().unwrap().len(), 2);
    }
}
