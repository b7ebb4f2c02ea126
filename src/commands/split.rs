//! # Split Command Implementation
//!
//! Runs the split pipeline for one repository and reports the result.
//!
//! ## Behaviour
//!
//! - **No target**: the repository is classified (and validated unless
//!   `--skip-missing`), the partition summary is printed, and nothing is
//!   written.
//! - **With target**: partitions are placed under the target directory with
//!   the chosen `--action`, then `--create-repos` optionally regenerates
//!   metadata for each of them.
//! - **Module-less repository**: a notice is printed and the command exits
//!   successfully without touching the filesystem.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use grobisplitter::defaults::DEFAULT_CREATEREPO_COMMAND;
use grobisplitter::error::Error;
use grobisplitter::output::{emoji, partitions_json, OutputConfig, OutputFormat, SummaryNode};
use grobisplitter::phases::materialize::Action;
use grobisplitter::phases::orchestrator::{
    execute_split, SplitOptions, SplitOutcome, SplitSummary,
};

/// Split a modular repository into one repository per module
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// The repository to split
    #[arg(value_name = "REPOSITORY")]
    pub repository: PathBuf,

    /// Method used to place package files in the split repositories
    #[arg(long, value_enum, default_value_t = Action::Hardlink)]
    pub action: Action,

    /// Target directory for the split repositories.
    ///
    /// Must not exist yet or be empty. Without it the repository is only
    /// classified and the result printed.
    #[arg(long, value_name = "DIR", env = "GROBISPLITTER_TARGET")]
    pub target: Option<PathBuf>,

    /// Skip the check that every package file exists
    #[arg(long)]
    pub skip_missing: bool,

    /// Create repository metadata for every split repository
    #[arg(long)]
    pub create_repos: bool,

    /// Command used to create repository metadata
    #[arg(
        long,
        value_name = "CMD",
        env = "GROBISPLITTER_CREATEREPO",
        default_value = DEFAULT_CREATEREPO_COMMAND
    )]
    pub createrepo_cmd: String,

    /// Format of the partition summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl SplitArgs {
    fn to_options(&self, out: &OutputConfig) -> SplitOptions {
        SplitOptions {
            repository: self.repository.clone(),
            target: self.target.clone(),
            action: self.action,
            skip_missing: self.skip_missing,
            create_repos: self.create_repos,
            createrepo_command: self.createrepo_cmd.clone(),
            show_progress: !self.quiet && out.interactive(),
        }
    }
}

/// Execute the split command.
pub fn execute(args: SplitArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let options = args.to_options(&out);

    let outcome = match execute_split(&options) {
        Ok(outcome) => outcome,
        Err(Error::MissingPackages { missing }) => {
            for entry in &missing {
                eprintln!("{}", entry);
            }
            return Err(Error::MissingPackages { missing }.into());
        }
        Err(e) => return Err(e.into()),
    };

    match outcome {
        SplitOutcome::NotModular { .. } => {
            // Printed even with --quiet: this is the whole result of the run.
            println!("This repository has no modules defined.");
            println!("Grobisplitter only works on repos with modules.");
        }
        SplitOutcome::Split(summary) => {
            if !args.quiet {
                print_summary(&out, &summary, args.format, &args.repository)?;
            }
        }
    }

    Ok(())
}

fn print_summary(
    out: &OutputConfig,
    summary: &SplitSummary,
    format: OutputFormat,
    repository: &std::path::Path,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", partitions_json(&summary.partitions)?),
        OutputFormat::Text => {
            let root = format!(
                "{} {}",
                emoji(out, "📦", "[REPO]"),
                repository.display()
            );
            ptree::print_tree(&SummaryNode::from_partitions(root, &summary.partitions))?;

            if let (Some(target), Some(report)) = (&summary.target, &summary.materialized) {
                println!(
                    "{} {} files placed in {} partitions under {}",
                    emoji(out, "✅", "[OK]"),
                    report.placed,
                    report.directories.len(),
                    target.display()
                );
                if report.skipped > 0 {
                    println!(
                        "{} {} missing files skipped",
                        emoji(out, "⚠️", "[WARN]"),
                        report.skipped
                    );
                }
            }
            if let Some(report) = &summary.regenerated {
                println!(
                    "{} Repository metadata created for {} partitions",
                    emoji(out, "🗂️", "[META]"),
                    report.processed.len() - report.failed.len()
                );
            }
        }
    }
    Ok(())
}
