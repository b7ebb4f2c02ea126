//! CLI argument parsing and dispatch

use anyhow::Result;
use clap::Parser;

use crate::commands;

/// Grobisplitter - Split a modular repository into one repository per module
#[derive(Parser, Debug)]
#[command(name = "grobisplitter")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    split: commands::split::SplitArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        commands::split::execute(self.split, &self.color)
    }
}

/// Route `log` records to stderr. `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
