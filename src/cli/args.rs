//! CLI argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version string including the commit the binary was built from.
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PEBBLE_PI_GIT_HASH"),
    ")"
);

/// CLI arguments container.
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "pebble-pi")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Estimate π by throwing pebbles at a circle in the sand", long_about = None)]
pub struct Args {
    /// The command to execute; defaults to `run` with default parameters.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Command to execute, with the zero-argument default applied.
    #[must_use]
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Run(RunArgs::default()))
    }
}

/// Available CLI commands.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Throw pebbles and estimate π
    Run(RunArgs),

    /// Validate a configuration file and print the effective parameters
    Check {
        /// Path to the YAML configuration.
        path: PathBuf,
    },

    /// Print the default configuration as YAML
    Defaults,
}

/// Options for the `run` command. Flags override the configuration file.
#[derive(Debug, Clone, Default, PartialEq, clap::Args)]
pub struct RunArgs {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Circle radius (half-width of the square)
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Pebble size subtracted from the radius
    #[arg(short, long)]
    pub offset: Option<f64>,

    /// Configured throw count (trials run from 1 to N - 1)
    #[arg(short = 'n', long)]
    pub trials: Option<u64>,

    /// Print progress every N trials
    #[arg(long)]
    pub report_interval: Option<u64>,

    /// Redraw the board every N trials
    #[arg(long)]
    pub render_interval: Option<u64>,

    /// Seed for the random source (drawn from the OS if omitted)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Draw the board in the terminal
    #[arg(long)]
    pub visualize: bool,

    /// Seconds to keep the finished board on screen
    #[arg(long)]
    pub hold_secs: Option<u64>,

    /// Only print the final estimate
    #[arg(short, long)]
    pub quiet: bool,
}
