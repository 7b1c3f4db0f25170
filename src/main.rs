//! pebble-pi CLI - Monte Carlo estimation of π
//!
//! Thin wrapper; all logic lives in `pebble_pi::cli`.

use clap::Parser;
use pebble_pi::cli::{run_cli, Args};
use std::process::ExitCode;

fn main() -> ExitCode {
    run_cli(Args::parse())
}
