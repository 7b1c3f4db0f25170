//! CLI module for pebble-pi.
//!
//! All CLI logic lives here rather than in main.rs so it can be tested.
//! The entry point `run_cli` is called from main.rs with parsed arguments.

mod args;
mod commands;
mod output;

pub use args::{Args, Command, RunArgs};
pub use commands::{
    check_config, resolve_config, run_cli, run_on_board, run_pebbles, run_with_printer,
    write_check_report,
};
pub use output::{format_config_summary, print_defaults, write_banner};

#[cfg(test)]
mod tests;
