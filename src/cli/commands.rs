//! CLI command handlers.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::config::{PiConfig, PiConfigBuilder};
use crate::engine::{SimRng, UniformSource};
use crate::error::PiResult;
use crate::observer::{format_final, NullObserver, ProgressPrinter};
use crate::sampler::{run_simulation, SimulationOutcome};
use crate::visualization::BoardSession;

use super::output::{format_config_summary, print_defaults, write_banner};
use super::{Args, Command, RunArgs};

/// Main CLI entry point.
///
/// Dispatches to the appropriate command handler based on parsed arguments.
#[must_use]
pub fn run_cli(args: Args) -> ExitCode {
    match args.command() {
        Command::Run(run) => run_pebbles(&run),
        Command::Check { path } => check_config(&path),
        Command::Defaults => match print_defaults() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(1)
            }
        },
    }
}

/// Build the effective configuration: file (or defaults), then flag overrides.
///
/// # Errors
///
/// Returns error if the file cannot be loaded or the result is invalid.
pub fn resolve_config(args: &RunArgs) -> PiResult<PiConfig> {
    let base = match &args.config {
        Some(path) => PiConfig::load(path)?,
        None => PiConfig::default(),
    };

    let mut builder = PiConfigBuilder::from_config(&base);
    if let Some(radius) = args.radius {
        builder = builder.radius(radius);
    }
    if let Some(offset) = args.offset {
        builder = builder.offset(offset);
    }
    if let Some(trials) = args.trials {
        builder = builder.trials(trials);
    }
    if let Some(interval) = args.report_interval {
        builder = builder.report_interval(interval);
    }
    if let Some(interval) = args.render_interval {
        builder = builder.render_interval(interval);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if args.visualize {
        builder = builder.visualize(true);
    }
    if let Some(secs) = args.hold_secs {
        builder = builder.hold_secs(secs);
    }

    builder.build()
}

/// Run the simulation described by `args`.
#[must_use]
pub fn run_pebbles(args: &RunArgs) -> ExitCode {
    // Configuration errors abort before any pebble is thrown
    let config = match resolve_config(args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    let rng = SimRng::for_config(&config);
    let mut stdout = io::stdout();

    if !args.quiet {
        if let Err(e) = write_banner(&mut stdout, &config, rng.master_seed()) {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    }

    let result = if config.enable_visualization() {
        run_with_board(&config, rng)
    } else if args.quiet {
        run_quiet(&config, rng, stdout)
    } else {
        run_with_printer(&config, rng, stdout)
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Run with progress lines and the final line written to `out`.
///
/// # Errors
///
/// Returns error if the configuration is invalid or `out` fails.
pub fn run_with_printer<S: UniformSource, W: Write>(
    config: &PiConfig,
    source: S,
    out: W,
) -> PiResult<SimulationOutcome> {
    let mut printer = ProgressPrinter::new(out);
    let outcome = run_simulation(config, source, &mut printer)?;
    printer.finish()?;
    Ok(outcome)
}

/// Run printing only the final line.
fn run_quiet<S: UniformSource, W: Write>(
    config: &PiConfig,
    source: S,
    mut out: W,
) -> PiResult<SimulationOutcome> {
    let outcome = run_simulation(config, source, &mut NullObserver)?;
    writeln!(out, "{}", format_final(&outcome))?;
    Ok(outcome)
}

/// Run on a board, or with printed progress if the board could not be opened.
///
/// The final line goes to `out` once the board has released its device.
///
/// # Errors
///
/// Returns error if the configuration is invalid or `out` fails. Board
/// failures only produce warnings.
pub fn run_on_board<S, B, W>(
    config: &PiConfig,
    source: S,
    board: PiResult<B>,
    mut out: W,
) -> PiResult<SimulationOutcome>
where
    S: UniformSource,
    B: BoardSession,
    W: Write,
{
    let mut board = match board {
        Ok(board) => board,
        Err(e) => {
            log::warn!("board unavailable, printing progress instead: {e}");
            eprintln!("Warning: {e}; printing progress instead");
            return run_with_printer(config, source, out);
        }
    };

    let outcome = run_simulation(config, source, &mut board)?;
    if let Err(e) = board.finish() {
        log::warn!("board failed during the run: {e}");
        eprintln!("Warning: {e}");
    }
    writeln!(out, "{}", format_final(&outcome))?;
    Ok(outcome)
}

#[cfg(feature = "tui")]
fn run_with_board(config: &PiConfig, rng: SimRng) -> PiResult<SimulationOutcome> {
    use crate::visualization::BoardTui;
    use std::time::Duration;

    let board = BoardTui::new(
        config.board,
        Duration::from_secs(config.visualization.hold_secs),
    );
    run_on_board(config, rng, board, io::stdout())
}

#[cfg(not(feature = "tui"))]
fn run_with_board(config: &PiConfig, rng: SimRng) -> PiResult<SimulationOutcome> {
    use crate::error::PiError;
    use crate::visualization::BoardScene;

    let board: PiResult<BoardScene> = Err(PiError::render(
        "pebble-pi was built without the `tui` feature",
    ));
    run_on_board(config, rng, board, io::stdout())
}

/// Validate a configuration file and print the effective parameters.
#[must_use]
pub fn check_config(path: &Path) -> ExitCode {
    match write_check_report(&mut io::stdout(), path) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Write the `check` report for `path` to `out`; `Ok(false)` if the file is invalid.
///
/// # Errors
///
/// Returns error if `out` fails.
pub fn write_check_report<W: Write>(out: &mut W, path: &Path) -> PiResult<bool> {
    writeln!(out, "Checking configuration: {}\n", path.display())?;

    match PiConfig::load(path) {
        Ok(config) => {
            write!(out, "{}", format_config_summary(&config))?;
            writeln!(out, "\n✓ Configuration is valid")?;
            Ok(true)
        }
        Err(e) => {
            writeln!(out, "✗ Configuration is invalid")?;
            eprintln!("Error: {e}");
            Ok(false)
        }
    }
}
