//! CLI module tests.

use super::args::{Args, Command, RunArgs};
use super::commands::{
    check_config, resolve_config, run_on_board, run_with_printer, write_check_report,
};
use super::output::{format_config_summary, write_banner};
use crate::config::PiConfig;
use crate::engine::SimRng;
use crate::error::{PiError, PiResult};
use crate::observer::SimulationObserver;
use crate::visualization::{BoardScene, BoardSession};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn parse(args: &[&str]) -> Option<Args> {
    Args::try_parse_from(args).ok()
}

fn write_config(contents: &str) -> Option<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new().ok()?;
    file.write_all(contents.as_bytes()).ok()?;
    Some(file)
}

// ============================================================================
// Args parsing tests
// ============================================================================

#[test]
fn test_parse_no_args_runs_defaults() {
    let args = parse(&["pebble-pi"]);
    assert_eq!(
        args.map(Args::command),
        Some(Command::Run(RunArgs::default()))
    );
}

#[test]
fn test_parse_run_command() {
    let args = parse(&["pebble-pi", "run"]);
    assert_eq!(
        args.map(Args::command),
        Some(Command::Run(RunArgs::default()))
    );
}

#[test]
fn test_parse_run_with_overrides() {
    let args = parse(&[
        "pebble-pi",
        "run",
        "--config",
        "pebbles.yaml",
        "-r",
        "50",
        "--offset",
        "0.5",
        "-n",
        "2001",
        "--report-interval",
        "250",
        "--render-interval",
        "10",
        "--seed",
        "7",
        "--visualize",
        "--hold-secs",
        "3",
        "-q",
    ]);
    let command = args.map(Args::command);
    assert!(matches!(command, Some(Command::Run(_))));
    if let Some(Command::Run(run)) = command {
        assert_eq!(run.config, Some(PathBuf::from("pebbles.yaml")));
        assert_eq!(run.radius, Some(50.0));
        assert_eq!(run.offset, Some(0.5));
        assert_eq!(run.trials, Some(2001));
        assert_eq!(run.report_interval, Some(250));
        assert_eq!(run.render_interval, Some(10));
        assert_eq!(run.seed, Some(7));
        assert!(run.visualize);
        assert_eq!(run.hold_secs, Some(3));
        assert!(run.quiet);
    }
}

#[test]
fn test_parse_check_command() {
    let args = parse(&["pebble-pi", "check", "pebbles.yaml"]);
    assert_eq!(
        args.map(Args::command),
        Some(Command::Check {
            path: PathBuf::from("pebbles.yaml")
        })
    );
}

#[test]
fn test_parse_check_requires_path() {
    assert!(parse(&["pebble-pi", "check"]).is_none());
}

#[test]
fn test_parse_defaults_command() {
    let args = parse(&["pebble-pi", "defaults"]);
    assert_eq!(args.map(Args::command), Some(Command::Defaults));
}

#[test]
fn test_parse_unknown_command() {
    assert!(parse(&["pebble-pi", "unknown-cmd"]).is_none());
}

#[test]
fn test_parse_rejects_non_numeric_trials() {
    assert!(parse(&["pebble-pi", "run", "--trials", "many"]).is_none());
}

#[test]
fn test_parse_rejects_negative_trials() {
    assert!(parse(&["pebble-pi", "run", "--trials", "-5"]).is_none());
}

#[test]
fn test_version_flag_is_handled_by_clap() {
    let err = Args::try_parse_from(["pebble-pi", "--version"]).err();
    assert_eq!(
        err.map(|e| e.kind()),
        Some(clap::error::ErrorKind::DisplayVersion)
    );
}

#[test]
fn test_args_definition_is_consistent() {
    use clap::CommandFactory;
    <Args as CommandFactory>::command().debug_assert();
}

// ============================================================================
// Config resolution tests
// ============================================================================

#[test]
fn test_resolve_defaults() {
    let config = resolve_config(&RunArgs::default()).ok();
    assert_eq!(config, Some(PiConfig::default()));
}

#[test]
fn test_resolve_flags_override_file() {
    let file = write_config("board:\n  radius: 10.0\n  offset: 1.0\nsampling:\n  trial_count: 500\n");
    assert!(file.is_some());
    if let Some(file) = file {
        let args = RunArgs {
            config: Some(file.path().to_path_buf()),
            trials: Some(1001),
            seed: Some(3),
            ..RunArgs::default()
        };
        let config = resolve_config(&args).ok();
        assert_eq!(config.as_ref().map(PiConfig::radius), Some(10.0));
        assert_eq!(config.as_ref().map(PiConfig::offset), Some(1.0));
        assert_eq!(config.as_ref().map(PiConfig::trial_count), Some(1001));
        assert_eq!(config.as_ref().and_then(PiConfig::seed), Some(3));
    }
}

#[test]
fn test_resolve_rejects_offset_beyond_radius() {
    let args = RunArgs {
        radius: Some(1.0),
        offset: Some(2.0),
        ..RunArgs::default()
    };
    let err = resolve_config(&args).err();
    assert!(err.is_some_and(|e| e.is_configuration()));
}

#[test]
fn test_resolve_rejects_zero_trials() {
    let args = RunArgs {
        trials: Some(0),
        ..RunArgs::default()
    };
    assert!(resolve_config(&args).is_err());
}

#[test]
fn test_resolve_missing_file() {
    let args = RunArgs {
        config: Some(PathBuf::from("/nonexistent/pebbles.yaml")),
        ..RunArgs::default()
    };
    assert!(resolve_config(&args).is_err());
}

// ============================================================================
// Run output tests
// ============================================================================

#[test]
fn test_run_with_printer_single_report() {
    let config = PiConfig::builder()
        .radius(100.0)
        .offset(0.0)
        .trials(101)
        .report_interval(100)
        .build();
    assert!(config.is_ok());
    if let Ok(config) = config {
        let mut out = Vec::new();
        let outcome = run_with_printer(&config, SimRng::new(42), &mut out).ok();
        let text = String::from_utf8(out).unwrap_or_default();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2, "output was: {text}");
        assert!(outcome.is_some());
        if let Some(outcome) = outcome {
            assert_eq!(outcome.throws, 100);
            assert_eq!(
                lines[0],
                format!(
                    "Throws: 100, hits: {}, estimate: {:.6}",
                    outcome.hits, outcome.estimate
                )
            );
            assert_eq!(lines[1], format!("Pi is (approx.) {:.6}", outcome.estimate));
        }
    }
}

#[test]
fn test_run_with_printer_report_count() {
    let config = PiConfig::builder().trials(9000).seed(1).build();
    assert!(config.is_ok());
    if let Ok(config) = config {
        let mut out = Vec::new();
        let _ = run_with_printer(&config, SimRng::new(1), &mut out);
        let text = String::from_utf8(out).unwrap_or_default();
        let progress = text.lines().filter(|l| l.starts_with("Throws:")).count();
        // trials 1..=8999, reports at 100..=8900
        assert_eq!(progress, 89);
        assert!(text.lines().last().is_some_and(|l| l.starts_with("Pi is (approx.)")));
    }
}

// ============================================================================
// Board fallback tests
// ============================================================================

/// Board that draws nothing and reports a failure when released.
struct FailingBoard;

impl SimulationObserver for FailingBoard {}

impl BoardSession for FailingBoard {
    fn finish(self) -> PiResult<()> {
        Err(PiError::render("terminal went away"))
    }
}

fn small_config() -> Option<PiConfig> {
    PiConfig::builder()
        .trials(301)
        .report_interval(100)
        .visualize(true)
        .build()
        .ok()
}

#[test]
fn test_board_unavailable_falls_back_to_printer() {
    let config = small_config();
    assert!(config.is_some());
    if let Some(config) = config {
        let board: PiResult<BoardScene> = Err(PiError::render("Failed to enable raw mode"));
        let mut out = Vec::new();
        let outcome = run_on_board(&config, SimRng::new(1), board, &mut out).ok();

        let mut expected = Vec::new();
        let printed = run_with_printer(&config, SimRng::new(1), &mut expected).ok();

        assert!(outcome.is_some());
        assert_eq!(outcome, printed);
        assert_eq!(out, expected);
        let text = String::from_utf8(out).unwrap_or_default();
        assert_eq!(text.lines().filter(|l| l.starts_with("Throws:")).count(), 3);
        assert!(text.lines().last().is_some_and(|l| l.starts_with("Pi is (approx.)")));
    }
}

#[test]
fn test_board_run_prints_only_final_line() {
    let config = small_config();
    assert!(config.is_some());
    if let Some(config) = config {
        let board = Ok(BoardScene::new(config.board));
        let mut out = Vec::new();
        let outcome = run_on_board(&config, SimRng::new(2), board, &mut out).ok();
        let text = String::from_utf8(out).unwrap_or_default();

        assert_eq!(outcome.map(|o| o.throws), Some(300));
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Pi is (approx.)"));
    }
}

#[test]
fn test_board_failure_keeps_estimate() {
    let config = small_config();
    assert!(config.is_some());
    if let Some(config) = config {
        let mut out = Vec::new();
        let outcome = run_on_board(&config, SimRng::new(3), Ok(FailingBoard), &mut out).ok();
        let text = String::from_utf8(out).unwrap_or_default();

        assert!(outcome.is_some());
        if let Some(outcome) = outcome {
            assert_eq!(text.trim_end(), format!("Pi is (approx.) {:.6}", outcome.estimate));
        }
    }
}

// ============================================================================
// Banner tests
// ============================================================================

/// Writer that behaves like a pipe whose reader has exited.
struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_banner_contents() {
    let mut out = Vec::new();
    assert!(write_banner(&mut out, &PiConfig::default(), 42).is_ok());
    let text = String::from_utf8(out).unwrap_or_default();
    assert!(text.starts_with("pebble-pi "));
    assert!(text.contains("radius 100, offset 0.2, 8999 throws, seed 42"));
}

#[test]
fn test_banner_reports_closed_pipe() {
    let err = write_banner(&mut ClosedPipe, &PiConfig::default(), 42).err();
    assert_eq!(err.map(|e| e.kind()), Some(io::ErrorKind::BrokenPipe));
}

#[test]
fn test_printer_reports_closed_pipe() {
    let config = small_config();
    assert!(config.is_some());
    if let Some(config) = config {
        let result = run_with_printer(&config, SimRng::new(4), ClosedPipe);
        assert!(matches!(result, Err(PiError::Io(_))));
    }
}

// ============================================================================
// Check / summary tests
// ============================================================================

#[test]
fn test_check_valid_file() {
    let file = write_config("sampling:\n  trial_count: 301\n");
    assert!(file.is_some());
    if let Some(file) = file {
        assert_eq!(check_config(file.path()), ExitCode::SUCCESS);
    }
}

#[test]
fn test_check_invalid_file() {
    let file = write_config("board:\n  radius: 1.0\n  offset: 1.0\n");
    assert!(file.is_some());
    if let Some(file) = file {
        assert_eq!(check_config(file.path()), ExitCode::from(1));
    }
}

#[test]
fn test_check_report_written_to_writer() {
    let file = write_config("sampling:\n  trial_count: 301\n");
    assert!(file.is_some());
    if let Some(file) = file {
        let mut out = Vec::new();
        let valid = write_check_report(&mut out, file.path()).ok();
        let text = String::from_utf8(out).unwrap_or_default();
        assert_eq!(valid, Some(true));
        assert!(text.contains("301 configured, 300 thrown"));
        assert!(text.contains("Configuration is valid"));
    }
}

#[test]
fn test_check_report_flags_invalid_file() {
    let file = write_config("board:\n  radius: 1.0\n  offset: 1.0\n");
    assert!(file.is_some());
    if let Some(file) = file {
        let mut out = Vec::new();
        assert_eq!(write_check_report(&mut out, file.path()).ok(), Some(false));
        let text = String::from_utf8(out).unwrap_or_default();
        assert!(text.contains("Configuration is invalid"));
    }
}

#[test]
fn test_config_summary_contents() {
    let summary = format_config_summary(&PiConfig::default());
    assert!(summary.contains("Radius:          100"));
    assert!(summary.contains("9000 configured, 8999 thrown"));
    assert!(summary.contains("Visualization:   off"));
    assert!(summary.contains("from entropy"));
}

#[test]
fn test_config_summary_with_visualization_and_seed() {
    let config = PiConfig::builder().visualize(true).seed(42).build();
    let summary = config.map(|c| format_config_summary(&c)).unwrap_or_default();
    assert!(summary.contains("on (redraw every 100, hold 20s)"));
    assert!(summary.contains("Seed:            42"));
}
