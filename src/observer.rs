//! Event sinks for the sampler.
//!
//! The sampling loop knows nothing about terminals or printing. Everything
//! it wants to say goes through [`SimulationObserver`], whose hooks all
//! default to doing nothing. Observers compose as tuples: `(a, b)` forwards
//! every event to `a` and then `b`.

use std::io::{self, Write};

use crate::config::BoardConfig;
use crate::sampler::{ProgressReport, SimulationOutcome, Tally, Trial};

/// Receiver of simulation events.
///
/// Hooks are called synchronously from the sampling loop. None of them can
/// influence the estimate.
pub trait SimulationObserver {
    /// The board is laid out, before the first throw.
    fn on_start(&mut self, _board: &BoardConfig) {}

    /// A pebble landed. `tally` already includes it.
    fn on_sample(&mut self, _trial: &Trial, _tally: &Tally) {}

    /// Render cadence reached.
    fn on_frame(&mut self, _tally: &Tally) {}

    /// Report cadence reached.
    fn on_report(&mut self, _report: &ProgressReport) {}

    /// All trials thrown.
    fn on_complete(&mut self, _outcome: &SimulationOutcome) {}
}

impl<T: SimulationObserver + ?Sized> SimulationObserver for &mut T {
    fn on_start(&mut self, board: &BoardConfig) {
        (**self).on_start(board);
    }

    fn on_sample(&mut self, trial: &Trial, tally: &Tally) {
        (**self).on_sample(trial, tally);
    }

    fn on_frame(&mut self, tally: &Tally) {
        (**self).on_frame(tally);
    }

    fn on_report(&mut self, report: &ProgressReport) {
        (**self).on_report(report);
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        (**self).on_complete(outcome);
    }
}

impl<A: SimulationObserver, B: SimulationObserver> SimulationObserver for (A, B) {
    fn on_start(&mut self, board: &BoardConfig) {
        self.0.on_start(board);
        self.1.on_start(board);
    }

    fn on_sample(&mut self, trial: &Trial, tally: &Tally) {
        self.0.on_sample(trial, tally);
        self.1.on_sample(trial, tally);
    }

    fn on_frame(&mut self, tally: &Tally) {
        self.0.on_frame(tally);
        self.1.on_frame(tally);
    }

    fn on_report(&mut self, report: &ProgressReport) {
        self.0.on_report(report);
        self.1.on_report(report);
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        self.0.on_complete(outcome);
        self.1.on_complete(outcome);
    }
}

impl<O: SimulationObserver> SimulationObserver for Option<O> {
    fn on_start(&mut self, board: &BoardConfig) {
        if let Some(inner) = self {
            inner.on_start(board);
        }
    }

    fn on_sample(&mut self, trial: &Trial, tally: &Tally) {
        if let Some(inner) = self {
            inner.on_sample(trial, tally);
        }
    }

    fn on_frame(&mut self, tally: &Tally) {
        if let Some(inner) = self {
            inner.on_frame(tally);
        }
    }

    fn on_report(&mut self, report: &ProgressReport) {
        if let Some(inner) = self {
            inner.on_report(report);
        }
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        if let Some(inner) = self {
            inner.on_complete(outcome);
        }
    }
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SimulationObserver for NullObserver {}

/// Format a progress line.
#[must_use]
pub fn format_progress(report: &ProgressReport) -> String {
    format!(
        "Throws: {}, hits: {}, estimate: {:.6}",
        report.throws, report.hits, report.estimate
    )
}

/// Format the final line.
#[must_use]
pub fn format_final(outcome: &SimulationOutcome) -> String {
    format!("Pi is (approx.) {:.6}", outcome.estimate)
}

/// Writes progress and final lines to any writer.
///
/// A failed write is remembered and the printer goes quiet; sampling
/// carries on regardless.
#[derive(Debug)]
pub struct ProgressPrinter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl ProgressPrinter<io::Stdout> {
    /// Printer writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressPrinter<W> {
    /// Create a printer over `out`.
    #[must_use]
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// First write error, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    /// Consume the printer, returning the writer or the first write error.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit while printing.
    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            log::warn!("progress output failed: {e}");
            self.error = Some(e);
        }
    }
}

impl<W: Write> SimulationObserver for ProgressPrinter<W> {
    fn on_report(&mut self, report: &ProgressReport) {
        self.emit(&format_progress(report));
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        self.emit(&format_final(outcome));
    }
}

/// Boxed sample callback.
pub type SampleFn<'a> = Box<dyn FnMut(&Trial) + 'a>;

/// Boxed report callback.
pub type ReportFn<'a> = Box<dyn FnMut(&ProgressReport) + 'a>;

/// Observer built from optional closures.
#[derive(Default)]
pub struct CallbackObserver<'a> {
    on_sample: Option<SampleFn<'a>>,
    on_report: Option<ReportFn<'a>>,
}

impl<'a> CallbackObserver<'a> {
    /// Observer with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `f` for every pebble.
    #[must_use]
    pub fn with_sample(mut self, f: impl FnMut(&Trial) + 'a) -> Self {
        self.on_sample = Some(Box::new(f));
        self
    }

    /// Call `f` for every progress report.
    #[must_use]
    pub fn with_report(mut self, f: impl FnMut(&ProgressReport) + 'a) -> Self {
        self.on_report = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for CallbackObserver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackObserver")
            .field("on_sample", &self.on_sample.is_some())
            .field("on_report", &self.on_report.is_some())
            .finish()
    }
}

impl SimulationObserver for CallbackObserver<'_> {
    fn on_sample(&mut self, trial: &Trial, _tally: &Tally) {
        if let Some(f) = self.on_sample.as_mut() {
            f(trial);
        }
    }

    fn on_report(&mut self, report: &ProgressReport) {
        if let Some(f) = self.on_report.as_mut() {
            f(report);
        }
    }
}

/// Records everything it sees.
#[derive(Debug, Clone, Default)]
pub struct TallyRecorder {
    /// Board passed to `on_start`.
    pub board: Option<BoardConfig>,
    /// Every trial, in order.
    pub trials: Vec<Trial>,
    /// Tally after each trial.
    pub tallies: Vec<Tally>,
    /// Every progress report.
    pub reports: Vec<ProgressReport>,
    /// Number of frame events.
    pub frames: u64,
    /// Final outcome.
    pub outcome: Option<SimulationOutcome>,
}

impl TallyRecorder {
    /// Hit/miss classification of every trial.
    #[must_use]
    pub fn hit_sequence(&self) -> Vec<bool> {
        self.trials.iter().map(|t| t.hit).collect()
    }
}

impl SimulationObserver for TallyRecorder {
    fn on_start(&mut self, board: &BoardConfig) {
        self.board = Some(*board);
    }

    fn on_sample(&mut self, trial: &Trial, tally: &Tally) {
        self.trials.push(*trial);
        self.tallies.push(*tally);
    }

    fn on_frame(&mut self, _tally: &Tally) {
        self.frames += 1;
    }

    fn on_report(&mut self, report: &ProgressReport) {
        self.reports.push(*report);
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        self.outcome = Some(*outcome);
    }
}
