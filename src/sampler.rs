//! Pebble sampler: throw, classify, tally, report.
//!
//! # Governing Equations
//!
//! ```text
//! x, y     ~ U[-r, r)               (independent)
//! hit      ⇔ x² + y² ≤ (r - offset)²
//! π̂(n)     = 4 · hits(n) / n
//! ```
//!
//! The offset models the pebble's own size: a pebble whose centre lies
//! within `offset` of the line would overlap it, so it does not count.
//!
//! # Trial indexing
//!
//! Trials are numbered from 1 and the loop stops *before* reaching
//! `trial_count`, so a configuration asking for `N` throws runs `N - 1`.
//! The final estimate is computed from that last index. This matches the
//! long-standing behaviour of the pebble-throwing program and is kept so
//! that published runs stay comparable.

use serde::{Deserialize, Serialize};

use crate::config::{BoardConfig, PiConfig};
use crate::engine::UniformSource;
use crate::error::PiResult;
use crate::estimator::estimate_pi;
use crate::observer::SimulationObserver;

/// A single pebble landing position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl SamplePoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance from the centre of the board.
    #[must_use]
    pub fn distance_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }
}

/// Whether a pebble at `point` counts as inside the circle.
///
/// The boundary is inclusive: with `offset = 0` a point exactly on the
/// circle is a hit.
///
/// Coordinates are rescaled by a power of two close to `1 / radius` before
/// squaring. The rescaling is exact, so the result equals the unscaled
/// comparison whenever that one neither overflows nor underflows, and stays
/// correct for radii where it would.
#[must_use]
pub fn classify(point: SamplePoint, radius: f64, offset: f64) -> bool {
    let scale = unit_scale(radius);
    let effective = (radius - offset) * scale;
    let scaled = SamplePoint::new(point.x * scale, point.y * scale);
    scaled.distance_squared() <= effective * effective
}

/// Power of two that brings a normal `radius` into `[1, 2)`.
#[allow(clippy::cast_possible_truncation)]
fn unit_scale(radius: f64) -> f64 {
    if !radius.is_normal() {
        return 1.0;
    }
    // Normal floats have exponents in [-1022, 1023], so this cannot truncate
    let exponent = radius.abs().log2().floor() as i32;
    2f64.powi(-exponent.clamp(-1022, 1022))
}

/// Running hit/throw counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Index of the last trial thrown (0 before the first).
    pub throws: u64,
    /// Pebbles that landed inside the circle.
    pub hits: u64,
}

impl Tally {
    /// Record one more trial.
    pub fn record(&mut self, hit: bool) {
        self.throws += 1;
        if hit {
            self.hits += 1;
        }
    }

    /// Current estimate, or `None` before the first trial.
    #[must_use]
    pub fn estimate(&self) -> Option<f64> {
        (self.throws > 0).then(|| estimate_pi(self.throws, self.hits))
    }
}

/// One thrown pebble.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// 1-based trial index.
    pub index: u64,
    /// Where the pebble landed.
    pub point: SamplePoint,
    /// Whether it landed inside the circle.
    pub hit: bool,
}

/// Progress snapshot emitted every `report_interval` trials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Trial index at the time of the report.
    pub throws: u64,
    /// Cumulative hits.
    pub hits: u64,
    /// Pi estimate from the cumulative counts.
    pub estimate: f64,
}

impl ProgressReport {
    fn from_tally(tally: &Tally) -> Self {
        Self {
            throws: tally.throws,
            hits: tally.hits,
            estimate: estimate_pi(tally.throws, tally.hits),
        }
    }
}

/// Result of a complete run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Last trial index reached.
    pub throws: u64,
    /// Final hit count.
    pub hits: u64,
    /// Final Pi estimate.
    pub estimate: f64,
    /// Number of progress reports emitted.
    pub reports: u64,
}

/// Stepwise pebble-throwing simulation.
///
/// Owns the tally for the duration of one run. Borrow a seeded
/// [`crate::engine::SimRng`] (or any other [`UniformSource`]) as `source`.
#[derive(Debug)]
pub struct PiSimulation<S> {
    board: BoardConfig,
    trial_count: u64,
    report_interval: u64,
    render_interval: u64,
    source: S,
    tally: Tally,
    reports: u64,
}

impl<S: UniformSource> PiSimulation<S> {
    /// Create a simulation for a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration violates any constraint; no
    /// pebble is thrown in that case.
    pub fn new(config: &PiConfig, source: S) -> PiResult<Self> {
        config.check()?;
        Ok(Self {
            board: config.board,
            trial_count: config.trial_count(),
            report_interval: config.report_interval(),
            render_interval: config.render_interval(),
            source,
            tally: Tally::default(),
            reports: 0,
        })
    }

    /// Current tally.
    #[must_use]
    pub const fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Board geometry in use.
    #[must_use]
    pub const fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Whether every trial has been thrown.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.tally.throws + 1 >= self.trial_count
    }

    /// Throw a single pebble without notifying anyone.
    ///
    /// Returns `None` once the run is complete.
    pub fn throw_pebble(&mut self) -> Option<Trial> {
        if self.is_complete() {
            return None;
        }

        let radius = self.board.radius;
        let x = self.source.uniform(-radius, radius);
        let y = self.source.uniform(-radius, radius);
        let point = SamplePoint::new(x, y);
        let hit = classify(point, radius, self.board.offset);

        self.tally.record(hit);
        Some(Trial {
            index: self.tally.throws,
            point,
            hit,
        })
    }

    /// Throw one pebble and drive the observer's per-trial hooks.
    pub fn step<O: SimulationObserver + ?Sized>(&mut self, observer: &mut O) -> Option<Trial> {
        let trial = self.throw_pebble()?;
        observer.on_sample(&trial, &self.tally);

        if trial.index % self.render_interval == 0 {
            observer.on_frame(&self.tally);
        }

        if trial.index % self.report_interval == 0 {
            let report = ProgressReport::from_tally(&self.tally);
            self.reports += 1;
            observer.on_report(&report);
        }

        Some(trial)
    }

    /// Throw every remaining pebble and return the final outcome.
    pub fn run<O: SimulationObserver + ?Sized>(&mut self, observer: &mut O) -> SimulationOutcome {
        if self.tally.throws == 0 {
            observer.on_start(&self.board);
        }

        while self.step(observer).is_some() {}

        let outcome = self.outcome();
        log::info!(
            "finished {} throws, {} hits, estimate {:.6}",
            outcome.throws,
            outcome.hits,
            outcome.estimate
        );
        observer.on_complete(&outcome);
        outcome
    }

    /// Outcome from the current tally.
    fn outcome(&self) -> SimulationOutcome {
        SimulationOutcome {
            throws: self.tally.throws,
            hits: self.tally.hits,
            estimate: estimate_pi(self.tally.throws, self.tally.hits),
            reports: self.reports,
        }
    }
}

/// Run a complete simulation.
///
/// # Errors
///
/// Returns error if the configuration is invalid. Validation happens before
/// any randomness is drawn.
///
/// # Seeding
///
/// Every draw comes from `source`; the configuration's seed is not read
/// here. Use [`crate::engine::SimRng::for_config`] to build a source that
/// honours it.
///
/// # Example
///
/// ```rust
/// use pebble_pi::prelude::*;
///
/// let config = PiConfig::builder().trials(1001).seed(42).build()?;
/// let mut rng = SimRng::for_config(&config);
/// let outcome = run_simulation(&config, &mut rng, &mut NullObserver)?;
/// assert_eq!(outcome.throws, 1000);
/// # Ok::<(), pebble_pi::PiError>(())
/// ```
pub fn run_simulation<S, O>(
    config: &PiConfig,
    source: S,
    observer: &mut O,
) -> PiResult<SimulationOutcome>
where
    S: UniformSource,
    O: SimulationObserver + ?Sized,
{
    log::debug!(
        "throwing {} pebbles at radius {} (offset {})",
        config.effective_trials(),
        config.radius(),
        config.offset()
    );
    let mut simulation = PiSimulation::new(config, source)?;
    Ok(simulation.run(observer))
}
