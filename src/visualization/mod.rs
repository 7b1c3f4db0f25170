//! Board visualization.
//!
//! The sampler's draw events are turned into a platform-agnostic list of
//! [`RenderCommand`]s by [`BoardScene`]. A backend only has to paint those
//! commands:
//! - TUI board: ratatui canvas (feature `tui`)
//!
//! Nothing in here feeds back into the estimate.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::BoardConfig;
use crate::error::PiResult;
use crate::observer::{format_progress, SimulationObserver};
use crate::sampler::{ProgressReport, SamplePoint, SimulationOutcome, Tally, Trial};

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "tui")]
pub use tui::{draw_board, BoardTui};

/// A board that holds an output device for the length of one run.
pub trait BoardSession: SimulationObserver {
    /// Release the device, returning the first error hit while drawing.
    ///
    /// # Errors
    ///
    /// Returns the first render error, if any.
    fn finish(self) -> PiResult<()>;
}

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create new color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Pebble inside the circle.
    pub const HIT: Self = Self::RED;
    /// Pebble outside the circle.
    pub const MISS: Self = Self::GREEN;
}

/// Platform-agnostic render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Axis-aligned rectangle outline; `(x, y)` is the bottom-left corner.
    DrawRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },

    /// Circle outline.
    DrawCircle {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },

    /// One pebble.
    DrawMarker {
        x: f64,
        y: f64,
        radius: f64,
        color: Color,
    },
}

/// A pebble as drawn on the board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Landing position.
    pub point: SamplePoint,
    /// Classification.
    pub hit: bool,
}

impl Marker {
    /// Color for this marker.
    #[must_use]
    pub const fn color(&self) -> Color {
        if self.hit {
            Color::HIT
        } else {
            Color::MISS
        }
    }
}

/// Accumulated board state, independent of any terminal.
#[derive(Debug, Clone)]
pub struct BoardScene {
    board: BoardConfig,
    markers: VecDeque<Marker>,
    marker_limit: Option<usize>,
    tally: Tally,
    last_report: Option<ProgressReport>,
    outcome: Option<SimulationOutcome>,
}

impl Default for BoardScene {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl BoardScene {
    /// Empty scene for a board.
    #[must_use]
    pub fn new(board: BoardConfig) -> Self {
        Self {
            board,
            markers: VecDeque::new(),
            marker_limit: None,
            tally: Tally::default(),
            last_report: None,
            outcome: None,
        }
    }

    /// Keep only the most recent `limit` markers.
    #[must_use]
    pub fn with_marker_limit(mut self, limit: usize) -> Self {
        self.marker_limit = Some(limit);
        self.trim();
        self
    }

    /// Board geometry.
    #[must_use]
    pub const fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Markers currently on the board, oldest first.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Number of markers currently kept.
    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Tally as of the last sample.
    #[must_use]
    pub const fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Most recent progress report.
    #[must_use]
    pub const fn last_report(&self) -> Option<&ProgressReport> {
        self.last_report.as_ref()
    }

    /// Whether the run has finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.outcome.is_some()
    }

    /// Add a pebble.
    pub fn push(&mut self, marker: Marker) {
        self.markers.push_back(marker);
        self.trim();
    }

    fn trim(&mut self) {
        if let Some(limit) = self.marker_limit {
            while self.markers.len() > limit {
                self.markers.pop_front();
            }
        }
    }

    /// Commands that draw the whole scene: square, circle, then pebbles.
    #[must_use]
    pub fn render_commands(&self) -> Vec<RenderCommand> {
        let r = self.board.radius;
        let mut commands = Vec::with_capacity(self.markers.len() + 2);

        commands.push(RenderCommand::DrawRect {
            x: -r,
            y: -r,
            width: 2.0 * r,
            height: 2.0 * r,
            color: Color::WHITE,
        });
        commands.push(RenderCommand::DrawCircle {
            x: 0.0,
            y: 0.0,
            radius: r,
            color: Color::BLUE,
        });

        commands.extend(self.markers.iter().map(|m| RenderCommand::DrawMarker {
            x: m.point.x,
            y: m.point.y,
            radius: self.board.offset,
            color: m.color(),
        }));

        commands
    }

    /// One-line status for the side panel.
    #[must_use]
    pub fn status_line(&self) -> String {
        if let Some(outcome) = &self.outcome {
            return crate::observer::format_final(outcome);
        }
        match self.tally.estimate() {
            Some(estimate) => format_progress(&ProgressReport {
                throws: self.tally.throws,
                hits: self.tally.hits,
                estimate,
            }),
            None => "Waiting for the first pebble...".to_string(),
        }
    }
}

impl SimulationObserver for BoardScene {
    fn on_start(&mut self, board: &BoardConfig) {
        self.board = *board;
        self.markers.clear();
        self.tally = Tally::default();
        self.last_report = None;
        self.outcome = None;
    }

    fn on_sample(&mut self, trial: &Trial, tally: &Tally) {
        self.push(Marker {
            point: trial.point,
            hit: trial.hit,
        });
        self.tally = *tally;
    }

    fn on_report(&mut self, report: &ProgressReport) {
        self.last_report = Some(*report);
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        self.outcome = Some(*outcome);
    }
}

impl BoardSession for BoardScene {
    fn finish(self) -> PiResult<()> {
        Ok(())
    }
}
