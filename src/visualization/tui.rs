//! Terminal board for pebble-pi.
//!
//! Draws the square, the circle and every pebble on a ratatui canvas.
//!
//! This module is only available with the `tui` feature.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color as TermColor, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Circle, Points, Rectangle},
        Block, Borders, Paragraph, Wrap,
    },
    Frame, Terminal,
};

use super::{BoardScene, BoardSession, Color, RenderCommand};
use crate::config::BoardConfig;
use crate::error::{PiError, PiResult};
use crate::observer::SimulationObserver;
use crate::sampler::{ProgressReport, SimulationOutcome, Tally, Trial};

/// Markers kept on screen; older pebbles scroll off.
const DEFAULT_MARKER_LIMIT: usize = 200_000;

/// Poll granularity while holding the finished board.
const HOLD_POLL: Duration = Duration::from_millis(100);

impl From<Color> for TermColor {
    fn from(c: Color) -> Self {
        Self::Rgb(c.r, c.g, c.b)
    }
}

/// Terminal board that redraws on every frame event.
///
/// Terminal failures never stop the sampler: the first error is kept, the
/// board stops drawing, and [`BoardTui::finish`] hands the error back.
pub struct BoardTui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    scene: BoardScene,
    hold: Duration,
    error: Option<PiError>,
}

impl BoardTui {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns error if terminal initialization fails.
    pub fn new(board: BoardConfig, hold: Duration) -> PiResult<Self> {
        enable_raw_mode().map_err(|e| PiError::render(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(PiError::render(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = match Terminal::new(backend) {
            Ok(t) => t,
            Err(e) => {
                restore_terminal();
                return Err(PiError::render(format!("Failed to create terminal: {e}")));
            }
        };

        Ok(Self {
            terminal,
            scene: BoardScene::new(board).with_marker_limit(DEFAULT_MARKER_LIMIT),
            hold,
            error: None,
        })
    }

    /// Scene being drawn.
    #[must_use]
    pub const fn scene(&self) -> &BoardScene {
        &self.scene
    }

    /// Release the terminal, returning the first render error if any.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while drawing.
    pub fn finish(mut self) -> PiResult<()> {
        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Render the board.
    ///
    /// # Errors
    ///
    /// Returns error if rendering fails.
    pub fn render(&mut self) -> PiResult<()> {
        let scene = &self.scene;
        self.terminal
            .draw(|frame| draw_board(frame, scene))
            .map_err(|e| PiError::render(format!("Render failed: {e}")))?;

        Ok(())
    }

    /// Keep the finished board on screen until `hold` elapses or a key is pressed.
    ///
    /// # Errors
    ///
    /// Returns error if terminal events cannot be read.
    pub fn hold(&mut self) -> PiResult<()> {
        let deadline = Instant::now() + self.hold;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            let wait = (deadline - now).min(HOLD_POLL);
            if event::poll(wait)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn record(&mut self, result: PiResult<()>) {
        if let Err(e) = result {
            log::warn!("board rendering stopped: {e}");
            self.error = Some(e);
        }
    }
}

impl std::fmt::Debug for BoardTui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardTui")
            .field("scene", &self.scene)
            .field("hold", &self.hold)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl SimulationObserver for BoardTui {
    fn on_start(&mut self, board: &BoardConfig) {
        self.scene.on_start(board);
        if self.error.is_none() {
            let result = self.render();
            self.record(result);
        }
    }

    fn on_sample(&mut self, trial: &Trial, tally: &Tally) {
        self.scene.on_sample(trial, tally);
    }

    fn on_frame(&mut self, _tally: &Tally) {
        if self.error.is_none() {
            let result = self.render();
            self.record(result);
        }
    }

    fn on_report(&mut self, report: &ProgressReport) {
        self.scene.on_report(report);
    }

    fn on_complete(&mut self, outcome: &SimulationOutcome) {
        self.scene.on_complete(outcome);
        if self.error.is_none() {
            let result = self.render().and_then(|()| self.hold());
            self.record(result);
        }
    }
}

impl BoardSession for BoardTui {
    fn finish(self) -> PiResult<()> {
        Self::finish(self)
    }
}

impl Drop for BoardTui {
    fn drop(&mut self) {
        restore_terminal();
        let _ = self.terminal.show_cursor();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Draw the board canvas and the estimate panel into one frame.
pub fn draw_board(frame: &mut Frame<'_>, scene: &BoardScene) {
    let commands = scene.render_commands();
    let radius = scene.board().radius;
    let done = scene.is_complete();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(frame.area());

    let board = Canvas::default()
        .block(
            Block::default()
                .title(" Pebbles ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(TermColor::Cyan)),
        )
        .marker(Marker::Braille)
        .x_bounds([-radius, radius])
        .y_bounds([-radius, radius])
        .paint(|ctx| paint_commands(ctx, &commands));
    frame.render_widget(board, chunks[0]);

    let footer = if done { "\n\n[any key] Quit" } else { "" };
    let panel = Paragraph::new(format!("{}{footer}", scene.status_line()))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Estimate ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if done {
                    TermColor::Green
                } else {
                    TermColor::Yellow
                })),
        )
        .style(Style::default().fg(TermColor::White));
    frame.render_widget(panel, chunks[1]);
}

/// Paint render commands onto a canvas context.
fn paint_commands(ctx: &mut ratatui::widgets::canvas::Context<'_>, commands: &[RenderCommand]) {
    let (hits, misses) = split_markers(commands);

    for command in commands {
        match *command {
            RenderCommand::DrawRect {
                x,
                y,
                width,
                height,
                color,
            } => ctx.draw(&Rectangle {
                x,
                y,
                width,
                height,
                color: color.into(),
            }),
            RenderCommand::DrawCircle {
                x,
                y,
                radius,
                color,
            } => ctx.draw(&Circle {
                x,
                y,
                radius,
                color: color.into(),
            }),
            RenderCommand::DrawMarker { .. } => {}
        }
    }

    ctx.draw(&Points {
        coords: &misses,
        color: Color::MISS.into(),
    });
    ctx.draw(&Points {
        coords: &hits,
        color: Color::HIT.into(),
    });
}

/// Split marker commands into (hit, miss) coordinate lists.
fn split_markers(commands: &[RenderCommand]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut hits = Vec::new();
    let mut misses = Vec::new();
    for command in commands {
        if let RenderCommand::DrawMarker { x, y, color, .. } = *command {
            if color == Color::HIT {
                hits.push((x, y));
            } else {
                misses.push((x, y));
            }
        }
    }
    (hits, misses)
}
