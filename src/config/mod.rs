//! Configuration system with YAML schema and validation.
//!
//! Parameters are fixed before the first pebble is thrown. A configuration
//! goes through three gates:
//! - serde: unknown keys and wrong types are rejected on load
//! - `validator`: per-field ranges
//! - semantic checks: cross-field constraints such as `offset < radius`
//!
//! # YAML Example
//!
//! ```yaml
//! board:
//!   radius: 100.0
//!   offset: 0.2
//! sampling:
//!   trial_count: 9000
//!   report_interval: 100
//! reproducibility:
//!   seed: 42
//! visualization:
//!   enabled: true
//!   render_interval: 100
//!   hold_secs: 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{PiError, PiResult};

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PiConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Geometry of the circle drawn in the sand.
    #[validate(nested)]
    #[serde(default)]
    pub board: BoardConfig,

    /// How many pebbles to throw and how often to report.
    #[validate(nested)]
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Seeding of the random source.
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Optional terminal rendering.
    #[validate(nested)]
    #[serde(default)]
    pub visualization: VisualizationConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl PiConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> PiResult<Self> {
        let path = path.as_ref();
        log::debug!("loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> PiResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize the configuration back to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> PiResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> PiConfigBuilder {
        PiConfigBuilder::default()
    }

    /// Run field and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self) -> PiResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> PiResult<()> {
        let BoardConfig { radius, offset } = self.board;

        if !radius.is_finite() {
            return Err(PiError::config(format!(
                "radius must be finite, got {radius}"
            )));
        }
        // Draws span [-radius, radius), so the diameter must be representable
        if !radius.is_normal() || !(2.0 * radius).is_finite() {
            return Err(PiError::config(format!(
                "radius must be a normal float with a finite diameter, got {radius}"
            )));
        }
        if !offset.is_finite() {
            return Err(PiError::config(format!(
                "offset must be finite, got {offset}"
            )));
        }
        if offset >= radius {
            return Err(PiError::config(format!(
                "offset ({offset}) must be smaller than radius ({radius})"
            )));
        }

        // The loop runs trial_count - 1 times; at least one trial must land.
        if self.sampling.trial_count < 2 {
            return Err(PiError::config(format!(
                "trial_count must be at least 2 (trials run from 1 to trial_count - 1), got {}",
                self.sampling.trial_count
            )));
        }

        Ok(())
    }

    /// Circle radius and half-width of the sampling square.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.board.radius
    }

    /// Pebble size subtracted from the radius when classifying.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.board.offset
    }

    /// Configured throw count. The loop stops one short of it.
    #[must_use]
    pub const fn trial_count(&self) -> u64 {
        self.sampling.trial_count
    }

    /// Number of trials actually thrown.
    #[must_use]
    pub const fn effective_trials(&self) -> u64 {
        self.sampling.trial_count.saturating_sub(1)
    }

    /// Progress-report cadence in trials.
    #[must_use]
    pub const fn report_interval(&self) -> u64 {
        self.sampling.report_interval
    }

    /// Display-refresh cadence in trials.
    #[must_use]
    pub const fn render_interval(&self) -> u64 {
        self.visualization.render_interval
    }

    /// Whether the terminal board should be drawn.
    #[must_use]
    pub const fn enable_visualization(&self) -> bool {
        self.visualization.enabled
    }

    /// Fixed seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.reproducibility.seed
    }
}

impl Default for PiConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            board: BoardConfig::default(),
            sampling: SamplingConfig::default(),
            reproducibility: ReproducibilityConfig::default(),
            visualization: VisualizationConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct PiConfigBuilder {
    radius: Option<f64>,
    offset: Option<f64>,
    trials: Option<u64>,
    report_interval: Option<u64>,
    render_interval: Option<u64>,
    visualize: Option<bool>,
    hold_secs: Option<u64>,
    seed: Option<u64>,
}

impl PiConfigBuilder {
    /// Start from an existing configuration instead of the defaults.
    #[must_use]
    pub fn from_config(config: &PiConfig) -> Self {
        Self {
            radius: Some(config.board.radius),
            offset: Some(config.board.offset),
            trials: Some(config.sampling.trial_count),
            report_interval: Some(config.sampling.report_interval),
            render_interval: Some(config.visualization.render_interval),
            visualize: Some(config.visualization.enabled),
            hold_secs: Some(config.visualization.hold_secs),
            seed: config.reproducibility.seed,
        }
    }

    /// Set the circle radius.
    #[must_use]
    pub const fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the pebble offset.
    #[must_use]
    pub const fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the configured throw count.
    #[must_use]
    pub const fn trials(mut self, trials: u64) -> Self {
        self.trials = Some(trials);
        self
    }

    /// Set the progress-report cadence.
    #[must_use]
    pub const fn report_interval(mut self, interval: u64) -> Self {
        self.report_interval = Some(interval);
        self
    }

    /// Set the display-refresh cadence.
    #[must_use]
    pub const fn render_interval(mut self, interval: u64) -> Self {
        self.render_interval = Some(interval);
        self
    }

    /// Enable or disable the terminal board.
    #[must_use]
    pub const fn visualize(mut self, enabled: bool) -> Self {
        self.visualize = Some(enabled);
        self
    }

    /// Set how long the finished board stays on screen.
    #[must_use]
    pub const fn hold_secs(mut self, secs: u64) -> Self {
        self.hold_secs = Some(secs);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if any parameter is out of range.
    pub fn build(self) -> PiResult<PiConfig> {
        let mut config = PiConfig::default();

        if let Some(radius) = self.radius {
            config.board.radius = radius;
        }
        if let Some(offset) = self.offset {
            config.board.offset = offset;
        }
        if let Some(trials) = self.trials {
            config.sampling.trial_count = trials;
        }
        if let Some(interval) = self.report_interval {
            config.sampling.report_interval = interval;
        }
        if let Some(interval) = self.render_interval {
            config.visualization.render_interval = interval;
        }
        if let Some(enabled) = self.visualize {
            config.visualization.enabled = enabled;
        }
        if let Some(secs) = self.hold_secs {
            config.visualization.hold_secs = secs;
        }
        if self.seed.is_some() {
            config.reproducibility.seed = self.seed;
        }

        config.check()?;
        Ok(config)
    }
}

/// Board geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    /// Circle radius, also the half-width of the square.
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Pebble radius; shrinks the effective circle.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_offset")]
    pub offset: f64,
}

const fn default_radius() -> f64 {
    100.0
}

const fn default_offset() -> f64 {
    0.2
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            offset: default_offset(),
        }
    }
}

/// Sampling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SamplingConfig {
    /// Configured throw count; trials run from 1 to `trial_count - 1`.
    #[validate(range(min = 1))]
    #[serde(default = "default_trial_count")]
    pub trial_count: u64,
    /// Print a progress line every this many trials.
    #[validate(range(min = 1))]
    #[serde(default = "default_interval")]
    pub report_interval: u64,
}

const fn default_trial_count() -> u64 {
    9000
}

const fn default_interval() -> u64 {
    100
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            trial_count: default_trial_count(),
            report_interval: default_interval(),
        }
    }
}

/// Reproducibility settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReproducibilityConfig {
    /// Master seed; drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Terminal visualization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct VisualizationConfig {
    /// Whether the board is drawn.
    #[serde(default)]
    pub enabled: bool,
    /// Redraw every this many trials.
    #[validate(range(min = 1))]
    #[serde(default = "default_interval")]
    pub render_interval: u64,
    /// Seconds the finished board stays on screen.
    #[serde(default = "default_hold_secs")]
    pub hold_secs: u64,
}

const fn default_hold_secs() -> u64 {
    20
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            render_interval: default_interval(),
            hold_secs: default_hold_secs(),
        }
    }
}
