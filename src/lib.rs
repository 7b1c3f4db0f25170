//! # pebble-pi
//!
//! Estimate π by throwing pebbles at a circle drawn in the sand.
//!
//! Pebbles land uniformly inside the square that bounds the circle. The
//! fraction landing inside the circle approaches `π/4`, so
//! `π ≈ 4 · hits / throws`.
//!
//! - [`estimator`]: the closed-form estimate
//! - [`sampler`]: the throwing loop, driven by an injected random source
//! - [`observer`]: progress printing and other event sinks
//! - [`visualization`]: the optional board renderer
//!
//! ## Example
//!
//! ```rust
//! use pebble_pi::prelude::*;
//!
//! let config = PiConfig::builder().radius(100.0).offset(0.0).trials(10_001).build()?;
//! let outcome = run_simulation(&config, SimRng::new(42), &mut NullObserver)?;
//! assert!((outcome.estimate - std::f64::consts::PI).abs() < 0.2);
//! # Ok::<(), pebble_pi::PiError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_precision_loss,
    clippy::missing_const_for_fn,
    clippy::float_cmp, // Exact estimates are part of the contract
)]

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod observer;
pub mod sampler;
pub mod visualization;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{PiConfig, PiConfigBuilder};
    pub use crate::engine::{SequenceSource, SimRng, UniformSource};
    pub use crate::error::{PiError, PiResult};
    pub use crate::estimator::estimate_pi;
    pub use crate::observer::{
        CallbackObserver, NullObserver, ProgressPrinter, SimulationObserver, TallyRecorder,
    };
    pub use crate::sampler::{
        classify, run_simulation, PiSimulation, ProgressReport, SamplePoint, SimulationOutcome,
        Tally, Trial,
    };
}

/// Re-export for public API
pub use error::{PiError, PiResult};
