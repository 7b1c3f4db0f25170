//! Random sources for pebble throwing.
//!
//! The sampler never touches process-global randomness. It draws through
//! the [`UniformSource`] trait, which the seeded PCG generator [`SimRng`]
//! implements for real runs and [`SequenceSource`] implements for scripted
//! runs.

use rand::prelude::*;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::config::PiConfig;

/// A source of uniform draws in the unit interval.
pub trait UniformSource {
    /// Draw the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Draw a value uniformly from `[min, max)`.
    fn uniform(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next_unit()
    }
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Seeded PCG generator.
///
/// Two generators built from the same seed yield bitwise-identical
/// sequences on every platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimRng {
    /// Seed the generator was built from.
    master_seed: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl SimRng {
    /// Create a new RNG with the given master seed.
    #[must_use]
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            rng: Pcg64::seed_from_u64(master_seed),
        }
    }

    /// Create an RNG from a seed drawn from the operating system.
    ///
    /// The drawn seed stays available through [`SimRng::master_seed`] so
    /// an interesting run can be repeated.
    #[must_use]
    pub fn from_entropy() -> Self {
        let seed: u64 = rand::thread_rng().gen();
        log::debug!("drew master seed {seed} from entropy");
        Self::new(seed)
    }

    /// RNG for a configuration: its `reproducibility.seed` when set,
    /// otherwise a seed drawn from the operating system.
    #[must_use]
    pub fn for_config(config: &PiConfig) -> Self {
        config.seed().map_or_else(Self::from_entropy, Self::new)
    }

    /// Get the master seed.
    #[must_use]
    pub const fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

}

impl UniformSource for SimRng {
    fn next_unit(&mut self) -> f64 {
        self.gen_f64()
    }
}

/// Replays a fixed list of unit draws, cycling when exhausted.
///
/// Values are taken as given, so `1.0` is accepted and maps to the upper
/// edge of a range. An empty list always yields `0.5`, the centre.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Create a source replaying `values` in order.
    #[must_use]
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of draws taken so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.5;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
