//! Randomness plumbing for the sampler.
//!
//! The sampler owns no generator of its own; callers hand it anything that
//! implements [`UniformSource`].

pub mod rng;

pub use rng::{SequenceSource, SimRng, UniformSource};
