//! Pi estimator.
//!
//! # Governing Equation
//!
//! ```text
//! P(hit)  = (π r²) / (2r)² = π / 4
//! π̂       = 4 · hits / throws
//! ```
//!
//! The ratio is recomputed from the cumulative counts at every call; there
//! is no running average to drift.

/// Estimate Pi from the number of throws and the number of hits.
///
/// `hits <= throws` is checked in debug builds only; in release builds an
/// inconsistent pair yields a meaningless but finite value.
///
/// # Panics
///
/// Panics if `throws == 0`. Estimating before any trial has landed is a
/// caller bug, not a recoverable condition.
///
/// # Example
///
/// ```rust
/// use pebble_pi::estimator::estimate_pi;
///
/// assert_eq!(estimate_pi(100, 79), 3.16);
/// ```
#[must_use]
pub fn estimate_pi(throws: u64, hits: u64) -> f64 {
    assert!(throws > 0, "estimate_pi requires at least one throw");
    debug_assert!(hits <= throws, "hits ({hits}) exceed throws ({throws})");
    4.0 * hits as f64 / throws as f64
}

/// Absolute error of an estimate against the true value of Pi.
#[must_use]
pub fn absolute_error(estimate: f64) -> f64 {
    (estimate - std::f64::consts::PI).abs()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn throws_and_hits() -> impl Strategy<Value = (u64, u64)> {
        (1u64..=u64::MAX).prop_flat_map(|throws| (Just(throws), 0..=throws))
    }

    proptest! {
        /// The estimate is exactly the closed-form ratio.
        #[test]
        fn prop_closed_form((throws, hits) in throws_and_hits()) {
            let expected = 4.0 * hits as f64 / throws as f64;
            prop_assert_eq!(estimate_pi(throws, hits).to_bits(), expected.to_bits());
        }

        #[test]
        fn prop_zero_hits(throws in 1u64..=u64::MAX) {
            prop_assert_eq!(estimate_pi(throws, 0), 0.0);
        }

        #[test]
        fn prop_all_hits(throws in 1u64..=u64::MAX) {
            prop_assert_eq!(estimate_pi(throws, throws), 4.0);
        }

        #[test]
        fn prop_bounded((throws, hits) in throws_and_hits()) {
            let estimate = estimate_pi(throws, hits);
            prop_assert!((0.0..=4.0).contains(&estimate));
        }
    }
}
