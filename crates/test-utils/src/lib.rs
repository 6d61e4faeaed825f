//! Shared test utilities for the pp-packing workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic field generators with missing data
//! - Common test fixtures
//! - Approximate equality assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures, create_temperature_grid};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro asserting two fields agree point by point.
///
/// Points where the expected value is the missing data indicator must match
/// it exactly; every other point must be within `epsilon`.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_field_approx_eq;
///
/// assert_field_approx_eq!(grid.as_slice(), &expected, mdi, 1.0 / 128.0);
/// ```
#[macro_export]
macro_rules! assert_field_approx_eq {
    ($actual:expr, $expected:expr, $mdi:expr, $epsilon:expr) => {{
        let actual: &[f32] = $actual;
        let expected: &[f32] = $expected;
        let mdi: f32 = $mdi;
        assert_eq!(
            actual.len(),
            expected.len(),
            "field lengths differ: {} != {}",
            actual.len(),
            expected.len()
        );
        for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
            if e.to_bits() == mdi.to_bits() || e == mdi {
                assert!(
                    a.to_bits() == mdi.to_bits() || a == mdi,
                    "point {}: expected missing data indicator, got {}",
                    i,
                    a
                );
            } else {
                let diff = (f64::from(a) - f64::from(e)).abs();
                let epsilon: f64 = $epsilon as f64;
                if diff > epsilon {
                    panic!(
                        "assertion failed at point {}: left `{:?}`, right `{:?}`, diff `{:?}` > epsilon `{:?}`",
                        i, a, e, diff, epsilon
                    );
                }
            }
        }
    }};
}
