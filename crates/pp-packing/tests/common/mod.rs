//! Common helpers for pp-packing integration tests.

use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber filtered by `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Worst-case WGDOS error at accuracy `bpacc` for a value of magnitude `value`:
/// half a quantisation step plus the final rounding to f32.
pub fn wgdos_tolerance(bpacc: i32, value: f32) -> f64 {
    2f64.powi(bpacc) / 2.0 + f64::from(value.abs()) * f64::from(f32::EPSILON)
}
