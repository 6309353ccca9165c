//! Windowed cascade filter engine.
//!
//! The engine is one generic shape: a fixed-capacity [`SlidingWindow`]
//! over the incoming value stream, plus an ordered chain of FIR
//! [`Stage`]s re-run over the window snapshot on demand. The five
//! indicator presets (EMA, Derivative, ZeroBaseline, TRIX, Hull) differ
//! only in window capacity and stage list.

pub mod cascade;
pub mod stage;
pub mod window;

pub use cascade::WindowedCascade;
pub use stage::{ConfigError, Stage};
pub use window::SlidingWindow;

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for filter tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
