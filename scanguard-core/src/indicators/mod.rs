//! Indicator families and their series computations.
//!
//! Every function here is pure: price series in, equally long series out.
//! The first `lookback` values are NaN (warmup), NaN inputs propagate, and
//! divisions by zero produce NaN instead of failing. No value at bar t may
//! depend on data from bar t+1 or later; the truncation tests in
//! `tests/property_tests.rs` hold every family to that.

pub mod adx;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod family;
pub mod macd;
pub mod momentum;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod specifier;
pub mod stoch_rsi;
pub mod wma;

pub use family::IndicatorFamily;
pub use specifier::{OutputColumn, Specifier, MAX_PARAM};

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
