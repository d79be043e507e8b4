//! Stochastic RSI: the stochastic oscillator applied to RSI.
//!
//! stoch = (RSI - min(RSI, n)) / (max(RSI, n) - min(RSI, n)) * 100
//! %K = SMA(stoch, k), %D = SMA(%K, d)
//!
//! A flat RSI window (zero range) yields NaN.
//! Lookback: %K rsi + stoch + k - 2; %D adds d - 1.

use crate::indicators::rsi::rsi;
use crate::indicators::sma::sma;

#[derive(Debug, Clone)]
pub struct StochRsiSeries {
    pub k: Vec<f64>,
    pub d: Vec<f64>,
}

pub fn stoch_rsi(
    close: &[f64],
    rsi_period: usize,
    stoch_period: usize,
    k_period: usize,
    d_period: usize,
) -> StochRsiSeries {
    let base = rsi(close, rsi_period);
    let stoch = stochastic(&base, stoch_period);
    let k = sma(&stoch, k_period);
    let d = sma(&k, d_period);
    StochRsiSeries { k, d }
}

/// Position of each value inside its trailing `period` range, 0–100.
fn stochastic(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = hi - lo;
        if range == 0.0 {
            continue;
        }
        result[i] = (values[i] - lo) / range * 100.0;
    }

    result
}
