//! Commodity Channel Index (CCI).
//!
//! CCI = (TP - SMA(TP)) / (0.015 * mean absolute deviation of TP)
//! TP (typical price) = (high + low + close) / 3.
//! Lookback: period - 1. A zero deviation (flat window) yields NaN.

use crate::indicators::sma::sma;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn cci(typical_price: &[f64], period: usize) -> Vec<f64> {
    let n = typical_price.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let mean = sma(typical_price, period);
    for i in (period - 1)..n {
        let m = mean[i];
        if m.is_nan() {
            continue;
        }
        let window = &typical_price[i + 1 - period..=i];
        let deviation = window.iter().map(|v| (v - m).abs()).sum::<f64>() / period as f64;
        if deviation == 0.0 {
            continue;
        }
        result[i] = (typical_price[i] - m) / (LAMBERT_CONSTANT * deviation);
    }

    result
}
