//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N). A flat window collapses all three
//! bands onto the mean. Lookback: period - 1.

use crate::indicators::sma::sma;

#[derive(Debug, Clone)]
pub struct BollingerSeries {
    pub lower: Vec<f64>,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
}

pub fn bollinger(close: &[f64], period: usize, multiplier: f64) -> BollingerSeries {
    let n = close.len();
    let middle = sma(close, period);
    let mut lower = vec![f64::NAN; n];
    let mut upper = vec![f64::NAN; n];

    for i in 0..n {
        let mean = middle[i];
        if mean.is_nan() {
            continue;
        }
        let window = &close[i + 1 - period..=i];
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let stddev = variance.sqrt();
        upper[i] = mean + multiplier * stddev;
        lower[i] = mean - multiplier * stddev;
    }

    BollingerSeries {
        lower,
        middle,
        upper,
    }
}
