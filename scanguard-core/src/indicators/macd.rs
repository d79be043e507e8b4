//! MACD: moving average convergence/divergence.
//!
//! line   = EMA(close, fast) - EMA(close, slow)
//! signal = EMA(line, signal)
//! hist   = line - signal
//!
//! Lookback: line max(fast, slow) - 1; signal and hist add signal - 1.

use crate::indicators::ema::ema;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub hist: Vec<f64>,
}

pub fn macd(close: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(close, fast);
    let slow_ema = ema(close, slow);
    let line: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema(&line, signal);
    let hist = line
        .iter()
        .zip(&signal_line)
        .map(|(l, s)| l - s)
        .collect();

    MacdSeries {
        line,
        signal: signal_line,
        hist,
    }
}
