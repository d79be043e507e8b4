//! The closed set of indicator families.
//!
//! Each variant knows its specifier prefix, parameter arity, output columns
//! and their warmup lookbacks, and how to compute itself from raw prices.
//! Adding a family means adding a variant and filling in every match below.

use crate::indicators::{
    adx::adx, bollinger::bollinger, cci::cci, ema::ema, macd::macd, momentum::momentum, roc::roc,
    rsi::rsi, sma::sma, stoch_rsi::stoch_rsi, wma::wma,
};
use crate::table::Ohlcv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorFamily {
    Sma,
    Ema,
    Wma,
    Momentum,
    Roc,
    Cci,
    Rsi,
    /// Average directional index (trend strength).
    Adx,
    /// (fast, slow, signal) → line, signal, histogram.
    Macd,
    /// (period, multiplier) → lower, middle, upper band.
    Bollinger,
    /// (rsi, stochastic, %K smoothing, %D smoothing) → %K, %D.
    StochRsi,
}

impl IndicatorFamily {
    pub const ALL: [IndicatorFamily; 11] = [
        IndicatorFamily::Sma,
        IndicatorFamily::Ema,
        IndicatorFamily::Wma,
        IndicatorFamily::Momentum,
        IndicatorFamily::Roc,
        IndicatorFamily::Cci,
        IndicatorFamily::Rsi,
        IndicatorFamily::Adx,
        IndicatorFamily::Macd,
        IndicatorFamily::Bollinger,
        IndicatorFamily::StochRsi,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            IndicatorFamily::Sma => "sma",
            IndicatorFamily::Ema => "ema",
            IndicatorFamily::Wma => "wma",
            IndicatorFamily::Momentum => "momentum",
            IndicatorFamily::Roc => "roc",
            IndicatorFamily::Cci => "cci",
            IndicatorFamily::Rsi => "rsi",
            IndicatorFamily::Adx => "adx",
            IndicatorFamily::Macd => "macd",
            IndicatorFamily::Bollinger => "bb",
            IndicatorFamily::StochRsi => "stochrsi",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.prefix() == prefix)
    }

    /// Number of integer parameters a specifier of this family carries.
    pub fn arity(self) -> usize {
        match self {
            IndicatorFamily::Macd => 3,
            IndicatorFamily::Bollinger => 2,
            IndicatorFamily::StochRsi => 4,
            _ => 1,
        }
    }

    /// Output column stems in output order; the full column name is the
    /// stem followed by the specifier's parameters.
    pub fn output_stems(self) -> &'static [&'static str] {
        match self {
            IndicatorFamily::Sma => &["sma"],
            IndicatorFamily::Ema => &["ema"],
            IndicatorFamily::Wma => &["wma"],
            IndicatorFamily::Momentum => &["momentum"],
            IndicatorFamily::Roc => &["roc"],
            IndicatorFamily::Cci => &["cci"],
            IndicatorFamily::Rsi => &["rsi"],
            IndicatorFamily::Adx => &["adx"],
            IndicatorFamily::Macd => &["macd", "macd_signal", "macd_hist"],
            IndicatorFamily::Bollinger => &["bb_lower", "bb_middle", "bb_upper"],
            IndicatorFamily::StochRsi => &["stochrsi_k", "stochrsi_d"],
        }
    }

    /// Leading NaN rows of each output on gap-free input, aligned with
    /// [`output_stems`](Self::output_stems).
    pub fn lookbacks(self, params: &[usize]) -> Vec<usize> {
        match (self, params) {
            (
                IndicatorFamily::Sma
                | IndicatorFamily::Ema
                | IndicatorFamily::Wma
                | IndicatorFamily::Cci,
                [p],
            ) => vec![p.saturating_sub(1)],
            (IndicatorFamily::Momentum | IndicatorFamily::Roc | IndicatorFamily::Rsi, [p]) => {
                vec![*p]
            }
            (IndicatorFamily::Adx, [p]) => vec![p.saturating_mul(2).saturating_sub(1)],
            (IndicatorFamily::Macd, [fast, slow, signal]) => {
                let line = (*fast).max(*slow).saturating_sub(1);
                let smoothed = line.saturating_add(signal.saturating_sub(1));
                vec![line, smoothed, smoothed]
            }
            (IndicatorFamily::Bollinger, [p, _]) => vec![p.saturating_sub(1); 3],
            (IndicatorFamily::StochRsi, [r, s, k, d]) => {
                let k_lookback = r.saturating_add(*s).saturating_add(*k).saturating_sub(2);
                vec![k_lookback, k_lookback.saturating_add(d.saturating_sub(1))]
            }
            _ => Vec::new(),
        }
    }

    /// Compute every output series, aligned with [`output_stems`](Self::output_stems).
    ///
    /// Returns an empty vector when `params` does not match the arity.
    pub fn compute(self, prices: &Ohlcv, params: &[usize]) -> Vec<Vec<f64>> {
        match (self, params) {
            (IndicatorFamily::Sma, [p]) => vec![sma(&prices.close, *p)],
            (IndicatorFamily::Ema, [p]) => vec![ema(&prices.close, *p)],
            (IndicatorFamily::Wma, [p]) => vec![wma(&prices.close, *p)],
            (IndicatorFamily::Momentum, [p]) => vec![momentum(&prices.close, *p)],
            (IndicatorFamily::Roc, [p]) => vec![roc(&prices.close, *p)],
            (IndicatorFamily::Cci, [p]) => vec![cci(&prices.typical_price(), *p)],
            (IndicatorFamily::Rsi, [p]) => vec![rsi(&prices.close, *p)],
            (IndicatorFamily::Adx, [p]) => vec![adx(&prices.high, &prices.low, &prices.close, *p)],
            (IndicatorFamily::Macd, [fast, slow, signal]) => {
                let out = macd(&prices.close, *fast, *slow, *signal);
                vec![out.line, out.signal, out.hist]
            }
            (IndicatorFamily::Bollinger, [period, multiplier]) => {
                let out = bollinger(&prices.close, *period, *multiplier as f64);
                vec![out.lower, out.middle, out.upper]
            }
            (IndicatorFamily::StochRsi, [r, s, k, d]) => {
                let out = stoch_rsi(&prices.close, *r, *s, *k, *d);
                vec![out.k, out.d]
            }
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for IndicatorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix())
    }
}
