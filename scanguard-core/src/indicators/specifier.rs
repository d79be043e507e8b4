//! Indicator specifiers: `family_p1_p2...`.
//!
//! A specifier is both the cache key and the column name (or, for
//! multi-output families, the parameter stamp on every output column), so
//! two equal specifiers always mean the same computation.

use crate::error::PrecomputeError;
use crate::indicators::family::IndicatorFamily;
use crate::table::Ohlcv;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Largest accepted parameter value.
pub const MAX_PARAM: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Specifier {
    family: IndicatorFamily,
    params: Vec<usize>,
}

/// One column a specifier materialises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputColumn {
    pub name: String,
    /// Leading rows that carry no usable value.
    pub lookback: usize,
}

impl Specifier {
    pub fn new(family: IndicatorFamily, params: Vec<usize>) -> Result<Self, PrecomputeError> {
        let spec = Self { family, params };
        if spec.params.len() != family.arity() {
            return Err(PrecomputeError::Malformed {
                specifier: spec.to_string(),
                reason: format!(
                    "{family} takes {} parameter(s), got {}",
                    family.arity(),
                    spec.params.len()
                ),
            });
        }
        if spec.params.contains(&0) {
            return Err(PrecomputeError::Malformed {
                specifier: spec.to_string(),
                reason: "parameters must be positive".to_owned(),
            });
        }
        if spec.params.iter().any(|p| *p > MAX_PARAM) {
            return Err(PrecomputeError::Malformed {
                specifier: spec.to_string(),
                reason: format!("parameters must not exceed {MAX_PARAM}"),
            });
        }
        Ok(spec)
    }

    /// Parse canonical specifier text.
    ///
    /// The family is the longest known prefix followed by `_` (or the end of
    /// the text); everything after it must be `_`-separated positive integers
    /// written without leading zeros, so the text is also the column name.
    pub fn parse(text: &str) -> Result<Self, PrecomputeError> {
        let family = IndicatorFamily::ALL
            .into_iter()
            .filter(|f| {
                text.strip_prefix(f.prefix())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('_'))
            })
            .max_by_key(|f| f.prefix().len())
            .ok_or_else(|| PrecomputeError::Unsupported {
                specifier: text.to_owned(),
            })?;

        let rest = &text[family.prefix().len()..];
        let mut params = Vec::with_capacity(family.arity());
        for token in rest.split('_').skip(1) {
            let value = parse_param(token).ok_or_else(|| PrecomputeError::Malformed {
                specifier: text.to_owned(),
                reason: format!("'{token}' is not a positive integer"),
            })?;
            params.push(value);
        }

        Self::new(family, params).map_err(|err| match err {
            PrecomputeError::Malformed { reason, .. } => PrecomputeError::Malformed {
                specifier: text.to_owned(),
                reason,
            },
            other => other,
        })
    }

    /// Recognise an output column name and return the specifier that owns it
    /// (`macd_signal_12_26_9` → `macd_12_26_9`).
    pub fn from_column(column: &str) -> Option<Self> {
        column_patterns().iter().find_map(|(family, pattern)| {
            let captures = pattern.captures(column)?;
            let params = captures
                .iter()
                .skip(1)
                .map(|m| m.and_then(|m| parse_param(m.as_str())))
                .collect::<Option<Vec<usize>>>()?;
            Self::new(*family, params).ok()
        })
    }

    pub fn family(&self) -> IndicatorFamily {
        self.family
    }

    pub fn params(&self) -> &[usize] {
        &self.params
    }

    /// Columns this specifier writes, with their warmup lookbacks.
    pub fn outputs(&self) -> Vec<OutputColumn> {
        let stamp = self.param_stamp();
        self.family
            .output_stems()
            .iter()
            .zip(self.family.lookbacks(&self.params))
            .map(|(stem, lookback)| OutputColumn {
                name: format!("{stem}_{stamp}"),
                lookback,
            })
            .collect()
    }

    /// Largest lookback across the outputs.
    pub fn lookback(&self) -> usize {
        self.outputs().iter().map(|o| o.lookback).max().unwrap_or(0)
    }

    /// Compute every output series from raw prices.
    pub fn compute(&self, prices: &Ohlcv) -> Vec<(OutputColumn, Vec<f64>)> {
        self.outputs()
            .into_iter()
            .zip(self.family.compute(prices, &self.params))
            .collect()
    }

    fn param_stamp(&self) -> String {
        self.params
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family.prefix())?;
        for p in &self.params {
            write!(f, "_{p}")?;
        }
        Ok(())
    }
}

impl FromStr for Specifier {
    type Err = PrecomputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_param(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if token.len() > 1 && token.starts_with('0') {
        return None;
    }
    token.parse().ok()
}

/// One anchored regex per family matching any of its output columns.
fn column_patterns() -> &'static [(IndicatorFamily, Regex)] {
    static PATTERNS: OnceLock<Vec<(IndicatorFamily, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        IndicatorFamily::ALL
            .into_iter()
            .map(|family| {
                let stems = family.output_stems().join("|");
                let params = r"_(\d+)".repeat(family.arity());
                let pattern = format!("^(?:{stems}){params}$");
                (
                    family,
                    Regex::new(&pattern).expect("column pattern is valid"),
                )
            })
            .collect()
    })
}
