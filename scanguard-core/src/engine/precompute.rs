//! Indicator precompute with a per-instance cache.
//!
//! The cache records which specifiers (and lag helpers) this engine has
//! written into the table it is working on. It belongs to the engine value;
//! two engines never see each other's entries. A column this engine did not
//! write is never trusted: it is recomputed and overwritten.

use crate::delay::shift_forward;
use crate::error::PrecomputeError;
use crate::indicators::Specifier;
use crate::table::{Ohlcv, TimeTable};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// Prefix of previous-bar helper columns: `lag1__close` is `close` one bar ago.
pub const LAG1_PREFIX: &str = "lag1__";

/// What one `precompute` call did, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecomputeReport {
    /// Specifiers whose columns were computed and inserted.
    pub computed: Vec<String>,
    /// Specifiers already in this engine's cache.
    pub skipped: Vec<String>,
}

impl PrecomputeReport {
    pub fn is_noop(&self) -> bool {
        self.computed.is_empty()
    }
}

#[derive(Debug, Default, Clone)]
pub struct PrecomputeEngine {
    cache: BTreeSet<String>,
}

impl PrecomputeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains(key)
    }

    /// Cached keys in sorted order.
    pub fn cached(&self) -> impl Iterator<Item = &str> {
        self.cache.iter().map(String::as_str)
    }

    /// Forget every cached entry, e.g. before reusing the engine on another table.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Ensure every output column of `specs` exists in `table`.
    ///
    /// All specifiers are parsed before the table is touched, so an
    /// unsupported or malformed one fails the call with nothing inserted.
    /// Specifiers are then handled in sorted canonical order. Every one not
    /// in this engine's cache is computed, replacing any same-named column
    /// already in the table. Outputs of one specifier are computed in full
    /// before any is inserted; an insert failure removes whatever that
    /// specifier had already written.
    pub fn precompute<I, S>(
        &mut self,
        table: &mut TimeTable,
        specs: I,
    ) -> Result<PrecomputeReport, PrecomputeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = BTreeMap::new();
        for text in specs {
            let spec = Specifier::parse(text.as_ref())?;
            parsed.insert(spec.to_string(), spec);
        }

        let mut report = PrecomputeReport::default();
        let mut prices: Option<Ohlcv> = None;

        for (key, spec) in parsed {
            if self.cache.contains(&key) {
                report.skipped.push(key);
                continue;
            }

            let outputs = spec.outputs();
            let replaced = outputs.iter().filter(|o| table.has_column(&o.name)).count();
            if prices.is_none() {
                let loaded = Ohlcv::load(table).map_err(|source| PrecomputeError::Table {
                    specifier: key.clone(),
                    source,
                })?;
                prices = Some(loaded);
            }
            let Some(prices) = prices.as_ref() else {
                continue;
            };

            let series = spec.compute(prices);
            insert_all(table, &key, series)?;
            debug!(specifier = %key, columns = outputs.len(), replaced, "computed indicator");
            self.cache.insert(key.clone());
            report.computed.push(key);
        }

        if !report.computed.is_empty() {
            info!(
                computed = report.computed.len(),
                skipped = report.skipped.len(),
                "precompute finished"
            );
        }
        Ok(report)
    }

    /// Largest warmup lookback across `specs`: the leading rows of the
    /// table that carry no usable signal once all of them are computed.
    pub fn warmup_bars<I, S>(specs: I) -> Result<usize, PrecomputeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut bars = 0;
        for text in specs {
            bars = bars.max(Specifier::parse(text.as_ref())?.lookback());
        }
        Ok(bars)
    }

    /// Ensure `lag1__<column>` exists. Returns true when it was computed now;
    /// an uncached helper already in the table is overwritten.
    pub fn ensure_lag1(&mut self, table: &mut TimeTable, column: &str) -> Result<bool, PrecomputeError> {
        let name = format!("{LAG1_PREFIX}{column}");
        if self.cache.contains(&name) {
            return Ok(false);
        }

        let to_error = |source| PrecomputeError::Table {
            specifier: name.clone(),
            source,
        };
        let values = table.column_f64(column).map_err(to_error)?;
        table
            .insert_f64(&name, shift_forward(&values, 1))
            .map_err(to_error)?;
        debug!(helper = %name, "computed lag helper");
        self.cache.insert(name);
        Ok(true)
    }
}

fn insert_all(
    table: &mut TimeTable,
    key: &str,
    series: Vec<(crate::indicators::OutputColumn, Vec<f64>)>,
) -> Result<(), PrecomputeError> {
    let mut written: Vec<String> = Vec::with_capacity(series.len());
    for (output, values) in series {
        if let Err(source) = table.insert_f64(&output.name, values) {
            for name in &written {
                let _ = table.remove_column(name);
            }
            return Err(PrecomputeError::Table {
                specifier: key.to_owned(),
                source,
            });
        }
        written.push(output.name);
    }
    Ok(())
}
