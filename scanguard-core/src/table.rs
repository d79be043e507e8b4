//! Time-indexed table: one row per time point over a polars `DataFrame`.
//!
//! The index column may be any dtype castable to `Int64` (`Int64`, `Date`,
//! `Datetime`). Values are read as `f64` with nulls surfacing as NaN, so
//! "blank" always means NaN to callers. The table never sorts, dedupes or
//! otherwise repairs its index; that is the guardrails' job to detect.

use crate::error::TableError;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Default name of the time-axis column.
pub const DEFAULT_INDEX_COLUMN: &str = "timestamp";

/// Raw price columns every precompute input must carry.
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// `NaiveDate::num_days_from_ce()` of 1970-01-01; polars `Date` counts days from there.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Clone)]
pub struct TimeTable {
    frame: DataFrame,
    index_column: String,
}

impl TimeTable {
    /// Wrap an existing frame. Fails if the index column is absent.
    pub fn from_frame(frame: DataFrame, index_column: impl Into<String>) -> Result<Self, TableError> {
        let index_column = index_column.into();
        if frame.get_column_index(&index_column).is_none() {
            return Err(TableError::MissingIndex(index_column));
        }
        Ok(Self {
            frame,
            index_column,
        })
    }

    /// Build a table from an integer index and named float columns.
    pub fn from_columns(index: Vec<i64>, columns: Vec<(&str, Vec<f64>)>) -> Result<Self, TableError> {
        let height = index.len();
        let mut cols = Vec::with_capacity(columns.len() + 1);
        cols.push(Column::new(DEFAULT_INDEX_COLUMN.into(), index));
        for (name, values) in columns {
            check_length(name, height, values.len())?;
            cols.push(Column::new(name.into(), values));
        }
        Self::from_frame(DataFrame::new(cols)?, DEFAULT_INDEX_COLUMN)
    }

    /// Build a daily table; dates are stored as a polars `Date` column.
    pub fn from_daily(dates: &[NaiveDate], columns: Vec<(&str, Vec<f64>)>) -> Result<Self, TableError> {
        let height = dates.len();
        let days: Vec<i32> = dates
            .iter()
            .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
            .collect();
        let index = Series::new(DEFAULT_INDEX_COLUMN.into(), days).cast(&DataType::Date)?;

        let mut cols = Vec::with_capacity(columns.len() + 1);
        cols.push(Column::from(index));
        for (name, values) in columns {
            check_length(name, height, values.len())?;
            cols.push(Column::new(name.into(), values));
        }
        Self::from_frame(DataFrame::new(cols)?, DEFAULT_INDEX_COLUMN)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn index_column(&self) -> &str {
        &self.index_column
    }

    /// Number of rows (time points).
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// The time axis as integers. Null index entries come back as `None`.
    pub fn index(&self) -> Result<Vec<Option<i64>>, TableError> {
        let column = self
            .frame
            .column(&self.index_column)
            .map_err(|_| TableError::MissingIndex(self.index_column.clone()))?;
        let as_int = column.as_materialized_series().cast(&DataType::Int64)?;
        let values = as_int.i64()?.into_iter().collect();
        Ok(values)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.get_column_index(name).is_some()
    }

    /// All column names, index included, in frame order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str().to_owned())
            .collect()
    }

    /// Column names excluding the index.
    pub fn value_columns(&self) -> Vec<String> {
        self.column_names()
            .into_iter()
            .filter(|name| name != &self.index_column)
            .collect()
    }

    /// Read a column as `f64`, nulls as NaN.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let column = self
            .frame
            .column(name)
            .map_err(|_| TableError::MissingColumn(name.to_owned()))?;
        let series = column.as_materialized_series();
        let casted = if series.dtype() == &DataType::Float64 {
            series.clone()
        } else {
            series.cast(&DataType::Float64)?
        };
        Ok(casted
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect())
    }

    /// Insert or replace a float column.
    pub fn insert_f64(&mut self, name: &str, values: Vec<f64>) -> Result<(), TableError> {
        check_length(name, self.height(), values.len())?;
        self.frame.with_column(Series::new(name.into(), values))?;
        Ok(())
    }

    pub fn remove_column(&mut self, name: &str) -> Result<(), TableError> {
        self.frame
            .drop_in_place(name)
            .map_err(|_| TableError::MissingColumn(name.to_owned()))?;
        Ok(())
    }

    /// BLAKE3 digest over the index and every numeric column, in name order.
    ///
    /// NaN payloads are canonicalised so two tables with the same blanks
    /// hash identically.
    pub fn fingerprint(&self) -> Result<String, TableError> {
        let mut hasher = blake3::Hasher::new();
        for value in self.index()? {
            hasher.update(&value.unwrap_or(i64::MIN).to_le_bytes());
        }

        let mut names = self.value_columns();
        names.sort();
        for name in names {
            let dtype = self.frame.column(&name)?.dtype().clone();
            if !(dtype.is_float() || dtype.is_integer()) {
                continue;
            }
            hasher.update(name.as_bytes());
            for v in self.column_f64(&name)? {
                let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
                hasher.update(&bits.to_le_bytes());
            }
        }
        Ok(hasher.finalize().to_hex().to_string())
    }
}

fn check_length(column: &str, expected: usize, actual: usize) -> Result<(), TableError> {
    if expected != actual {
        return Err(TableError::LengthMismatch {
            column: column.to_owned(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Raw OHLCV columns pulled out of a table once per precompute call.
#[derive(Debug, Clone)]
pub struct Ohlcv {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
}

impl Ohlcv {
    pub fn load(table: &TimeTable) -> Result<Self, TableError> {
        Ok(Self {
            open: table.column_f64("open")?,
            high: table.column_f64("high")?,
            low: table.column_f64("low")?,
            close: table.column_f64("close")?,
            volume: table.column_f64("volume")?,
        })
    }

    pub fn len(&self) -> usize {
        self.close.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Typical price (high + low + close) / 3.
    pub fn typical_price(&self) -> Vec<f64> {
        self.high
            .iter()
            .zip(&self.low)
            .zip(&self.close)
            .map(|((h, l), c)| (h + l + c) / 3.0)
            .collect()
    }
}

/// Synthetic daily OHLCV table for tests.
///
/// open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_table(closes: &[f64]) -> TimeTable {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..closes.len())
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect();
    let open: Vec<f64> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| if i == 0 { c } else { closes[i - 1] })
        .collect();
    let high: Vec<f64> = open.iter().zip(closes).map(|(o, c)| o.max(*c) + 1.0).collect();
    let low: Vec<f64> = open.iter().zip(closes).map(|(o, c)| o.min(*c) - 1.0).collect();
    TimeTable::from_daily(
        &dates,
        vec![
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", closes.to_vec()),
            ("volume", vec![1000.0; closes.len()]),
        ],
    )
    .unwrap()
}
