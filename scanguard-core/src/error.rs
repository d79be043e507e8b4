//! Structured error types.
//!
//! Every failure here is a correctness defect in the input or the
//! configuration, never a transient condition, so none of them is retried.
//! Messages name the violated invariant and the offending
//! column/specifier/expression.

use polars::prelude::PolarsError;
use thiserror::Error;

/// A temporal-safety or structural guardrail failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardrailViolation {
    #[error(
        "index is not strictly increasing at row {position} ({previous:?} followed by {current:?})"
    )]
    Ordering {
        position: usize,
        previous: Option<i64>,
        current: Option<i64>,
    },

    #[error("duplicate index value {value} appears {count} times")]
    DuplicateIndex { value: i64, count: usize },

    #[error("warmup requires {required} rows but the table has only {available}")]
    InsufficientWarmup { required: usize, available: usize },

    #[error("column '{column}' has a usable value at row {row} inside the {min_bars}-bar warmup window")]
    NonBlankWarmup {
        column: String,
        row: usize,
        min_bars: usize,
    },

    #[error("table '{name}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("table '{name}' disagrees with the reference index at row {position}")]
    IndexMismatch { name: String, position: usize },

    #[error("expression references future data ({pattern}): {expression}")]
    ForwardReference { pattern: String, expression: String },

    #[error("cannot read table for guard check: {0}")]
    Table(String),
}

impl From<TableError> for GuardrailViolation {
    fn from(err: TableError) -> Self {
        GuardrailViolation::Table(err.to_string())
    }
}

/// Indicator precompute failures.
#[derive(Debug, Error)]
pub enum PrecomputeError {
    #[error("PC001 unsupported indicator family: '{specifier}'")]
    Unsupported { specifier: String },

    #[error("PC002 malformed parameters for '{specifier}': {reason}")]
    Malformed { specifier: String, reason: String },

    #[error("cannot compute '{specifier}': {source}")]
    Table {
        specifier: String,
        #[source]
        source: TableError,
    },
}

impl PrecomputeError {
    /// Short diagnostic code (`PC001`, `PC002`), if the failure has one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            PrecomputeError::Unsupported { .. } => Some("PC001"),
            PrecomputeError::Malformed { .. } => Some("PC002"),
            PrecomputeError::Table { .. } => None,
        }
    }

    /// The specifier text that caused the failure.
    pub fn specifier(&self) -> &str {
        match self {
            PrecomputeError::Unsupported { specifier }
            | PrecomputeError::Malformed { specifier, .. }
            | PrecomputeError::Table { specifier, .. } => specifier,
        }
    }
}

/// Errors reading or writing a `TimeTable`.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("missing index column '{0}'")]
    MissingIndex(String),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Errors loading filter definitions.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("cannot read filter definitions from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed filter definitions: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors loading a `GuardConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid future-reference pattern '{pattern}': {reason}")]
    Pattern { pattern: String, reason: String },
}
