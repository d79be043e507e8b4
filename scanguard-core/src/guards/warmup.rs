//! Warmup-window guard.
//!
//! The first `min_bars` rows of an indicator column must carry no usable
//! value. Anything else there is a backfill artifact that downstream rules
//! could mistake for real history.

use crate::error::GuardrailViolation;
use crate::table::TimeTable;

/// Check the warmup window of `columns` (every non-index column if empty).
///
/// `min_bars <= 0` means no warmup is required.
pub fn check_warmup(
    table: &TimeTable,
    min_bars: i64,
    columns: &[&str],
) -> Result<(), GuardrailViolation> {
    let Some(required) = required_bars(min_bars) else {
        return Ok(());
    };
    ensure_length(required, table.height())?;

    let names: Vec<String> = if columns.is_empty() {
        table.value_columns()
    } else {
        columns.iter().map(|c| (*c).to_owned()).collect()
    };

    for name in names {
        let values = table.column_f64(&name)?;
        if let Some(row) = first_non_blank(&values[..required]) {
            return Err(GuardrailViolation::NonBlankWarmup {
                column: name,
                row,
                min_bars: required,
            });
        }
    }
    Ok(())
}

/// Same rule as [`check_warmup`] for a bare series.
pub fn check_warmup_values(values: &[f64], min_bars: i64) -> Result<(), GuardrailViolation> {
    let Some(required) = required_bars(min_bars) else {
        return Ok(());
    };
    ensure_length(required, values.len())?;
    if let Some(row) = first_non_blank(&values[..required]) {
        return Err(GuardrailViolation::NonBlankWarmup {
            column: "<series>".to_owned(),
            row,
            min_bars: required,
        });
    }
    Ok(())
}

fn required_bars(min_bars: i64) -> Option<usize> {
    if min_bars <= 0 {
        None
    } else {
        usize::try_from(min_bars).ok()
    }
}

fn ensure_length(required: usize, available: usize) -> Result<(), GuardrailViolation> {
    if available < required {
        return Err(GuardrailViolation::InsufficientWarmup {
            required,
            available,
        });
    }
    Ok(())
}

fn first_non_blank(window: &[f64]) -> Option<usize> {
    window.iter().position(|v| !v.is_nan())
}
