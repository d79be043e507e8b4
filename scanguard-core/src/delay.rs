//! Execution delay adapter.
//!
//! Turns a signal computed on bar t into the series a simulator may act on,
//! using the delay from [`enforce_t_plus_one`].

use crate::error::GuardrailViolation;
use crate::guards::exec_policy::{enforce_t_plus_one, ExecConfig};
use crate::guards::index::assert_monotonic_index;
use crate::table::TimeTable;

/// A value per time point, aligned with an integer index.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    pub index: Vec<i64>,
    pub values: Vec<f64>,
}

impl SignalSeries {
    pub fn new(index: Vec<i64>, values: Vec<f64>) -> Result<Self, GuardrailViolation> {
        if index.len() != values.len() {
            return Err(GuardrailViolation::LengthMismatch {
                name: "signal".to_owned(),
                expected: index.len(),
                actual: values.len(),
            });
        }
        Ok(Self { index, values })
    }

    /// Read one column of a table as a signal. The table's index must pass
    /// [`assert_monotonic_index`].
    pub fn from_table(table: &TimeTable, column: &str) -> Result<Self, GuardrailViolation> {
        assert_monotonic_index(table)?;
        let index = table.index()?.into_iter().flatten().collect();
        let values = table.column_f64(column)?;
        Self::new(index, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Move every value `periods` rows later; the vacated front is NaN.
pub fn shift_forward(values: &[f64], periods: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if periods < n {
        out[periods..].copy_from_slice(&values[..n - periods]);
    }
    out
}

/// Delay `signal` by the canonical execution delay.
///
/// The result has the same index and length; value at row i is the input
/// at row i - delay. The input is left untouched.
pub fn apply_t_plus_one(signal: &SignalSeries, config: Option<ExecConfig>) -> SignalSeries {
    let config = enforce_t_plus_one(config);
    SignalSeries {
        index: signal.index.clone(),
        values: shift_forward(&signal.values, config.delay as usize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::make_table;

    #[test]
    fn shifts_one_bar() {
        let signal = SignalSeries::new(vec![1, 2, 3], vec![1.0, 0.0, 1.0]).unwrap();
        let delayed = apply_t_plus_one(&signal, None);
        assert_eq!(delayed.index, vec![1, 2, 3]);
        assert!(delayed.values[0].is_nan());
        assert_eq!(&delayed.values[1..], &[1.0, 0.0]);
        // input untouched
        assert_eq!(signal.values, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn caller_delay_is_overridden() {
        let signal = SignalSeries::new(vec![1, 2, 3], vec![5.0, 6.0, 7.0]).unwrap();
        let delayed = apply_t_plus_one(
            &signal,
            Some(ExecConfig {
                delay: 0,
                ..ExecConfig::default()
            }),
        );
        assert!(delayed.values[0].is_nan());
        assert_eq!(delayed.values[2], 6.0);
    }

    #[test]
    fn empty_and_single() {
        let empty = SignalSeries::new(vec![], vec![]).unwrap();
        assert!(apply_t_plus_one(&empty, None).is_empty());

        let single = SignalSeries::new(vec![7], vec![1.0]).unwrap();
        let delayed = apply_t_plus_one(&single, None);
        assert_eq!(delayed.len(), 1);
        assert!(delayed.values[0].is_nan());
    }

    #[test]
    fn shift_longer_than_series() {
        assert!(shift_forward(&[1.0, 2.0], 5).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn length_mismatch_rejected() {
        assert!(SignalSeries::new(vec![1, 2], vec![1.0]).is_err());
    }

    #[test]
    fn from_table_reads_column() {
        let table = make_table(&[10.0, 11.0, 12.0]);
        let signal = SignalSeries::from_table(&table, "close").unwrap();
        assert_eq!(signal.values, vec![10.0, 11.0, 12.0]);
        assert_eq!(signal.index[0], 19724);
    }
}
