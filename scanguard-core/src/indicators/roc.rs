//! Rate of Change (ROC).
//!
//! Percentage price change over N bars.
//! ROC[t] = (close[t] - close[t-period]) / close[t-period] * 100
//! Lookback: period. A zero base price yields NaN.

pub fn roc(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 {
        return result;
    }

    for i in period..n {
        let prev = values[i - period];
        let curr = values[i];
        if prev.is_nan() || curr.is_nan() || prev == 0.0 {
            result[i] = f64::NAN;
        } else {
            result[i] = (curr - prev) / prev * 100.0;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn roc_basic() {
        // Closes: 100, 110, 121 → 10% each step
        let result = roc(&[100.0, 110.0, 121.0], 1);
        assert!(result[0].is_nan());
        assert_approx(result[1], 10.0, DEFAULT_EPSILON);
        assert_approx(result[2], 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_period_2() {
        let result = roc(&[100.0, 110.0, 121.0], 2);
        assert!(result[1].is_nan());
        assert_approx(result[2], 21.0, DEFAULT_EPSILON);
    }

    #[test]
    fn roc_zero_base_is_nan() {
        let result = roc(&[0.0, 5.0], 1);
        assert!(result[1].is_nan());
    }
}
