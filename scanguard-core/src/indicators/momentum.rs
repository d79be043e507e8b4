//! Momentum: simple lookback difference, not percentage.
//!
//! momentum[t] = close[t] - close[t-period]
//! Lookback: period.

pub fn momentum(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 {
        return result;
    }

    for i in period..n {
        // NaN on either side propagates through the subtraction.
        result[i] = values[i] - values[i - period];
    }

    result
}
