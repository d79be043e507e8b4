//! Simple Moving Average (SMA).
//!
//! Rolling mean over a lookback window; a NaN anywhere in the window makes
//! that bar NaN. Lookback: period - 1.

/// Rolling mean of `values` over `period` bars.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    // Track the sum of finite values and how many NaNs sit in the window,
    // so a NaN leaving the window does not poison the running sum.
    let mut sum = 0.0;
    let mut nan_count = 0usize;
    for i in 0..n {
        let entering = values[i];
        if entering.is_nan() {
            nan_count += 1;
        } else {
            sum += entering;
        }

        if i >= period {
            let leaving = values[i - period];
            if leaving.is_nan() {
                nan_count -= 1;
            } else {
                sum -= leaving;
            }
        }

        if i + 1 >= period && nan_count == 0 {
            result[i] = sum / period as f64;
        }
    }

    result
}
