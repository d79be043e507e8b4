//! ADX: Average Directional Index (Wilder), the trend-strength family.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period - 1. TR[0] is NaN (no previous close), so the DI
//! smoothing lands on bar `period` and the ADX smoothing on `2 * period - 1`.

/// True Range: max(high-low, |high-prev_close|, |low-prev_close|); TR[0] = NaN.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let n = close.len();
    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let (h, l, pc) = (high[i], low[i], close[i - 1]);
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }
    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
///
/// Seeds with the mean of the first run of `period` consecutive non-NaN
/// values; a NaN after the seed taints everything that follows.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let mut run = 0usize;
    let mut seed_end = None;
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() {
            run = 0;
            continue;
        }
        run += 1;
        if run == period {
            seed_end = Some(i + 1);
            break;
        }
    }
    let Some(seed_end) = seed_end else {
        return result;
    };

    let seed = values[seed_end - period..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

pub fn adx(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let n = close.len();
    if n < 2 || period == 0 {
        return vec![f64::NAN; n];
    }

    // Step 1: Compute +DM and -DM
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    for i in 1..n {
        let up = high[i] - high[i - 1];
        let down = low[i - 1] - low[i];
        if up.is_nan() || down.is_nan() {
            continue;
        }
        plus_dm[i] = if up > down && up > 0.0 { up } else { 0.0 };
        minus_dm[i] = if down > up && down > 0.0 { down } else { 0.0 };
    }

    // Step 2: Wilder smooth +DM, -DM, and TR
    let smooth_tr = wilder_smooth(&true_range(high, low, close), period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);

    // Step 3-5: +DI, -DI, DX (zero denominators stay NaN)
    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        let tr = smooth_tr[i];
        if tr.is_nan() || tr == 0.0 {
            continue;
        }
        let plus_di = 100.0 * smooth_plus[i] / tr;
        let minus_di = 100.0 * smooth_minus[i] / tr;
        let di_sum = plus_di + minus_di;
        if di_sum == 0.0 {
            continue;
        }
        dx[i] = 100.0 * (plus_di - minus_di).abs() / di_sum;
    }

    // Step 6: Wilder smooth DX
    wilder_smooth(&dx, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn ohlc() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let high = vec![105.0, 108.0, 107.0, 103.0, 106.0, 110.0, 112.0, 111.0, 109.0, 113.0];
        let low = vec![95.0, 100.0, 98.0, 97.0, 100.0, 103.0, 106.0, 104.0, 103.0, 105.0];
        let close = vec![102.0, 106.0, 99.0, 101.0, 105.0, 108.0, 110.0, 105.0, 107.0, 112.0];
        (high, low, close)
    }

    #[test]
    fn true_range_uses_previous_close() {
        let tr = true_range(&[10.0, 12.0], &[8.0, 11.0], &[9.0, 11.5]);
        assert!(tr[0].is_nan());
        // max(1, |12-9|, |11-9|) = 3
        assert_approx(tr[1], 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_seed_and_recursion() {
        let result = wilder_smooth(&[f64::NAN, 2.0, 4.0, 6.0], 2);
        assert!(result[1].is_nan());
        assert_approx(result[2], 3.0, DEFAULT_EPSILON);
        // 0.5 * 6 + 0.5 * 3
        assert_approx(result[3], 4.5, DEFAULT_EPSILON);
    }

    #[test]
    fn adx_lookback_and_bounds() {
        let (high, low, close) = ohlc();
        let result = adx(&high, &low, &close, 3);
        // first value at 2 * 3 - 1
        assert!(result[..5].iter().all(|v| v.is_nan()));
        assert!(!result[5].is_nan());
        for v in result.iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(v), "ADX out of bounds: {v}");
        }
    }

    #[test]
    fn adx_strong_uptrend_is_high() {
        let close: Vec<f64> = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
        let high: Vec<f64> = close.iter().map(|c| c + 1.0).collect();
        let low: Vec<f64> = close.iter().map(|c| c - 1.0).collect();
        let result = adx(&high, &low, &close, 5);
        // Pure up moves: -DM is always zero, so DX = 100 every bar.
        assert_approx(result[29], 100.0, 1e-9);
    }
}
