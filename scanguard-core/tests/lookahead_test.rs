//! Look-ahead contamination tests for every indicator family.
//!
//! Invariant: no indicator value at bar t may depend on price data from bar
//! t+1 or later.
//!
//! Method: precompute on a truncated table (bars 0..100) and the full table
//! (bars 0..200). Bars 0..100 must be identical between both runs.

use chrono::NaiveDate;
use scanguard_core::engine::PrecomputeEngine;
use scanguard_core::indicators::Specifier;
use scanguard_core::table::TimeTable;

const SPECS: [&str; 14] = [
    "sma_20",
    "ema_12",
    "wma_10",
    "momentum_10",
    "roc_12",
    "cci_20",
    "rsi_14",
    "adx_14",
    "macd_12_26_9",
    "macd_5_35_5",
    "bb_20_2",
    "bb_10_3",
    "stochrsi_14_14_3_3",
    "stochrsi_7_10_2_4",
];

/// Deterministic pseudo-random walk, as OHLCV columns.
fn make_table(n: usize) -> TimeTable {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect();
    let mut price = 100.0;
    let (mut open, mut high, mut low, mut close, mut volume) =
        (vec![], vec![], vec![], vec![], vec![]);
    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        price += ((seed % 200) as f64 - 100.0) * 0.05;
        price = price.max(10.0);
        let o = price - 0.5;
        let c = price + 0.3;
        open.push(o);
        close.push(c);
        high.push(o.max(c) + 2.0);
        low.push(o.min(c) - 2.0);
        volume.push(1000.0 + i as f64 * 100.0);
    }
    TimeTable::from_daily(
        &dates,
        vec![
            ("open", open),
            ("high", high),
            ("low", low),
            ("close", close),
            ("volume", volume),
        ],
    )
    .unwrap()
}

fn same(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || (a - b).abs() < 1e-9
}

#[test]
fn truncated_prefix_matches_full_series() {
    let mut full = make_table(200);
    let mut truncated = make_table(100);

    PrecomputeEngine::new().precompute(&mut full, SPECS).unwrap();
    PrecomputeEngine::new().precompute(&mut truncated, SPECS).unwrap();

    for spec in SPECS {
        for output in Specifier::parse(spec).unwrap().outputs() {
            let f = full.column_f64(&output.name).unwrap();
            let t = truncated.column_f64(&output.name).unwrap();
            assert_eq!(t.len(), 100, "{}: truncated length", output.name);
            for i in 0..100 {
                assert!(
                    same(f[i], t[i]),
                    "{}: bar {i} differs (full={}, truncated={})",
                    output.name,
                    f[i],
                    t[i]
                );
            }
        }
    }
}

#[test]
fn warmup_rows_are_blank_and_the_next_is_not() {
    let mut table = make_table(200);
    PrecomputeEngine::new().precompute(&mut table, SPECS).unwrap();

    for spec in SPECS {
        for output in Specifier::parse(spec).unwrap().outputs() {
            let values = table.column_f64(&output.name).unwrap();
            assert!(
                values[..output.lookback].iter().all(|v| v.is_nan()),
                "{}: value inside warmup",
                output.name
            );
            assert!(
                !values[output.lookback].is_nan(),
                "{}: first value after warmup is blank",
                output.name
            );
        }
    }
}

#[test]
fn perturbing_the_future_leaves_the_past_alone() {
    let table = make_table(150);
    let mut a = table.clone();
    let mut b = table.clone();

    // Change the last 50 closes of b only.
    let mut close = b.column_f64("close").unwrap();
    for v in close.iter_mut().skip(100) {
        *v *= 1.5;
    }
    b.insert_f64("close", close).unwrap();

    PrecomputeEngine::new().precompute(&mut a, SPECS).unwrap();
    PrecomputeEngine::new().precompute(&mut b, SPECS).unwrap();

    for spec in SPECS {
        for output in Specifier::parse(spec).unwrap().outputs() {
            let x = a.column_f64(&output.name).unwrap();
            let y = b.column_f64(&output.name).unwrap();
            for i in 0..100 {
                assert!(same(x[i], y[i]), "{}: bar {i} moved", output.name);
            }
        }
    }
}
