//! Criterion benchmarks for scanguard hot paths.
//!
//! Benchmarks:
//! 1. Indicator precompute (mixed specifier batch, cold engine)
//! 2. Warm engine re-run (cache hits only)
//! 3. Filter preparation (sanitize, scan, precompute, warmup, missing columns)
//! 4. Multi-table batch (sequential vs rayon)

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scanguard_core::config::GuardConfig;
use scanguard_core::diagnostics::MemorySink;
use scanguard_core::engine::{precompute_tables, PrecomputeEngine};
use scanguard_core::filters::{FilterDefinition, FilterPipeline};
use scanguard_core::table::TimeTable;

const SPECS: [&str; 10] = [
    "sma_20",
    "sma_50",
    "ema_12",
    "rsi_14",
    "adx_14",
    "cci_20",
    "macd_12_26_9",
    "bb_20_2",
    "stochrsi_14_14_3_3",
    "roc_10",
];

// ── Helpers ──────────────────────────────────────────────────────────

fn make_table(n: usize, seed: u64) -> TimeTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = NaiveDate::from_ymd_opt(2015, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect();

    let mut price = 100.0_f64;
    let (mut open, mut high, mut low, mut close, mut volume) =
        (vec![], vec![], vec![], vec![], vec![]);
    for _ in 0..n {
        let o = price;
        price = (price * (1.0 + rng.gen_range(-0.02..0.02))).max(1.0);
        open.push(o);
        close.push(price);
        high.push(o.max(price) * (1.0 + rng.gen_range(0.0..0.01)));
        low.push(o.min(price) * (1.0 - rng.gen_range(0.0..0.01)));
        volume.push(rng.gen_range(1_000.0..50_000.0));
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

// ── 1. Cold precompute ───────────────────────────────────────────────

fn bench_precompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("precompute_cold");
    for bars in [252usize, 1260, 5040] {
        let table = make_table(bars, 7);
        group.bench_with_input(BenchmarkId::from_parameter(bars), &table, |b, table| {
            b.iter(|| {
                let mut table = table.clone();
                let mut engine = PrecomputeEngine::new();
                black_box(engine.precompute(&mut table, SPECS).unwrap());
            });
        });
    }
    group.finish();
}

// ── 2. Warm engine ───────────────────────────────────────────────────

fn bench_cached(c: &mut Criterion) {
    let mut table = make_table(1260, 11);
    let mut engine = PrecomputeEngine::new();
    engine.precompute(&mut table, SPECS).unwrap();

    c.bench_function("precompute_warm_1260", |b| {
        b.iter(|| black_box(engine.precompute(&mut table, SPECS).unwrap()));
    });
}

// ── 3. Filter preparation ────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let table = make_table(1260, 3);
    let definitions: Vec<FilterDefinition> = [
        "rsi_14 < 30 and close > sma_50",
        "macd_hist_12_26_9 > 0 and lag1__macd_hist_12_26_9 <= 0",
        "close > bb_upper_20_2",
        "adx_14 > 25 and ema_12 > sma_20",
        "stochrsi_k_14_14_3_3 > stochrsi_d_14_14_3_3",
        "close.shift(-1) > close",
    ]
    .iter()
    .enumerate()
    .map(|(i, expr)| FilterDefinition::new(format!("F{i}"), *expr))
    .collect();

    c.bench_function("prepare_6_filters_1260", |b| {
        b.iter(|| {
            let mut table = table.clone();
            let mut pipeline = FilterPipeline::new(GuardConfig::default()).unwrap();
            let mut sink = MemorySink::new();
            black_box(pipeline.prepare(&mut table, &definitions, &mut sink).unwrap());
        });
    });
}

// ── 4. Batch ─────────────────────────────────────────────────────────

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_16_tables_1260");
    let tables: Vec<TimeTable> = (0..16).map(|seed| make_table(1260, seed)).collect();

    for parallel in [false, true] {
        let label = if parallel { "rayon" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut tables = tables.clone();
                black_box(precompute_tables(&mut tables, &SPECS, parallel));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_precompute,
    bench_cached,
    bench_pipeline,
    bench_batch
);
criterion_main!(benches);
