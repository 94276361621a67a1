//! Criterion benchmarks for the per-stock hot path.
//!
//! Benchmarks:
//! 1. Share-count adjustment of a raw window
//! 2. Indicator frame computation (single SMA and the macd_kdj stack)
//! 3. Full detector pipeline per stock, for each strategy family

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use signalscan_core::indicators::{Indicator, Kdj, KdjLine, KdjParams, Macd, MacdParams, Sma};
use signalscan_core::{
    adjust, DailyBar, IndicatorFrame, ScanConstants, SignalDetector, Stock, StrategyConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────

/// Most-recent-first window with a share-count change halfway through.
fn make_window(n: usize) -> Vec<DailyBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let mut bars: Vec<DailyBar> = (0..n)
        .map(|i| {
            let close = 20.0 + (i as f64 * 0.1).sin() * 2.0;
            DailyBar {
                stock_id: "BENCH".into(),
                stock_name: "BENCH".into(),
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.1,
                high: close + 0.3,
                low: close - 0.3,
                close,
                volume: 1_000_000,
                amount: close * 1_000_000.0,
                change_pct: 0.8,
                turnover_pct: 1.2,
                volume_ratio: 1.0,
                total_shares: if i < n / 2 { 1.0e9 } else { 1.2e9 },
            }
        })
        .collect();
    bars.reverse();
    bars
}

// ── 1. Adjustment ────────────────────────────────────────────────────

fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust");
    for &n in &[30, 260, 520] {
        let window = make_window(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| adjust(black_box(&window)));
        });
    }
    group.finish();
}

// ── 2. Indicator frame ───────────────────────────────────────────────

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_frame");
    for &n in &[260, 520] {
        let series = adjust(&make_window(n)).unwrap();

        let single: Vec<Box<dyn Indicator>> = vec![Box::new(Sma::new(20))];
        group.bench_with_input(BenchmarkId::new("sma_20", n), &n, |b, _| {
            b.iter(|| IndicatorFrame::compute(black_box(series.clone()), black_box(&single)));
        });

        let mut stack: Vec<Box<dyn Indicator>> = Vec::new();
        for line in Macd::lines(MacdParams::standard()) {
            stack.push(Box::new(line));
        }
        for line in [KdjLine::K, KdjLine::D, KdjLine::KDDif] {
            stack.push(Box::new(Kdj::new(KdjParams::default(), line)));
        }
        group.bench_with_input(BenchmarkId::new("macd_kdj_stack", n), &n, |b, _| {
            b.iter(|| IndicatorFrame::compute(black_box(series.clone()), black_box(&stack)));
        });
    }
    group.finish();
}

// ── 3. Detector pipeline ─────────────────────────────────────────────

fn bench_detector(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector");
    let constants = ScanConstants::default();
    let stock = Stock::new("BENCH", "BENCH");

    let configs = [
        StrategyConfig::ma(5, 20),
        StrategyConfig::macd(12, 26, 9),
        StrategyConfig::macd_kdj(12, 26, 9),
        StrategyConfig::ma_macd(5, 10),
        StrategyConfig::halfboot(5, 10),
    ];
    for config in configs {
        let detector = SignalDetector::new(config, constants).unwrap();
        let window = make_window(detector.fetch_limit());
        let date = window[0].date;
        group.bench_function(config.label(), |b| {
            b.iter(|| detector.detect(black_box(&stock), black_box(&window), date));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_adjust, bench_frame, bench_detector);
criterion_main!(benches);
