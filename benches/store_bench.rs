use chart_store::core::{
    Categories, ChartType, Options, RawSeries, ScaleOptions, SeriesInput, ValueEdge, ViewRange,
    compute_scale,
};
use chart_store::modules::series_data::ZOOM;
use chart_store::{ActionPayload, InitStoreState, Store};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn combo_init(points: usize) -> InitStoreState {
    let categories: Vec<String> = (0..points).map(|i| format!("2024-01-{:02}", i % 28 + 1)).collect();
    let wave = |phase: f64| -> Vec<f64> {
        (0..points)
            .map(|i| ((i as f64) * 0.1 + phase).sin() * 100.0)
            .collect()
    };
    let series = RawSeries::new()
        .with(
            ChartType::Column,
            vec![
                SeriesInput::values("north", &wave(0.0)),
                SeriesInput::values("south", &wave(1.0)),
            ],
        )
        .with(ChartType::Line, vec![SeriesInput::values("trend", &wave(2.0))]);
    InitStoreState::new(series, Options::default()).with_categories(Categories::List(categories))
}

fn bench_compute_scale(c: &mut Criterion) {
    let options = ScaleOptions::default();
    c.bench_function("compute_scale", |b| {
        b.iter(|| {
            let _ = compute_scale(
                black_box(ValueEdge::new(-1_234.5, 98_765.4)),
                black_box(640.0),
                &options,
            );
        })
    });
}

fn bench_store_init_1k(c: &mut Criterion) {
    let init = combo_init(1_000);
    c.bench_function("store_init_1k", |b| {
        b.iter(|| {
            let store = Store::new(black_box(init.clone())).expect("store init");
            black_box(store.state().axes.x_axis.is_some());
        })
    });
}

fn bench_store_zoom_1k(c: &mut Criterion) {
    let mut store = Store::new(combo_init(1_000)).expect("store init");
    let mut start = 0usize;
    c.bench_function("store_zoom_1k", |b| {
        b.iter(|| {
            start = (start + 37) % 900;
            store
                .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(start, start + 99)))
                .expect("zoom");
            black_box(store.state().categories.len());
        })
    });
}

criterion_group!(
    benches,
    bench_compute_scale,
    bench_store_init_1k,
    bench_store_zoom_1k
);
criterion_main!(benches);
