use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use chart_store::core::{
    Categories, CategoryKey, ChartType, Datum, Options, RawSeries, ScaleOptions, SeriesData,
    SeriesInput, Theme, ValueEdge, ViewRange, compute_scale,
};
use chart_store::modules::axes::SET_AXES_DATA;
use chart_store::modules::legend::SET_LEGEND_CHECKED_STATE;
use chart_store::modules::series_data::ZOOM;
use chart_store::{ActionPayload, InitStoreState, Store};
use proptest::prelude::*;

fn column_init(values: &[f64]) -> InitStoreState {
    let categories = (0..values.len()).map(|index| format!("c{index}")).collect();
    let series = RawSeries::new().with(ChartType::Column, vec![SeriesInput::values("v", values)]);
    InitStoreState::new(series, Options::default()).with_categories(Categories::List(categories))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn scale_limit_covers_the_data_range(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.01f64..1_000_000.0,
        offset in 50.0f64..2_000.0
    ) {
        let range = ValueEdge::new(min, min + span);
        let scale = compute_scale(range, offset, &ScaleOptions::default());
        let tolerance = 1e-6 * (span + min.abs() + 1.0);

        prop_assert!(scale.step_size > 0.0);
        prop_assert!(scale.step_count >= 1);
        prop_assert!(scale.limit.max > scale.limit.min);
        prop_assert!(scale.limit.min <= range.min + tolerance);
        prop_assert!(scale.limit.max >= range.max - tolerance);
    }

    #[test]
    fn coordinate_categories_are_sorted_and_distinct(
        xs in prop::collection::vec(-50i32..50, 1..30)
    ) {
        let points = xs
            .iter()
            .map(|x| Some(Datum::Pair(CategoryKey::Number(f64::from(*x)), 1.0)))
            .collect();
        let series = RawSeries::new().with(
            ChartType::Scatter,
            vec![SeriesInput::new("pts", SeriesData::Points(points))],
        );
        let store = Store::new(InitStoreState::new(series, Options::default()))
            .expect("store init");

        let expected: Vec<String> = xs
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(ToString::to_string)
            .collect();
        prop_assert_eq!(&store.state().raw_categories.0, &Categories::List(expected));
    }

    #[test]
    fn legend_follows_series_order_and_palette(count in 1usize..12) {
        let inputs = (0..count)
            .map(|index| SeriesInput::values(format!("s{index}"), &[index as f64]))
            .collect();
        let series = RawSeries::new().with(ChartType::Line, inputs);
        let store = Store::new(InitStoreState::new(series, Options::default()))
            .expect("store init");
        let theme = Theme::default();

        let legend = &store.state().legend;
        prop_assert_eq!(legend.data.len(), count);
        for (index, datum) in legend.data.iter().enumerate() {
            prop_assert_eq!(&datum.label, &format!("s{index}"));
            prop_assert_eq!(datum.color.clone(), Some(theme.series_color(index)));
        }
    }

    #[test]
    fn unchecking_one_entry_keeps_the_others_in_place(
        count in 1usize..12,
        pick in 0usize..12
    ) {
        let target = pick % count;
        let inputs = (0..count)
            .map(|index| SeriesInput::values(format!("s{index}"), &[index as f64]))
            .collect();
        let series = RawSeries::new().with(ChartType::Column, inputs);
        let mut store = Store::new(InitStoreState::new(series, Options::default()))
            .expect("store init");
        let before = store.state().legend.data.clone();

        store
            .dispatch(
                SET_LEGEND_CHECKED_STATE,
                ActionPayload::LegendChecked {
                    label: format!("s{target}"),
                    checked: false,
                },
            )
            .expect("uncheck");

        let after = &store.state().legend.data;
        prop_assert_eq!(after.len(), before.len());
        for (index, (old, new)) in before.iter().zip(after.iter()).enumerate() {
            prop_assert_eq!(&new.label, &old.label);
            prop_assert_eq!(new.active, old.active);
            prop_assert_eq!(&new.color, &old.color);
            prop_assert_eq!(new.checked, index != target);
        }
    }

    #[test]
    fn zoom_keeps_a_contiguous_window(
        len in 1usize..20,
        start in 0usize..30,
        end in 0usize..30
    ) {
        let values: Vec<f64> = (0..len).map(|index| index as f64).collect();
        let mut store = Store::new(column_init(&values)).expect("store init");

        store
            .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(start, end)))
            .expect("zoom");

        let window = ViewRange::new(start, end).normalized(len).expect("non-empty");
        let raw = store.state().raw_categories.0.x_labels().to_vec();
        let visible = store.state().categories.x_labels().to_vec();
        prop_assert_eq!(visible.len(), window.end - window.start + 1);
        prop_assert_eq!(&visible[..], &raw[window.start..=window.end]);
    }

    #[test]
    fn derived_state_is_a_fixed_point(
        values in prop::collection::vec(-1_000.0f64..1_000.0, 1..12)
    ) {
        let mut store = Store::new(column_init(&values)).expect("store init");
        let before = store.state().clone();
        let notified = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&notified);
        store.subscribe(move |_slice, _state| {
            *sink.lock().expect("counter lock") += 1;
        });

        store
            .dispatch(SET_AXES_DATA, ActionPayload::None)
            .expect("recompute axes");
        store.reset(column_init(&values)).expect("reset");

        prop_assert_eq!(store.state(), &before);
        prop_assert_eq!(*notified.lock().expect("counter lock"), 0);
    }
}
