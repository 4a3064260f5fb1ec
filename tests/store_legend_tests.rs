use approx::assert_relative_eq;
use chart_store::core::{
    Align, ChartType, LegendIconType, Options, RawSeries, SeriesInput, Theme,
};
use chart_store::modules::legend::{
    SET_ALL_LEGEND_ACTIVE_STATE, SET_LEGEND_ACTIVE_STATE, SET_LEGEND_CHECKED_STATE,
};
use chart_store::{ActionPayload, ChartError, InitStoreState, Store};

// 0.6em per glyph at the default 11px legend font.
const GLYPH: f64 = 6.6;
const DECORATION: f64 = 12.0 + 5.0 + 12.0 + 5.0;

fn store_from_json(series: &str, options: &str) -> Store {
    let series: RawSeries = serde_json::from_str(series).expect("parse series");
    let options: Options = serde_json::from_str(options).expect("parse options");
    Store::new(InitStoreState::new(series, options)).expect("store init")
}

fn combo_store() -> Store {
    let series = RawSeries::new()
        .with(
            ChartType::Line,
            vec![
                SeriesInput::values("a", &[1.0, 2.0]),
                SeriesInput::values("b", &[3.0, 4.0]),
            ],
        )
        .with(ChartType::Column, vec![SeriesInput::values("c", &[5.0, 6.0])]);
    Store::new(InitStoreState::new(series, Options::default())).expect("store init")
}

#[test]
fn entries_follow_series_declaration_order() {
    let store = combo_store();
    let legend = &store.state().legend;
    let theme = Theme::default();

    let labels: Vec<&str> = legend.data.iter().map(|datum| datum.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "b", "c"]);

    let icons: Vec<LegendIconType> = legend.data.iter().map(|datum| datum.icon_type).collect();
    assert_eq!(
        icons,
        vec![LegendIconType::Line, LegendIconType::Line, LegendIconType::Rect]
    );

    for (index, datum) in legend.data.iter().enumerate() {
        assert!(datum.active && datum.checked);
        assert_eq!(datum.color, Some(theme.series_color(index)));
    }
}

#[test]
fn unchecking_hides_the_series_but_keeps_its_color() {
    let mut store = combo_store();

    store
        .dispatch(
            SET_LEGEND_CHECKED_STATE,
            ActionPayload::LegendChecked {
                label: "b".to_owned(),
                checked: false,
            },
        )
        .expect("uncheck");

    let state = store.state();
    assert!(!state.legend.is_checked("b"));
    let line = state.series.group(ChartType::Line).expect("line group");
    let names: Vec<&str> = line.data.iter().map(|input| input.name.as_str()).collect();
    assert_eq!(names, vec!["a"]);
    assert_eq!(line.colors.len(), 2);
    assert_eq!(line.series_count, 2);
    assert_eq!(
        state.legend.datum("b").and_then(|datum| datum.color.clone()),
        Some(Theme::default().series_color(1))
    );
}

#[test]
fn active_state_can_be_set_per_entry_or_for_all() {
    let mut store = combo_store();

    store
        .dispatch(
            SET_LEGEND_ACTIVE_STATE,
            ActionPayload::LegendActive {
                label: "c".to_owned(),
                active: false,
            },
        )
        .expect("deactivate one");
    let active: Vec<bool> = store.state().legend.data.iter().map(|d| d.active).collect();
    assert_eq!(active, vec![true, true, false]);

    store
        .dispatch(SET_ALL_LEGEND_ACTIVE_STATE, ActionPayload::AllLegendActive(false))
        .expect("deactivate all");
    assert!(store.state().legend.data.iter().all(|datum| !datum.active));
}

#[test]
fn unknown_legend_label_is_an_error() {
    let mut store = combo_store();
    let before = store.state().clone();

    let err = store
        .dispatch(
            SET_LEGEND_CHECKED_STATE,
            ActionPayload::LegendChecked {
                label: "missing".to_owned(),
                checked: false,
            },
        )
        .expect_err("unknown label");

    assert!(matches!(err, ChartError::LegendEntryNotFound(label) if label == "missing"));
    assert_eq!(store.state(), &before);
}

#[test]
fn side_legend_width_fits_the_widest_item() {
    let store = store_from_json(r#"{"line": [{"name": "a", "data": [1, 2]}]}"#, "{}");
    let legend = &store.state().legend;

    assert!(legend.visible);
    assert_eq!(legend.align, Align::Right);
    assert_relative_eq!(legend.data[0].width, DECORATION + GLYPH, epsilon = 1e-9);
    assert_relative_eq!(legend.width, DECORATION + DECORATION + GLYPH, epsilon = 1e-9);
}

#[test]
fn top_legend_width_sums_items() {
    let store = store_from_json(
        r#"{"line": [{"name": "a", "data": [1]}, {"name": "bb", "data": [2]}]}"#,
        r#"{"legend": {"align": "top"}}"#,
    );
    let legend = &store.state().legend;

    let expected = (DECORATION + GLYPH) + (DECORATION + 2.0 * GLYPH) + 40.0;
    assert_relative_eq!(legend.width, expected, epsilon = 1e-9);
}

#[test]
fn hidden_legend_has_no_width() {
    let store = store_from_json(
        r#"{"line": [{"name": "a", "data": [1, 2]}]}"#,
        r#"{"legend": {"visible": false}}"#,
    );

    assert!(!store.state().legend.visible);
    assert_eq!(store.state().legend.width, 0.0);
}

#[test]
fn bubble_charts_get_a_circle_legend() {
    let store = store_from_json(
        r#"{"bubble": [{"name": "b1", "data": [{"x": 1, "y": 2, "r": 3}]}]}"#,
        "{}",
    );
    let circle = &store.state().circle_legend;
    let width = DECORATION + DECORATION + 2.0 * GLYPH;

    assert!(circle.visible);
    assert_relative_eq!(circle.width, width, epsilon = 1e-9);
    assert_relative_eq!(circle.radius, (width - 5.0) / 2.0, epsilon = 1e-9);
    assert_eq!(store.state().legend.data[0].icon_type, LegendIconType::Circle);
}

#[test]
fn scatter_series_keep_their_icon_type() {
    let store = store_from_json(
        r#"{"scatter": [
            {"name": "s1", "data": [[1, 2]], "iconType": "triangle"},
            {"name": "s2", "data": [[2, 3]]}
        ]}"#,
        "{}",
    );
    let legend = &store.state().legend;

    assert!(legend.use_scatter_chart_icon);
    assert_eq!(legend.data[0].icon_type, LegendIconType::Triangle);
    assert_eq!(legend.data[1].icon_type, LegendIconType::Circle);
}

#[test]
fn nested_pie_legend_lists_root_slices() {
    let store = store_from_json(
        r#"{"pie": [{"name": "browsers", "data": [
            {"name": "Chrome", "data": 50},
            {"name": "Edge", "data": 30},
            {"name": "Chrome 64", "parentName": "Chrome", "data": 20}
        ]}]}"#,
        "{}",
    );
    let legend = &store.state().legend;
    let theme = Theme::default();

    let labels: Vec<&str> = legend.data.iter().map(|datum| datum.label.as_str()).collect();
    assert_eq!(labels, vec!["Chrome", "Edge"]);
    assert_eq!(legend.data[0].color, Some(theme.series_color(0)));
    assert_eq!(legend.data[1].color, Some(theme.series_color(1)));

    let ring = store
        .state()
        .nested_pie_series
        .0
        .get("browsers")
        .expect("browsers ring");
    let child = ring
        .data
        .iter()
        .find(|slice| slice.name == "Chrome 64")
        .expect("child slice");
    assert_eq!(child.color, theme.series_color(0));
    assert_eq!(child.root_name, "Chrome");
}

#[test]
fn treemap_legend_is_hidden_without_color_value() {
    let store = store_from_json(
        r#"{"treemap": [{"name": "root", "data": [1, 2]}]}"#,
        "{}",
    );

    assert!(!store.state().legend.visible);
}
