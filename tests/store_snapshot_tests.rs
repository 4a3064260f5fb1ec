use chart_store::core::{Categories, ChartType, Options, RawSeries, SeriesInput, ViewRange};
use chart_store::modules::series_data::ZOOM;
use chart_store::store::STORE_SNAPSHOT_JSON_SCHEMA_V1;
use chart_store::{ActionPayload, InitStoreState, Store, StoreSnapshot};

fn zoomed_store() -> Store {
    let series = RawSeries::new()
        .with(
            ChartType::Column,
            vec![SeriesInput::values("sales", &[10.0, -20.0, 30.0, 5.0])],
        )
        .with(ChartType::Line, vec![SeriesInput::values("rate", &[1.0, 2.0, 3.0, 4.0])]);
    let options: Options = serde_json::from_str(
        r#"{"secondaryYAxis": {"chartType": "line", "title": "Rate"}, "legend": {"align": "bottom"}}"#,
    )
    .expect("parse options");
    let init = InitStoreState::new(series, options).with_categories(Categories::List(
        ["Q1", "Q2", "Q3", "Q4"].iter().map(|c| (*c).to_owned()).collect(),
    ));
    let mut store = Store::new(init).expect("store init");
    store
        .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(1, 3)))
        .expect("zoom");
    store
}

#[test]
fn snapshot_contract_v1_keeps_every_derived_slice() {
    let store = zoomed_store();
    let snapshot = store.snapshot();

    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    let restored = StoreSnapshot::from_json_compat_str(&json).expect("parse contract");

    assert_eq!(restored, snapshot);
    assert_eq!(restored.zoom_range, Some(ViewRange::new(1, 3)));
}

#[test]
fn snapshot_json_uses_camel_case_keys() {
    let json = zoomed_store()
        .snapshot()
        .to_json_contract_v1_pretty()
        .expect("serialize");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

    assert_eq!(
        value["schema_version"].as_u64(),
        Some(u64::from(STORE_SNAPSHOT_JSON_SCHEMA_V1))
    );
    let snapshot = &value["snapshot"];
    assert!(snapshot["rawCategories"].is_array());
    assert!(snapshot["dataRange"]["secondaryYAxis"].is_object());
    assert!(snapshot["scale"]["yAxis"]["stepSize"].is_number());
    assert_eq!(snapshot["axes"]["xAxis"]["axis"]["role"]["kind"], "label");
    assert_eq!(snapshot["legend"]["align"], "bottom");
}

#[test]
fn bare_snapshot_json_is_accepted() {
    let snapshot = zoomed_store().snapshot();
    let bare = serde_json::to_string(&snapshot).expect("serialize bare");

    let restored = StoreSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(restored, snapshot);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let json = zoomed_store()
        .snapshot()
        .to_json_contract_v1_pretty()
        .expect("serialize");
    let mut value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    value["schema_version"] = serde_json::Value::from(2);

    let err = StoreSnapshot::from_json_compat_str(&value.to_string()).expect_err("version 2");
    assert!(err.to_string().contains("unsupported snapshot schema version"));
}
