use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chart_store::core::{
    AxisName, Categories, ChartType, HeuristicTextMeasurer, Options, RawSeries, Rect, ScaleData,
    SeriesInput, ViewRange,
};
use chart_store::modules::layout::{Layout, SET_LAYOUT};
use chart_store::modules::series_data::ZOOM;
use chart_store::modules::{OptionsModule, ScaleState, default_modules};
use chart_store::store::{
    ActionContext, MAX_NOTIFICATIONS_PER_FLUSH, ModuleRegistry, Observer, StoreModule, ZoomRange,
};
use chart_store::{ActionPayload, ChartError, ChartResult, InitStoreState, Slice, Store};

fn column_init() -> InitStoreState {
    let series = RawSeries::new().with(
        ChartType::Column,
        vec![SeriesInput::values("a", &[10.0, 20.0, 30.0])],
    );
    InitStoreState::new(series, Options::default()).with_categories(Categories::List(vec![
        "Jan".to_owned(),
        "Feb".to_owned(),
        "Mar".to_owned(),
    ]))
}

fn recorder(store: &mut Store) -> Arc<Mutex<Vec<Slice>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |slice, _state| {
        sink.lock().expect("recorder lock").push(slice);
    });
    seen
}

/// Test module with a configurable action list that does nothing.
struct Inert {
    name: &'static str,
    owned: &'static [Slice],
    actions: &'static [&'static str],
    observers: &'static [Observer],
}

impl StoreModule for Inert {
    fn name(&self) -> &'static str {
        self.name
    }

    fn owned_slices(&self) -> &'static [Slice] {
        self.owned
    }

    fn actions(&self) -> &'static [&'static str] {
        self.actions
    }

    fn observers(&self) -> &'static [Observer] {
        self.observers
    }

    fn run_action(
        &self,
        _action: &str,
        _ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        Ok(())
    }
}

fn registry_with(extra: impl StoreModule + 'static) -> ChartResult<ModuleRegistry> {
    let mut modules = default_modules();
    modules.push(Arc::new(extra));
    ModuleRegistry::new(modules)
}

#[test]
fn unknown_action_is_rejected() {
    let mut store = Store::new(column_init()).expect("store init");
    let before = store.state().clone();

    let err = store
        .dispatch("noSuchAction", ActionPayload::None)
        .expect_err("unknown action");

    assert!(matches!(err, ChartError::UnknownAction(name) if name == "noSuchAction"));
    assert_eq!(store.state(), &before);
}

#[test]
fn duplicate_module_names_are_rejected() {
    let err = ModuleRegistry::new(vec![Arc::new(OptionsModule), Arc::new(OptionsModule)])
        .expect_err("duplicate module");

    assert!(matches!(err, ChartError::DuplicateModule(name) if name == "options"));
}

#[test]
fn duplicate_action_names_are_rejected() {
    let err = registry_with(Inert {
        name: "copycat",
        owned: &[],
        actions: &["setLayout"],
        observers: &[],
    })
    .expect_err("duplicate action");

    match err {
        ChartError::DuplicateAction {
            action,
            first,
            second,
        } => {
            assert_eq!(action, "setLayout");
            assert_eq!(first, "layout");
            assert_eq!(second, "copycat");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn slices_have_a_single_owner() {
    let err = registry_with(Inert {
        name: "usurper",
        owned: &[Slice::Scale],
        actions: &[],
        observers: &[],
    })
    .expect_err("ownership conflict");

    assert!(matches!(
        err,
        ChartError::SliceOwnershipConflict { slice, first, second }
            if slice == "scale" && first == "scale" && second == "usurper"
    ));
}

#[test]
fn observers_must_name_declared_actions() {
    const DANGLING: &[Observer] = &[Observer {
        name: "dangling",
        watches: &[Slice::Layout],
        dispatch: &["neverDeclared"],
    }];
    let err = registry_with(Inert {
        name: "dangling",
        owned: &[],
        actions: &[],
        observers: DANGLING,
    })
    .expect_err("dangling observer");

    assert!(matches!(err, ChartError::UnknownAction(_)));
}

#[test]
fn default_registry_owns_every_slice() {
    let store = Store::new(InitStoreState::default()).expect("store init");
    let registry = store.registry();

    for slice in Slice::ALL {
        assert!(registry.owner_of(slice).is_some(), "{} has no owner", slice.as_str());
    }
    assert_eq!(registry.owner_of(Slice::ZoomRange), Some("seriesData"));
    assert_eq!(registry.owner_of(Slice::CircleLegend), Some("legend"));
    assert_eq!(
        registry.reset_actions().collect::<Vec<_>>(),
        vec![
            "initOptions",
            "initLayout",
            "initSeriesData",
            "initCategory",
            "initAxes",
            "initLegendState",
        ]
    );
}

struct Rogue;

impl StoreModule for Rogue {
    fn name(&self) -> &'static str {
        "rogue"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[]
    }

    fn actions(&self) -> &'static [&'static str] {
        &["rogueWrite"]
    }

    fn run_action(
        &self,
        _action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        ctx.set(Layout::from_plot(Rect::sized(1.0, 1.0)))?;
        Ok(())
    }
}

#[test]
fn writes_outside_the_grant_are_denied() {
    let registry = Arc::new(registry_with(Rogue).expect("registry"));
    let mut store = Store::with_parts(registry, column_init(), Arc::new(HeuristicTextMeasurer))
        .expect("store init");
    let layout = store.state().layout.clone();

    let err = store
        .dispatch("rogueWrite", ActionPayload::None)
        .expect_err("write denied");

    assert!(matches!(
        err,
        ChartError::SliceWriteDenied { module, slice } if module == "rogue" && slice == "layout"
    ));
    assert_eq!(store.state().layout, layout);
    store
        .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(0, 1)))
        .expect("store stays usable");
}

struct PingPong;

impl StoreModule for PingPong {
    fn name(&self) -> &'static str {
        "pingPong"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[]
    }

    fn actions(&self) -> &'static [&'static str] {
        &["ping", "pong"]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            "ping" => ctx.dispatch("pong", ActionPayload::None),
            _ => ctx.dispatch("ping", ActionPayload::None),
        }
    }
}

#[test]
fn reentrant_actions_report_the_chain() {
    let registry = Arc::new(registry_with(PingPong).expect("registry"));
    let mut store = Store::with_parts(registry, column_init(), Arc::new(HeuristicTextMeasurer))
        .expect("store init");

    let err = store
        .dispatch("ping", ActionPayload::None)
        .expect_err("cycle");

    match err {
        ChartError::ActionCycle { action, chain } => {
            assert_eq!(action, "ping");
            assert_eq!(chain, "ping -> pong -> ping");
        }
        other => panic!("unexpected error: {other}"),
    }
    store
        .dispatch(SET_LAYOUT, ActionPayload::Layout(store.state().layout.clone()))
        .expect("store stays usable");
}

const LEFT_OBSERVERS: &[Observer] = &[Observer {
    name: "onScale",
    watches: &[Slice::Scale],
    dispatch: &["bumpLayout"],
}];

const RIGHT_OBSERVERS: &[Observer] = &[Observer {
    name: "onLayout",
    watches: &[Slice::Layout],
    dispatch: &["bumpScale"],
}];

/// Grows the plot whenever the scale changes, once kicked.
struct Left;

impl StoreModule for Left {
    fn name(&self) -> &'static str {
        "left"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Layout, Slice::ZoomRange]
    }

    fn actions(&self) -> &'static [&'static str] {
        &["kick", "stop", "bumpLayout"]
    }

    fn observers(&self) -> &'static [Observer] {
        LEFT_OBSERVERS
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            "kick" => {
                ctx.set(ZoomRange(Some(ViewRange::new(0, 0))))?;
                bump_layout(ctx)
            }
            "stop" => ctx.set(ZoomRange(None)).map(drop),
            _ => bump_layout(ctx),
        }
    }
}

fn bump_layout(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    if ctx.state().zoom_range.0.is_none() {
        return Ok(());
    }
    ctx.modify(|layout: &mut Layout| layout.plot.width += 1.0)?;
    Ok(())
}

/// Grows the scale whenever the layout changes, once kicked.
struct Right;

impl StoreModule for Right {
    fn name(&self) -> &'static str {
        "right"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Scale]
    }

    fn actions(&self) -> &'static [&'static str] {
        &["bumpScale"]
    }

    fn observers(&self) -> &'static [Observer] {
        RIGHT_OBSERVERS
    }

    fn run_action(
        &self,
        _action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        if ctx.state().zoom_range.0.is_none() {
            return Ok(());
        }
        ctx.modify(|scale: &mut ScaleState| {
            scale
                .0
                .entry(AxisName::YAxis)
                .or_insert_with(ScaleData::percent_stack)
                .step_count += 1;
        })?;
        Ok(())
    }
}

#[test]
fn runaway_propagation_hits_the_notification_limit() {
    let registry = Arc::new(
        ModuleRegistry::new(vec![Arc::new(Left), Arc::new(Right)]).expect("registry"),
    );
    let mut store = Store::with_parts(
        registry,
        InitStoreState::default(),
        Arc::new(HeuristicTextMeasurer),
    )
    .expect("store init");

    let err = store
        .dispatch("kick", ActionPayload::None)
        .expect_err("notification limit");

    assert!(matches!(
        err,
        ChartError::NotificationLimit { limit, .. } if limit == MAX_NOTIFICATIONS_PER_FLUSH
    ));

    let seen = recorder(&mut store);
    store
        .dispatch("stop", ActionPayload::None)
        .expect("store stays usable");
    assert_eq!(*seen.lock().expect("recorder lock"), vec![Slice::ZoomRange]);
}

static ZOOM_GUARD_FAILS: AtomicBool = AtomicBool::new(false);

/// Fails once when the zoom range changes, ahead of the category module.
struct ZoomGuard;

impl StoreModule for ZoomGuard {
    fn name(&self) -> &'static str {
        "zoomGuard"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[]
    }

    fn actions(&self) -> &'static [&'static str] {
        &["checkZoom"]
    }

    fn observers(&self) -> &'static [Observer] {
        &[Observer {
            name: "guardZoom",
            watches: &[Slice::ZoomRange],
            dispatch: &["checkZoom"],
        }]
    }

    fn run_action(
        &self,
        _action: &str,
        _ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        if ZOOM_GUARD_FAILS.swap(false, Ordering::SeqCst) {
            return Err(ChartError::InvalidData("zoom rejected once".to_owned()));
        }
        Ok(())
    }
}

#[test]
fn refresh_rederives_slices_after_a_failed_dispatch() {
    let mut modules = default_modules();
    modules.insert(3, Arc::new(ZoomGuard));
    let registry = Arc::new(ModuleRegistry::new(modules).expect("registry"));
    let mut store = Store::with_parts(registry, column_init(), Arc::new(HeuristicTextMeasurer))
        .expect("store init");

    ZOOM_GUARD_FAILS.store(true, Ordering::SeqCst);
    store
        .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(1, 2)))
        .expect_err("guard fails");

    assert_eq!(store.state().zoom_range, ZoomRange(Some(ViewRange::new(1, 2))));
    assert_eq!(store.state().categories.len(), 3, "categories are stale");

    store.refresh().expect("refresh");
    assert_eq!(
        store.state().categories,
        Categories::List(vec!["Feb".to_owned(), "Mar".to_owned()])
    );
}

#[test]
fn unchanged_writes_do_not_notify() {
    let mut store = Store::new(column_init()).expect("store init");
    let seen = recorder(&mut store);

    let layout = store.state().layout.clone();
    store
        .dispatch(SET_LAYOUT, ActionPayload::Layout(layout))
        .expect("same layout");
    store
        .dispatch("setAxesData", ActionPayload::None)
        .expect("recompute axes");

    assert!(seen.lock().expect("recorder lock").is_empty());
}

#[test]
fn batch_coalesces_notifications() {
    let mut store = Store::new(column_init()).expect("store init");
    let seen = recorder(&mut store);

    store
        .batch(|store| {
            store.dispatch(
                SET_LAYOUT,
                ActionPayload::Layout(Layout::from_plot(Rect::sized(900.0, 500.0))),
            )?;
            store.dispatch(
                SET_LAYOUT,
                ActionPayload::Layout(Layout::from_plot(Rect::sized(1000.0, 500.0))),
            )?;
            assert!(seen.lock().expect("recorder lock").is_empty());
            Ok(())
        })
        .expect("batch");

    let seen = seen.lock().expect("recorder lock");
    assert_eq!(seen.iter().filter(|slice| **slice == Slice::Layout).count(), 1);
    assert_eq!(store.state().layout.plot.width, 1000.0);
}

#[test]
fn observers_run_before_subscribers_see_downstream_slices() {
    let mut store = Store::new(column_init()).expect("store init");
    let seen = recorder(&mut store);

    store
        .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(0, 1)))
        .expect("zoom");

    let seen = seen.lock().expect("recorder lock");
    assert_eq!(seen.first(), Some(&Slice::ZoomRange));
    assert!(seen.contains(&Slice::Categories));
    assert!(seen.contains(&Slice::Series));
    assert!(seen.contains(&Slice::Axes));
    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), seen.len(), "each slice notified once: {seen:?}");
}

#[test]
fn unsubscribed_callbacks_are_not_called() {
    let mut store = Store::new(column_init()).expect("store init");
    let seen = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&seen);
    let id = store.subscribe(move |_slice, _state| {
        *sink.lock().expect("counter lock") += 1;
    });

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store
        .dispatch(ZOOM, ActionPayload::Zoom(ViewRange::new(0, 1)))
        .expect("zoom");

    assert_eq!(*seen.lock().expect("counter lock"), 0);
}

#[test]
fn reset_with_the_same_input_is_a_no_op() {
    let mut store = Store::new(column_init()).expect("store init");
    let before = store.state().clone();
    let seen = recorder(&mut store);

    store.reset(column_init()).expect("reset");

    assert_eq!(store.state(), &before);
    assert!(seen.lock().expect("recorder lock").is_empty());
}
