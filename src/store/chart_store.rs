use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::core::{
    Categories, ChartType, Datum, HeuristicTextMeasurer, Options, RawSeries, SeriesData,
    TextMeasurer,
};
use crate::error::{ChartError, ChartResult};
use crate::modules::{self, category, series_data};

use super::computed::Computed;
use super::module::ActionPayload;
use super::registry::ModuleRegistry;
use super::runtime::StoreCore;
use super::slice::Slice;
use super::snapshot::StoreSnapshot;
use super::state::{ChartState, InitStoreState};

/// Upper bound on slice notifications drained by one flush.
pub const MAX_NOTIFICATIONS_PER_FLUSH: usize = 1_024;

pub type SubscriberFn = Box<dyn FnMut(Slice, &ChartState) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    callback: SubscriberFn,
}

/// Reactive chart state store.
///
/// Actions are dispatched by name; every write queues its slice, and the
/// queue is drained once the outermost dispatch returns. Draining runs the
/// observers watching each slice, in module registration order, and then the
/// external subscribers.
///
/// A failed dispatch (an action error, a cycle or the notification limit)
/// keeps the slices already written but drops the pending notifications, so
/// slices derived from them can be stale until [`Store::refresh`] runs.
pub struct Store {
    core: StoreCore,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    batch_depth: usize,
}

impl Store {
    /// Builds a store over the default module set with heuristic text metrics.
    pub fn new(init: InitStoreState) -> ChartResult<Self> {
        let registry = Arc::new(modules::default_registry()?);
        Self::with_parts(registry, init, Arc::new(HeuristicTextMeasurer))
    }

    pub fn with_measurer(
        init: InitStoreState,
        measurer: Arc<dyn TextMeasurer>,
    ) -> ChartResult<Self> {
        let registry = Arc::new(modules::default_registry()?);
        Self::with_parts(registry, init, measurer)
    }

    pub fn with_parts(
        registry: Arc<ModuleRegistry>,
        init: InitStoreState,
        measurer: Arc<dyn TextMeasurer>,
    ) -> ChartResult<Self> {
        let mut store = Self {
            core: StoreCore::new(registry, init, measurer),
            subscribers: Vec::new(),
            next_subscription: 0,
            batch_depth: 0,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&mut self) -> ChartResult<()> {
        let module_count = self.core.registry.modules().len();
        debug!(modules = module_count, "initialize store");
        for index in 0..module_count {
            if let Err(err) = self.core.init_module(index) {
                self.core.runtime.clear();
                return Err(err);
            }
        }
        self.core.runtime.clear_pending();
        if let Err(err) = self.core.run_all_observers() {
            self.core.runtime.clear();
            return Err(err);
        }
        self.flush()
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.core.state
    }

    #[must_use]
    pub fn init_state(&self) -> &InitStoreState {
        &self.core.init
    }

    #[must_use]
    pub fn computed(&self) -> Computed<'_> {
        Computed::new(&self.core.state)
    }

    #[must_use]
    pub fn registry(&self) -> &ModuleRegistry {
        &self.core.registry
    }

    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::from_state(&self.core.state)
    }

    /// Runs `action` and propagates the resulting notifications.
    pub fn dispatch(&mut self, action: &str, payload: ActionPayload) -> ChartResult<()> {
        debug!(action, payload = payload.kind(), "dispatch");
        if let Err(err) = self.core.run_action(action, payload) {
            self.core.runtime.clear();
            return Err(err);
        }
        self.flush_if_idle()
    }

    /// Re-runs every observer in registration order and drains the queue,
    /// bringing derived slices back in line after a failed dispatch.
    pub fn refresh(&mut self) -> ChartResult<()> {
        debug!("refresh derived state");
        if let Err(err) = self.core.run_all_observers() {
            self.core.runtime.clear();
            return Err(err);
        }
        self.flush_if_idle()
    }

    /// Forces a notification for `slice`.
    pub fn notify(&mut self, slice: Slice) -> ChartResult<()> {
        self.core.mark_dirty(slice);
        self.flush_if_idle()
    }

    /// Runs `f` with notification draining deferred until it returns.
    pub fn batch<T>(&mut self, f: impl FnOnce(&mut Self) -> ChartResult<T>) -> ChartResult<T> {
        self.batch_depth += 1;
        let result = f(self);
        self.batch_depth -= 1;
        match result {
            Ok(value) => {
                self.flush_if_idle()?;
                Ok(value)
            }
            Err(err) => {
                self.core.runtime.clear();
                Err(err)
            }
        }
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(Slice, &ChartState) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Returns `true` when a subscriber was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        if let Some(position) = self.subscribers.iter().position(|entry| entry.id == id) {
            self.subscribers.remove(position);
            return true;
        }
        false
    }

    /// Replaces the init snapshot and rebuilds every module from it.
    pub fn reset(&mut self, init: InitStoreState) -> ChartResult<()> {
        debug!(
            chart_types = init.series.0.len(),
            has_categories = init.categories.is_some(),
            "reset store"
        );
        self.core.init = init;
        let registry = Arc::clone(&self.core.registry);
        self.batch(|store| {
            for action in registry.reset_actions() {
                store.core.run_action(action, ActionPayload::None)?;
            }
            Ok(())
        })
    }

    pub fn set_data(
        &mut self,
        series: RawSeries,
        categories: Option<Categories>,
    ) -> ChartResult<()> {
        let init = InitStoreState {
            series,
            options: self.core.init.options.clone(),
            categories,
        };
        self.reset(init)
    }

    pub fn set_options(&mut self, options: Options) -> ChartResult<()> {
        let init = InitStoreState {
            options,
            ..self.core.init.clone()
        };
        self.reset(init)
    }

    /// Appends one datum per series of `chart_type`, and optionally a category.
    ///
    /// Series past the end of `data` get an empty slot so every series keeps
    /// the same length. More data than series is rejected before anything
    /// changes.
    ///
    /// With `series.shift` enabled the oldest datum and category are dropped
    /// so the window keeps its length.
    pub fn add_data(
        &mut self,
        chart_type: ChartType,
        data: Vec<Datum>,
        category: Option<String>,
    ) -> ChartResult<()> {
        let shift = self.core.state.options.series.shift;
        let mut init = self.core.init.clone();
        let Some(group) = init.series.get_mut(chart_type) else {
            return Err(ChartError::InvalidData(format!(
                "no `{}` series to append to",
                chart_type.as_str()
            )));
        };
        if data.len() > group.len() {
            return Err(ChartError::InvalidData(format!(
                "{} data values appended to {} `{}` series",
                data.len(),
                group.len(),
                chart_type.as_str()
            )));
        }
        if let Some(series) = group
            .iter()
            .find(|series| !matches!(series.data, SeriesData::Points(_)))
        {
            return Err(ChartError::InvalidData(format!(
                "series `{}` does not hold a data sequence",
                series.name
            )));
        }
        if data.len() < group.len() {
            debug!(
                chart_type = chart_type.as_str(),
                series = group.len(),
                data = data.len(),
                "padding appended data with empty slots"
            );
        }

        let mut data = data.into_iter();
        for series in group.iter_mut() {
            if let SeriesData::Points(points) = &mut series.data {
                points.push(data.next());
                if shift {
                    points.remove(0);
                }
            }
        }

        if let (Some(category), Some(Categories::List(labels))) =
            (category, init.categories.as_mut())
        {
            labels.push(category);
            if shift && !labels.is_empty() {
                labels.remove(0);
            }
        }

        trace!(chart_type = chart_type.as_str(), shift, "add data");
        self.core.init = init;
        self.batch(|store| {
            store
                .core
                .run_action(category::INIT_CATEGORY, ActionPayload::None)?;
            store
                .core
                .run_action(series_data::INIT_SERIES_DATA, ActionPayload::None)
        })
    }

    fn flush_if_idle(&mut self) -> ChartResult<()> {
        if self.batch_depth > 0 {
            return Ok(());
        }
        self.flush()
    }

    /// Drains the notification queue to a fixed point.
    fn flush(&mut self) -> ChartResult<()> {
        let mut notifications = 0usize;
        while let Some(slice) = self.core.runtime.pop() {
            notifications += 1;
            if notifications > MAX_NOTIFICATIONS_PER_FLUSH {
                warn!(
                    limit = MAX_NOTIFICATIONS_PER_FLUSH,
                    slice = slice.as_str(),
                    pending = self.core.runtime.pending_len(),
                    "notification limit exceeded; dropping pending notifications"
                );
                self.core.runtime.clear();
                return Err(ChartError::NotificationLimit {
                    limit: MAX_NOTIFICATIONS_PER_FLUSH,
                    slice: slice.as_str().to_owned(),
                });
            }

            trace!(slice = slice.as_str(), "notify slice");
            if let Err(err) = self.core.run_observers(slice) {
                self.core.runtime.clear();
                return Err(err);
            }
            for subscriber in &mut self.subscribers {
                (subscriber.callback)(slice, &self.core.state);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("registry", &self.core.registry)
            .field("subscribers", &self.subscribers.len())
            .field("batch_depth", &self.batch_depth)
            .finish_non_exhaustive()
    }
}
