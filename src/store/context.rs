use crate::core::TextMeasurer;
use crate::error::{ChartError, ChartResult};

use super::computed::Computed;
use super::module::ActionPayload;
use super::runtime::StoreCore;
use super::slice::{Slice, SliceSet};
use super::state::{ChartState, InitStoreState, SliceValue};

/// Handle passed to a running action.
///
/// Reads see the whole state tree; writes are limited to the slices granted
/// to the module the action belongs to.
pub struct ActionContext<'a> {
    core: &'a mut StoreCore,
    module: &'static str,
    grant: SliceSet,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(core: &'a mut StoreCore, module: &'static str, grant: SliceSet) -> Self {
        Self {
            core,
            module,
            grant,
        }
    }

    #[must_use]
    pub fn module_name(&self) -> &'static str {
        self.module
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        &self.core.state
    }

    #[must_use]
    pub fn init(&self) -> &InitStoreState {
        &self.core.init
    }

    #[must_use]
    pub fn measurer(&self) -> &dyn TextMeasurer {
        &*self.core.measurer
    }

    #[must_use]
    pub fn computed(&self) -> Computed<'_> {
        Computed::new(&self.core.state)
    }

    #[must_use]
    pub fn get<T: SliceValue>(&self) -> &T {
        T::get(&self.core.state)
    }

    /// Writes a slice; returns whether the value changed.
    ///
    /// The slice is queued for notification only when it changed.
    pub fn set<T: SliceValue>(&mut self, value: T) -> ChartResult<bool> {
        self.check_grant(T::SLICE)?;
        let slot = T::slot(&mut self.core.state);
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        self.core.mark_dirty(T::SLICE);
        Ok(true)
    }

    pub fn modify<T: SliceValue>(&mut self, f: impl FnOnce(&mut T)) -> ChartResult<bool> {
        self.check_grant(T::SLICE)?;
        let mut value = T::get(&self.core.state).clone();
        f(&mut value);
        self.set(value)
    }

    /// Queues a notification for `slice` without writing it.
    pub fn notify(&mut self, slice: Slice) {
        self.core.mark_dirty(slice);
    }

    /// Runs another action synchronously before returning.
    pub fn dispatch(&mut self, action: &str, payload: ActionPayload) -> ChartResult<()> {
        self.core.run_action(action, payload)
    }

    fn check_grant(&self, slice: Slice) -> ChartResult<()> {
        if self.grant.contains(slice) {
            return Ok(());
        }
        Err(ChartError::SliceWriteDenied {
            module: self.module.to_owned(),
            slice: slice.as_str().to_owned(),
        })
    }
}
