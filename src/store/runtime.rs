use std::collections::VecDeque;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;

use crate::core::TextMeasurer;
use crate::error::{ChartError, ChartResult};

use super::context::ActionContext;
use super::module::ActionPayload;
use super::registry::ModuleRegistry;
use super::slice::{Slice, SliceSet};
use super::state::{ChartState, InitStoreState};

/// Dispatch bookkeeping: the running action chain and the dirty-slice queue.
#[derive(Debug, Default)]
pub(crate) struct DispatchRuntime {
    call_stack: SmallVec<[&'static str; 8]>,
    pending: VecDeque<Slice>,
    queued: SliceSet,
}

impl DispatchRuntime {
    /// Queues `slice` unless it is already waiting.
    fn enqueue(&mut self, slice: Slice) -> bool {
        if self.queued.contains(slice) {
            return false;
        }
        self.queued = self.queued.with(slice);
        self.pending.push_back(slice);
        true
    }

    pub(crate) fn pop(&mut self) -> Option<Slice> {
        let slice = self.pending.pop_front()?;
        self.queued = self.queued.without(slice);
        Some(slice)
    }

    pub(crate) fn clear(&mut self) {
        self.call_stack.clear();
        self.pending.clear();
        self.queued = SliceSet::none();
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending.clear();
        self.queued = SliceSet::none();
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn cycle_chain(&self, action: &str) -> String {
        let mut chain = self.call_stack.join(" -> ");
        chain.push_str(" -> ");
        chain.push_str(action);
        chain
    }
}

/// Everything an action can reach: registry, state, init snapshot, measurer.
pub(crate) struct StoreCore {
    pub(crate) registry: Arc<ModuleRegistry>,
    pub(crate) state: ChartState,
    pub(crate) init: InitStoreState,
    pub(crate) measurer: Arc<dyn TextMeasurer>,
    pub(crate) runtime: DispatchRuntime,
}

impl StoreCore {
    pub(crate) fn new(
        registry: Arc<ModuleRegistry>,
        init: InitStoreState,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        Self {
            registry,
            state: ChartState::default(),
            init,
            measurer,
            runtime: DispatchRuntime::default(),
        }
    }

    pub(crate) fn mark_dirty(&mut self, slice: Slice) {
        if self.runtime.enqueue(slice) {
            trace!(slice = slice.as_str(), "queue slice notification");
        }
    }

    /// Runs one action to completion, guarding against re-entry.
    pub(crate) fn run_action(&mut self, action: &str, payload: ActionPayload) -> ChartResult<()> {
        let registry = Arc::clone(&self.registry);
        let (action, index) = registry
            .resolve(action)
            .ok_or_else(|| ChartError::UnknownAction(action.to_owned()))?;
        let Some(module) = registry.module(index) else {
            return Err(ChartError::UnknownAction(action.to_owned()));
        };

        if self.runtime.call_stack.contains(&action) {
            return Err(ChartError::ActionCycle {
                action: action.to_owned(),
                chain: self.runtime.cycle_chain(action),
            });
        }

        trace!(
            action,
            module = module.name(),
            depth = self.runtime.call_stack.len(),
            "run action"
        );
        self.runtime.call_stack.push(action);
        let result = {
            let mut ctx = ActionContext::new(self, module.name(), registry.grant(index));
            module.run_action(action, &mut ctx, payload)
        };
        self.runtime.call_stack.pop();
        result
    }

    pub(crate) fn init_module(&mut self, index: usize) -> ChartResult<()> {
        let registry = Arc::clone(&self.registry);
        let Some(module) = registry.module(index) else {
            return Ok(());
        };
        trace!(module = module.name(), "init module state");
        let mut ctx = ActionContext::new(self, module.name(), registry.grant(index));
        module.init_state(&mut ctx)
    }

    /// Runs every observer watching `slice`; returns how many ran.
    pub(crate) fn run_observers(&mut self, slice: Slice) -> ChartResult<usize> {
        let registry = Arc::clone(&self.registry);
        let mut count = 0;
        for observer in registry.observers_for(slice) {
            trace!(
                observer = observer.name,
                slice = slice.as_str(),
                "run observer"
            );
            for action in observer.dispatch {
                self.run_action(action, ActionPayload::None)?;
            }
            count += 1;
        }
        Ok(count)
    }

    pub(crate) fn run_all_observers(&mut self) -> ChartResult<()> {
        let registry = Arc::clone(&self.registry);
        for observer in registry.all_observers() {
            for action in observer.dispatch {
                self.run_action(action, ActionPayload::None)?;
            }
        }
        Ok(())
    }
}
