use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{ChartError, ChartResult};

use super::module::{Observer, StoreModule};
use super::slice::{Slice, SliceSet};

/// Ordered set of store modules with resolved action names and slice grants.
///
/// All wiring mistakes (duplicate names, two owners for one slice, observers
/// that dispatch an undeclared action) are rejected here, before any state
/// exists.
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn StoreModule>>,
    actions: IndexMap<&'static str, usize>,
    owners: IndexMap<Slice, usize>,
    grants: Vec<SliceSet>,
}

impl ModuleRegistry {
    pub fn new(modules: Vec<Arc<dyn StoreModule>>) -> ChartResult<Self> {
        let mut names: IndexMap<&'static str, usize> = IndexMap::new();
        let mut actions: IndexMap<&'static str, usize> = IndexMap::new();
        let mut owners: IndexMap<Slice, usize> = IndexMap::new();
        let mut grants = Vec::with_capacity(modules.len());

        for (index, module) in modules.iter().enumerate() {
            let name = module.name();
            if names.insert(name, index).is_some() {
                return Err(ChartError::DuplicateModule(name.to_owned()));
            }

            for action in module.actions() {
                if let Some(first) = actions.insert(*action, index) {
                    return Err(ChartError::DuplicateAction {
                        action: (*action).to_owned(),
                        first: modules[first].name().to_owned(),
                        second: name.to_owned(),
                    });
                }
            }

            for slice in module.owned_slices() {
                if let Some(first) = owners.insert(*slice, index) {
                    return Err(ChartError::SliceOwnershipConflict {
                        slice: slice.as_str().to_owned(),
                        first: modules[first].name().to_owned(),
                        second: name.to_owned(),
                    });
                }
            }
            grants.push(SliceSet::from_slices(module.owned_slices()));
        }

        for module in &modules {
            let targets = module
                .observers()
                .iter()
                .flat_map(|observer| observer.dispatch.iter())
                .chain(module.reset_actions().iter());
            for action in targets {
                if !actions.contains_key(action) {
                    return Err(ChartError::UnknownAction(format!(
                        "{action} (referenced by module `{}`)",
                        module.name()
                    )));
                }
            }
        }

        debug!(
            modules = modules.len(),
            actions = actions.len(),
            slices = owners.len(),
            "built module registry"
        );

        Ok(Self {
            modules,
            actions,
            owners,
            grants,
        })
    }

    #[must_use]
    pub fn modules(&self) -> &[Arc<dyn StoreModule>] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, index: usize) -> Option<&Arc<dyn StoreModule>> {
        self.modules.get(index)
    }

    /// Resolves an action to its interned name and owning module index.
    #[must_use]
    pub fn resolve(&self, action: &str) -> Option<(&'static str, usize)> {
        self.actions
            .get_key_value(action)
            .map(|(name, index)| (*name, *index))
    }

    #[must_use]
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }

    #[must_use]
    pub fn owner_of(&self, slice: Slice) -> Option<&'static str> {
        self.owners
            .get(&slice)
            .and_then(|index| self.modules.get(*index))
            .map(|module| module.name())
    }

    #[must_use]
    pub fn grant(&self, index: usize) -> SliceSet {
        self.grants.get(index).copied().unwrap_or_default()
    }

    /// Observers watching `slice`, in module registration order.
    pub fn observers_for(&self, slice: Slice) -> impl Iterator<Item = &Observer> {
        self.modules
            .iter()
            .flat_map(|module| module.observers().iter())
            .filter(move |observer| observer.watches(slice))
    }

    pub fn all_observers(&self) -> impl Iterator<Item = &Observer> {
        self.modules
            .iter()
            .flat_map(|module| module.observers().iter())
    }

    pub fn reset_actions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules
            .iter()
            .flat_map(|module| module.reset_actions().iter().copied())
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field(
                "modules",
                &self.modules.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
