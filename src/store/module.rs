use crate::core::ViewRange;
use crate::error::{ChartError, ChartResult};
use crate::modules::layout::Layout;

use super::context::ActionContext;
use super::slice::Slice;

/// Re-runs `dispatch` whenever one of the `watches` slices is notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observer {
    pub name: &'static str,
    pub watches: &'static [Slice],
    pub dispatch: &'static [&'static str],
}

impl Observer {
    #[must_use]
    pub fn watches(&self, slice: Slice) -> bool {
        self.watches.contains(&slice)
    }
}

/// Arguments carried by a dispatched action.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionPayload {
    #[default]
    None,
    Layout(Layout),
    Zoom(ViewRange),
    LegendActive {
        label: String,
        active: bool,
    },
    LegendChecked {
        label: String,
        checked: bool,
    },
    AllLegendActive(bool),
}

impl ActionPayload {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::None => "no",
            Self::Layout(_) => "a layout",
            Self::Zoom(_) => "a zoom range",
            Self::LegendActive { .. } => "a legend active",
            Self::LegendChecked { .. } => "a legend checked",
            Self::AllLegendActive(_) => "an all-legend active",
        }
    }

    /// Error for an action that received the wrong payload variant.
    #[must_use]
    pub fn mismatch(action: &str, expected: &str) -> ChartError {
        ChartError::InvalidPayload {
            action: action.to_owned(),
            expected: expected.to_owned(),
        }
    }
}

/// A named unit of state ownership.
///
/// A module owns the slices it lists in `owned_slices` and is the only code
/// allowed to write them. Its actions are looked up by name through the
/// registry, and its observers re-dispatch actions when upstream slices
/// change.
pub trait StoreModule: Send + Sync {
    fn name(&self) -> &'static str;

    fn owned_slices(&self) -> &'static [Slice];

    fn actions(&self) -> &'static [&'static str];

    fn observers(&self) -> &'static [Observer] {
        &[]
    }

    /// Actions that rebuild this module's slices from the init snapshot.
    fn reset_actions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Derives this module's slices when the store is built.
    fn init_state(&self, ctx: &mut ActionContext<'_>) -> ChartResult<()> {
        for action in self.reset_actions() {
            ctx.dispatch(action, ActionPayload::None)?;
        }
        Ok(())
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        payload: ActionPayload,
    ) -> ChartResult<()>;
}
