use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::scale::PERCENT_STACK_STEP_SIZE;
use crate::core::{AxisName, ScaleData, ScaleOptions, ValueEdge, compute_scale};
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Observer, Slice, StoreModule};

pub const SET_SCALE: &str = "setScale";

const DIVERGING_PERCENT_STEP_COUNT: usize = 9;

/// Nice scale per axis, one entry per axis with a data range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ScaleState(pub IndexMap<AxisName, ScaleData>);

impl ScaleState {
    #[must_use]
    pub fn get(&self, axis_name: AxisName) -> Option<&ScaleData> {
        self.0.get(&axis_name)
    }
}

const SCALE_OBSERVERS: &[Observer] = &[Observer {
    name: "updateScale",
    watches: &[Slice::DataRange, Slice::Options, Slice::Layout],
    dispatch: &[SET_SCALE],
}];

#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleModule;

impl StoreModule for ScaleModule {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Scale]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[SET_SCALE]
    }

    fn observers(&self) -> &'static [Observer] {
        SCALE_OBSERVERS
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            SET_SCALE => set_scale(ctx),
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn set_scale(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let computed = ctx.computed();
    let value_axis = computed.value_axis_name();
    let percent_stack = computed.has_percent_stack();
    let state = ctx.state();
    let plot = state.layout.plot;
    let diverging = state.options.series.diverging;
    let default_options = ScaleOptions::default();

    let mut scale = IndexMap::with_capacity(state.data_range.0.len());
    for (axis_name, range) in &state.data_range.0 {
        let value_scale = *axis_name == value_axis || *axis_name == AxisName::SecondaryYAxis;
        let data = if percent_stack && value_scale {
            percent_stack_scale(*range, diverging)
        } else {
            let offset = if axis_name.is_horizontal() {
                plot.width
            } else {
                plot.height
            };
            let options = state
                .options
                .axis(*axis_name)
                .map_or(&default_options, |axis| &axis.scale);
            compute_scale(*range, offset, options)
        };
        scale.insert(*axis_name, data);
    }

    debug!(axes = scale.len(), "scale derived");
    ctx.set(ScaleState(scale))?;
    Ok(())
}

/// Percent stacks span 0..100, or -100..100 when values can go negative.
fn percent_stack_scale(range: ValueEdge, diverging: bool) -> ScaleData {
    if diverging || range.min < 0.0 {
        return ScaleData {
            limit: ValueEdge::new(-100.0, 100.0),
            step_size: PERCENT_STACK_STEP_SIZE,
            step_count: DIVERGING_PERCENT_STEP_COUNT,
        };
    }
    ScaleData::percent_stack()
}
