use serde::{Deserialize, Serialize};

use crate::core::Rect;
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Slice, StoreModule};

pub const INIT_LAYOUT: &str = "initLayout";
pub const SET_LAYOUT: &str = "setLayout";

pub const DEFAULT_CHART_WIDTH: f64 = 800.0;
pub const DEFAULT_CHART_HEIGHT: f64 = 500.0;

/// Pixel rects of the axes and the plot, supplied by the layout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Layout {
    pub x_axis: Rect,
    pub y_axis: Rect,
    pub secondary_y_axis: Rect,
    pub plot: Rect,
}

impl Layout {
    /// Layout with zero-thickness axes hugging `plot`.
    #[must_use]
    pub fn from_plot(plot: Rect) -> Self {
        Self {
            x_axis: Rect::new(plot.x, plot.y + plot.height, plot.width, 0.0),
            y_axis: Rect::new(plot.x, plot.y, 0.0, plot.height),
            secondary_y_axis: Rect::new(plot.x + plot.width, plot.y, 0.0, plot.height),
            plot,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutModule;

impl StoreModule for LayoutModule {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Layout]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[INIT_LAYOUT, SET_LAYOUT]
    }

    fn reset_actions(&self) -> &'static [&'static str] {
        &[INIT_LAYOUT]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            INIT_LAYOUT => init_layout(ctx),
            SET_LAYOUT => match payload {
                ActionPayload::Layout(layout) => ctx.set(layout).map(drop),
                _ => Err(ActionPayload::mismatch(action, "a layout")),
            },
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn init_layout(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let chart = &ctx.state().options.chart;
    let width = chart.width.unwrap_or(DEFAULT_CHART_WIDTH);
    let height = chart.height.unwrap_or(DEFAULT_CHART_HEIGHT);
    ctx.set(Layout::from_plot(Rect::sized(width, height)))?;
    Ok(())
}
