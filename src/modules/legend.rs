//! Legend entries, their interaction state and the legend box size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{
    Align, ChartType, LegendIconType, RawSeries, SeriesData, SeriesLookup, TextMeasurer,
    TextStyle,
};
use crate::error::{ChartError, ChartResult};
use crate::store::computed::use_spectrum_legend;
use crate::store::{ActionContext, ActionPayload, Observer, Slice, StoreModule};

pub const INIT_LEGEND_STATE: &str = "initLegendState";
pub const SET_LEGEND_LAYOUT: &str = "setLegendLayout";
pub const SET_LEGEND_ACTIVE_STATE: &str = "setLegendActiveState";
pub const SET_ALL_LEGEND_ACTIVE_STATE: &str = "setAllLegendActiveState";
pub const SET_LEGEND_CHECKED_STATE: &str = "setLegendCheckedState";
pub const UPDATE_LEGEND_COLOR: &str = "updateLegendColor";
pub const UPDATE_LEGEND_ICON: &str = "updateLegendIcon";
pub const UPDATE_NESTED_PIE_CHART_LEGEND: &str = "updateNestedPieChartLegend";

pub const LEGEND_CHECKBOX_SIZE: f64 = 12.0;
pub const LEGEND_ICON_SIZE: f64 = 12.0;
pub const LEGEND_ITEM_MARGIN_X: f64 = 40.0;
pub const LEGEND_MARGIN_X: f64 = 5.0;
const SPECTRUM_BAR_HEIGHT: f64 = 6.0;
const SPECTRUM_BAR_PADDING: f64 = 5.0;
const SPECTRUM_TOOLTIP_POINT_HEIGHT: f64 = 6.0;
const SPECTRUM_TOOLTIP_PADDING: f64 = 6.0;
const LAYOUT_PADDING_X: f64 = 10.0;
const MAX_INITIAL_WIDTH: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendDatum {
    pub label: String,
    pub active: bool,
    pub checked: bool,
    pub width: f64,
    pub icon_type: LegendIconType,
    pub chart_type: ChartType,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendState {
    pub use_spectrum_legend: bool,
    pub use_scatter_chart_icon: bool,
    pub data: Vec<LegendDatum>,
    pub visible: bool,
    pub align: Align,
    pub show_checkbox: bool,
    pub width: f64,
}

impl LegendState {
    #[must_use]
    pub fn datum(&self, label: &str) -> Option<&LegendDatum> {
        self.data.iter().find(|datum| datum.label == label)
    }

    /// Series without a legend entry count as checked.
    #[must_use]
    pub fn is_checked(&self, label: &str) -> bool {
        self.datum(label).is_none_or(|datum| datum.checked)
    }

    fn datum_mut(&mut self, label: &str) -> ChartResult<&mut LegendDatum> {
        self.data
            .iter_mut()
            .find(|datum| datum.label == label)
            .ok_or_else(|| ChartError::LegendEntryNotFound(label.to_owned()))
    }
}

/// Bubble size legend drawn under the regular legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct CircleLegendState {
    pub visible: bool,
    pub width: f64,
    pub radius: f64,
}

const LEGEND_OBSERVERS: &[Observer] = &[
    Observer {
        name: "updateLegendLayout",
        watches: &[Slice::Options, Slice::Theme, Slice::Series],
        dispatch: &[SET_LEGEND_LAYOUT],
    },
    Observer {
        name: "updateNestedPieLegend",
        watches: &[Slice::NestedPieSeries],
        dispatch: &[UPDATE_NESTED_PIE_CHART_LEGEND],
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct LegendModule;

impl StoreModule for LegendModule {
    fn name(&self) -> &'static str {
        "legend"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Legend, Slice::CircleLegend]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[
            INIT_LEGEND_STATE,
            SET_LEGEND_LAYOUT,
            SET_LEGEND_ACTIVE_STATE,
            SET_ALL_LEGEND_ACTIVE_STATE,
            SET_LEGEND_CHECKED_STATE,
            UPDATE_LEGEND_COLOR,
            UPDATE_LEGEND_ICON,
            UPDATE_NESTED_PIE_CHART_LEGEND,
        ]
    }

    fn observers(&self) -> &'static [Observer] {
        LEGEND_OBSERVERS
    }

    fn reset_actions(&self) -> &'static [&'static str] {
        &[INIT_LEGEND_STATE]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        payload: ActionPayload,
    ) -> ChartResult<()> {
        match (action, payload) {
            (INIT_LEGEND_STATE, _) => init_legend_state(ctx),
            (SET_LEGEND_LAYOUT, _) => set_legend_layout(ctx),
            (SET_LEGEND_ACTIVE_STATE, ActionPayload::LegendActive { label, active }) => {
                update_datum(ctx, &label, |datum| datum.active = active)
            }
            (SET_LEGEND_CHECKED_STATE, ActionPayload::LegendChecked { label, checked }) => {
                update_datum(ctx, &label, |datum| datum.checked = checked)
            }
            (SET_ALL_LEGEND_ACTIVE_STATE, ActionPayload::AllLegendActive(active)) => {
                ctx.modify(|legend: &mut LegendState| {
                    legend.data.iter_mut().for_each(|datum| datum.active = active);
                })?;
                ctx.notify(Slice::Legend);
                Ok(())
            }
            (UPDATE_LEGEND_COLOR, _) => update_legend_color(ctx),
            (UPDATE_LEGEND_ICON, _) => update_legend_icon(ctx),
            (UPDATE_NESTED_PIE_CHART_LEGEND, _) => update_nested_pie_chart_legend(ctx),
            (SET_LEGEND_ACTIVE_STATE, _) => {
                Err(ActionPayload::mismatch(action, "a legend active"))
            }
            (SET_LEGEND_CHECKED_STATE, _) => {
                Err(ActionPayload::mismatch(action, "a legend checked"))
            }
            (SET_ALL_LEGEND_ACTIVE_STATE, _) => {
                Err(ActionPayload::mismatch(action, "an all-legend active"))
            }
            (other, _) => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn update_datum(
    ctx: &mut ActionContext<'_>,
    label: &str,
    update: impl FnOnce(&mut LegendDatum),
) -> ChartResult<()> {
    let mut legend = ctx.state().legend.clone();
    update(legend.datum_mut(label)?);
    ctx.set(legend)?;
    ctx.notify(Slice::Legend);
    Ok(())
}

fn icon_type_of(chart_type: ChartType) -> LegendIconType {
    match chart_type {
        ChartType::Bubble | ChartType::Scatter => LegendIconType::Circle,
        ChartType::Bar
        | ChartType::Column
        | ChartType::Area
        | ChartType::Pie
        | ChartType::BoxPlot
        | ChartType::Bullet => LegendIconType::Rect,
        ChartType::Line | ChartType::Radar => LegendIconType::Line,
        ChartType::Heatmap | ChartType::Treemap => LegendIconType::Spectrum,
    }
}

/// Legend labels in series declaration order; root slices for nested pies.
fn legend_labels(series: &RawSeries) -> Vec<(String, ChartType)> {
    if series.has_nested_pie_series() {
        return series
            .series_of(ChartType::Pie)
            .unwrap_or_default()
            .iter()
            .flat_map(|pie| match &pie.data {
                SeriesData::Nested(slices) => slices.as_slice(),
                SeriesData::Points(_) | SeriesData::Value(_) => &[],
            })
            .filter(|slice| slice.parent_name.is_none())
            .map(|slice| (slice.name.clone(), ChartType::Pie))
            .collect();
    }
    series
        .iter()
        .flat_map(|(chart_type, inputs)| {
            inputs
                .iter()
                .map(move |input| (input.legend_label().to_owned(), chart_type))
        })
        .collect()
}

fn item_width(
    label: &str,
    show_checkbox: bool,
    spectrum: bool,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> f64 {
    let decoration = if spectrum {
        0.0
    } else {
        let checkbox = if show_checkbox {
            LEGEND_CHECKBOX_SIZE + LEGEND_MARGIN_X
        } else {
            0.0
        };
        checkbox + LEGEND_ICON_SIZE + LEGEND_MARGIN_X
    };
    decoration + measurer.text_width(label, style)
}

fn init_legend_state(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let state = ctx.state();
    let init = ctx.init();
    let show_checkbox = init.options.legend.show_checkbox.unwrap_or(true);
    let spectrum = use_spectrum_legend(&init.series, &init.options);
    let style = state.theme.legend_label.text_style();
    let measurer = ctx.measurer();

    let data = legend_labels(&init.series)
        .into_iter()
        .map(|(label, chart_type)| LegendDatum {
            width: item_width(&label, show_checkbox, spectrum, &style, measurer),
            active: true,
            checked: true,
            icon_type: icon_type_of(chart_type),
            chart_type,
            color: None,
            label,
        })
        .collect::<Vec<_>>();
    debug!(entries = data.len(), "legend initialized");

    let legend = LegendState {
        use_spectrum_legend: spectrum,
        use_scatter_chart_icon: init.series.has(ChartType::Scatter),
        data,
        ..state.legend.clone()
    };
    ctx.set(legend)?;
    ctx.dispatch(SET_LEGEND_LAYOUT, ActionPayload::None)
}

struct LegendWidthParams<'a> {
    initial_width: f64,
    chart_width: f64,
    item_widths: &'a [f64],
    spectrum: bool,
    align: Align,
    visible: bool,
    show_checkbox: bool,
    fixed_width: Option<f64>,
}

fn legend_width(params: LegendWidthParams<'_>) -> f64 {
    if !params.visible {
        return 0.0;
    }
    if let Some(width) = params.fixed_width.filter(|width| *width > 0.0) {
        return width;
    }

    let widths = params.item_widths;
    let sum: f64 = widths.iter().sum();
    let max = widths.iter().copied().fold(0.0, f64::max);
    match (params.spectrum, params.align.is_vertical()) {
        (true, true) => (params.chart_width / 4.0).max(sum),
        (true, false) => {
            max + SPECTRUM_TOOLTIP_PADDING * 2.0
                + SPECTRUM_BAR_PADDING * 2.0
                + SPECTRUM_TOOLTIP_POINT_HEIGHT
                + SPECTRUM_BAR_HEIGHT
                + LAYOUT_PADDING_X * 2.0
        }
        (false, true) => sum + LEGEND_ITEM_MARGIN_X * widths.len().saturating_sub(1) as f64,
        (false, false) => {
            let checkbox = if params.show_checkbox {
                LEGEND_CHECKBOX_SIZE + LEGEND_MARGIN_X
            } else {
                0.0
            };
            checkbox + LEGEND_ICON_SIZE + LEGEND_MARGIN_X + max.max(params.initial_width)
        }
    }
}

fn set_legend_layout(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let state = ctx.state();
    let options = &state.options;
    let series = &state.series;
    let align = options.legend.align.unwrap_or_default();
    let visible = if series.has(ChartType::Treemap) && options.series.use_color_value != Some(true)
    {
        false
    } else {
        options.legend.visible.unwrap_or(true)
    };
    let show_checkbox = options.legend.show_checkbox.unwrap_or(true);
    let chart_width = options.chart.width.unwrap_or(0.0);
    let initial_width = (chart_width / 10.0).min(MAX_INITIAL_WIDTH);
    let item_widths: Vec<f64> = state.legend.data.iter().map(|datum| datum.width).collect();
    let width = legend_width(LegendWidthParams {
        initial_width,
        chart_width,
        item_widths: &item_widths,
        spectrum: state.legend.use_spectrum_legend,
        align,
        visible,
        show_checkbox,
        fixed_width: options.legend.width,
    });

    let circle_visible =
        series.has(ChartType::Bubble) && options.circle_legend.visible.unwrap_or(true);
    let circle_width = if align.is_vertical() {
        initial_width
    } else {
        initial_width.max(width)
    };
    let circle_legend = if circle_visible {
        CircleLegendState {
            visible: true,
            width: circle_width,
            radius: ((circle_width - LEGEND_MARGIN_X) / 2.0).max(0.0),
        }
    } else {
        CircleLegendState::default()
    };

    let nested_pie = ctx.init().series.has_nested_pie_series();
    let scatter = series.has(ChartType::Scatter);

    ctx.modify(|legend: &mut LegendState| {
        legend.visible = visible;
        legend.align = align;
        legend.show_checkbox = show_checkbox;
        legend.width = width;
    })?;
    ctx.set(circle_legend)?;

    if nested_pie {
        ctx.dispatch(UPDATE_NESTED_PIE_CHART_LEGEND, ActionPayload::None)?;
    } else {
        ctx.dispatch(UPDATE_LEGEND_COLOR, ActionPayload::None)?;
    }
    if scatter {
        ctx.dispatch(UPDATE_LEGEND_ICON, ActionPayload::None)?;
    }
    Ok(())
}

fn apply_colors<'c>(legend: &mut LegendState, colors: impl Iterator<Item = &'c String>) {
    let mut colors = colors;
    for datum in &mut legend.data {
        datum.color = colors.next().cloned();
    }
}

fn update_legend_color(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    if ctx.computed().use_spectrum_legend() {
        return Ok(());
    }
    let mut legend = ctx.state().legend.clone();
    apply_colors(&mut legend, ctx.state().series.colors());
    ctx.set(legend)?;
    Ok(())
}

fn update_legend_icon(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let mut legend = ctx.state().legend.clone();
    let scatter = ctx.init().series.series_of(ChartType::Scatter).unwrap_or_default();
    for datum in legend
        .data
        .iter_mut()
        .filter(|datum| datum.chart_type == ChartType::Scatter)
    {
        if let Some(icon_type) = scatter
            .iter()
            .find(|input| input.name == datum.label)
            .and_then(|input| input.icon_type)
        {
            datum.icon_type = icon_type;
        }
    }
    ctx.set(legend)?;
    Ok(())
}

fn update_nested_pie_chart_legend(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    if !ctx.init().series.has_nested_pie_series() {
        return Ok(());
    }
    let mut legend = ctx.state().legend.clone();
    apply_colors(&mut legend, ctx.state().nested_pie_series.colors());
    ctx.set(legend)?;
    Ok(())
}
