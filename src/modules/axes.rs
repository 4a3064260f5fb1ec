//! Axis label, tick and sizing data derived from scales and categories.
//!
//! `setAxesData` recomputes every axis from scratch. When a layout-relevant
//! measurement changes (label widths of the y axes, height of the x axis) the
//! module re-notifies `layout` so the layout collaborator can resize the plot;
//! the follow-up pass produces identical axes and propagation stops.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::axis_labels::{
    ViewLabelParams, auto_adjusting_interval, axis_label_anchor_point, diverging_labels,
    format_date_labels, make_labels_from_limit, max_label_size, view_labels,
};
use crate::core::axis_rotation::make_rotation_data;
use crate::core::windowing::is_zooming;
use crate::core::{
    AxisName, AxisOptions, AxisTitle, AxisTitleOption, ChartType, LabelFormatContext, LabelSize,
    Options, Rect, RotationData, ScaleData, SeriesLookup, TextMeasurer, Theme, ViewLabel,
};
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Observer, Slice, StoreModule};

use super::layout::Layout;

pub const INIT_AXES: &str = "initAxes";
pub const SET_AXES_DATA: &str = "setAxesData";

const RADIAL_AXIS_PADDING: f64 = 50.0;

/// Role-specific part of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AxisRole {
    Label { label_distance: f64 },
    Value { zero_position: Option<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisData {
    pub labels: Vec<String>,
    pub view_labels: Vec<ViewLabel>,
    pub tick_count: usize,
    pub tick_distance: f64,
    pub point_on_column: bool,
    pub tick_interval: usize,
    pub label_interval: usize,
    pub title: Option<AxisTitle>,
    pub max_label_width: f64,
    pub max_label_height: f64,
    pub role: AxisRole,
}

impl AxisData {
    #[must_use]
    pub fn is_label_axis(&self) -> bool {
        matches!(self.role, AxisRole::Label { .. })
    }

    #[must_use]
    pub fn zero_position(&self) -> Option<f64> {
        match self.role {
            AxisRole::Value { zero_position } => zero_position,
            AxisRole::Label { .. } => None,
        }
    }

    #[must_use]
    pub fn label_distance(&self) -> Option<f64> {
        match self.role {
            AxisRole::Label { label_distance } => Some(label_distance),
            AxisRole::Value { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XAxisData {
    pub axis: AxisData,
    pub rotation: RotationData,
    pub max_height: f64,
    pub offset_y: f64,
}

/// Value axis split around a centred y axis (diverging bar charts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CenterYAxisData {
    pub axis: AxisData,
    pub x: f64,
    pub x_axis_half_size: f64,
    pub second_start_x: f64,
    pub y_axis_label_anchor_point: f64,
    pub y_axis_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadialAxisData {
    pub labels: Vec<String>,
    pub axis_size: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub label_interval: usize,
    pub max_label_width: f64,
    pub max_label_height: f64,
}

/// Which optional axes exist, fixed by `initAxes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AxesShape {
    pub center_y_axis: bool,
    pub radial_axis: bool,
    pub secondary_y_axis: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AxesState {
    pub shape: AxesShape,
    pub x_axis: Option<XAxisData>,
    pub y_axis: Option<AxisData>,
    pub secondary_y_axis: Option<AxisData>,
    pub center_y_axis: Option<CenterYAxisData>,
    pub radial_axis: Option<RadialAxisData>,
}

impl AxesState {
    /// Whether any measurement the layout depends on differs from `other`.
    #[must_use]
    pub fn layout_changed(&self, other: &Self) -> bool {
        let width = |axis: &Option<AxisData>| axis.as_ref().map(|axis| axis.max_label_width);
        width(&self.y_axis) != width(&other.y_axis)
            || width(&self.secondary_y_axis) != width(&other.secondary_y_axis)
            || self.x_axis.as_ref().map(|axis| axis.max_height)
                != other.x_axis.as_ref().map(|axis| axis.max_height)
    }
}

const AXES_OBSERVERS: &[Observer] = &[Observer {
    name: "updateAxes",
    watches: &[
        Slice::Scale,
        Slice::Options,
        Slice::Series,
        Slice::Layout,
        Slice::ZoomRange,
        Slice::Theme,
        Slice::Categories,
    ],
    dispatch: &[SET_AXES_DATA],
}];

#[derive(Debug, Clone, Copy, Default)]
pub struct AxesModule;

impl StoreModule for AxesModule {
    fn name(&self) -> &'static str {
        "axes"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Axes]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[INIT_AXES, SET_AXES_DATA]
    }

    fn observers(&self) -> &'static [Observer] {
        AXES_OBSERVERS
    }

    fn reset_actions(&self) -> &'static [&'static str] {
        &[INIT_AXES]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            INIT_AXES => init_axes(ctx),
            SET_AXES_DATA => {
                let shape = ctx.state().axes.shape;
                set_axes_data(ctx, shape)
            }
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn init_axes(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let computed = ctx.computed();
    let state = ctx.state();
    let shape = AxesShape {
        center_y_axis: computed.is_center_y_axis(),
        radial_axis: state.series.has(ChartType::Radar),
        secondary_y_axis: state.options.has_secondary_y_axis(),
    };
    debug!(?shape, "axes initialized");
    set_axes_data(ctx, shape)
}

fn set_axes_data(ctx: &mut ActionContext<'_>, shape: AxesShape) -> ChartResult<()> {
    let computed = ctx.computed();
    let state = ctx.state();
    let builder = AxesBuilder {
        options: &state.options,
        theme: &state.theme,
        measurer: ctx.measurer(),
        label_on_y: computed.label_on_y_axis(),
        point_on_column: computed.is_point_on_column(),
        diverging_box: computed.is_diverging_box_series(),
        coordinate: computed.is_coordinate_chart(),
        zooming: is_zooming(state.raw_categories.0.len(), computed.view_range()),
    };
    let axes = builder.build(shape, &state.layout, state.categories.x_labels(), |name| {
        state.scale.get(name)
    });
    let layout_changed = state.axes.layout_changed(&axes);

    if layout_changed {
        trace!("axes layout measurements changed");
        ctx.notify(Slice::Layout);
    }
    ctx.set(axes)?;
    Ok(())
}

/// Tick and label interval plus title, before any sizing.
#[derive(Debug, Clone, PartialEq)]
struct InitAxisData {
    tick_interval: usize,
    label_interval: usize,
    title: Option<AxisTitle>,
}

impl InitAxisData {
    /// User intervals win; `auto_interval` applies only when the axis has no
    /// interval or step options at all.
    fn new(axis: Option<&AxisOptions>, auto_interval: Option<usize>) -> Self {
        let tick = axis.and_then(|axis| axis.tick.interval);
        let label = axis.and_then(|axis| axis.label.interval);
        let step_size = axis.and_then(|axis| axis.scale.step_size);
        let initial = if tick.is_none() && label.is_none() && step_size.is_none() {
            auto_interval.unwrap_or(1)
        } else {
            1
        };
        Self {
            tick_interval: tick.unwrap_or(initial),
            label_interval: label.unwrap_or(initial),
            title: axis
                .and_then(|axis| axis.title.as_ref())
                .map(AxisTitleOption::resolve),
        }
    }
}

/// Division that falls back to the numerator for a zero or non-finite divisor.
fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        numerator
    } else {
        numerator / denominator
    }
}

fn zero_position(
    scale: &ScaleData,
    axis_size: f64,
    label_on_y: bool,
    diverging_box: bool,
) -> Option<f64> {
    let limit = scale.limit;
    if !limit.contains_zero() || diverging_box {
        return None;
    }
    let position = safe_div(0.0 - limit.min, limit.max - limit.min) * axis_size;
    Some(if label_on_y {
        position
    } else {
        axis_size - position
    })
}

struct AxesBuilder<'a> {
    options: &'a Options,
    theme: &'a Theme,
    measurer: &'a dyn TextMeasurer,
    label_on_y: bool,
    point_on_column: bool,
    diverging_box: bool,
    coordinate: bool,
    zooming: bool,
}

impl AxesBuilder<'_> {
    fn build<'s>(
        &self,
        shape: AxesShape,
        layout: &Layout,
        categories: &[String],
        scale_of: impl Fn(AxisName) -> Option<&'s ScaleData>,
    ) -> AxesState {
        let plot = layout.plot;
        let (value_axis_name, label_axis_name, value_axis_size, label_axis_size) =
            if self.label_on_y {
                (AxisName::XAxis, AxisName::YAxis, plot.width, plot.height)
            } else {
                (AxisName::YAxis, AxisName::XAxis, plot.height, plot.width)
            };

        let x_init = InitAxisData::new(
            Some(&self.options.x_axis),
            self.x_auto_interval(categories, layout),
        );
        let y_init = InitAxisData::new(Some(&self.options.y_axis), None);
        let init_of = |axis_name: AxisName| match axis_name {
            AxisName::XAxis => &x_init,
            AxisName::YAxis | AxisName::SecondaryYAxis => &y_init,
        };

        let center_half =
            shape.center_y_axis.then(|| (layout.x_axis.width - layout.y_axis.width) / 2.0);

        let value_axis = self.value_axis(
            value_axis_name,
            scale_of(value_axis_name),
            value_axis_size,
            center_half,
            init_of(value_axis_name),
        );
        let label_axis = self.label_axis(
            label_axis_name,
            scale_of(label_axis_name),
            label_axis_size,
            categories,
            init_of(label_axis_name),
        );

        let secondary_y_axis = shape.secondary_y_axis.then(|| {
            let axis_options = self.options.secondary_y_axis.as_ref();
            let init = InitAxisData::new(axis_options, None);
            let scale = scale_of(AxisName::SecondaryYAxis);
            if self.label_on_y {
                let categories = axis_options
                    .and_then(|axis| axis.categories.as_deref())
                    .unwrap_or(categories);
                self.label_axis(AxisName::SecondaryYAxis, scale, label_axis_size, categories, &init)
            } else {
                self.value_axis(AxisName::SecondaryYAxis, scale, value_axis_size, None, &init)
            }
        });

        let center_y_axis = center_half.map(|half| CenterYAxisData {
            axis: value_axis.clone(),
            x: layout.x_axis.x + half,
            x_axis_half_size: half,
            second_start_x: (layout.x_axis.width + layout.y_axis.width) / 2.0,
            y_axis_label_anchor_point: layout.y_axis.width / 2.0,
            y_axis_height: layout.y_axis.height,
        });

        let radial_axis = shape
            .radial_axis
            .then(|| self.radial_axis(scale_of(value_axis_name), plot, y_init.label_interval));

        let (x_axis, x_axis_size, y_axis) = if self.label_on_y {
            (value_axis, value_axis_size, label_axis)
        } else {
            (label_axis, label_axis_size, value_axis)
        };

        AxesState {
            shape,
            x_axis: Some(self.x_axis(x_axis, x_axis_size, center_half)),
            y_axis: Some(y_axis),
            secondary_y_axis,
            center_y_axis,
            radial_axis,
        }
    }

    /// Initial interval of a category x axis sized to its labels.
    fn x_auto_interval(&self, categories: &[String], layout: &Layout) -> Option<usize> {
        if self.label_on_y || self.options.series.shift || self.coordinate {
            return None;
        }
        let style = self.theme.axis(AxisName::XAxis).label.text_style();
        let first_width = categories
            .first()
            .map(|label| self.measurer.text_width(label, &style));
        Some(auto_adjusting_interval(
            categories.len(),
            layout.x_axis.width,
            first_width,
        ))
    }

    fn format_labels(&self, axis_name: AxisName, labels: Vec<String>) -> Vec<String> {
        let Some(formatter) = self
            .options
            .axis(axis_name)
            .and_then(|axis| axis.label.formatter.as_ref())
        else {
            return labels;
        };
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                formatter.format(
                    label,
                    LabelFormatContext {
                        index,
                        labels: &labels,
                        axis_name,
                    },
                )
            })
            .collect()
    }

    fn label_size(&self, axis_name: AxisName, labels: &[String]) -> LabelSize {
        let margin = match axis_name {
            AxisName::XAxis => 0.0,
            AxisName::YAxis | AxisName::SecondaryYAxis => self
                .options
                .axis(axis_name)
                .and_then(|axis| axis.label.margin)
                .map_or(0.0, f64::abs),
        };
        let style = self.theme.axis(axis_name).label.text_style();
        max_label_size(labels, margin, &style, self.measurer)
    }

    fn value_axis(
        &self,
        axis_name: AxisName,
        scale: Option<&ScaleData>,
        axis_size: f64,
        center_half: Option<f64>,
        init: &InitAxisData,
    ) -> AxisData {
        let size = center_half.unwrap_or(axis_size);
        let mut raw_labels = scale
            .map(|scale| make_labels_from_limit(scale.limit, scale.step_size))
            .unwrap_or_default();
        if center_half.is_none() && self.diverging_box {
            raw_labels = diverging_labels(&raw_labels);
        }
        let labels = self.format_labels(axis_name, raw_labels);

        let tick_distance = size / labels.len().max(1) as f64;
        let tick_count = labels.len();
        let ordered: Vec<String> = if self.label_on_y {
            labels.clone()
        } else {
            labels.iter().rev().cloned().collect()
        };
        let view_labels = view_labels(
            ViewLabelParams {
                labels: &ordered,
                point_on_column: false,
                tick_distance,
                tick_count,
                label_interval: init.label_interval,
            },
            size,
        );
        let label_size = self.label_size(axis_name, &labels);
        let zero_position = scale.and_then(|scale| {
            zero_position(scale, axis_size, self.label_on_y, self.diverging_box)
        });

        AxisData {
            labels,
            view_labels,
            tick_count,
            tick_distance,
            point_on_column: false,
            tick_interval: init.tick_interval,
            label_interval: init.label_interval,
            title: init.title.clone(),
            max_label_width: label_size.max_label_width,
            max_label_height: label_size.max_label_height,
            role: AxisRole::Value { zero_position },
        }
    }

    fn label_axis(
        &self,
        axis_name: AxisName,
        scale: Option<&ScaleData>,
        axis_size: f64,
        categories: &[String],
        init: &InitAxisData,
    ) -> AxisData {
        let point_on_column = self.point_on_column;
        let raw_labels = match scale {
            Some(scale) if self.coordinate && !self.zooming => {
                make_labels_from_limit(scale.limit, scale.step_size)
            }
            _ => match self
                .options
                .x_axis
                .date
                .as_ref()
                .and_then(|date| date.format.as_deref())
            {
                Some(format) => format_date_labels(categories, format),
                None => categories.to_vec(),
            },
        };
        let labels = self.format_labels(axis_name, raw_labels);

        let column_offset = usize::from(!point_on_column);
        let tick_interval_count = categories.len().saturating_sub(column_offset);
        let tick_distance = safe_div(axis_size, tick_interval_count as f64);
        let label_distance = safe_div(
            axis_size,
            labels.len().saturating_sub(column_offset) as f64,
        );
        let tick_count = labels.len() + usize::from(point_on_column);
        let view_labels = view_labels(
            ViewLabelParams {
                labels: &labels,
                point_on_column,
                tick_distance,
                tick_count,
                label_interval: init.label_interval,
            },
            axis_size,
        );
        let label_size = self.label_size(axis_name, &labels);

        AxisData {
            labels,
            view_labels,
            tick_count,
            tick_distance,
            point_on_column,
            tick_interval: init.tick_interval,
            label_interval: init.label_interval,
            title: init.title.clone(),
            max_label_width: label_size.max_label_width,
            max_label_height: label_size.max_label_height,
            role: AxisRole::Label { label_distance },
        }
    }

    fn x_axis(&self, axis: AxisData, axis_size: f64, center_half: Option<f64>) -> XAxisData {
        let label_options = &self.options.x_axis.label;
        let offset_y =
            axis_label_anchor_point(axis.max_label_height) + label_options.margin.unwrap_or(0.0);
        let size = center_half.unwrap_or(axis_size);
        let column_offset = usize::from(!axis.point_on_column);
        let distance = safe_div(
            size,
            axis.view_labels.len().saturating_sub(column_offset) as f64,
        );
        let rotation = make_rotation_data(
            axis.max_label_width,
            axis.max_label_height,
            distance,
            label_options.rotatable.unwrap_or(true),
        );
        let label_height = if rotation.need_rotate_label {
            rotation.rotation_height
        } else {
            axis.max_label_height
        };

        XAxisData {
            max_height: label_height + offset_y,
            axis,
            rotation,
            offset_y,
        }
    }

    fn radial_axis(&self, scale: Option<&ScaleData>, plot: Rect, label_interval: usize) -> RadialAxisData {
        let raw_labels = scale
            .map(|scale| make_labels_from_limit(scale.limit, scale.step_size))
            .unwrap_or_default();
        let labels = self.format_labels(AxisName::YAxis, raw_labels);
        let style = self.theme.axis(AxisName::YAxis).label.text_style();
        let label_size = max_label_size(&labels, 0.0, &style, self.measurer);

        RadialAxisData {
            labels,
            axis_size: plot.width.min(plot.height) / 2.0 - RADIAL_AXIS_PADDING,
            center_x: plot.width / 2.0,
            center_y: plot.height / 2.0,
            label_interval,
            max_label_width: label_size.max_label_width,
            max_label_height: label_size.max_label_height,
        }
    }
}
