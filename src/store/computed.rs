use crate::core::{AxisAlign, AxisName, ChartType, Options, SeriesLookup, StackType, ViewRange};

use super::state::ChartState;

#[must_use]
pub fn label_on_y_axis(series: &(impl SeriesLookup + ?Sized), options: &Options) -> bool {
    series.has(ChartType::Bar) || (series.has(ChartType::Bullet) && !options.series.vertical)
}

#[must_use]
pub const fn value_axis_name(label_on_y_axis: bool) -> AxisName {
    if label_on_y_axis {
        AxisName::XAxis
    } else {
        AxisName::YAxis
    }
}

#[must_use]
pub const fn label_axis_name(label_on_y_axis: bool) -> AxisName {
    if label_on_y_axis {
        AxisName::YAxis
    } else {
        AxisName::XAxis
    }
}

/// Categories sit between ticks for box-type series, and for line/area when
/// `xAxis.pointOnColumn` is set.
#[must_use]
pub fn is_point_on_column(series: &(impl SeriesLookup + ?Sized), options: &Options) -> bool {
    if series.has_box_type_series() {
        return true;
    }
    if series.has(ChartType::Line) || series.has(ChartType::Area) {
        return options.x_axis.point_on_column.unwrap_or(false);
    }
    false
}

#[must_use]
pub fn has_percent_stack(series: &(impl SeriesLookup + ?Sized), options: &Options) -> bool {
    options.series.stack_type() == Some(StackType::Percent)
        && series
            .chart_types()
            .iter()
            .any(|chart_type| chart_type.is_stackable())
}

#[must_use]
pub fn use_spectrum_legend(series: &(impl SeriesLookup + ?Sized), options: &Options) -> bool {
    options
        .series
        .use_color_value
        .unwrap_or_else(|| series.has(ChartType::Heatmap))
}

#[must_use]
pub fn is_center_y_axis(series: &(impl SeriesLookup + ?Sized), options: &Options) -> bool {
    series.has(ChartType::Bar)
        && options.series.diverging
        && options.y_axis.align == Some(AxisAlign::Center)
}

#[must_use]
pub fn is_diverging_box_series(series: &(impl SeriesLookup + ?Sized), options: &Options) -> bool {
    series.has_box_type_series() && options.series.diverging
}

/// Pure derived values, recomputed on every call.
#[derive(Debug, Clone, Copy)]
pub struct Computed<'a> {
    state: &'a ChartState,
}

impl<'a> Computed<'a> {
    #[must_use]
    pub fn new(state: &'a ChartState) -> Self {
        Self { state }
    }

    /// Zoom window clamped to the raw categories.
    #[must_use]
    pub fn view_range(self) -> Option<ViewRange> {
        self.state
            .zoom_range
            .0
            .and_then(|range| range.normalized(self.state.raw_categories.0.len()))
    }

    #[must_use]
    pub fn label_on_y_axis(self) -> bool {
        label_on_y_axis(&self.state.series, &self.state.options)
    }

    #[must_use]
    pub fn value_axis_name(self) -> AxisName {
        value_axis_name(self.label_on_y_axis())
    }

    #[must_use]
    pub fn label_axis_name(self) -> AxisName {
        label_axis_name(self.label_on_y_axis())
    }

    #[must_use]
    pub fn is_coordinate_chart(self) -> bool {
        self.state.series.is_coordinate_series()
    }

    #[must_use]
    pub fn has_percent_stack(self) -> bool {
        has_percent_stack(&self.state.series, &self.state.options)
    }

    #[must_use]
    pub fn use_spectrum_legend(self) -> bool {
        use_spectrum_legend(&self.state.series, &self.state.options)
    }

    #[must_use]
    pub fn is_center_y_axis(self) -> bool {
        is_center_y_axis(&self.state.series, &self.state.options)
    }

    #[must_use]
    pub fn is_point_on_column(self) -> bool {
        is_point_on_column(&self.state.series, &self.state.options)
    }

    #[must_use]
    pub fn is_diverging_box_series(self) -> bool {
        is_diverging_box_series(&self.state.series, &self.state.options)
    }
}
