use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{
    AxisName, ChartType, Datum, SeriesData, SeriesInput, SeriesLookup, StackType, ValueEdge,
};
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Observer, Slice, StoreModule};

use super::series_data::SeriesState;

pub const SET_DATA_RANGE: &str = "setDataRange";

/// Raw value extent per axis, before nice rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct DataRange(pub IndexMap<AxisName, ValueEdge>);

impl DataRange {
    #[must_use]
    pub fn get(&self, axis_name: AxisName) -> Option<ValueEdge> {
        self.0.get(&axis_name).copied()
    }
}

const DATA_RANGE_OBSERVERS: &[Observer] = &[Observer {
    name: "updateDataRange",
    watches: &[Slice::Series, Slice::Options, Slice::Categories],
    dispatch: &[SET_DATA_RANGE],
}];

#[derive(Debug, Clone, Copy, Default)]
pub struct DataRangeModule;

impl StoreModule for DataRangeModule {
    fn name(&self) -> &'static str {
        "dataRange"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::DataRange]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[SET_DATA_RANGE]
    }

    fn observers(&self) -> &'static [Observer] {
        DATA_RANGE_OBSERVERS
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            SET_DATA_RANGE => set_data_range(ctx),
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn set_data_range(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let computed = ctx.computed();
    let value_axis = computed.value_axis_name();
    let label_axis = computed.label_axis_name();
    let coordinate = computed.is_coordinate_chart();
    let state = ctx.state();
    let series = &state.series;
    let stack = state.options.series.stack_type();
    let secondary_type = state
        .options
        .secondary_y_axis
        .as_ref()
        .and_then(|axis| axis.chart_type)
        .filter(|chart_type| series.has(*chart_type));

    let value_types: Vec<ChartType> = series
        .chart_types()
        .into_iter()
        .filter(|chart_type| chart_type.uses_value_axis())
        .collect();
    let primary_types: Vec<ChartType> = match secondary_type {
        Some(secondary) if value_types.iter().any(|t| *t != secondary) => value_types
            .iter()
            .copied()
            .filter(|t| *t != secondary)
            .collect(),
        _ => value_types.clone(),
    };

    let mut range = IndexMap::new();
    if let Some(edge) = value_edge(series, &primary_types, coordinate, stack) {
        range.insert(value_axis, edge);
    }
    if state.options.has_secondary_y_axis() {
        let types = secondary_type.map_or_else(|| value_types.clone(), |t| vec![t]);
        if let Some(edge) = value_edge(series, &types, coordinate, stack) {
            range.insert(AxisName::SecondaryYAxis, edge);
        }
    }
    if coordinate {
        let xs: Vec<f64> = value_types
            .iter()
            .filter_map(|t| series.series_of(*t))
            .flatten()
            .flat_map(SeriesInput::points)
            .flatten()
            .filter_map(|datum| datum.x_value().and_then(|x| x.as_number()))
            .collect();
        if let Some(edge) = limit_safely(&xs, true) {
            range.insert(label_axis, edge);
        }
    }

    trace!(axes = range.len(), "data range derived");
    ctx.set(DataRange(range))?;
    Ok(())
}

fn value_edge(
    series: &SeriesState,
    chart_types: &[ChartType],
    coordinate: bool,
    stack: Option<StackType>,
) -> Option<ValueEdge> {
    let mut values = Vec::new();
    for chart_type in chart_types {
        let Some(inputs) = series.series_of(*chart_type) else {
            continue;
        };
        if stack == Some(StackType::Normal) && chart_type.is_stackable() {
            values.extend(stacked_sums(inputs));
        } else {
            values.extend(inputs.iter().flat_map(|input| series_values(input, coordinate)));
        }
        if chart_type.is_box_type() && !inputs.is_empty() {
            values.push(0.0);
        }
    }
    limit_safely(&values, false)
}

fn series_values(input: &SeriesInput, coordinate: bool) -> Vec<f64> {
    match &input.data {
        SeriesData::Points(points) => points
            .iter()
            .flatten()
            .flat_map(|datum| datum.axis_values(coordinate))
            .collect(),
        SeriesData::Value(value) => value.iter().copied().collect(),
        SeriesData::Nested(_) => Vec::new(),
    }
}

/// Positive and negative totals per category index.
fn stacked_sums(inputs: &[SeriesInput]) -> Vec<f64> {
    let len = inputs.iter().map(|input| input.points().len()).max().unwrap_or(0);
    let mut sums = Vec::with_capacity(len * 2);
    for index in 0..len {
        let (positive, negative) = inputs
            .iter()
            .filter_map(|input| input.points().get(index).cloned().flatten())
            .filter_map(|datum| match datum {
                Datum::Value(value) => Some(value),
                Datum::Pair(_, y) => Some(y),
                Datum::Point(point) => Some(point.y),
                Datum::Values(_) => None,
            })
            .fold((0.0, 0.0), |(pos, neg), value: f64| {
                if value >= 0.0 {
                    (pos + value, neg)
                } else {
                    (pos, neg + value)
                }
            });
        sums.push(positive);
        sums.push(negative);
    }
    sums
}

/// Min/max of `values`, widened so the scale never sees an empty interval.
#[must_use]
pub fn limit_safely(values: &[f64], label_axis: bool) -> Option<ValueEdge> {
    let finite = values.iter().copied().filter(|value| value.is_finite());
    let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, value| match acc {
        Some((min, max)) => Some((min.min(value), max.max(value))),
        None => Some((value, value)),
    })?;
    let mut limit = ValueEdge::new(min, max);

    if values.len() == 1 && !label_axis {
        if limit.min > 0.0 {
            limit.min = 0.0;
        } else {
            limit.max = 0.0;
        }
    }
    if limit.min == 0.0 && limit.max == 0.0 {
        limit.max = 10.0;
    } else if limit.min == limit.max {
        let delta = limit.min.abs() / 10.0;
        limit.min -= delta;
        limit.max += delta;
    }

    Some(limit)
}
