use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::warn;

use crate::core::windowing::data_in_range;
use crate::core::{
    Categories, CategoryKey, ChartType, Datum, RawSeries, SeriesData, SeriesInput, SeriesLookup,
    Theme, ViewRange,
};
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Observer, Slice, StoreModule, ZoomRange};

use super::legend::LegendState;

pub const INIT_SERIES_DATA: &str = "initSeriesData";
pub const SET_SERIES_DATA: &str = "setSeriesData";
pub const ZOOM: &str = "zoom";
pub const RESET_ZOOM: &str = "resetZoom";

/// Series of one chart type as rendering sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SeriesGroup {
    /// Checked series, with the zoom window applied.
    pub data: Vec<SeriesInput>,
    /// One palette color per declared series, checked or not.
    pub colors: Vec<String>,
    pub series_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SeriesState(pub IndexMap<ChartType, SeriesGroup>);

impl SeriesState {
    #[must_use]
    pub fn group(&self, chart_type: ChartType) -> Option<&SeriesGroup> {
        self.0.get(&chart_type)
    }

    /// Palette colors of every declared series, in declaration order.
    pub fn colors(&self) -> impl Iterator<Item = &String> {
        self.0.values().flat_map(|group| group.colors.iter())
    }
}

impl SeriesLookup for SeriesState {
    fn series_of(&self, chart_type: ChartType) -> Option<&[SeriesInput]> {
        self.0.get(&chart_type).map(|group| group.data.as_slice())
    }

    fn chart_types(&self) -> SmallVec<[ChartType; 4]> {
        self.0.keys().copied().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedPieSlice {
    pub name: String,
    pub parent_name: Option<String>,
    pub root_name: String,
    pub data: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NestedPieGroup {
    pub data: Vec<NestedPieSlice>,
    /// Colors of the root slices of this ring.
    pub colors: Vec<String>,
}

/// Nested pie rings keyed by series name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NestedPieSeries(pub IndexMap<String, NestedPieGroup>);

impl NestedPieSeries {
    pub fn colors(&self) -> impl Iterator<Item = &String> {
        self.0.values().flat_map(|group| group.colors.iter())
    }
}

const SERIES_DATA_OBSERVERS: &[Observer] = &[Observer {
    name: "updateSeriesData",
    watches: &[
        Slice::Legend,
        Slice::ZoomRange,
        Slice::Theme,
        Slice::RawCategories,
    ],
    dispatch: &[SET_SERIES_DATA],
}];

/// Owns the visible series, nested pie rings and the zoom window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesDataModule;

impl StoreModule for SeriesDataModule {
    fn name(&self) -> &'static str {
        "seriesData"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::Series, Slice::NestedPieSeries, Slice::ZoomRange]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[INIT_SERIES_DATA, SET_SERIES_DATA, ZOOM, RESET_ZOOM]
    }

    fn observers(&self) -> &'static [Observer] {
        SERIES_DATA_OBSERVERS
    }

    fn reset_actions(&self) -> &'static [&'static str] {
        &[INIT_SERIES_DATA]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            INIT_SERIES_DATA => {
                ctx.set(ZoomRange(None))?;
                set_series_data(ctx)
            }
            SET_SERIES_DATA => set_series_data(ctx),
            ZOOM => match payload {
                ActionPayload::Zoom(range) => zoom(ctx, range),
                _ => Err(ActionPayload::mismatch(action, "a zoom range")),
            },
            RESET_ZOOM => ctx.set(ZoomRange(None)).map(drop),
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn zoom(ctx: &mut ActionContext<'_>, range: ViewRange) -> ChartResult<()> {
    let len = ctx.state().raw_categories.0.len();
    let normalized = range.normalized(len);
    if normalized != Some(range) {
        warn!(
            start = range.start,
            end = range.end,
            categories = len,
            "zoom range adjusted to category bounds"
        );
    }
    ctx.set(ZoomRange(normalized))?;
    Ok(())
}

fn set_series_data(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let view_range = ctx.computed().view_range();
    let state = ctx.state();
    let raw = &ctx.init().series;
    let series = derive_series(
        raw,
        &state.theme,
        &state.legend,
        view_range,
        &state.raw_categories.0,
    );
    let nested = if raw.has_nested_pie_series() {
        derive_nested_pie(raw, &state.theme, &state.legend)
    } else {
        NestedPieSeries::default()
    };

    ctx.set(series)?;
    ctx.set(nested)?;
    Ok(())
}

fn derive_series(
    raw: &RawSeries,
    theme: &Theme,
    legend: &LegendState,
    view_range: Option<ViewRange>,
    raw_categories: &Categories,
) -> SeriesState {
    let coordinate = raw.is_coordinate_series();
    let mut color_index = 0;
    let mut groups = IndexMap::with_capacity(raw.0.len());

    for (chart_type, inputs) in raw.iter() {
        let mut group = SeriesGroup {
            series_count: inputs.len(),
            ..SeriesGroup::default()
        };
        for input in inputs {
            group.colors.push(theme.series_color(color_index));
            color_index += 1;
            if !legend.is_checked(input.legend_label()) {
                continue;
            }
            let mut series = input.clone();
            if let (Some(range), SeriesData::Points(points)) = (view_range, &input.data) {
                if chart_type != ChartType::Pie {
                    series.data = SeriesData::Points(if coordinate {
                        points_in_category_window(points, range, raw_categories.x_labels())
                    } else {
                        data_in_range(points, range)
                    });
                }
            }
            group.data.push(series);
        }
        groups.insert(chart_type, group);
    }

    SeriesState(groups)
}

/// Keeps coordinate points whose x value lies between the window's edge categories.
fn points_in_category_window(
    points: &[Option<Datum>],
    range: ViewRange,
    categories: &[String],
) -> Vec<Option<Datum>> {
    let (Some(start), Some(end)) = (categories.get(range.start), categories.get(range.end)) else {
        return points.to_vec();
    };
    let window = categories[range.start..=range.end].to_vec();
    let bounds = start.parse::<f64>().ok().zip(end.parse::<f64>().ok());

    points
        .iter()
        .filter(|point| {
            let Some(x) = point.as_ref().and_then(Datum::x_value) else {
                return true;
            };
            match (bounds, &x) {
                (Some((min, max)), CategoryKey::Number(value)) => *value >= min && *value <= max,
                _ => window.contains(&x.to_string()),
            }
        })
        .cloned()
        .collect()
}

fn derive_nested_pie(raw: &RawSeries, theme: &Theme, legend: &LegendState) -> NestedPieSeries {
    let Some(pies) = raw.series_of(ChartType::Pie) else {
        return NestedPieSeries::default();
    };

    let mut parents: IndexMap<&str, Option<&str>> = IndexMap::new();
    let mut root_colors: IndexMap<&str, String> = IndexMap::new();
    for slice in pies.iter().filter_map(nested_slices).flatten() {
        parents.insert(slice.name.as_str(), slice.parent_name.as_deref());
        if slice.parent_name.is_none() && !root_colors.contains_key(slice.name.as_str()) {
            let color = theme.series_color(root_colors.len());
            root_colors.insert(slice.name.as_str(), color);
        }
    }

    let root_of = |name: &str| -> String {
        let mut current = name;
        for _ in 0..parents.len() {
            match parents.get(current).copied().flatten() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current.to_owned()
    };

    let mut groups = IndexMap::with_capacity(pies.len());
    for pie in pies {
        let Some(slices) = nested_slices(pie) else {
            continue;
        };
        let mut group = NestedPieGroup::default();
        for slice in slices {
            let root_name = root_of(&slice.name);
            let color = root_colors
                .get(root_name.as_str())
                .cloned()
                .unwrap_or_else(|| theme.series_color(0));
            if slice.parent_name.is_none() {
                group.colors.push(color.clone());
            }
            if !legend.is_checked(&root_name) {
                continue;
            }
            group.data.push(NestedPieSlice {
                name: slice.name.clone(),
                parent_name: slice.parent_name.clone(),
                root_name,
                data: slice.data,
                color,
            });
        }
        groups.insert(pie.name.clone(), group);
    }

    NestedPieSeries(groups)
}

fn nested_slices(series: &SeriesInput) -> Option<&[crate::core::PieSlice]> {
    match &series.data {
        SeriesData::Nested(slices) => Some(slices),
        SeriesData::Points(_) | SeriesData::Value(_) => None,
    }
}
