use serde::{Deserialize, Serialize};

use crate::core::{Categories, Options, RawSeries, Theme, ViewRange};
use crate::modules::axes::AxesState;
use crate::modules::data_range::DataRange;
use crate::modules::layout::Layout;
use crate::modules::legend::{CircleLegendState, LegendState};
use crate::modules::scale::ScaleState;
use crate::modules::series_data::{NestedPieSeries, SeriesState};

use super::slice::Slice;

/// Immutable input the store was built (or last reset) from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct InitStoreState {
    pub series: RawSeries,
    pub options: Options,
    pub categories: Option<Categories>,
}

impl InitStoreState {
    #[must_use]
    pub fn new(series: RawSeries, options: Options) -> Self {
        Self {
            series,
            options,
            categories: None,
        }
    }

    #[must_use]
    pub fn with_categories(mut self, categories: Categories) -> Self {
        self.categories = Some(categories);
        self
    }
}

/// Current zoom window over the raw categories, `None` when not zoomed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct ZoomRange(pub Option<ViewRange>);

/// Every category, ignoring zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RawCategories(pub Categories);

/// The whole state tree. Each field is one slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartState {
    pub options: Options,
    pub theme: Theme,
    pub layout: Layout,
    pub series: SeriesState,
    pub nested_pie_series: NestedPieSeries,
    pub zoom_range: ZoomRange,
    pub raw_categories: RawCategories,
    pub categories: Categories,
    pub data_range: DataRange,
    pub scale: ScaleState,
    pub axes: AxesState,
    pub legend: LegendState,
    pub circle_legend: CircleLegendState,
}

/// A value stored in exactly one slice of `ChartState`.
///
/// Writes go through `ActionContext::set`, which checks the writer's grant
/// for `SLICE` before touching the field.
pub trait SliceValue: Clone + PartialEq + Send + Sync + 'static {
    const SLICE: Slice;

    fn get(state: &ChartState) -> &Self;

    fn slot(state: &mut ChartState) -> &mut Self;
}

macro_rules! slice_value {
    ($ty:ty, $slice:expr, $field:ident) => {
        impl SliceValue for $ty {
            const SLICE: Slice = $slice;

            fn get(state: &ChartState) -> &Self {
                &state.$field
            }

            fn slot(state: &mut ChartState) -> &mut Self {
                &mut state.$field
            }
        }
    };
}

slice_value!(Options, Slice::Options, options);
slice_value!(Theme, Slice::Theme, theme);
slice_value!(Layout, Slice::Layout, layout);
slice_value!(SeriesState, Slice::Series, series);
slice_value!(NestedPieSeries, Slice::NestedPieSeries, nested_pie_series);
slice_value!(ZoomRange, Slice::ZoomRange, zoom_range);
slice_value!(RawCategories, Slice::RawCategories, raw_categories);
slice_value!(Categories, Slice::Categories, categories);
slice_value!(DataRange, Slice::DataRange, data_range);
slice_value!(ScaleState, Slice::Scale, scale);
slice_value!(AxesState, Slice::Axes, axes);
slice_value!(LegendState, Slice::Legend, legend);
slice_value!(CircleLegendState, Slice::CircleLegend, circle_legend);
