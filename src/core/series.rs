use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Series families understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartType {
    Line,
    Area,
    Bar,
    Column,
    Pie,
    Scatter,
    Bubble,
    BoxPlot,
    Bullet,
    Radar,
    Heatmap,
    Treemap,
}

impl ChartType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Area => "area",
            Self::Bar => "bar",
            Self::Column => "column",
            Self::Pie => "pie",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
            Self::BoxPlot => "boxPlot",
            Self::Bullet => "bullet",
            Self::Radar => "radar",
            Self::Heatmap => "heatmap",
            Self::Treemap => "treemap",
        }
    }

    /// Bar-like series whose categories sit between ticks.
    #[must_use]
    pub const fn is_box_type(self) -> bool {
        matches!(self, Self::Bar | Self::Column | Self::BoxPlot | Self::Bullet)
    }

    /// Series that contribute values to a value axis.
    #[must_use]
    pub const fn uses_value_axis(self) -> bool {
        !matches!(self, Self::Pie | Self::Heatmap | Self::Treemap)
    }

    /// Series whose data may carry explicit x values.
    #[must_use]
    pub const fn accepts_coordinates(self) -> bool {
        matches!(self, Self::Line | Self::Area | Self::Scatter | Self::Bubble)
    }

    #[must_use]
    pub const fn is_stackable(self) -> bool {
        matches!(self, Self::Bar | Self::Column | Self::Area)
    }
}

/// Icon drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendIconType {
    Rect,
    Circle,
    Line,
    Spectrum,
    Triangle,
    Pentagon,
    Star,
    Diamond,
    Cross,
    TriangleDown,
}

/// Raw x-value of a datum before it is normalized into a category label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryKey {
    Number(f64),
    Text(String),
}

impl CategoryKey {
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => f.write_str(&format_number(*value)),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Formats a number the way axis and category labels print it:
/// integral values without a fraction and no negative zero.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDatum {
    pub x: CategoryKey,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One entry of a series `data` array.
///
/// `Pair` is `[x, y]` for coordinate series and `[start, end]` for range
/// bars; `Values` carries box-plot quartiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Value(f64),
    Pair(CategoryKey, f64),
    Point(PointDatum),
    Values(Vec<f64>),
}

impl Datum {
    /// Explicit x value of a coordinate datum. Plain and box values have none.
    #[must_use]
    pub fn x_value(&self) -> Option<CategoryKey> {
        match self {
            Self::Pair(x, _) => Some(x.clone()),
            Self::Point(point) => Some(point.x.clone()),
            Self::Value(_) | Self::Values(_) => None,
        }
    }

    #[must_use]
    pub fn is_coordinate(&self) -> bool {
        matches!(self, Self::Pair(..) | Self::Point(_))
    }

    /// Values this datum contributes to a value-axis range.
    #[must_use]
    pub fn axis_values(&self, coordinate: bool) -> SmallVec<[f64; 4]> {
        match self {
            Self::Value(value) => smallvec![*value],
            Self::Pair(_, y) if coordinate => smallvec![*y],
            Self::Pair(start, end) => match start.as_number() {
                Some(start) => smallvec![start, *end],
                None => smallvec![*end],
            },
            Self::Point(point) => smallvec![point.y],
            Self::Values(values) => values.iter().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub name: String,
    #[serde(default)]
    pub data: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesData {
    Points(Vec<Option<Datum>>),
    Nested(Vec<PieSlice>),
    Value(Option<f64>),
}

impl Default for SeriesData {
    fn default() -> Self {
        Self::Points(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesInput {
    pub name: String,
    #[serde(default)]
    pub data: SeriesData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<LegendIconType>,
}

impl SeriesInput {
    #[must_use]
    pub fn new(name: impl Into<String>, data: SeriesData) -> Self {
        Self {
            name: name.into(),
            data,
            color_value: None,
            icon_type: None,
        }
    }

    #[must_use]
    pub fn values(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(
            name,
            SeriesData::Points(values.iter().map(|value| Some(Datum::Value(*value))).collect()),
        )
    }

    #[must_use]
    pub fn with_icon_type(mut self, icon_type: LegendIconType) -> Self {
        self.icon_type = Some(icon_type);
        self
    }

    #[must_use]
    pub fn with_color_value(mut self, color_value: impl Into<String>) -> Self {
        self.color_value = Some(color_value.into());
        self
    }

    /// Label under which the series appears in the legend.
    #[must_use]
    pub fn legend_label(&self) -> &str {
        self.color_value.as_deref().unwrap_or(&self.name)
    }

    #[must_use]
    pub fn points(&self) -> &[Option<Datum>] {
        match &self.data {
            SeriesData::Points(points) => points,
            SeriesData::Nested(_) | SeriesData::Value(_) => &[],
        }
    }
}

/// Read access shared by raw input series and the derived `series` slice.
pub trait SeriesLookup {
    fn series_of(&self, chart_type: ChartType) -> Option<&[SeriesInput]>;

    fn chart_types(&self) -> SmallVec<[ChartType; 4]>;

    fn has(&self, chart_type: ChartType) -> bool {
        self.series_of(chart_type).is_some()
    }

    fn has_box_type_series(&self) -> bool {
        self.chart_types().iter().any(|chart_type| chart_type.is_box_type())
    }

    /// Coordinate charts place numeric or explicit x values on the label axis.
    fn is_coordinate_series(&self) -> bool {
        if self.has(ChartType::Scatter) || self.has(ChartType::Bubble) {
            return true;
        }
        [ChartType::Line, ChartType::Area].iter().any(|chart_type| {
            self.series_of(*chart_type).is_some_and(|series| {
                series
                    .iter()
                    .flat_map(SeriesInput::points)
                    .flatten()
                    .any(Datum::is_coordinate)
            })
        })
    }

    fn has_nested_pie_series(&self) -> bool {
        self.series_of(ChartType::Pie)
            .and_then(|series| series.first())
            .is_some_and(|first| matches!(first.data, SeriesData::Nested(_)))
    }
}

/// Series exactly as supplied by the host, keyed by chart type in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RawSeries(pub IndexMap<ChartType, Vec<SeriesInput>>);

impl RawSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, chart_type: ChartType, series: Vec<SeriesInput>) -> Self {
        self.0.insert(chart_type, series);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChartType, &[SeriesInput])> {
        self.0
            .iter()
            .map(|(chart_type, series)| (*chart_type, series.as_slice()))
    }

    pub fn get_mut(&mut self, chart_type: ChartType) -> Option<&mut Vec<SeriesInput>> {
        self.0.get_mut(&chart_type)
    }
}

impl SeriesLookup for RawSeries {
    fn series_of(&self, chart_type: ChartType) -> Option<&[SeriesInput]> {
        self.0.get(&chart_type).map(Vec::as_slice)
    }

    fn chart_types(&self) -> SmallVec<[ChartType; 4]> {
        self.0.keys().copied().collect()
    }
}

/// Category labels: a plain sequence, or an `x`/`y` pair for heatmaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Categories {
    List(Vec<String>),
    Xy { x: Vec<String>, y: Vec<String> },
}

impl Default for Categories {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Categories {
    /// Labels laid along the category axis.
    #[must_use]
    pub fn x_labels(&self) -> &[String] {
        match self {
            Self::List(labels) => labels,
            Self::Xy { x, .. } => x,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x_labels().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_labels().is_empty()
    }

    /// Applies `f` to the category-axis labels, passing other fields through.
    #[must_use]
    pub fn map_x(&self, f: impl FnOnce(&[String]) -> Vec<String>) -> Self {
        match self {
            Self::List(labels) => Self::List(f(labels)),
            Self::Xy { x, y } => Self::Xy {
                x: f(x),
                y: y.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datum_parses_all_input_shapes() {
        let data: Vec<Option<Datum>> =
            serde_json::from_str(r#"[1.5, [2, 3], ["a", 4], {"x": 5, "y": 6}, [1, 2, 3, 4, 5], null]"#)
                .expect("parse data");

        assert_eq!(data[0], Some(Datum::Value(1.5)));
        assert_eq!(data[1], Some(Datum::Pair(CategoryKey::Number(2.0), 3.0)));
        assert_eq!(
            data[2],
            Some(Datum::Pair(CategoryKey::Text("a".to_owned()), 4.0))
        );
        assert!(matches!(data[3], Some(Datum::Point(_))));
        assert_eq!(data[4], Some(Datum::Values(vec![1.0, 2.0, 3.0, 4.0, 5.0])));
        assert_eq!(data[5], None);
    }

    #[test]
    fn nested_pie_series_is_detected() {
        let series: RawSeries = serde_json::from_str(
            r#"{"pie": [{"name": "browsers", "data": [{"name": "Chrome", "data": 50}, {"name": "Chrome 64", "parentName": "Chrome", "data": 20}]}]}"#,
        )
        .expect("parse series");

        assert!(series.has_nested_pie_series());
        assert!(!series.is_coordinate_series());
    }

    #[test]
    fn number_labels_print_without_fraction() {
        assert_eq!(CategoryKey::Number(3.0).to_string(), "3");
        assert_eq!(CategoryKey::Number(-0.0).to_string(), "0");
        assert_eq!(CategoryKey::Number(2.5).to_string(), "2.5");
    }
}
