use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Align, AxisName, ChartType};

/// Context handed to axis label formatters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFormatContext<'a> {
    pub index: usize,
    pub labels: &'a [String],
    pub axis_name: AxisName,
}

pub type LabelFormatterFn =
    Arc<dyn Fn(&str, LabelFormatContext<'_>) -> String + Send + Sync + 'static>;

/// User-supplied axis label formatter.
///
/// Formatters are compared by identity so that replacing the closure counts
/// as an options change while cloning options does not.
#[derive(Clone)]
pub struct LabelFormatter(LabelFormatterFn);

impl LabelFormatter {
    pub fn new(
        formatter: impl Fn(&str, LabelFormatContext<'_>) -> String + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(formatter))
    }

    #[must_use]
    pub fn format(&self, label: &str, context: LabelFormatContext<'_>) -> String {
        (self.0)(label, context)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

impl PartialEq for LabelFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Root chart options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub chart: ChartOptions,
    pub x_axis: AxisOptions,
    pub y_axis: AxisOptions,
    /// Presence of this entry turns the secondary y axis on.
    pub secondary_y_axis: Option<AxisOptions>,
    pub series: SeriesOptions,
    pub legend: LegendOptions,
    pub circle_legend: CircleLegendOptions,
    pub theme: ThemeOptions,
}

impl Options {
    /// Options for one physical axis, if that axis is configured.
    #[must_use]
    pub fn axis(&self, axis_name: AxisName) -> Option<&AxisOptions> {
        match axis_name {
            AxisName::XAxis => Some(&self.x_axis),
            AxisName::YAxis => Some(&self.y_axis),
            AxisName::SecondaryYAxis => self.secondary_y_axis.as_ref(),
        }
    }

    #[must_use]
    pub fn has_secondary_y_axis(&self) -> bool {
        self.secondary_y_axis.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Per-axis options. Some fields only apply to one axis:
/// `point_on_column` and `date` to the x axis, `align` to the y axis,
/// `chart_type` and `categories` to the secondary y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct AxisOptions {
    pub title: Option<AxisTitleOption>,
    pub tick: TickOptions,
    pub label: AxisLabelOptions,
    pub scale: ScaleOptions,
    pub point_on_column: Option<bool>,
    pub date: Option<DateOptions>,
    pub align: Option<AxisAlign>,
    pub chart_type: Option<ChartType>,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TickOptions {
    pub interval: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AxisLabelOptions {
    pub interval: Option<usize>,
    pub margin: Option<f64>,
    pub rotatable: Option<bool>,
    #[serde(skip)]
    pub formatter: Option<LabelFormatter>,
}

/// User overrides for the computed scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleOptions {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step_size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DateOptions {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisTitleOption {
    Text(String),
    Detailed(AxisTitle),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTitle {
    pub text: String,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
}

impl AxisTitleOption {
    #[must_use]
    pub fn resolve(&self) -> AxisTitle {
        match self {
            Self::Text(text) => AxisTitle {
                text: text.clone(),
                offset_x: 0.0,
                offset_y: 0.0,
            },
            Self::Detailed(title) => title.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum StackType {
    #[default]
    Normal,
    Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StackOptions {
    #[serde(rename = "type")]
    pub stack_type: StackType,
    pub connector: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    pub stack: Option<StackOptions>,
    pub diverging: bool,
    pub use_color_value: Option<bool>,
    pub shift: bool,
    pub vertical: bool,
}

impl SeriesOptions {
    #[must_use]
    pub fn stack_type(&self) -> Option<StackType> {
        self.stack.map(|stack| stack.stack_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendOptions {
    pub visible: Option<bool>,
    pub show_checkbox: Option<bool>,
    pub align: Option<Align>,
    pub width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CircleLegendOptions {
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeOptions {
    pub font_family: Option<String>,
    pub series_colors: Option<Vec<String>>,
    pub legend_label: FontThemeOptions,
    pub x_axis_label: FontThemeOptions,
    pub y_axis_label: FontThemeOptions,
    pub secondary_y_axis_label: FontThemeOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct FontThemeOptions {
    pub font_size: Option<f64>,
    pub font_weight: Option<u16>,
    pub font_family: Option<String>,
}
