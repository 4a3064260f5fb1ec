pub mod axis_labels;
pub mod axis_rotation;
pub mod options;
pub mod scale;
pub mod series;
pub mod text;
pub mod theme;
pub mod types;
pub mod windowing;

pub use axis_labels::{LabelSize, ViewLabel};
pub use axis_rotation::RotationData;
pub use options::{
    AxisAlign, AxisOptions, AxisTitle, AxisTitleOption, LabelFormatContext, LabelFormatter,
    Options, ScaleOptions, SeriesOptions, StackType,
};
pub use scale::{ScaleData, compute_scale};
pub use series::{
    Categories, CategoryKey, ChartType, Datum, LegendIconType, PieSlice, PointDatum, RawSeries,
    SeriesData, SeriesInput, SeriesLookup,
};
pub use text::{HeuristicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use theme::{FontTheme, Theme};
pub use types::{Align, AxisName, Rect, ValueEdge, ViewRange};
