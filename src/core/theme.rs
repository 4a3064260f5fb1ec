use serde::{Deserialize, Serialize};

use super::options::{FontThemeOptions, ThemeOptions};
use super::text::TextStyle;
use super::AxisName;

pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_LEGEND_LABEL_FONT_SIZE: f64 = 11.0;
pub const DEFAULT_AXIS_LABEL_FONT_SIZE: f64 = 11.0;
pub const DEFAULT_AXIS_TITLE_FONT_SIZE: f64 = 11.0;
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

pub const DEFAULT_SERIES_COLORS: [&str; 20] = [
    "#00a9ff", "#ffb840", "#ff5a46", "#00bd9f", "#785fff", "#f28b8c", "#989486", "#516f7d",
    "#29dbe3", "#dddddd", "#64e38b", "#e3b664", "#fb826e", "#64e3c2", "#f66efb", "#e3cd64",
    "#82e364", "#8570ff", "#e39e64", "#fa5643",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontTheme {
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: u16,
}

impl FontTheme {
    fn resolve(options: &FontThemeOptions, family: &str, default_size: f64) -> Self {
        Self {
            font_size: options.font_size.unwrap_or(default_size),
            font_family: options
                .font_family
                .clone()
                .unwrap_or_else(|| family.to_owned()),
            font_weight: options.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT),
        }
    }

    #[must_use]
    pub fn text_style(&self) -> TextStyle {
        TextStyle {
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            font_weight: self.font_weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTheme {
    pub label: FontTheme,
    pub title: FontTheme,
}

impl AxisTheme {
    fn resolve(label: &FontThemeOptions, family: &str) -> Self {
        Self {
            label: FontTheme::resolve(label, family, DEFAULT_AXIS_LABEL_FONT_SIZE),
            title: FontTheme::resolve(
                &FontThemeOptions::default(),
                family,
                DEFAULT_AXIS_TITLE_FONT_SIZE,
            ),
        }
    }
}

/// Presentational values the store needs to size labels and pick colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub series_colors: Vec<String>,
    pub legend_label: FontTheme,
    pub x_axis: AxisTheme,
    pub y_axis: AxisTheme,
    pub secondary_y_axis: AxisTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_options(&ThemeOptions::default())
    }
}

impl Theme {
    #[must_use]
    pub fn from_options(options: &ThemeOptions) -> Self {
        let family = options
            .font_family
            .clone()
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_owned());
        let series_colors = match &options.series_colors {
            Some(colors) if !colors.is_empty() => colors.clone(),
            _ => DEFAULT_SERIES_COLORS.iter().map(|c| (*c).to_owned()).collect(),
        };

        Self {
            legend_label: FontTheme::resolve(
                &options.legend_label,
                &family,
                DEFAULT_LEGEND_LABEL_FONT_SIZE,
            ),
            x_axis: AxisTheme::resolve(&options.x_axis_label, &family),
            y_axis: AxisTheme::resolve(&options.y_axis_label, &family),
            secondary_y_axis: AxisTheme::resolve(&options.secondary_y_axis_label, &family),
            series_colors,
            font_family: family,
        }
    }

    #[must_use]
    pub fn axis(&self, axis_name: AxisName) -> &AxisTheme {
        match axis_name {
            AxisName::XAxis => &self.x_axis,
            AxisName::YAxis => &self.y_axis,
            AxisName::SecondaryYAxis => &self.secondary_y_axis,
        }
    }

    /// Palette color for the `index`-th series, cycling the palette.
    #[must_use]
    pub fn series_color(&self, index: usize) -> String {
        if self.series_colors.is_empty() {
            return DEFAULT_SERIES_COLORS[index % DEFAULT_SERIES_COLORS.len()].to_owned();
        }
        self.series_colors[index % self.series_colors.len()].clone()
    }
}
