//! Text measurement used to size axis labels and legend items.
//!
//! Shaping stays with the host; the store only needs widths and heights, so
//! it depends on a small `TextMeasurer` trait. `HeuristicTextMeasurer` is the
//! default and is also what the tests rely on.

use serde::{Deserialize, Serialize};

use super::theme::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_WEIGHT};

pub trait TextMeasurer: Send + Sync {
    /// Measures `text` as a single line.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        self.measure(text, style).advance_width
    }

    fn text_height(&self, text: &str, style: &TextStyle) -> f64 {
        self.measure(text, style).line_height()
    }

    /// Widest label, `0` for an empty list.
    fn max_width(&self, labels: &[String], style: &TextStyle) -> f64 {
        labels
            .iter()
            .map(|label| self.text_width(label, style))
            .fold(0.0, f64::max)
    }

    fn max_height(&self, labels: &[String], style: &TextStyle) -> f64 {
        labels
            .iter()
            .map(|label| self.text_height(label, style))
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: u16,
}

impl TextStyle {
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_weight: DEFAULT_FONT_WEIGHT,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(11.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub advance_width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub leading: f64,
}

impl TextMetrics {
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// Average glyph width of 0.6em, baseline at 0.8em.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance_width = 0.6 * style.font_size * text.chars().count() as f64;
        TextMetrics {
            advance_width,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
            leading: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn heuristic_metrics_scale_with_font_size() {
        let style = TextStyle::new(10.0);
        let metrics = HeuristicTextMeasurer.measure("abcd", &style);

        assert_relative_eq!(metrics.advance_width, 24.0);
        assert_relative_eq!(metrics.line_height(), 10.0);
    }

    #[test]
    fn max_width_of_empty_list_is_zero() {
        assert_eq!(HeuristicTextMeasurer.max_width(&[], &TextStyle::default()), 0.0);
    }
}
