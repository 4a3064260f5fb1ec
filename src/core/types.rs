use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in chart pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }
}

/// Closed numeric interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueEdge {
    pub min: f64,
    pub max: f64,
}

impl ValueEdge {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        (self.max - self.min).abs()
    }

    #[must_use]
    pub fn contains_zero(self) -> bool {
        self.min <= 0.0 && self.max >= 0.0
    }
}

/// Inclusive window of category indices currently in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRange {
    pub start: usize,
    pub end: usize,
}

impl ViewRange {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Swaps inverted bounds and clamps the window to `len` items.
    ///
    /// Returns `None` when there is nothing to window.
    #[must_use]
    pub fn normalized(self, len: usize) -> Option<Self> {
        if len == 0 {
            return None;
        }
        let (start, end) = if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        };
        let last = len - 1;
        Some(Self {
            start: start.min(last),
            end: end.min(last),
        })
    }

    #[must_use]
    pub fn covers_all(self, len: usize) -> bool {
        self.start == 0 && len > 0 && self.end == len - 1
    }
}

/// Physical axis keys used by scale, data range and axes slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisName {
    XAxis,
    YAxis,
    SecondaryYAxis,
}

impl AxisName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::XAxis => "xAxis",
            Self::YAxis => "yAxis",
            Self::SecondaryYAxis => "secondaryYAxis",
        }
    }

    /// Whether the axis runs horizontally.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::XAxis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

impl Align {
    /// Top and bottom legends flow horizontally above/below the plot.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}
