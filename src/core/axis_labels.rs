use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::text::{TextMeasurer, TextStyle};
use super::types::ValueEdge;

pub const TICK_SIZE: f64 = 5.0;
pub const AUTO_INTERVAL_MIN_WIDTH: f64 = 90.0;
pub const AUTO_INTERVAL_MAX_WIDTH: f64 = 121.0;
pub const AUTO_INTERVAL_LABEL_MARGIN: f64 = 5.0;
const MAX_GENERATED_LABELS: usize = 10_000;

/// Label kept for display together with its pixel offset along the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewLabel {
    pub text: String,
    pub offset_pos: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LabelSize {
    pub max_label_width: f64,
    pub max_label_height: f64,
}

/// Value labels `min, min + step, ..` up to and including `max`.
///
/// Stepping is done on decimals so `0.1` steps do not drift.
#[must_use]
pub fn make_labels_from_limit(limit: ValueEdge, step_size: f64) -> Vec<String> {
    let (Some(min), Some(max)) = (Decimal::from_f64(limit.min), Decimal::from_f64(limit.max))
    else {
        return Vec::new();
    };
    let step = Decimal::from_f64(step_size).filter(|step| step.is_sign_positive() && !step.is_zero());
    let Some(step) = step else {
        return vec![min.normalize().to_string()];
    };

    let mut labels = Vec::new();
    let mut value = min;
    while value <= max && labels.len() < MAX_GENERATED_LABELS {
        labels.push(value.normalize().to_string());
        value += step;
    }
    labels
}

/// Formats category labels as dates when they parse as one.
///
/// Supported tokens: `YYYY YY MM M DD D hh h mm ss A`. Labels that do not
/// parse as a timestamp or date are returned unchanged.
#[must_use]
pub fn format_date_labels(categories: &[String], format: &str) -> Vec<String> {
    let pattern = date_pattern(format);
    categories
        .iter()
        .map(|category| {
            let Some(datetime) = parse_category_date(category) else {
                return category.clone();
            };
            let mut out = String::new();
            if write!(out, "{}", datetime.format(&pattern)).is_err() {
                return category.clone();
            }
            out
        })
        .collect()
}

fn date_pattern(format: &str) -> String {
    const TOKENS: [&str; 11] = ["YYYY", "YY", "MM", "M", "DD", "D", "hh", "h", "mm", "ss", "A"];
    let twelve_hour = format.contains('A');
    let mut pattern = String::with_capacity(format.len() * 2);
    let mut rest = format;

    while !rest.is_empty() {
        if let Some(token) = TOKENS.iter().find(|token| rest.starts_with(**token)) {
            pattern.push_str(match *token {
                "YYYY" => "%Y",
                "YY" => "%y",
                "MM" => "%m",
                "M" => "%-m",
                "DD" => "%d",
                "D" => "%-d",
                "hh" if twelve_hour => "%I",
                "hh" => "%H",
                "h" if twelve_hour => "%-I",
                "h" => "%-H",
                "mm" => "%M",
                "ss" => "%S",
                _ => "%p",
            });
            rest = &rest[token.len()..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            if ch == '%' {
                pattern.push_str("%%");
            } else {
                pattern.push(ch);
            }
        }
        rest = chars.as_str();
    }
    pattern
}

fn parse_category_date(label: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

    let label = label.trim();
    if label.len() == 4 && label.bytes().all(|byte| byte.is_ascii_digit()) {
        return label
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .and_then(|date| date.and_hms_opt(0, 0, 0));
    }
    if let Ok(millis) = label.parse::<f64>() {
        if !millis.is_finite() || label.trim_start_matches('-').len() <= 4 {
            return None;
        }
        return DateTime::from_timestamp_millis(millis as i64).map(|time| time.naive_utc());
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(label) {
        return Some(time.naive_local());
    }
    if let Some(time) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(label, format).ok())
    {
        return Some(time);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(label, format).ok())
        .or_else(|| {
            // Year-month labels such as `2021-03` name the first of the month.
            ["%Y-%m-%d", "%Y/%m/%d"]
                .iter()
                .zip(["-01", "/01"])
                .find_map(|(format, day)| {
                    NaiveDate::parse_from_str(&format!("{label}{day}"), format).ok()
                })
        })
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Evenly spaced tick offsets `i / (count - 1) * size`.
#[must_use]
pub fn tick_pixel_positions(size: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|index| {
            if index == 0 {
                0.0
            } else {
                index as f64 / (count - 1) as f64 * size
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct ViewLabelParams<'a> {
    pub labels: &'a [String],
    pub point_on_column: bool,
    pub tick_distance: f64,
    pub tick_count: usize,
    pub label_interval: usize,
}

/// Labels shown on an axis of `axis_size` pixels.
///
/// A label is kept when its index is a multiple of the label interval and its
/// position, shifted half a tick for point-on-column axes, stays on the axis.
#[must_use]
pub fn view_labels(params: ViewLabelParams<'_>, axis_size: f64) -> Vec<ViewLabel> {
    let positions = tick_pixel_positions(axis_size, params.tick_count);
    let interval = params.label_interval.max(1);
    let adjustment = if params.point_on_column {
        params.tick_distance / 2.0
    } else {
        0.0
    };

    params
        .labels
        .iter()
        .enumerate()
        .filter_map(|(index, text)| {
            let position = positions.get(index)?;
            let offset_pos = position + adjustment;
            (index % interval == 0 && offset_pos <= axis_size).then(|| ViewLabel {
                text: text.clone(),
                offset_pos,
            })
        })
        .collect()
}

/// Size of the longest label, widened by `x_margin`.
#[must_use]
pub fn max_label_size(
    labels: &[String],
    x_margin: f64,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> LabelSize {
    let longest = labels
        .iter()
        .fold("", |acc, label| {
            if acc.chars().count() >= label.chars().count() {
                acc
            } else {
                label.as_str()
            }
        });
    LabelSize {
        max_label_width: measurer.text_width(longest, style) + x_margin,
        max_label_height: measurer.text_height(longest, style),
    }
}

/// Snaps a coordinate to the centre of a 1px line.
#[must_use]
pub fn crisp_pixel(pixel: f64) -> f64 {
    if pixel.fract() == 0.0 {
        pixel + 0.5
    } else {
        (pixel - 0.5).round() + 0.5
    }
}

#[must_use]
pub fn axis_label_anchor_point(label_height: f64) -> f64 {
    crisp_pixel(TICK_SIZE * 2.0 + label_height / 2.0)
}

/// Interval at which category labels fit on an axis `axis_width` pixels wide.
///
/// `first_label_width` is the measured width of the first category.
#[must_use]
pub fn auto_adjusting_interval(count: usize, axis_width: f64, first_label_width: Option<f64>) -> usize {
    if count == 0 || !axis_width.is_finite() || axis_width <= 0.0 {
        return 1;
    }
    if let Some(width) = first_label_width {
        if width < axis_width / count as f64 - AUTO_INTERVAL_LABEL_MARGIN {
            return 1;
        }
    }

    let fitting_divisor = (1..=count).filter(|divisor| count % divisor == 0).find(|interval| {
        let interval_width = *interval as f64 / count as f64 * axis_width;
        (AUTO_INTERVAL_MIN_WIDTH..=AUTO_INTERVAL_MAX_WIDTH).contains(&interval_width)
    });
    if let Some(interval) = fitting_divisor {
        return interval;
    }

    let max_label_count = (axis_width / AUTO_INTERVAL_MIN_WIDTH).floor() as usize;
    if max_label_count == 0 {
        return count;
    }
    count.div_ceil(max_label_count).max(1)
}

/// Labels for a diverging axis mirrored around the zero label.
///
/// A negative-only range mirrors to `l ++ rev(l[..n-1])` so the zero label
/// stays in the centre of the axis, matching the non-negative case.
#[must_use]
pub fn diverging_labels(labels: &[String]) -> Vec<String> {
    if labels.is_empty() {
        return Vec::new();
    }
    let negative_only = labels
        .iter()
        .all(|label| label.parse::<f64>().is_ok_and(|value| value <= 0.0));

    if negative_only {
        let mut out = labels.to_vec();
        out.extend(labels[..labels.len() - 1].iter().rev().cloned());
        out
    } else {
        let mut out: Vec<String> = labels[1..].iter().rev().cloned().collect();
        out.extend(labels.iter().cloned());
        out
    }
}
