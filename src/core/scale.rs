use serde::{Deserialize, Serialize};
use tracing::warn;

use super::options::ScaleOptions;
use super::types::ValueEdge;

/// Preferred pixel distance between two value ticks.
pub const DEFAULT_PIXELS_PER_STEP: f64 = 88.0;
const SNAP_VALUES: [f64; 4] = [1.0, 2.0, 5.0, 10.0];
const MIN_STEP_SIZE: f64 = 1.0;
const EPSILON: f64 = 1e-9;

pub const PERCENT_STACK_LIMIT: ValueEdge = ValueEdge {
    min: 0.0,
    max: 100.0,
};
pub const PERCENT_STACK_STEP_SIZE: f64 = 25.0;
pub const PERCENT_STACK_STEP_COUNT: usize = 5;

/// Nice limit, step and step count of one value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleData {
    pub limit: ValueEdge,
    pub step_size: f64,
    pub step_count: usize,
}

impl ScaleData {
    #[must_use]
    pub fn percent_stack() -> Self {
        Self {
            limit: PERCENT_STACK_LIMIT,
            step_size: PERCENT_STACK_STEP_SIZE,
            step_count: PERCENT_STACK_STEP_COUNT,
        }
    }

    /// Projects `value` onto an axis of `size` pixels measured from `limit.min`.
    ///
    /// Returns `None` for a degenerate limit or non-finite input.
    #[must_use]
    pub fn value_to_pixel(&self, value: f64, size: f64) -> Option<f64> {
        let span = self.limit.max - self.limit.min;
        if !value.is_finite() || !size.is_finite() || span == 0.0 || !span.is_finite() {
            return None;
        }
        Some((value - self.limit.min) / span * size)
    }
}

/// Computes a nice scale for `range` spread over `offset_size` pixels.
///
/// User bounds in `options` replace the computed ones and the step count is
/// derived to cover the resulting limit.
#[must_use]
pub fn compute_scale(range: ValueEdge, offset_size: f64, options: &ScaleOptions) -> ScaleData {
    let (user_min, user_max) = user_bounds(options);
    let user_step = options
        .step_size
        .filter(|step| step.is_finite() && *step > 0.0);

    let mut min = user_min.unwrap_or(range.min);
    let mut max = user_max.unwrap_or(range.max);
    if min > max {
        std::mem::swap(&mut min, &mut max);
    }

    let offset_size = if offset_size.is_finite() && offset_size > 0.0 {
        offset_size
    } else {
        DEFAULT_PIXELS_PER_STEP
    };

    let step_size = match user_step {
        Some(step) => step,
        None => snap_step(rough_step(min, max, offset_size)),
    };
    let multiplier = place_multiplier(step_size);

    let mut limit = normalized_limit(min, max, step_size, multiplier);
    if let Some(user_min) = user_min {
        limit.min = user_min;
    }
    if let Some(user_max) = user_max {
        limit.max = user_max;
    }
    if limit.max <= limit.min {
        limit.max = fix_float(limit.min + step_size, multiplier);
    }

    let step_count = step_count_of(limit, step_size, multiplier);

    if user_max.is_none() && limit.max == range.max && range.max != 0.0 {
        limit.max = fix_float(limit.max + step_size, multiplier);
    }
    if user_min.is_none() && limit.min == range.min && range.min != 0.0 {
        limit.min = fix_float(limit.min - step_size, multiplier);
    }

    ScaleData {
        limit,
        step_size,
        step_count,
    }
}

fn user_bounds(options: &ScaleOptions) -> (Option<f64>, Option<f64>) {
    let min = options.min.filter(|value| value.is_finite());
    let max = options.max.filter(|value| value.is_finite());
    match (min, max) {
        (Some(min), Some(max)) if min > max => {
            warn!(min, max, "inverted scale bounds; swapping");
            (Some(max), Some(min))
        }
        bounds => bounds,
    }
}

fn rough_step(min: f64, max: f64, offset_size: f64) -> f64 {
    let limit_size = (max - min).abs();
    let step_count = (offset_size / DEFAULT_PIXELS_PER_STEP).ceil().max(1.0);
    let step = limit_size / offset_size * (offset_size / step_count);
    let integral_range = min.fract() == 0.0 && max.fract() == 0.0;

    if step <= 0.0 || !step.is_finite() {
        return MIN_STEP_SIZE;
    }
    if integral_range && step < MIN_STEP_SIZE {
        return MIN_STEP_SIZE;
    }
    step
}

/// Power of ten at or below `value`; `1` for zero.
#[must_use]
pub fn digits_of(value: f64) -> f64 {
    let value = value.abs();
    if value == 0.0 || !value.is_finite() {
        return 1.0;
    }
    10f64.powi(value.log10().floor() as i32)
}

/// Rounds a step to 1, 2, 5 or 10 times a power of ten.
#[must_use]
pub fn snap_step(step: f64) -> f64 {
    let digits = digits_of(step);
    let normalized = step / digits;
    let snapped = SNAP_VALUES
        .windows(2)
        .find(|pair| normalized <= (pair[0] + pair[1]) / 2.0)
        .map_or(SNAP_VALUES[SNAP_VALUES.len() - 1], |pair| pair[0]);
    fix_float(snapped * digits, place_multiplier(digits))
}

fn place_multiplier(step_size: f64) -> f64 {
    let digits = digits_of(step_size);
    if digits >= 1.0 { 1.0 } else { 1.0 / digits }
}

fn fix_float(value: f64, multiplier: f64) -> f64 {
    (value * multiplier).round() / multiplier
}

fn normalized_limit(min: f64, max: f64, step_size: f64, multiplier: f64) -> ValueEdge {
    let steps_of = |value: f64| (value * multiplier) / (step_size * multiplier);
    let max = fix_float((steps_of(max) - EPSILON).ceil() * step_size, multiplier);
    let min = if min > step_size {
        fix_float((steps_of(min) + EPSILON).floor() * step_size, multiplier)
    } else if min < 0.0 {
        -fix_float((steps_of(min.abs()) - EPSILON).ceil() * step_size, multiplier)
    } else {
        0.0
    };
    ValueEdge::new(min, max)
}

fn step_count_of(limit: ValueEdge, step_size: f64, multiplier: f64) -> usize {
    let size = (limit.max - limit.min) * multiplier;
    let step = step_size * multiplier;
    let count = (size / step - EPSILON).ceil();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        1
    }
}
