use std::cmp::Ordering;
use std::collections::HashSet;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::windowing::data_in_range;
use crate::core::{Categories, CategoryKey, ChartType, Datum, RawSeries, SeriesData};
use crate::error::{ChartError, ChartResult};
use crate::store::{ActionContext, ActionPayload, Observer, RawCategories, Slice, StoreModule};

pub const INIT_CATEGORY: &str = "initCategory";
pub const SET_CATEGORY: &str = "setCategory";

const CATEGORY_OBSERVERS: &[Observer] = &[Observer {
    name: "updateCategory",
    watches: &[Slice::ZoomRange, Slice::RawCategories],
    dispatch: &[SET_CATEGORY],
}];

/// Owns `rawCategories` and its zoomed view `categories`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryModule;

impl StoreModule for CategoryModule {
    fn name(&self) -> &'static str {
        "category"
    }

    fn owned_slices(&self) -> &'static [Slice] {
        &[Slice::RawCategories, Slice::Categories]
    }

    fn actions(&self) -> &'static [&'static str] {
        &[INIT_CATEGORY, SET_CATEGORY]
    }

    fn observers(&self) -> &'static [Observer] {
        CATEGORY_OBSERVERS
    }

    fn reset_actions(&self) -> &'static [&'static str] {
        &[INIT_CATEGORY]
    }

    fn run_action(
        &self,
        action: &str,
        ctx: &mut ActionContext<'_>,
        _payload: ActionPayload,
    ) -> ChartResult<()> {
        match action {
            INIT_CATEGORY => init_category(ctx),
            SET_CATEGORY => set_category(ctx),
            other => Err(ChartError::UnknownAction(other.to_owned())),
        }
    }
}

fn init_category(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let init = ctx.init();
    let raw = make_raw_categories(&init.series, init.categories.as_ref());
    debug!(count = raw.len(), "raw categories derived");
    ctx.set(RawCategories(raw))?;
    set_category(ctx)
}

fn set_category(ctx: &mut ActionContext<'_>) -> ChartResult<()> {
    let view_range = ctx.computed().view_range();
    let raw = &ctx.state().raw_categories.0;
    let categories = match view_range {
        Some(range) => raw.map_x(|labels| data_in_range(labels, range)),
        None => raw.clone(),
    };
    ctx.set(categories)?;
    Ok(())
}

/// Explicit categories win; otherwise the distinct x values of coordinate
/// data and the names of bullet series, numbers first in numeric order, then
/// text in lexical order. Series with only plain values fall back to
/// 1-based index labels covering the longest series.
#[must_use]
pub fn make_raw_categories(series: &RawSeries, categories: Option<&Categories>) -> Categories {
    if let Some(categories) = categories {
        return categories.clone();
    }

    let mut keys = Vec::new();
    let mut seen_numbers = HashSet::new();
    let mut seen_text = HashSet::new();
    let mut push = |key: CategoryKey| {
        let fresh = match &key {
            CategoryKey::Number(value) => seen_numbers.insert(OrderedFloat(*value)),
            CategoryKey::Text(text) => seen_text.insert(text.clone()),
        };
        if fresh {
            keys.push(key);
        }
    };

    let mut longest = 0;
    for (chart_type, inputs) in series.iter() {
        if chart_type == ChartType::Pie {
            continue;
        }
        for input in inputs {
            match &input.data {
                SeriesData::Points(points) => {
                    longest = longest.max(points.len());
                    if chart_type.accepts_coordinates() {
                        points
                            .iter()
                            .flatten()
                            .filter_map(Datum::x_value)
                            .for_each(&mut push);
                    }
                }
                _ if chart_type == ChartType::Bullet => push(CategoryKey::Text(input.name.clone())),
                _ => {}
            }
        }
    }

    if keys.is_empty() {
        return Categories::List((1..=longest).map(|index| index.to_string()).collect());
    }

    keys.sort_by(compare_category_keys);

    let mut labels_seen = HashSet::new();
    Categories::List(
        keys.iter()
            .map(ToString::to_string)
            .filter(|label| labels_seen.insert(label.clone()))
            .collect(),
    )
}

fn compare_category_keys(left: &CategoryKey, right: &CategoryKey) -> Ordering {
    match (left, right) {
        (CategoryKey::Number(a), CategoryKey::Number(b)) => a.total_cmp(b),
        (CategoryKey::Number(_), CategoryKey::Text(_)) => Ordering::Less,
        (CategoryKey::Text(_), CategoryKey::Number(_)) => Ordering::Greater,
        (CategoryKey::Text(a), CategoryKey::Text(b)) => a.cmp(b),
    }
}
