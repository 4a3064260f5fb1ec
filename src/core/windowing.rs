use super::types::ViewRange;

/// Returns the items inside an inclusive index window.
///
/// Inverted windows are swapped and windows past the end are clamped.
#[must_use]
pub fn data_in_range<T: Clone>(items: &[T], range: ViewRange) -> Vec<T> {
    match range.normalized(items.len()) {
        Some(range) => items[range.start..=range.end].to_vec(),
        None => Vec::new(),
    }
}

/// Whether `range` hides part of a sequence of `len` items.
#[must_use]
pub fn is_zooming(len: usize, range: Option<ViewRange>) -> bool {
    range.is_some_and(|range| {
        let (start, end) = if range.start <= range.end {
            (range.start, range.end)
        } else {
            (range.end, range.start)
        };
        start != 0 || end.saturating_add(1) != len
    })
}
