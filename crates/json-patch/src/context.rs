//! Positional context for array operations.
//!
//! A context records the neighbours of an array position as
//! `{"before": [...], "after": [...]}`. When a patch is applied to an array
//! that has drifted since the patch was made, the neighbours are searched for
//! in the current array to recover the intended position.

use json_value::{Map, Value};

/// Returns a context builder that captures up to `size` elements on each side
/// of an array position.
///
/// `after` starts at the position itself, so for a removal it includes the
/// removed element.
pub fn make_context(size: usize) -> impl Fn(usize, &[Value]) -> Value + Clone {
    move |index, array| {
        let index = index.min(array.len());
        let before = &array[index.saturating_sub(size)..index];
        let after = &array[index..(index + size).min(array.len())];

        let mut context = Map::new();
        context.insert("before".to_string(), Value::Array(before.to_vec()));
        context.insert("after".to_string(), Value::Array(after.to_vec()));
        Value::Object(context)
    }
}

/// Adjusts `index` to the position in `array` that best matches `context`.
///
/// A context without usable `before`/`after` arrays leaves the index as is.
pub fn find_context(index: usize, array: &[Value], context: &Value) -> usize {
    find_position(
        array,
        side(context, "before"),
        side(context, "after"),
        index,
    )
}

fn side<'c>(context: &'c Value, name: &str) -> &'c [Value] {
    match context.get(name) {
        Some(Value::Array(values)) => values,
        _ => &[],
    }
}

/// Searches `array` for the position sitting between `before` and `after`,
/// starting at `start`.
///
/// The full context is tried first. Each following round drops one element
/// from the outer edge of both sides, so that the closest neighbours weigh
/// the most. Falls back to `start` when nothing matches.
pub fn find_position(array: &[Value], before: &[Value], after: &[Value], start: usize) -> usize {
    let mut skip_before = 0;
    let mut take_after = after.len();

    while take_after > 0 || skip_before < before.len() {
        if let Some(index) = find_position_with(
            array,
            &before[skip_before..],
            &after[..take_after],
            start,
        ) {
            tracing::trace!(start, index, "context matched");
            return index;
        }

        skip_before = (skip_before + 1).min(before.len());
        take_after = take_after.saturating_sub(1);
    }

    start
}

fn find_position_with(
    array: &[Value],
    before: &[Value],
    after: &[Value],
    start: usize,
) -> Option<usize> {
    // backwards from `start`, then forwards
    if let Some(first) = start.checked_sub(before.len()) {
        if let Some(i) = (0..=first)
            .rev()
            .find(|&i| matches_at(array, i + before.len(), before, after))
        {
            return Some(i + before.len());
        }
    }

    (start..array.len()).find(|&i| matches_at(array, i, before, after))
}

/// Whether `before` ends and `after` starts at `position`.
fn matches_at(array: &[Value], position: usize, before: &[Value], after: &[Value]) -> bool {
    let before_matches = position
        .checked_sub(before.len())
        .and_then(|b| array.get(b..position))
        .map_or(false, |slice| slice == before);
    let after_matches = array
        .get(position..position + after.len())
        .map_or(false, |slice| slice == after);
    before_matches && after_matches
}
