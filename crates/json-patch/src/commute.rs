use std::cmp::Ordering;

use json_pointer::{parse_array_index, JsonPointer};

use crate::{Operation, Patch, PatchError};

/// How an operation shifts the array elements that follow its target.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Shift {
    Insert,
    Delete,
    None,
}

fn shift(operation: &Operation) -> Shift {
    match operation {
        Operation::Add { .. } | Operation::Copy { .. } => Shift::Insert,
        Operation::Remove { .. } => Shift::Delete,
        _ => Shift::None,
    }
}

fn is_array_position(segment: &str) -> bool {
    segment == "-" || parse_array_index(segment).is_some()
}

/// Whether operations on `a` and `b` can never observe each other.
fn independent(a: &JsonPointer, b: &JsonPointer) -> bool {
    if a == b || a.is_ancestor_of(b) || b.is_ancestor_of(a) {
        return false;
    }

    let depth = a.len().min(b.len()) - 1;
    if a.common_prefix_len(b) < depth {
        return true;
    }

    let (a, b) = (&a.segments()[depth], &b.segments()[depth]);
    !is_array_position(a) && !is_array_position(b)
}

fn pointers(operation: &Operation) -> impl Iterator<Item = &JsonPointer> {
    operation
        .from()
        .into_iter()
        .chain(std::iter::once(operation.path()))
}

fn reindex(operation: &mut Operation, depth: usize, index: usize) {
    let path = operation.path().with_segment(depth, index.to_string());
    *operation.path_mut() = path;
}

/// Swaps two adjacent operations.
///
/// Given `left` followed by `right`, returns `(right', left')` such that
/// applying `right'` then `left'` has the same effect. Array indices are
/// adjusted for the insertion or removal the other operation performs.
/// Operations that depend on each other are rejected with
/// [`PatchError::PatchesNotCommutable`].
pub fn commute(left: &Operation, right: &Operation) -> Result<(Operation, Operation), PatchError> {
    let conflict = || PatchError::PatchesNotCommutable {
        left: Box::new(left.clone()),
        right: Box::new(right.clone()),
    };
    let (mut left_c, mut right_c) = (left.clone(), right.clone());
    let (lshift, rshift) = (shift(left), shift(right));

    if lshift == Shift::None
        && rshift == Shift::None
        && left.from().is_none()
        && right.from().is_none()
    {
        // a replace overwrites whatever the other side reads or writes at or
        // below its path
        let (lpath, rpath) = (left.path(), right.path());
        let related =
            lpath == rpath || lpath.is_ancestor_of(rpath) || rpath.is_ancestor_of(lpath);
        let replaces = matches!(left, Operation::Replace { .. })
            || matches!(right, Operation::Replace { .. });
        return if related && replaces {
            Err(conflict())
        } else {
            Ok((right_c, left_c))
        };
    }

    if left.from().is_some() || right.from().is_some() {
        let all_independent =
            pointers(left).all(|l| pointers(right).all(|r| independent(l, r)));
        return if all_independent {
            Ok((right_c, left_c))
        } else {
            Err(conflict())
        };
    }

    let (lpath, rpath) = (left.path(), right.path());
    if lpath.is_empty() || rpath.is_empty() {
        return Err(conflict());
    }

    let depth = lpath.len().min(rpath.len()) - 1;
    if lpath.common_prefix_len(rpath) < depth {
        return Ok((right_c, left_c));
    }

    let (lseg, rseg) = (&lpath.segments()[depth], &rpath.segments()[depth]);
    let (li, ri) = match (parse_array_index(lseg), parse_array_index(rseg)) {
        (Some(li), Some(ri)) => (li, ri),
        _ if lseg == "-" || rseg == "-" => return Err(conflict()),
        _ if lseg != rseg => return Ok((right_c, left_c)),
        _ if lpath == rpath && lshift == Shift::Delete && rshift == Shift::Delete => {
            return Ok((right_c, left_c))
        }
        _ => return Err(conflict()),
    };

    match lpath.len().cmp(&rpath.len()) {
        // both target elements of the same array
        Ordering::Equal => match li.cmp(&ri) {
            Ordering::Less => match lshift {
                Shift::Insert => reindex(&mut right_c, depth, ri - 1),
                Shift::Delete => reindex(&mut right_c, depth, ri + 1),
                Shift::None => {}
            },
            Ordering::Greater => match rshift {
                Shift::Insert => reindex(&mut left_c, depth, li + 1),
                Shift::Delete => reindex(&mut left_c, depth, li - 1),
                Shift::None => {}
            },
            Ordering::Equal => match (lshift, rshift) {
                (_, Shift::Insert) => reindex(&mut left_c, depth, li + 1),
                (Shift::Delete, Shift::Delete) => {}
                (Shift::Delete, Shift::None) => reindex(&mut right_c, depth, ri + 1),
                _ => return Err(conflict()),
            },
        },
        // left targets an element that right descends into
        Ordering::Less => match li.cmp(&ri) {
            Ordering::Less => match lshift {
                Shift::Insert => reindex(&mut right_c, depth, ri - 1),
                Shift::Delete => reindex(&mut right_c, depth, ri + 1),
                Shift::None => {}
            },
            Ordering::Equal if lshift == Shift::Delete => {
                reindex(&mut right_c, depth, ri + 1)
            }
            Ordering::Equal => return Err(conflict()),
            Ordering::Greater => {}
        },
        // right targets an element that left descends into
        Ordering::Greater => match li.cmp(&ri) {
            Ordering::Greater => match rshift {
                Shift::Insert => reindex(&mut left_c, depth, li + 1),
                Shift::Delete => reindex(&mut left_c, depth, li - 1),
                Shift::None => {}
            },
            Ordering::Equal if rshift == Shift::Insert => {
                reindex(&mut left_c, depth, li + 1)
            }
            Ordering::Equal => return Err(conflict()),
            Ordering::Less => {}
        },
    }

    Ok((right_c, left_c))
}

/// Swaps two adjacent patches.
///
/// Given `left` followed by `right`, returns `(right', left')` such that
/// applying `right'` then `left'` has the same effect.
pub fn commute_patches(
    left: &[Operation],
    right: &[Operation],
) -> Result<(Patch, Patch), PatchError> {
    let mut right = right.to_vec();
    let mut commuted_left = Vec::with_capacity(left.len());

    for operation in left.iter().rev() {
        let mut operation = operation.clone();
        for right_operation in &mut right {
            let (r, l) = commute(&operation, right_operation)?;
            *right_operation = r;
            operation = l;
        }
        commuted_left.push(operation);
    }
    commuted_left.reverse();

    tracing::trace!(
        left = commuted_left.len(),
        right = right.len(),
        "patches commuted"
    );
    Ok((right, commuted_left))
}
