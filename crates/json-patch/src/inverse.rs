use json_pointer::JsonPointer;
use json_value::Value;

use crate::{Operation, Patch, PatchError};

/// Computes the patch that undoes `patch`.
///
/// `remove` and `replace` can only be inverted when they are immediately
/// preceded by a `test` of the same path, which records the value they
/// discard. `copy` is never invertible.
pub fn invert(patch: &[Operation]) -> Result<Patch, PatchError> {
    let mut inverse = Vec::with_capacity(patch.len());
    let mut index = patch.len();

    while index > 0 {
        index -= 1;
        match &patch[index] {
            operation @ Operation::Test { .. } => inverse.push(operation.clone()),
            Operation::Add {
                path,
                value,
                context,
            } => {
                inverse.push(Operation::Test {
                    path: path.clone(),
                    value: value.clone(),
                    context: context.clone(),
                });
                inverse.push(Operation::Remove {
                    path: path.clone(),
                    context: context.clone(),
                });
            }
            Operation::Replace {
                path,
                value,
                context,
            } => {
                let prev_value =
                    preceding_test(patch, &mut index, path, "replace without a preceding test")?;
                inverse.push(Operation::Test {
                    path: path.clone(),
                    value: value.clone(),
                    context: context.clone(),
                });
                inverse.push(Operation::Replace {
                    path: path.clone(),
                    value: prev_value.clone(),
                    context: context.clone(),
                });
            }
            Operation::Remove { path, context } => {
                let prev_value =
                    preceding_test(patch, &mut index, path, "remove without a preceding test")?;
                inverse.push(Operation::Add {
                    path: path.clone(),
                    value: prev_value.clone(),
                    context: context.clone(),
                });
            }
            Operation::Move { from, path } => inverse.push(Operation::Move {
                from: path.clone(),
                path: from.clone(),
            }),
            Operation::Copy { path, .. } => {
                return Err(PatchError::PatchNotInvertible {
                    path: path.clone(),
                    reason: "copy",
                })
            }
        }
    }

    Ok(inverse)
}

/// Consumes the `test` of `path` right before `patch[*index]`, returning its
/// value.
fn preceding_test<'a>(
    patch: &'a [Operation],
    index: &mut usize,
    path: &JsonPointer,
    reason: &'static str,
) -> Result<&'a Value, PatchError> {
    match index.checked_sub(1).map(|prev| (prev, &patch[prev])) {
        Some((
            prev,
            Operation::Test {
                path: test_path,
                value,
                ..
            },
        )) if test_path == path => {
            *index = prev;
            Ok(value)
        }
        _ => Err(PatchError::PatchNotInvertible {
            path: path.clone(),
            reason,
        }),
    }
}
