use json_pointer::{JsonPointer, PointerNotFound};

use crate::Operation;

/// Why an operation could not be applied.
#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum InvalidOperation {
    #[error("path not found: {path}")]
    PathNotFound { path: JsonPointer },
    #[error("invalid index `{index}` at {path}")]
    InvalidIndex { path: JsonPointer, index: String },
    #[error("not a container: {path}")]
    NotAContainer { path: JsonPointer },
    #[error("cannot remove the whole document")]
    EmptyPath,
    #[error("cannot move {from} into its own child {path}")]
    MoveIntoDescendant { from: JsonPointer, path: JsonPointer },
    #[error("malformed operation: {reason}")]
    Malformed { reason: String },
}

impl From<PointerNotFound> for InvalidOperation {
    fn from(err: PointerNotFound) -> Self {
        InvalidOperation::PathNotFound { path: err.pointer }
    }
}

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
pub enum PatchError {
    #[error("invalid patch operation: {0}")]
    InvalidPatchOperation(#[from] InvalidOperation),
    #[error("test failed: {path}")]
    TestFailed { path: JsonPointer },
    #[error("patch not invertible: {reason} at {path}")]
    PatchNotInvertible { path: JsonPointer, reason: &'static str },
    #[error(
        "patches not commutable: `{} {}` then `{} {}`",
        .left.name(), .left.path(), .right.name(), .right.path()
    )]
    PatchesNotCommutable {
        left: Box<Operation>,
        right: Box<Operation>,
    },
}

impl From<PointerNotFound> for PatchError {
    fn from(err: PointerNotFound) -> Self {
        PatchError::InvalidPatchOperation(err.into())
    }
}
