use crate::JsonPointer;

#[derive(Debug, thiserror::Error, Copy, Clone, Eq, PartialEq)]
#[error("invalid json pointer")]
pub struct ParseJsonPointerError;

#[derive(Debug, thiserror::Error, Clone, Eq, PartialEq)]
#[error("pointer not found: {pointer}")]
pub struct PointerNotFound {
    pub pointer: JsonPointer,
}
