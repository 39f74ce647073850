use json_pointer::JsonPointer;
use json_value::Value;
use serde::{Deserialize, Serialize};

use crate::{InvalidOperation, PatchError};

/// An ordered list of operations, applied left to right.
pub type Patch = Vec<Operation>;

/// A single RFC 6902 operation.
///
/// `context` is an extension: positional information about the array
/// neighbours of the target, used for fuzzy application.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    Add {
        path: JsonPointer,
        value: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<Value>,
    },
    Remove {
        path: JsonPointer,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<Value>,
    },
    Replace {
        path: JsonPointer,
        value: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<Value>,
    },
    Move {
        from: JsonPointer,
        path: JsonPointer,
    },
    Copy {
        from: JsonPointer,
        path: JsonPointer,
    },
    Test {
        path: JsonPointer,
        value: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<Value>,
    },
}

impl Operation {
    pub fn add(path: JsonPointer, value: impl Into<Value>) -> Self {
        Operation::Add {
            path,
            value: value.into(),
            context: None,
        }
    }

    pub fn remove(path: JsonPointer) -> Self {
        Operation::Remove {
            path,
            context: None,
        }
    }

    pub fn replace(path: JsonPointer, value: impl Into<Value>) -> Self {
        Operation::Replace {
            path,
            value: value.into(),
            context: None,
        }
    }

    pub fn move_from(from: JsonPointer, path: JsonPointer) -> Self {
        Operation::Move { from, path }
    }

    pub fn copy_from(from: JsonPointer, path: JsonPointer) -> Self {
        Operation::Copy { from, path }
    }

    pub fn test(path: JsonPointer, value: impl Into<Value>) -> Self {
        Operation::Test {
            path,
            value: value.into(),
            context: None,
        }
    }

    /// Attaches positional context. Ignored by `move` and `copy`.
    #[must_use]
    pub fn with_context(mut self, new_context: Value) -> Self {
        match &mut self {
            Operation::Add { context, .. }
            | Operation::Remove { context, .. }
            | Operation::Replace { context, .. }
            | Operation::Test { context, .. } => *context = Some(new_context),
            Operation::Move { .. } | Operation::Copy { .. } => {}
        }
        self
    }

    /// The `op` member of the wire format.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Remove { .. } => "remove",
            Operation::Replace { .. } => "replace",
            Operation::Move { .. } => "move",
            Operation::Copy { .. } => "copy",
            Operation::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &JsonPointer {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path, .. }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    pub(crate) fn path_mut(&mut self) -> &mut JsonPointer {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path, .. }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    pub fn from(&self) -> Option<&JsonPointer> {
        match self {
            Operation::Move { from, .. } | Operation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Operation::Add { value, .. }
            | Operation::Replace { value, .. }
            | Operation::Test { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&Value> {
        match self {
            Operation::Add { context, .. }
            | Operation::Remove { context, .. }
            | Operation::Replace { context, .. }
            | Operation::Test { context, .. } => context.as_ref(),
            Operation::Move { .. } | Operation::Copy { .. } => None,
        }
    }
}

/// Parses a patch document, reporting anything that is not a well-formed
/// list of operations as an invalid patch operation.
pub fn parse_patch(json: &str) -> Result<Patch, PatchError> {
    serde_json::from_str(json).map_err(|err| {
        InvalidOperation::Malformed {
            reason: err.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use json_pointer::json_pointer;
    use json_value::value;

    use super::*;

    #[test]
    fn wire_format() {
        let patch = parse_patch(
            r#"[
                {"op": "add", "path": "/a~1b/0", "value": {"x": 1}},
                {"op": "remove", "path": "/c", "value": 1},
                {"op": "replace", "path": "", "value": null},
                {"op": "move", "from": "/d", "path": "/e"},
                {"op": "copy", "from": "/f", "path": "/g"},
                {"op": "test", "path": "/h", "value": [1], "context": {"before": [], "after": []}}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            patch,
            vec![
                Operation::add(json_pointer!("/a~1b/0"), value!({"x": 1})),
                Operation::remove(json_pointer!("/c")),
                Operation::replace(json_pointer!(""), Value::Null),
                Operation::move_from(json_pointer!("/d"), json_pointer!("/e")),
                Operation::copy_from(json_pointer!("/f"), json_pointer!("/g")),
                Operation::test(json_pointer!("/h"), value!([1]))
                    .with_context(value!({"before": [], "after": []})),
            ]
        );

        assert_eq!(
            serde_json::to_value(&patch[..2]).unwrap(),
            serde_json::json!([
                {"op": "add", "path": "/a~1b/0", "value": {"x": 1}},
                {"op": "remove", "path": "/c"}
            ])
        );
    }

    #[test]
    fn malformed() {
        for json in [
            r#"[{"op": "frobnicate", "path": "/a"}]"#,
            r#"[{"op": "add", "path": "/a"}]"#,
            r#"[{"op": "move", "path": "/a"}]"#,
            r#"[{"op": "remove", "path": "a"}]"#,
            r#"{"op": "remove", "path": "/a"}"#,
        ] {
            assert!(matches!(
                parse_patch(json),
                Err(PatchError::InvalidPatchOperation(
                    InvalidOperation::Malformed { .. }
                ))
            ));
        }
    }
}
