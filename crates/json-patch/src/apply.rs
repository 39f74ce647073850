use std::fmt::{self, Debug, Formatter};

use json_pointer::{parse_array_index, JsonPointerRef, ValueExt};
use json_value::Value;

use crate::{
    context,
    undo::{restore, UndoCommand, UpdateSource, UpdateTarget},
    InvalidOperation, Operation, PatchError,
};

/// Maps an array index to the best position for the given context.
pub type FindContext = dyn Fn(usize, &[Value], &Value) -> usize;

#[derive(Default)]
pub struct PatchOptions {
    find_context: Option<Box<FindContext>>,
}

impl Debug for PatchOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatchOptions")
            .field("find_context", &self.find_context.is_some())
            .finish()
    }
}

impl PatchOptions {
    /// Adjusts the index of array operations that carry a context.
    #[must_use]
    pub fn find_context(self, f: impl Fn(usize, &[Value], &Value) -> usize + 'static) -> Self {
        Self {
            find_context: Some(Box::new(f)),
        }
    }

    /// Uses [`context::find_context`] for array operations that carry a
    /// context.
    #[must_use]
    pub fn fuzzy(self) -> Self {
        self.find_context(context::find_context)
    }
}

/// Applies `patch` to a copy of `document`.
pub fn apply(patch: &[Operation], document: &Value) -> Result<Value, PatchError> {
    apply_with(patch, document, &PatchOptions::default())
}

pub fn apply_with(
    patch: &[Operation],
    document: &Value,
    options: &PatchOptions,
) -> Result<Value, PatchError> {
    let mut document = document.clone();
    apply_in_place_with(patch, &mut document, options)?;
    Ok(document)
}

/// Applies `patch` to `document` in place.
///
/// Either every operation succeeds, or `document` is rolled back to its
/// original state and the first error is returned.
pub fn apply_in_place(patch: &[Operation], document: &mut Value) -> Result<(), PatchError> {
    apply_in_place_with(patch, document, &PatchOptions::default())
}

pub fn apply_in_place_with(
    patch: &[Operation],
    document: &mut Value,
    options: &PatchOptions,
) -> Result<(), PatchError> {
    let mut undo_commands = Vec::new();
    let res = Patcher {
        root: document,
        options,
    }
    .patch_all(&mut undo_commands, patch);

    match &res {
        Ok(()) => tracing::debug!(operations = patch.len(), "patch applied"),
        Err(err) => {
            tracing::debug!(
                error = %err,
                undo_count = undo_commands.len(),
                "patch failed, rolling back"
            );
            for undo_command in undo_commands.into_iter().rev() {
                undo_command.execute(document);
            }
        }
    }

    res
}

enum Inserted<'a> {
    Root {
        prev_value: Value,
    },
    Target {
        target: UpdateTarget<'a>,
        prev_value: Option<Value>,
    },
}

/// A failed insertion hands the value back so that a move can restore it.
struct Rejected {
    error: PatchError,
    value: Value,
}

impl Rejected {
    fn new(error: impl Into<PatchError>, value: Value) -> Self {
        Self {
            error: error.into(),
            value,
        }
    }
}

fn array_index(
    options: &PatchOptions,
    array: &[Value],
    key: &str,
    context: Option<&Value>,
    allow_end: bool,
) -> Option<usize> {
    let index = parse_array_index(key)?;
    let index = match (&options.find_context, context) {
        (Some(find_context), Some(context)) => find_context(index, array, context),
        _ => index,
    };
    let limit = if allow_end {
        array.len() + 1
    } else {
        array.len()
    };
    (index < limit).then_some(index)
}

fn invalid_index(path: JsonPointerRef<'_>, key: &str) -> InvalidOperation {
    InvalidOperation::InvalidIndex {
        path: path.to_owned(),
        index: key.to_string(),
    }
}

struct Patcher<'r, 'o> {
    root: &'r mut Value,
    options: &'o PatchOptions,
}

impl<'r, 'o> Patcher<'r, 'o> {
    fn patch_all<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        patch: &'a [Operation],
    ) -> Result<(), PatchError> {
        for operation in patch {
            tracing::trace!(op = operation.name(), path = %operation.path(), "apply operation");
            self.patch_command(undo_commands, operation)?;
        }
        Ok(())
    }

    fn patch_command<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        operation: &'a Operation,
    ) -> Result<(), PatchError> {
        match operation {
            Operation::Add {
                path,
                value,
                context,
            } => self.patch_command_add(undo_commands, path.as_ref(), value, context.as_ref()),
            Operation::Remove { path, context } => {
                self.patch_command_remove(undo_commands, path.as_ref(), context.as_ref())
            }
            Operation::Replace {
                path,
                value,
                context,
            } => self.patch_command_replace(undo_commands, path.as_ref(), value, context.as_ref()),
            Operation::Move { from, path } => {
                self.patch_command_move(undo_commands, from.as_ref(), path.as_ref())
            }
            Operation::Copy { from, path } => {
                self.patch_command_copy(undo_commands, from.as_ref(), path.as_ref())
            }
            Operation::Test {
                path,
                value,
                context,
            } => self.patch_command_test(path.as_ref(), value, context.as_ref()),
        }
    }

    /// Inserts `value` at `path`. The parent must already exist.
    fn insert<'a>(
        &mut self,
        path: JsonPointerRef<'a>,
        value: Value,
        context: Option<&Value>,
    ) -> Result<Inserted<'a>, Rejected> {
        let (container, key) = match self.root.resolve_mut(path) {
            Ok(resolved) => resolved,
            Err(err) => return Err(Rejected::new(err, value)),
        };
        let (parent_path, key) = match (path.split_last(), key) {
            (Some((parent_path, _)), Some(key)) => (parent_path, key),
            _ => {
                let prev_value = std::mem::replace(container, value);
                return Ok(Inserted::Root { prev_value });
            }
        };

        match container {
            Value::Object(obj) => {
                let prev_value = obj.insert(key.to_string(), value);
                Ok(Inserted::Target {
                    target: UpdateTarget::Object {
                        path: parent_path,
                        key,
                    },
                    prev_value,
                })
            }
            Value::Array(array) if key == "-" => {
                array.push(value);
                Ok(Inserted::Target {
                    target: UpdateTarget::ArrayAppend { path: parent_path },
                    prev_value: None,
                })
            }
            Value::Array(array) => match array_index(self.options, array, key, context, true) {
                Some(index) => {
                    array.insert(index, value);
                    Ok(Inserted::Target {
                        target: UpdateTarget::ArrayInsert {
                            path: parent_path,
                            index,
                        },
                        prev_value: None,
                    })
                }
                None => Err(Rejected::new(invalid_index(parent_path, key), value)),
            },
            _ => Err(Rejected::new(
                InvalidOperation::NotAContainer {
                    path: parent_path.to_owned(),
                },
                value,
            )),
        }
    }

    /// Detaches the value at `path`.
    fn take<'a>(
        &mut self,
        path: JsonPointerRef<'a>,
        context: Option<&Value>,
    ) -> Result<(UpdateSource<'a>, Value), PatchError> {
        let (container, key) = self.root.resolve_mut(path)?;
        let (parent_path, key) = match (path.split_last(), key) {
            (Some((parent_path, _)), Some(key)) => (parent_path, key),
            _ => return Err(InvalidOperation::EmptyPath.into()),
        };

        match container {
            Value::Object(obj) => {
                let (index, _, value) =
                    obj.shift_remove_full(key)
                        .ok_or_else(|| InvalidOperation::PathNotFound {
                            path: path.to_owned(),
                        })?;
                Ok((
                    UpdateSource::Object {
                        path: parent_path,
                        key,
                        index,
                    },
                    value,
                ))
            }
            Value::Array(array) => {
                let index = array_index(self.options, array, key, context, false)
                    .ok_or_else(|| invalid_index(parent_path, key))?;
                let value = array.remove(index);
                Ok((
                    UpdateSource::Array {
                        path: parent_path,
                        index,
                    },
                    value,
                ))
            }
            _ => Err(InvalidOperation::NotAContainer {
                path: parent_path.to_owned(),
            }
            .into()),
        }
    }

    fn patch_command_add<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        path: JsonPointerRef<'a>,
        value: &Value,
        context: Option<&Value>,
    ) -> Result<(), PatchError> {
        let undo_command = match self
            .insert(path, value.clone(), context)
            .map_err(|rejected| rejected.error)?
        {
            Inserted::Root { prev_value } => UndoCommand::ReplaceRoot { prev_value },
            Inserted::Target { target, prev_value } => UndoCommand::Add { target, prev_value },
        };
        undo_commands.push(undo_command);
        Ok(())
    }

    fn patch_command_remove<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        path: JsonPointerRef<'a>,
        context: Option<&Value>,
    ) -> Result<(), PatchError> {
        let (source, prev_value) = self.take(path, context)?;
        undo_commands.push(UndoCommand::Remove { source, prev_value });
        Ok(())
    }

    fn patch_command_replace<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        path: JsonPointerRef<'a>,
        value: &Value,
        context: Option<&Value>,
    ) -> Result<(), PatchError> {
        let (container, key) = self.root.resolve_mut(path)?;
        let (parent_path, key) = match (path.split_last(), key) {
            (Some((parent_path, _)), Some(key)) => (parent_path, key),
            _ => {
                let prev_value = std::mem::replace(container, value.clone());
                undo_commands.push(UndoCommand::ReplaceRoot { prev_value });
                return Ok(());
            }
        };

        let (source, slot) = match container {
            Value::Object(obj) => {
                let (index, _, slot) =
                    obj.get_full_mut(key)
                        .ok_or_else(|| InvalidOperation::PathNotFound {
                            path: path.to_owned(),
                        })?;
                (
                    UpdateSource::Object {
                        path: parent_path,
                        key,
                        index,
                    },
                    slot,
                )
            }
            Value::Array(array) => {
                let index = array_index(self.options, array, key, context, false)
                    .ok_or_else(|| invalid_index(parent_path, key))?;
                (
                    UpdateSource::Array {
                        path: parent_path,
                        index,
                    },
                    &mut array[index],
                )
            }
            _ => {
                return Err(InvalidOperation::NotAContainer {
                    path: parent_path.to_owned(),
                }
                .into())
            }
        };

        let prev_value = std::mem::replace(slot, value.clone());
        undo_commands.push(UndoCommand::Replace { source, prev_value });
        Ok(())
    }

    fn patch_command_move<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        from: JsonPointerRef<'a>,
        path: JsonPointerRef<'a>,
    ) -> Result<(), PatchError> {
        if from == path {
            return match self.root.locate(from) {
                Some(_) => Ok(()),
                None => Err(InvalidOperation::PathNotFound {
                    path: from.to_owned(),
                }
                .into()),
            };
        }
        if path.starts_with(from) {
            return Err(InvalidOperation::MoveIntoDescendant {
                from: from.to_owned(),
                path: path.to_owned(),
            }
            .into());
        }

        let (source, value) = self.take(from, None)?;
        match self.insert(path, value, None) {
            Ok(Inserted::Root { prev_value }) => {
                undo_commands.push(UndoCommand::MoveToRoot { source, prev_value });
            }
            Ok(Inserted::Target { target, prev_value }) => {
                undo_commands.push(UndoCommand::Move {
                    source,
                    target,
                    prev_value,
                });
            }
            Err(Rejected { error, value }) => {
                restore(self.root, source, value);
                return Err(error);
            }
        }

        Ok(())
    }

    fn patch_command_copy<'a>(
        &mut self,
        undo_commands: &mut Vec<UndoCommand<'a>>,
        from: JsonPointerRef<'a>,
        path: JsonPointerRef<'a>,
    ) -> Result<(), PatchError> {
        let value = self.root.locate(from).cloned().ok_or_else(|| {
            InvalidOperation::PathNotFound {
                path: from.to_owned(),
            }
        })?;

        let undo_command = match self
            .insert(path, value, None)
            .map_err(|rejected| rejected.error)?
        {
            Inserted::Root { prev_value } => UndoCommand::ReplaceRoot { prev_value },
            Inserted::Target { target, prev_value } => UndoCommand::Add { target, prev_value },
        };
        undo_commands.push(undo_command);
        Ok(())
    }

    fn patch_command_test(
        &self,
        path: JsonPointerRef<'_>,
        value: &Value,
        context: Option<&Value>,
    ) -> Result<(), PatchError> {
        let actual = match self.root.resolve(path) {
            Ok((container, None)) => Some(container),
            Ok((Value::Array(array), Some(key))) => {
                array_index(self.options, array, key, context, false).map(|index| &array[index])
            }
            Ok((Value::Object(obj), Some(key))) => obj.get(key),
            Ok(_) | Err(_) => None,
        };

        if actual == Some(value) {
            Ok(())
        } else {
            Err(PatchError::TestFailed {
                path: path.to_owned(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use json_pointer::json_pointer;
    use json_value::value;

    use super::*;
    use crate::context::make_context;

    fn patch(json: serde_json::Value) -> Vec<Operation> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn add() {
        let doc = value!({"a": [1, 2], "b": {}});

        assert_eq!(
            apply(&[Operation::add(json_pointer!("/a/1"), value!(9))], &doc).unwrap(),
            value!({"a": [1, 9, 2], "b": {}})
        );
        assert_eq!(
            apply(&[Operation::add(json_pointer!("/a/2"), value!(9))], &doc).unwrap(),
            value!({"a": [1, 2, 9], "b": {}})
        );
        assert_eq!(
            apply(&[Operation::add(json_pointer!("/a/-"), value!(9))], &doc).unwrap(),
            value!({"a": [1, 2, 9], "b": {}})
        );
        assert_eq!(
            apply(&[Operation::add(json_pointer!("/b/c"), value!(true))], &doc).unwrap(),
            value!({"a": [1, 2], "b": {"c": true}})
        );
        assert_eq!(
            apply(&[Operation::add(json_pointer!(""), value!([]))], &doc).unwrap(),
            value!([])
        );
    }

    #[test]
    fn add_overwrites_object_member() {
        let doc = value!({"a": 1, "b": 2});
        let res = apply(&[Operation::add(json_pointer!("/a"), value!(3))], &doc).unwrap();
        assert_eq!(res, value!({"a": 3, "b": 2}));
    }

    #[test]
    fn add_invalid() {
        let doc = value!({"a": [1, 2], "s": "x"});

        assert!(matches!(
            apply(&[Operation::add(json_pointer!("/a/3"), value!(9))], &doc),
            Err(PatchError::InvalidPatchOperation(
                InvalidOperation::InvalidIndex { .. }
            ))
        ));
        assert!(matches!(
            apply(&[Operation::add(json_pointer!("/a/01"), value!(9))], &doc),
            Err(PatchError::InvalidPatchOperation(
                InvalidOperation::InvalidIndex { .. }
            ))
        ));
        assert!(matches!(
            apply(&[Operation::add(json_pointer!("/x/y"), value!(9))], &doc),
            Err(PatchError::InvalidPatchOperation(
                InvalidOperation::PathNotFound { .. }
            ))
        ));
        assert!(matches!(
            apply(&[Operation::add(json_pointer!("/s/0"), value!(9))], &doc),
            Err(PatchError::InvalidPatchOperation(
                InvalidOperation::NotAContainer { .. }
            ))
        ));
    }

    #[test]
    fn remove() {
        let doc = value!({"a": [1, 2, 3], "b": 1, "c": 2});

        assert_eq!(
            apply(&[Operation::remove(json_pointer!("/a/1"))], &doc).unwrap(),
            value!({"a": [1, 3], "b": 1, "c": 2})
        );
        assert_eq!(
            apply(&[Operation::remove(json_pointer!("/b"))], &doc).unwrap(),
            value!({"a": [1, 2, 3], "c": 2})
        );
        assert_eq!(
            apply(&[Operation::remove(json_pointer!("/a/3"))], &doc),
            Err(InvalidOperation::InvalidIndex {
                path: json_pointer!("/a"),
                index: "3".to_string(),
            }
            .into())
        );
        assert_eq!(
            apply(&[Operation::remove(json_pointer!("/x"))], &doc),
            Err(InvalidOperation::PathNotFound {
                path: json_pointer!("/x")
            }
            .into())
        );
        assert_eq!(
            apply(&[Operation::remove(json_pointer!(""))], &doc),
            Err(InvalidOperation::EmptyPath.into())
        );
    }

    #[test]
    fn replace() {
        let doc = value!({"a": [1, 2], "b": 1});

        assert_eq!(
            apply(&[Operation::replace(json_pointer!("/a/0"), value!("x"))], &doc).unwrap(),
            value!({"a": ["x", 2], "b": 1})
        );
        assert_eq!(
            apply(&[Operation::replace(json_pointer!("/b"), value!(null))], &doc).unwrap(),
            value!({"a": [1, 2], "b": null})
        );
        assert_eq!(
            apply(&[Operation::replace(json_pointer!(""), value!(7))], &doc).unwrap(),
            value!(7)
        );
        assert!(apply(&[Operation::replace(json_pointer!("/c"), value!(1))], &doc).is_err());
        assert!(apply(&[Operation::replace(json_pointer!("/a/2"), value!(1))], &doc).is_err());
    }

    #[test]
    fn move_value() {
        let doc = value!({"x": 1});
        assert_eq!(
            apply(
                &[Operation::move_from(json_pointer!("/x"), json_pointer!("/y"))],
                &doc
            )
            .unwrap(),
            value!({"y": 1})
        );

        let doc = value!([1, 2, 3, 4]);
        assert_eq!(
            apply(
                &[Operation::move_from(json_pointer!("/0"), json_pointer!("/2"))],
                &doc
            )
            .unwrap(),
            value!([2, 3, 1, 4])
        );

        let doc = value!({"a": {"b": [1]}});
        assert_eq!(
            apply(
                &[Operation::move_from(json_pointer!("/a/b"), json_pointer!(""))],
                &doc
            )
            .unwrap(),
            value!([1])
        );

        assert_eq!(
            apply(
                &[Operation::move_from(json_pointer!("/a"), json_pointer!("/a"))],
                &doc
            )
            .unwrap(),
            doc
        );
    }

    #[test]
    fn move_into_descendant() {
        let doc = value!({"a": {"b": {}}});
        assert_eq!(
            apply(
                &[Operation::move_from(json_pointer!("/a"), json_pointer!("/a/b/c"))],
                &doc
            ),
            Err(InvalidOperation::MoveIntoDescendant {
                from: json_pointer!("/a"),
                path: json_pointer!("/a/b/c"),
            }
            .into())
        );
    }

    #[test]
    fn failed_move_keeps_source() {
        let mut doc = value!({"a": 1, "b": 2, "c": [0]});
        let res = apply_in_place(
            &[Operation::move_from(json_pointer!("/a"), json_pointer!("/c/5"))],
            &mut doc,
        );
        assert!(res.is_err());
        assert_eq!(doc, value!({"a": 1, "b": 2, "c": [0]}));
        assert_eq!(
            doc.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn copy() {
        let doc = value!({"a": {"b": 1}});
        let res = apply(
            &patch(serde_json::json!([
                {"op": "copy", "from": "/a", "path": "/c"},
                {"op": "replace", "path": "/a/b", "value": 2}
            ])),
            &doc,
        )
        .unwrap();
        assert_eq!(res, value!({"a": {"b": 2}, "c": {"b": 1}}));

        assert!(apply(
            &[Operation::copy_from(json_pointer!("/x"), json_pointer!("/y"))],
            &doc
        )
        .is_err());
    }

    #[test]
    fn test_operation() {
        let doc = value!({"a": [1, {"b": 1.0}], "c": null});

        assert!(apply(&[Operation::test(json_pointer!("/a/1"), value!({"b": 1}))], &doc).is_ok());
        assert!(apply(&[Operation::test(json_pointer!("/c"), value!(null))], &doc).is_ok());
        assert!(apply(&[Operation::test(json_pointer!(""), doc.clone())], &doc).is_ok());
        assert_eq!(
            apply(&[Operation::test(json_pointer!("/d"), value!(null))], &doc),
            Err(PatchError::TestFailed {
                path: json_pointer!("/d")
            })
        );
        assert_eq!(
            apply(&[Operation::test(json_pointer!("/a/0"), value!(2))], &doc),
            Err(PatchError::TestFailed {
                path: json_pointer!("/a/0")
            })
        );
    }

    #[test]
    fn rollback() {
        let original = value!({"a": [1, 2, 3], "b": {"c": 1, "d": 2}, "e": 0});
        let mut doc = original.clone();

        let res = apply_in_place(
            &patch(serde_json::json!([
                {"op": "add", "path": "/a/1", "value": 10},
                {"op": "remove", "path": "/b/c"},
                {"op": "replace", "path": "/e", "value": 5},
                {"op": "move", "from": "/a/0", "path": "/b/x"},
                {"op": "copy", "from": "/b", "path": "/f"},
                {"op": "add", "path": "/b/d", "value": 3},
                {"op": "replace", "path": "", "value": {"a": []}},
                {"op": "add", "path": "/a/-", "value": 1},
                {"op": "test", "path": "/a/0", "value": 2}
            ])),
            &mut doc,
        );

        assert_eq!(
            res,
            Err(PatchError::TestFailed {
                path: json_pointer!("/a/0")
            })
        );
        assert_eq!(doc, original);
        assert_eq!(
            doc.as_object().unwrap().keys().collect::<Vec<_>>(),
            vec!["a", "b", "e"]
        );
        assert_eq!(
            doc.get("b")
                .and_then(Value::as_object)
                .unwrap()
                .keys()
                .collect::<Vec<_>>(),
            vec!["c", "d"]
        );
    }

    #[test]
    fn fuzzy_context() {
        let doc = value!([0, 1, 2, 3, 4]);
        let context = make_context(2)(2, &[value!(1), value!(2), value!(3), value!(4)]);
        let remove = vec![Operation::remove(json_pointer!("/2")).with_context(context)];

        assert_eq!(apply(&remove, &doc).unwrap(), value!([0, 1, 3, 4]));
        assert_eq!(
            apply_with(&remove, &doc, &PatchOptions::default().fuzzy()).unwrap(),
            value!([0, 1, 2, 4])
        );
    }

    #[test]
    fn custom_find_context() {
        let doc = value!([0, 1, 2]);
        let options = PatchOptions::default().find_context(|_, array, _| array.len() - 1);
        let replace =
            vec![Operation::replace(json_pointer!("/0"), value!("x")).with_context(value!({}))];
        assert_eq!(
            apply_with(&replace, &doc, &options).unwrap(),
            value!([0, 1, "x"])
        );
    }
}
