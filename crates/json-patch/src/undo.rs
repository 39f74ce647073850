use json_pointer::{JsonPointerRef, ValueExt};
use json_value::Value;

/// Where a value was taken from, or overwritten in place.
pub(crate) enum UpdateSource<'a> {
    Object {
        path: JsonPointerRef<'a>,
        key: &'a str,
        index: usize,
    },
    Array {
        path: JsonPointerRef<'a>,
        index: usize,
    },
}

/// Where a value was inserted.
pub(crate) enum UpdateTarget<'a> {
    Object {
        path: JsonPointerRef<'a>,
        key: &'a str,
    },
    ArrayInsert {
        path: JsonPointerRef<'a>,
        index: usize,
    },
    ArrayAppend {
        path: JsonPointerRef<'a>,
    },
}

/// One entry of the undo log kept while a patch is applied in place.
pub(crate) enum UndoCommand<'a> {
    ReplaceRoot {
        prev_value: Value,
    },
    Add {
        target: UpdateTarget<'a>,
        prev_value: Option<Value>,
    },
    Remove {
        source: UpdateSource<'a>,
        prev_value: Value,
    },
    Replace {
        source: UpdateSource<'a>,
        prev_value: Value,
    },
    Move {
        source: UpdateSource<'a>,
        target: UpdateTarget<'a>,
        prev_value: Option<Value>,
    },
    MoveToRoot {
        source: UpdateSource<'a>,
        prev_value: Value,
    },
}

impl<'a> UndoCommand<'a> {
    pub(crate) fn execute(self, root: &mut Value) {
        match self {
            UndoCommand::ReplaceRoot { prev_value } => {
                *root = prev_value;
            }
            UndoCommand::Add { target, prev_value } => {
                take_inserted(root, target, prev_value);
            }
            UndoCommand::Remove { source, prev_value } => {
                restore(root, source, prev_value);
            }
            UndoCommand::Replace { source, prev_value } => match source {
                UpdateSource::Object { path, key, .. } => {
                    if let Some(Value::Object(obj)) = root.locate_mut(path) {
                        obj.insert(key.to_string(), prev_value);
                    }
                }
                UpdateSource::Array { path, index } => {
                    if let Some(Value::Array(array)) = root.locate_mut(path) {
                        if let Some(value) = array.get_mut(index) {
                            *value = prev_value;
                        }
                    }
                }
            },
            UndoCommand::Move {
                source,
                target,
                prev_value,
            } => {
                if let Some(value) = take_inserted(root, target, prev_value) {
                    restore(root, source, value);
                }
            }
            UndoCommand::MoveToRoot { source, prev_value } => {
                let value = std::mem::replace(root, prev_value);
                restore(root, source, value);
            }
        }
    }
}

/// Removes an inserted value, putting back whatever it overwrote.
fn take_inserted(
    root: &mut Value,
    target: UpdateTarget<'_>,
    prev_value: Option<Value>,
) -> Option<Value> {
    match target {
        UpdateTarget::Object { path, key } => match root.locate_mut(path) {
            Some(Value::Object(obj)) => match prev_value {
                Some(prev_value) => obj.insert(key.to_string(), prev_value),
                None => obj.shift_remove(key),
            },
            _ => None,
        },
        UpdateTarget::ArrayInsert { path, index } => match root.locate_mut(path) {
            Some(Value::Array(array)) if index < array.len() => Some(array.remove(index)),
            _ => None,
        },
        UpdateTarget::ArrayAppend { path } => match root.locate_mut(path) {
            Some(Value::Array(array)) => array.pop(),
            _ => None,
        },
    }
}

/// Puts a taken value back where it came from.
pub(crate) fn restore(root: &mut Value, source: UpdateSource<'_>, value: Value) {
    match source {
        UpdateSource::Object { path, key, index } => {
            if let Some(Value::Object(obj)) = root.locate_mut(path) {
                let index = index.min(obj.len());
                obj.shift_insert(index, key.to_string(), value);
            }
        }
        UpdateSource::Array { path, index } => {
            if let Some(Value::Array(array)) = root.locate_mut(path) {
                if index <= array.len() {
                    array.insert(index, value);
                }
            }
        }
    }
}
