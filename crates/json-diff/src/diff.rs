use std::fmt::{self, Debug, Formatter};

use json_patch::{context, Operation, Patch};
use json_pointer::JsonPointer;
use json_value::{format_date, Map, Number, Value};

use crate::lcs::{LcsMatrix, Step};

/// Identity of an array element. Elements with equal hashes are aligned and
/// diffed recursively instead of being removed and added.
pub type Hasher = dyn Fn(&Value) -> String;

/// Builds the context attached to an array operation from the index and the
/// array as it is when the operation applies.
pub type MakeContext = dyn Fn(usize, &[Value]) -> Value;

pub struct DiffOptions {
    hash: Option<Box<Hasher>>,
    make_context: Option<Box<MakeContext>>,
    invertible: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            hash: None,
            make_context: None,
            invertible: true,
        }
    }
}

impl Debug for DiffOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions")
            .field("hash", &self.hash.is_some())
            .field("make_context", &self.make_context.is_some())
            .field("invertible", &self.invertible)
            .finish()
    }
}

impl DiffOptions {
    #[must_use]
    pub fn hash(self, f: impl Fn(&Value) -> String + 'static) -> Self {
        Self {
            hash: Some(Box::new(f)),
            ..self
        }
    }

    #[must_use]
    pub fn make_context(self, f: impl Fn(usize, &[Value]) -> Value + 'static) -> Self {
        Self {
            make_context: Some(Box::new(f)),
            ..self
        }
    }

    /// Attaches up to `size` neighbours on each side to array operations.
    #[must_use]
    pub fn context(self, size: usize) -> Self {
        self.make_context(context::make_context(size))
    }

    /// Whether `remove` and `replace` are preceded by a `test` of the old
    /// value, which makes the patch invertible. Defaults to `true`.
    #[must_use]
    pub fn invertible(self, invertible: bool) -> Self {
        Self { invertible, ..self }
    }
}

/// The `id` member of objects that have one, the whole element otherwise.
///
/// The hash is canonical: member order and number formatting do not change
/// it, so elements that compare equal always hash equal.
pub fn default_hash(value: &Value) -> String {
    let identity = match value.get("id") {
        Some(id) => id,
        None => value,
    };
    let mut out = String::new();
    write_canonical(identity, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => out.push_str(&format!("{:?}", s)),
        Value::Date(date) => out.push_str(&format!("date({})", format_date(date))),
        Value::Array(array) => {
            out.push('[');
            for (i, item) in array.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(obj) => {
            let mut members: Vec<_> = obj.iter().collect();
            members.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
            out.push('{');
            for (i, (key, item)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&format!("{:?}:", key));
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

// Integral floats are written like integers so `1` and `1.0` agree.
fn write_number(n: &Number, out: &mut String) {
    if let Some(n) = n.as_i64() {
        out.push_str(&n.to_string());
    } else if let Some(n) = n.as_u64() {
        out.push_str(&n.to_string());
    } else if let Some(n) = n.as_f64() {
        if n.fract() == 0.0 && n.abs() < 9.0e15 {
            out.push_str(&(n as i64).to_string());
        } else {
            out.push_str(&format!("{:?}", n));
        }
    }
}

/// Computes a patch turning `a` into `b`.
pub fn diff(a: &Value, b: &Value) -> Patch {
    diff_with(a, b, &DiffOptions::default())
}

pub fn diff_with(a: &Value, b: &Value, options: &DiffOptions) -> Patch {
    let mut differ = Differ {
        options,
        patch: Vec::new(),
    };
    differ.diff(a, b, &JsonPointer::root());
    tracing::debug!(operations = differ.patch.len(), "diff computed");
    differ.patch
}

struct Differ<'o> {
    options: &'o DiffOptions,
    patch: Patch,
}

impl<'o> Differ<'o> {
    fn diff(&mut self, a: &Value, b: &Value, path: &JsonPointer) {
        match (a, b) {
            (Value::Array(a), Value::Array(b)) => self.diff_arrays(a, b, path),
            (Value::Object(a), Value::Object(b)) => self.diff_objects(a, b, path),
            _ if a == b => {}
            _ => {
                if self.options.invertible {
                    self.patch.push(Operation::test(path.clone(), a.clone()));
                }
                self.patch.push(Operation::replace(path.clone(), b.clone()));
            }
        }
    }

    fn diff_objects(&mut self, a: &Map, b: &Map, path: &JsonPointer) {
        for (key, value) in a {
            if !b.contains_key(key) {
                let path = path.join(key.as_str());
                if self.options.invertible {
                    self.patch.push(Operation::test(path.clone(), value.clone()));
                }
                self.patch.push(Operation::remove(path));
            }
        }

        for (key, value) in b {
            let path = path.join(key.as_str());
            match a.get(key) {
                Some(prev_value) => self.diff(prev_value, value, &path),
                None => self.patch.push(Operation::add(path, value.clone())),
            }
        }
    }

    fn hash(&self, value: &Value) -> String {
        match &self.options.hash {
            Some(hash) => hash(value),
            None => default_hash(value),
        }
    }

    fn diff_arrays(&mut self, a: &[Value], b: &[Value], path: &JsonPointer) {
        let a_hashes: Vec<String> = a.iter().map(|value| self.hash(value)).collect();
        let b_hashes: Vec<String> = b.iter().map(|value| self.hash(value)).collect();
        let matrix = LcsMatrix::compare(&a_hashes, &b_hashes, |x, y| x == y);
        tracing::trace!(path = %path, distance = matrix.distance(), "array diff");

        // The array as it is when each emitted operation applies, only kept
        // when contexts are requested.
        let mut current = self.options.make_context.as_ref().map(|_| a.to_vec());

        // `index` is the position in the partially patched array.
        matrix.reduce(0, |index, step, i, j| {
            let context = match (&self.options.make_context, &current) {
                (Some(make_context), Some(current)) => Some(make_context(index, current)),
                _ => None,
            };
            let index_path = path.join(index.to_string());

            match step {
                Step::Right => {
                    if self.options.invertible {
                        self.push(Operation::test(index_path.clone(), a[j].clone()), &context);
                    }
                    self.push(Operation::remove(index_path), &context);
                    if let Some(current) = &mut current {
                        current.remove(index);
                    }
                    index
                }
                Step::Down => {
                    self.push_add(index_path, b[i].clone(), context);
                    if let Some(current) = &mut current {
                        current.insert(index, b[i].clone());
                    }
                    index + 1
                }
                Step::Diagonal => {
                    self.diff(&a[j], &b[i], &index_path);
                    if let Some(current) = &mut current {
                        current[index] = b[i].clone();
                    }
                    index + 1
                }
            }
        });
    }

    fn push(&mut self, operation: Operation, context: &Option<Value>) {
        self.patch.push(match context {
            Some(context) => operation.with_context(context.clone()),
            None => operation,
        });
    }

    /// Pushes an `add`, turning it into a `replace` when the previous operation
    /// removed the element at the same position.
    fn push_add(&mut self, path: JsonPointer, value: Value, context: Option<Value>) {
        if let Some(last) = self.patch.last_mut() {
            if let Operation::Remove {
                path: removed,
                context: removed_context,
            } = last
            {
                if *removed == path {
                    *last = Operation::Replace {
                        path,
                        value,
                        context: removed_context.take(),
                    };
                    return;
                }
            }
        }

        let operation = Operation::add(path, value);
        self.patch.push(match context {
            Some(context) => operation.with_context(context),
            None => operation,
        });
    }
}
