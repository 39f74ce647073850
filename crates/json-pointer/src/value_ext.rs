use json_value::Value;

use crate::{parse_array_index, JsonPointerRef, PointerNotFound, ToJsonPointerRef};

pub trait ValueExt {
    fn locate<T: ToJsonPointerRef>(&self, pointer: T) -> Option<&Value>;

    fn locate_mut<T: ToJsonPointerRef>(&mut self, pointer: T) -> Option<&mut Value>;

    /// Resolves `pointer` to the container holding its target and the key of
    /// the target inside it. The key is `None` for the whole document.
    ///
    /// The target itself does not have to exist, only its parent.
    fn resolve<'p>(
        &self,
        pointer: JsonPointerRef<'p>,
    ) -> Result<(&Value, Option<&'p str>), PointerNotFound>;

    fn resolve_mut<'p>(
        &mut self,
        pointer: JsonPointerRef<'p>,
    ) -> Result<(&mut Value, Option<&'p str>), PointerNotFound>;
}

fn child<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(obj) => obj.get(segment),
        Value::Array(array) => array.get(parse_array_index(segment)?),
        _ => None,
    }
}

fn child_mut<'a>(value: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    match value {
        Value::Object(obj) => obj.get_mut(segment),
        Value::Array(array) => array.get_mut(parse_array_index(segment)?),
        _ => None,
    }
}

impl ValueExt for Value {
    fn locate<T: ToJsonPointerRef>(&self, pointer: T) -> Option<&Value> {
        pointer
            .to_json_pointer_ref()
            .iter()
            .try_fold(self, |acc, segment| child(acc, segment))
    }

    fn locate_mut<T: ToJsonPointerRef>(&mut self, pointer: T) -> Option<&mut Value> {
        pointer
            .to_json_pointer_ref()
            .iter()
            .try_fold(self, |acc, segment| child_mut(acc, segment))
    }

    fn resolve<'p>(
        &self,
        pointer: JsonPointerRef<'p>,
    ) -> Result<(&Value, Option<&'p str>), PointerNotFound> {
        match pointer.split_last() {
            Some((parent, key)) => match self.locate(parent) {
                Some(container) => Ok((container, Some(key))),
                None => Err(PointerNotFound {
                    pointer: pointer.to_owned(),
                }),
            },
            None => Ok((self, None)),
        }
    }

    fn resolve_mut<'p>(
        &mut self,
        pointer: JsonPointerRef<'p>,
    ) -> Result<(&mut Value, Option<&'p str>), PointerNotFound> {
        match pointer.split_last() {
            Some((parent, key)) => match self.locate_mut(parent) {
                Some(container) => Ok((container, Some(key))),
                None => Err(PointerNotFound {
                    pointer: pointer.to_owned(),
                }),
            },
            None => Ok((self, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use json_value::value;

    use super::*;
    use crate::json_pointer;

    #[test]
    fn locate() {
        let doc = value!({"a": [10, {"b~c": 1, "d/e": 2}], "": 3});

        assert_eq!(doc.locate(json_pointer!("")), Some(&doc));
        assert_eq!(doc.locate(json_pointer!("/")), Some(&value!(3)));
        assert_eq!(doc.locate(json_pointer!("/a/0")), Some(&value!(10)));
        assert_eq!(doc.locate(json_pointer!("/a/1/b~0c")), Some(&value!(1)));
        assert_eq!(doc.locate(json_pointer!("/a/1/d~1e")), Some(&value!(2)));
        assert_eq!(doc.locate(json_pointer!("/a/01")), None);
        assert_eq!(doc.locate(json_pointer!("/a/2")), None);
        assert_eq!(doc.locate(json_pointer!("/a/0/x")), None);
    }

    #[test]
    fn locate_mut() {
        let mut doc = value!({"a": [1, 2]});
        *doc.locate_mut(json_pointer!("/a/1")).unwrap() = value!("two");
        assert_eq!(doc, value!({"a": [1, "two"]}));
    }

    #[test]
    fn resolve() {
        let doc = value!({"a": {"b": null}, "n": null});

        let pointer = json_pointer!("");
        let (container, key) = doc.resolve(pointer.as_ref()).unwrap();
        assert_eq!(container, &doc);
        assert_eq!(key, None);

        let pointer = json_pointer!("/a/missing");
        let (container, key) = doc.resolve(pointer.as_ref()).unwrap();
        assert_eq!(container, &value!({"b": null}));
        assert_eq!(key, Some("missing"));

        let pointer = json_pointer!("/n/x/y");
        assert_eq!(
            doc.resolve(pointer.as_ref()).unwrap_err(),
            PointerNotFound {
                pointer: json_pointer!("/n/x/y")
            }
        );
    }
}
