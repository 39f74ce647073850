use std::fmt::{self, Debug, Display, Formatter};

use crate::{encode_segment, JsonPointer};

pub trait ToJsonPointerRef {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'_>;
}

/// A borrowed view over the segments of a [`JsonPointer`].
#[derive(Copy, Clone)]
pub struct JsonPointerRef<'a> {
    pub(crate) path: &'a [String],
}

impl<'a> ToJsonPointerRef for JsonPointerRef<'a> {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'a> {
        *self
    }
}

impl PartialEq<JsonPointer> for JsonPointerRef<'_> {
    fn eq(&self, other: &JsonPointer) -> bool {
        self.path == other.0.as_slice()
    }
}

impl PartialEq for JsonPointerRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for JsonPointerRef<'_> {}

impl Display for JsonPointerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for segment in self.iter() {
            f.write_str("/")?;
            f.write_str(&encode_segment(segment))?;
        }

        Ok(())
    }
}

impl Debug for JsonPointerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl<'a> JsonPointerRef<'a> {
    pub fn to_owned(&self) -> JsonPointer {
        JsonPointer(self.path.to_vec())
    }

    /// Splits into the parent pointer and the last (decoded) segment.
    pub fn split_last(&self) -> Option<(JsonPointerRef<'a>, &'a str)> {
        self.path
            .split_last()
            .map(|(key, parent)| (JsonPointerRef { path: parent }, key.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a String> {
        self.path.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn starts_with(&self, needle: JsonPointerRef<'_>) -> bool {
        self.path.starts_with(needle.path)
    }
}

#[cfg(test)]
mod tests {
    use crate::json_pointer;

    #[test]
    fn test_starts_with() {
        assert!(json_pointer!("/a/b/c")
            .as_ref()
            .starts_with(json_pointer!("/a/b").as_ref()));

        assert!(json_pointer!("/a/b/c")
            .as_ref()
            .starts_with(json_pointer!("/a/b/c").as_ref()));

        assert!(!json_pointer!("/a/b")
            .as_ref()
            .starts_with(json_pointer!("/a/b/c").as_ref()));

        assert!(!json_pointer!("/a1/b/c")
            .as_ref()
            .starts_with(json_pointer!("/a/b").as_ref()));

        assert!(json_pointer!("/c/d/e")
            .as_ref()
            .starts_with(json_pointer!("").as_ref()));
    }

    #[test]
    fn test_split_last() {
        let pointer = json_pointer!("/a/b");
        let (parent, key) = pointer.as_ref().split_last().unwrap();
        assert_eq!(parent, json_pointer!("/a"));
        assert_eq!(key, "b");
        assert!(json_pointer!("").as_ref().split_last().is_none());

        let pointer = json_pointer!("/");
        let (parent, key) = pointer.as_ref().split_last().unwrap();
        assert!(parent.is_empty());
        assert_eq!(key, "");
    }
}
