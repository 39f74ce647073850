use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

use crate::{parser::parse_json_pointer, JsonPointerRef, ParseJsonPointerError, ToJsonPointerRef};

/// A parsed JSON Pointer; segments are stored decoded.
#[derive(Clone, Eq, Default)]
pub struct JsonPointer(pub(crate) Vec<String>);

impl ToJsonPointerRef for JsonPointer {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'_> {
        self.as_ref()
    }
}

impl<'a> ToJsonPointerRef for &'a JsonPointer {
    fn to_json_pointer_ref(&self) -> JsonPointerRef<'a> {
        self.as_ref()
    }
}

impl PartialEq<JsonPointerRef<'_>> for JsonPointer {
    fn eq(&self, other: &JsonPointerRef<'_>) -> bool {
        self.0.iter().eq(other.iter())
    }
}

impl PartialEq for JsonPointer {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Hash for JsonPointer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for segment in &self.0 {
            segment.hash(state);
        }
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.as_ref(), f)
    }
}

impl Debug for JsonPointer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl FromStr for JsonPointer {
    type Err = ParseJsonPointerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_json_pointer(s).map(Self)
    }
}

impl Serialize for JsonPointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for JsonPointer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_json_pointer(&s)
            .map(Self)
            .map_err(|err| D::Error::custom(format!("{}: `{}`", err, s)))
    }
}

impl FromIterator<String> for JsonPointer {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl JsonPointer {
    #[inline]
    pub fn root() -> JsonPointer {
        JsonPointer(Vec::new())
    }

    #[inline]
    pub fn as_ref(&self) -> JsonPointerRef<'_> {
        JsonPointerRef { path: &self.0 }
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    /// Returns a new pointer with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> JsonPointer {
        let mut pointer = self.clone();
        pointer.push(segment);
        pointer
    }

    /// Returns a copy with the segment at `depth` swapped for `segment`.
    ///
    /// Panics if `depth` is out of range.
    #[must_use]
    pub fn with_segment(&self, depth: usize, segment: impl Into<String>) -> JsonPointer {
        let mut pointer = self.clone();
        pointer.0[depth] = segment.into();
        pointer
    }

    /// Number of leading segments shared with `other`.
    pub fn common_prefix_len(&self, other: &JsonPointer) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// True when `self` is a proper ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &JsonPointer) -> bool {
        self.len() < other.len() && other.as_ref().starts_with(self.as_ref())
    }
}
