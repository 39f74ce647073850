use std::borrow::Cow;

use crate::ParseJsonPointerError;

/// Escapes a single reference token: `~` becomes `~0`, then `/` becomes `~1`.
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'~', b'/', segment.as_bytes()).is_none() {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
}

/// Reverses [`encode_segment`]: `~1` becomes `/`, then `~0` becomes `~`.
///
/// Unknown escapes such as `~2` are kept verbatim.
pub fn decode_segment(segment: &str) -> Cow<'_, str> {
    if memchr::memchr(b'~', segment.as_bytes()).is_none() {
        return Cow::Borrowed(segment);
    }
    Cow::Owned(segment.replace("~1", "/").replace("~0", "~"))
}

/// Parses an array index token: `0` or a base-10 integer without leading
/// zeros. The append marker `-` is not an index.
pub fn parse_array_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    match bytes {
        [] => None,
        [b'0'] => Some(0),
        [b'0', ..] => None,
        _ if bytes.iter().all(u8::is_ascii_digit) => segment.parse().ok(),
        _ => None,
    }
}

pub(crate) fn parse_json_pointer(input: &str) -> Result<Vec<String>, ParseJsonPointerError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let rest = input.strip_prefix('/').ok_or(ParseJsonPointerError)?;
    let bytes = rest.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;

    for idx in memchr::memchr_iter(b'/', bytes) {
        segments.push(decode_segment(&rest[start..idx]).into_owned());
        start = idx + 1;
    }
    segments.push(decode_segment(&rest[start..]).into_owned());

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! segments {
        ($($value:literal),*) => {
            &[$($value.to_string()),*]
        }
    }

    fn check(input: &str, segments: &[String]) {
        assert_eq!(parse_json_pointer(input).unwrap(), segments);
    }

    #[test]
    fn test_parser() {
        check("", segments!());
        check("/foo", segments!("foo"));
        check("/foo/0", segments!("foo", "0"));
        check("/", segments!(""));
        check("//", segments!("", ""));
        check("/a~1b", segments!("a/b"));
        check("/c%d", segments!("c%d"));
        check("/e^f", segments!("e^f"));
        check("/g|h", segments!("g|h"));
        check("/ ", segments!(" "));
        check("/m~0n", segments!("m~n"));
        check("/~01", segments!("~1"));
        check("/a~c/~1bc/~2d", segments!("a~c", "/bc", "~2d"));
    }

    #[test]
    fn test_parser_rejects_relative() {
        assert_eq!(parse_json_pointer("foo"), Err(ParseJsonPointerError));
        assert_eq!(parse_json_pointer("0/a"), Err(ParseJsonPointerError));
    }

    #[test]
    fn test_segment_codec() {
        for segment in ["", "plain", "a/b", "m~n", "~1", "/~/~0", "~01"] {
            assert_eq!(decode_segment(&encode_segment(segment)), segment);
        }
        assert_eq!(encode_segment("a/b~c"), "a~1b~0c");
        assert_eq!(decode_segment("a~1b~0c"), "a/b~c");
    }

    #[test]
    fn test_array_index() {
        assert_eq!(parse_array_index("0"), Some(0));
        assert_eq!(parse_array_index("10"), Some(10));
        assert_eq!(parse_array_index("01"), None);
        assert_eq!(parse_array_index("-"), None);
        assert_eq!(parse_array_index("+1"), None);
        assert_eq!(parse_array_index("-1"), None);
        assert_eq!(parse_array_index("1e3"), None);
        assert_eq!(parse_array_index(""), None);
    }
}
