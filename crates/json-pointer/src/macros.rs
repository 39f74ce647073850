/// Parses a pointer literal, panicking when it is malformed.
///
/// `json_pointer!()` is the root pointer.
#[macro_export]
macro_rules! json_pointer {
    () => {
        $crate::JsonPointer::root()
    };
    ($path:expr) => {
        match <$crate::JsonPointer as ::std::str::FromStr>::from_str($path) {
            ::std::result::Result::Ok(pointer) => pointer,
            ::std::result::Result::Err(_) => panic!("invalid json pointer: {:?}", $path),
        }
    };
}
