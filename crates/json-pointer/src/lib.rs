mod macros;

mod error;
mod json_pointer;
mod json_pointer_ref;
mod parser;
mod value_ext;

pub use error::{ParseJsonPointerError, PointerNotFound};
pub use json_pointer::JsonPointer;
pub use json_pointer_ref::{JsonPointerRef, ToJsonPointerRef};
pub use parser::{decode_segment, encode_segment, parse_array_index};
pub use value_ext::ValueExt;
