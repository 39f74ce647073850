mod macros;

mod date;
mod value;

pub use date::{format_date, parse_date};
pub use value::{Map, Value};

pub use serde_json::Number;
