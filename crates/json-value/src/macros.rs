/// Builds a [`Value`](crate::Value) from `serde_json::json!` syntax.
#[macro_export]
macro_rules! value {
    ($($json:tt)+) => {
        $crate::Value::from(::serde_json::json!($($json)+))
    };
}
