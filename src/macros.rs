/// Builds a [`DataValue`](crate::DataValue) from a literal-like description.
///
/// Leaves go through `DataValue::from`, so the Rust type picks the variant:
/// `1` is an int, `1i64` a long, `1.5f32` a float, `"x"` a string. Maps use
/// string-literal keys, lists infer their element type from the first element
/// and need an explicit type when empty. Negative numbers and other
/// multi-token expressions must be parenthesised.
///
/// ```rust
/// use ubo::{data, DataType};
///
/// let value = data!({
///     "name": "abc",
///     "count": 5i16,
///     "scores": [1, 2, (-3)],
///     "tags": [String;],
///     "nested": { "flag": true }
/// });
///
/// let map = value.as_map().unwrap();
/// assert_eq!(map.get_short("count", 0), 5);
/// assert_eq!(map.get_list("scores", DataType::Int).unwrap().len(), 3);
/// assert!(map.get_list("tags", DataType::String).unwrap().is_empty());
/// assert!(map.get_map("nested").unwrap().get_bool("flag", false));
/// ```
///
/// # Panics
///
/// Panics if the elements of a list literal are not all of the same variant.
#[macro_export]
macro_rules! data {
    ({}) => {
        $crate::DataValue::Map($crate::DataMap::new())
    };

    ({ $($key:literal : $value:tt),+ $(,)? }) => {{
        let mut map = $crate::DataMap::new();
        $(
            map.put($key, $crate::data!($value));
        )+
        $crate::DataValue::Map(map)
    }};

    ([]) => {
        compile_error!("an empty list needs an element type, e.g. data!([Int;])")
    };

    ([ $ty:ident ; ]) => {
        $crate::DataValue::List($crate::DataList::new($crate::DataType::$ty))
    };

    ([ $ty:ident ; $($elem:tt),+ $(,)? ]) => {
        $crate::DataValue::List(
            $crate::DataList::with_values($crate::DataType::$ty, vec![$($crate::data!($elem)),+])
                .expect("data! list elements must match the declared type"),
        )
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::DataValue::List(
            $crate::DataList::infer(vec![$($crate::data!($elem)),+])
                .expect("data! list elements must share one variant"),
        )
    };

    ($value:expr) => {
        $crate::DataValue::from($value)
    };
}
