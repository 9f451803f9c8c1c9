/// Builds a [`BodyMap`](crate::BodyMap) from a JSON-like literal.
///
/// Values may be `null`, nested `{ ... }` maps, `[ ... ]` arrays, or any single-token
/// expression with an `Into<Value>` conversion. Wrap multi-token expressions such as
/// negative numbers in parentheses.
///
/// ```rust
/// use bodymap::bodymap;
///
/// let bm = bodymap! {
///     "appid": "wx123456",
///     "total_fee": 100,
///     "refund": (-1),
///     "scene_info": { "h5_info": { "type": "Wap" } },
///     "tags": ["a", "b"],
///     "attach": null,
/// };
///
/// assert_eq!(bm.get_string("scene_info"), r#"{"h5_info":{"type":"Wap"}}"#);
/// assert_eq!(bm.get_string("refund"), "-1");
/// assert_eq!(bm.get_string("attach"), "");
/// ```
#[macro_export]
macro_rules! bodymap {
    () => {
        $crate::BodyMap::new()
    };

    ($($key:literal : $value:tt),+ $(,)?) => {{
        let mut map = $crate::BodyMap::new();
        $(
            map.set($key, $crate::bodymap_value!($value));
        )+
        map
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! bodymap_value {
    (null) => {
        $crate::Value::Null
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),+ $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::bodymap_value!($elem)),+])
    };

    ({ $($body:tt)* }) => {
        $crate::Value::Map($crate::bodymap!($($body)*))
    };

    ($other:expr) => {
        $crate::Value::from($other)
    };
}
