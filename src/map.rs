//! The body map container.
//!
//! [`BodyMap`] is an insertion-ordered map from string keys to [`Value`]s, used as the
//! request and response payload of API clients. It is built up with chained setters,
//! read back through lenient accessors, and serialized with one of the codecs:
//!
//! - [`BodyMap::encode_json`] / [`BodyMap::decode_json`]
//! - [`BodyMap::encode_xml`] / [`BodyMap::decode_xml`]
//! - [`BodyMap::encode_url_params`]
//!
//! ## Ordering
//!
//! Iteration follows insertion order, and [`BodyMap::remove`] keeps the order of the
//! remaining entries. JSON object order is not a durable contract on the wire, and
//! URL parameters are always re-sorted by key.
//!
//! ## Absent maps
//!
//! An API response may not carry a body at all. The [`MaybeBodyMap`] trait gives
//! `Option<BodyMap>` and `Option<&BodyMap>` the same lenient accessors, so callers can
//! read from a missing map without unwrapping first.
//!
//! ## Examples
//!
//! ```rust
//! use bodymap::BodyMap;
//!
//! let mut bm = BodyMap::new();
//! bm.set("out_trade_no", "P20150806125346")
//!     .set("total_fee", 100)
//!     .set_nested("scene_info", |scene| {
//!         scene.set_nested("h5_info", |h5| {
//!             h5.set("type", "Wap").set("wap_url", "https://example.com");
//!         });
//!     });
//!
//! assert_eq!(bm.get_string("total_fee"), "100");
//! assert_eq!(
//!     bm.get_string("scene_info"),
//!     r#"{"h5_info":{"type":"Wap","wap_url":"https://example.com"}}"#
//! );
//! ```

use crate::{coerce_to_string, to_value, Error, File, Result, Value};
use indexmap::IndexMap;
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// An insertion-ordered map of string keys to heterogeneous values.
///
/// Keys are unique; setting an existing key overwrites its value in place.
///
/// # Examples
///
/// ```rust
/// use bodymap::{BodyMap, Value};
///
/// let mut bm = BodyMap::new();
/// bm.set("first", 1).set("second", 2).set("first", "one");
///
/// let keys: Vec<_> = bm.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// assert_eq!(bm.get_any("first"), Some(&Value::from("one")));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodyMap(IndexMap<String, Value>);

impl BodyMap {
    #[must_use]
    pub fn new() -> Self {
        BodyMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BodyMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts or overwrites `key`, returning the map for chaining.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("4key", "4value").set("5key", 5).set("6key", true);
    /// assert_eq!(bm.len(), 3);
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Builds a child map with `build` and stores it under `key`.
    ///
    /// The child starts empty, so nesting can go arbitrarily deep without declaring
    /// intermediate types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set_nested("partner", |p| {
    ///     p.set("type", "APPID").set("appid", "wx123456");
    /// })
    /// .set("limit", 5);
    ///
    /// let partner = bm.get_any("partner").and_then(|v| v.as_map()).unwrap();
    /// assert_eq!(partner.get_string("appid"), "wx123456");
    /// ```
    pub fn set_nested<F>(&mut self, key: impl Into<String>, build: F) -> &mut Self
    where
        F: FnOnce(&mut BodyMap),
    {
        let mut child = BodyMap::new();
        build(&mut child);
        self.0.insert(key.into(), Value::Map(child));
        self
    }

    /// Stores a file attachment under `key`.
    ///
    /// File entries stay distinguishable through [`Value::is_file`], which is how
    /// transports pick out multipart fields.
    pub fn set_file(&mut self, key: impl Into<String>, file: File) -> &mut Self {
        self.0.insert(key.into(), Value::File(file));
        self
    }

    /// Converts any serializable value with [`to_value`] and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has a shape a body map cannot hold, such as a
    /// map with non-string keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Receiver { account: String, amount: u32 }
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set_serialized("receivers", &vec![Receiver { account: "190001001".into(), amount: 100 }])
    ///     .unwrap();
    /// assert_eq!(bm.get_string("receivers"), r#"[{"account":"190001001","amount":100}]"#);
    /// ```
    pub fn set_serialized<T>(&mut self, key: impl Into<String>, value: &T) -> Result<&mut Self>
    where
        T: ?Sized + Serialize,
    {
        let value = to_value(value)?;
        self.0.insert(key.into(), value);
        Ok(self)
    }

    /// Returns the string form of the value at `key`.
    ///
    /// Missing keys yield `""`, strings are returned verbatim and everything else goes
    /// through [`coerce_to_string`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("name", "jerry").set("age", 18).set("vip", false);
    ///
    /// assert_eq!(bm.get_string("name"), "jerry");
    /// assert_eq!(bm.get_string("age"), "18");
    /// assert_eq!(bm.get_string("vip"), "false");
    /// assert_eq!(bm.get_string("missing"), "");
    /// ```
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        match self.0.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(value) => coerce_to_string(value),
            None => String::new(),
        }
    }

    /// Returns the raw value at `key` without any coercion.
    #[must_use]
    pub fn get_any(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_any_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Parses the string form of `key` as JSON into `T`.
    ///
    /// This is how gateways that embed JSON documents inside string fields are read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the text is not JSON or does not fit `T`. A
    /// missing key decodes the empty string and therefore fails the same way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Cfg { x: i32 }
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("cfg", r#"{"x":1}"#);
    ///
    /// let cfg: Cfg = bm.decode("cfg").unwrap();
    /// assert_eq!(cfg.x, 1);
    /// ```
    pub fn decode<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.get_string(key)).map_err(Error::decode)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Clears every entry while keeping the same instance and its allocation.
    pub fn reset(&mut self) {
        self.0.clear();
    }

    /// Fails with every required key whose string form is empty, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming all offending keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("a", "1").set("b", "");
    ///
    /// let err = bm.check_required(&["a", "b", "c"]).unwrap_err();
    /// assert_eq!(err.to_string(), "b, c : cannot be empty");
    /// assert!(bm.check_required(&["a"]).is_ok());
    /// ```
    pub fn check_required(&self, keys: &[&str]) -> Result<()> {
        let empty: Vec<String> = keys
            .iter()
            .filter(|key| self.get_string(key).is_empty())
            .map(|key| key.to_string())
            .collect();
        if empty.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(empty))
        }
    }

    /// Visits entries in iteration order until `visit` returns `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("a", 1).set("b", 2).set("c", 3);
    ///
    /// let mut seen = Vec::new();
    /// bm.for_each(|k, _| {
    ///     seen.push(k.to_string());
    ///     k != "b"
    /// });
    /// assert_eq!(seen, vec!["a", "b"]);
    /// ```
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &Value) -> bool,
    {
        for (key, value) in &self.0 {
            if !visit(key, value) {
                break;
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

/// Lenient accessors for a map that may be absent.
///
/// An absent map behaves like an empty one for reads that have a natural empty answer,
/// and fails with [`Error::NilMap`] where a definite result is required.
///
/// # Examples
///
/// ```rust
/// use bodymap::{BodyMap, Error, MaybeBodyMap};
///
/// let missing: Option<BodyMap> = None;
/// assert_eq!(missing.get_string("code"), "");
/// assert_eq!(missing.encode_url_params(), "");
/// assert_eq!(missing.decode::<i32>("code").unwrap_err(), Error::NilMap);
/// ```
pub trait MaybeBodyMap {
    fn as_body_map(&self) -> Option<&BodyMap>;

    fn get_string(&self, key: &str) -> String {
        self.as_body_map()
            .map(|bm| bm.get_string(key))
            .unwrap_or_default()
    }

    fn get_any(&self, key: &str) -> Option<&Value> {
        self.as_body_map().and_then(|bm| bm.get_any(key))
    }

    fn decode<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.as_body_map().ok_or(Error::NilMap)?.decode(key)
    }

    fn encode_json(&self) -> String {
        self.as_body_map()
            .map(BodyMap::encode_json)
            .unwrap_or_default()
    }

    fn encode_url_params(&self) -> String {
        self.as_body_map()
            .map(BodyMap::encode_url_params)
            .unwrap_or_default()
    }
}

impl MaybeBodyMap for Option<BodyMap> {
    fn as_body_map(&self) -> Option<&BodyMap> {
        self.as_ref()
    }
}

impl MaybeBodyMap for Option<&BodyMap> {
    fn as_body_map(&self) -> Option<&BodyMap> {
        *self
    }
}

impl Serialize for BodyMap {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for BodyMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BodyMapVisitor;

        impl<'de> Visitor<'de> for BodyMapVisitor {
            type Value = BodyMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = BodyMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.0.insert(key, value);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_map(BodyMapVisitor)
    }
}

impl From<IndexMap<String, Value>> for BodyMap {
    fn from(map: IndexMap<String, Value>) -> Self {
        BodyMap(map)
    }
}

impl From<HashMap<String, Value>> for BodyMap {
    fn from(map: HashMap<String, Value>) -> Self {
        BodyMap(map.into_iter().collect())
    }
}

impl From<BodyMap> for IndexMap<String, Value> {
    fn from(map: BodyMap) -> Self {
        map.0
    }
}

impl IntoIterator for BodyMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BodyMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for BodyMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        BodyMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for BodyMap {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.0.insert(k.into(), v.into());
        }
    }
}
