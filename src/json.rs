//! JSON codec for [`BodyMap`].
//!
//! The map serializes as a plain JSON object. Nested maps become nested objects, arrays
//! become arrays and files become `{"name": ..., "content": <base64>}`. Key order follows
//! insertion order on output, but readers must not depend on it.
//!
//! Decoding merges into an existing map: keys present in the input overwrite, all other
//! entries are left alone. Nested objects come back as nested [`BodyMap`]s.

use crate::{BodyMap, Error, Result};

impl BodyMap {
    /// Serializes the map to a compact JSON object.
    ///
    /// Fail-soft: if any value cannot be represented in JSON (a NaN or infinite float
    /// somewhere in the tree), the result is `""`. An empty map encodes as `{}`, so an
    /// empty string always means failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("4key", "4value").set("limit", 5);
    /// assert_eq!(bm.encode_json(), r#"{"4key":"4value","limit":5}"#);
    ///
    /// bm.set("ratio", f64::NAN);
    /// assert_eq!(bm.encode_json(), "");
    /// ```
    #[must_use]
    pub fn encode_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(err) => {
                log::debug!("body map JSON encoding failed: {}", err);
                String::new()
            }
        }
    }

    /// Parses a JSON object and merges its entries into this map.
    ///
    /// Accepts anything byte-like, so both `&str` and `&[u8]` bodies work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the input is not valid JSON or not an object. On
    /// error the map is left unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("name", "tom").set("kept", true);
    /// bm.decode_json(r#"{"name":"jerry","age":18}"#).unwrap();
    ///
    /// assert_eq!(bm.get_string("name"), "jerry");
    /// assert_eq!(bm.get_string("age"), "18");
    /// assert_eq!(bm.get_string("kept"), "true");
    /// assert!(bm.decode_json("[1,2]").is_err());
    /// ```
    pub fn decode_json(&mut self, json: impl AsRef<[u8]>) -> Result<()> {
        let decoded: BodyMap = serde_json::from_slice(json.as_ref()).map_err(Error::decode)?;
        self.extend(decoded);
        Ok(())
    }

    /// Builds a new map from a JSON object.
    ///
    /// # Errors
    ///
    /// Same as [`BodyMap::decode_json`].
    pub fn from_json(json: impl AsRef<[u8]>) -> Result<BodyMap> {
        let mut bm = BodyMap::new();
        bm.decode_json(json)?;
        Ok(bm)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BodyMap, Error, File, Value};

    #[test]
    fn test_empty_map_is_empty_object() {
        assert_eq!(BodyMap::new().encode_json(), "{}");
    }

    #[test]
    fn test_nested_encode() {
        let mut bm = BodyMap::new();
        bm.set_nested("scene_info", |scene| {
            scene.set_nested("h5_info", |h5| {
                h5.set("type", "Wap").set("wap_name", "H5测试支付");
            });
        })
        .set("7key", "7value");

        assert_eq!(
            bm.encode_json(),
            r#"{"scene_info":{"h5_info":{"type":"Wap","wap_name":"H5测试支付"}},"7key":"7value"}"#
        );
    }

    #[test]
    fn test_roundtrip_keeps_nested_maps() {
        let mut bm = BodyMap::new();
        bm.set("s", "x")
            .set("i", -3)
            .set("f", 1.5)
            .set("b", false)
            .set("n", Value::Null)
            .set("a", vec![Value::from(1), Value::from("two")])
            .set_nested("m", |m| {
                m.set("inner", "v");
            });

        let back = BodyMap::from_json(bm.encode_json()).unwrap();
        assert_eq!(back, bm);
        assert!(back.get_any("m").is_some_and(Value::is_map));
    }

    #[test]
    fn test_floats_survive_roundtrip_exactly() {
        let floats = [-106633661.30099145, -420077966.91370356, 127312048.16540599, 0.1];
        let mut bm = BodyMap::new();
        for (i, f) in floats.iter().enumerate() {
            bm.set(format!("f{}", i), *f);
        }

        let back = BodyMap::from_json(bm.encode_json()).unwrap();
        for (i, f) in floats.iter().enumerate() {
            assert_eq!(
                back.get_any(&format!("f{}", i)).and_then(Value::as_f64),
                Some(*f)
            );
        }
    }

    #[test]
    fn test_file_decodes_as_map() {
        let mut bm = BodyMap::new();
        bm.set_file("img", File::new("a.png", b"png".to_vec()));

        let back = BodyMap::from_json(bm.encode_json()).unwrap();
        let img = back.get_any("img").and_then(Value::as_map).unwrap();
        assert_eq!(img.get_string("name"), "a.png");
        assert_eq!(img.get_string("content"), "cG5n");
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        let mut bm = BodyMap::new();
        bm.set("keep", 1);
        for bad in ["", "null", "[1]", "\"x\"", "{\"a\":", "{'a':1}"] {
            assert!(
                matches!(bm.decode_json(bad), Err(Error::Decode(_))),
                "accepted {:?}",
                bad
            );
        }
        assert_eq!(bm.len(), 1);
    }

    #[test]
    fn test_decode_accepts_bytes() {
        let mut bm = BodyMap::new();
        bm.decode_json(b"{\"code\":\"SUCCESS\"}".as_slice()).unwrap();
        assert_eq!(bm.get_string("code"), "SUCCESS");
    }
}
