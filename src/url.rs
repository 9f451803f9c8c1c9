//! URL query-parameter encoder for [`BodyMap`].
//!
//! Produces `key1=value1&key2=value2` with keys sorted by byte order, regardless of
//! insertion order. This is the canonical form payment gateways sign, so the ordering
//! is part of the contract.
//!
//! Keys and values are query-escaped: ASCII alphanumerics and `-_.~` pass through, a
//! space becomes `+` (or `%20` with [`SpaceEncoding::Percent`]) and every other byte
//! becomes `%XX` with uppercase hex. Keys whose value coerces to an empty string are
//! omitted. There is no decode direction.

use crate::{coerce_to_string, BodyMap, EncodeOptions, SpaceEncoding};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped in a query component: everything but alphanumerics and `-_.~`.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

impl BodyMap {
    /// Encodes the map as sorted, escaped URL parameters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.set("b", "2").set("a", "1").set("c", "");
    /// assert_eq!(bm.encode_url_params(), "a=1&b=2");
    ///
    /// bm.set("q", "x&y=z%");
    /// assert_eq!(bm.encode_url_params(), "a=1&b=2&q=x%26y%3Dz%25");
    /// ```
    #[must_use]
    pub fn encode_url_params(&self) -> String {
        self.encode_url_params_with_options(&EncodeOptions::default())
    }

    /// Encodes the map as sorted, escaped URL parameters using `options`.
    #[must_use]
    pub fn encode_url_params_with_options(&self, options: &EncodeOptions) -> String {
        let mut keys: Vec<&String> = self.keys().collect();
        keys.sort_unstable();

        let mut buf = String::with_capacity(self.len() * 16);
        for key in keys {
            let value = match self.get_any(key) {
                Some(value) => coerce_to_string(value),
                None => continue,
            };
            if value.is_empty() {
                continue;
            }
            if !buf.is_empty() {
                buf.push('&');
            }
            push_escaped(&mut buf, key, options.space_encoding);
            buf.push('=');
            push_escaped(&mut buf, &value, options.space_encoding);
        }
        buf
    }
}

fn push_escaped(buf: &mut String, input: &str, space: SpaceEncoding) {
    for chunk in utf8_percent_encode(input, QUERY_ESCAPE) {
        // escaped bytes arrive one "%XX" chunk at a time
        if chunk == "%20" {
            buf.push_str(space.as_str());
        } else {
            buf.push_str(chunk);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_sorted_and_skips_empty() {
        let mut bm = BodyMap::new();
        bm.set("b", "2").set("a", "1").set("c", "");
        assert_eq!(bm.encode_url_params(), "a=1&b=2");
    }

    #[test]
    fn test_sort_is_bytewise() {
        let mut bm = BodyMap::new();
        bm.set("b", 1).set("B", 2).set("_", 3).set("a1", 4).set("a", 5);
        assert_eq!(bm.encode_url_params(), "B=2&_=3&a=5&a1=4&b=1");
    }

    #[test]
    fn test_all_empty_is_empty_string() {
        let mut bm = BodyMap::new();
        assert_eq!(bm.encode_url_params(), "");
        bm.set("a", "").set("b", Value::Null);
        assert_eq!(bm.encode_url_params(), "");
    }

    #[test]
    fn test_escaping_keys_and_values() {
        let mut bm = BodyMap::new();
        bm.set("a b", "c+d e").set("ü", "~*-._");
        assert_eq!(
            bm.encode_url_params(),
            "a+b=c%2Bd+e&%C3%BC=~%2A-._"
        );
    }

    #[test]
    fn test_query_escape_set() {
        let mut bm = BodyMap::new();
        bm.set("k", "a~b*c");
        assert_eq!(bm.encode_url_params(), "k=a~b%2Ac");

        bm.set("k", "%20 /?#!'()");
        assert_eq!(bm.encode_url_params(), "k=%2520+%2F%3F%23%21%27%28%29");
    }

    #[test]
    fn test_percent_space_option() {
        let mut bm = BodyMap::new();
        bm.set("a b", "c+d e");
        let options = EncodeOptions::new().with_space_encoding(SpaceEncoding::Percent);
        assert_eq!(
            bm.encode_url_params_with_options(&options),
            "a%20b=c%2Bd%20e"
        );
    }

    #[test]
    fn test_nested_values_are_json_encoded() {
        let mut bm = BodyMap::new();
        bm.set_nested("partner", |p| {
            p.set("type", "APPID");
        })
        .set("limit", 5)
        .set("offset", 10);
        assert_eq!(
            bm.encode_url_params(),
            "limit=5&offset=10&partner=%7B%22type%22%3A%22APPID%22%7D"
        );
    }
}
