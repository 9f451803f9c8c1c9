//! # bodymap
//!
//! An ordered, heterogeneously-typed map used as the request and response payload of API
//! clients such as payment gateway SDKs.
//!
//! ## What is a body map?
//!
//! Gateway APIs take loosely-typed parameter bags: strings, amounts, flags, nested
//! objects and file uploads, sent as JSON, as a flat `<xml>` document, or as sorted URL
//! parameters for signing. [`BodyMap`] holds such a bag and knows all three encodings.
//!
//! ## Key Features
//!
//! - **Chained building**: `set`, `set_nested` and `set_file` return the map
//! - **Lenient reads**: [`BodyMap::get_string`] never fails, missing keys read as `""`
//! - **One coercion rule**: [`coerce_to_string`] is shared by every codec
//! - **Three codecs**: JSON both ways, flat CDATA XML both ways, sorted URL parameters
//! - **Validation**: [`BodyMap::check_required`] names every missing key at once
//!
//! ## Quick Start
//!
//! ```rust
//! use bodymap::BodyMap;
//!
//! let mut bm = BodyMap::new();
//! bm.set("appid", "wx123456")
//!     .set("total_fee", 100)
//!     .set("body", "Coffee beans")
//!     .set_nested("scene_info", |scene| {
//!         scene.set("store_id", "SZ001");
//!     });
//!
//! bm.check_required(&["appid", "total_fee"]).unwrap();
//!
//! assert_eq!(
//!     bm.encode_url_params(),
//!     "appid=wx123456&body=Coffee+beans&scene_info=%7B%22store_id%22%3A%22SZ001%22%7D&total_fee=100"
//! );
//!
//! let json = bm.encode_json();
//! let back = BodyMap::from_json(&json).unwrap();
//! assert_eq!(back, bm);
//! ```
//!
//! ### Reading a gateway response
//!
//! ```rust
//! use bodymap::BodyMap;
//!
//! let body = b"<xml><return_code><![CDATA[SUCCESS]]></return_code><prepay_id><![CDATA[wx2016]]></prepay_id></xml>";
//! let resp = BodyMap::from_xml(body).unwrap();
//!
//! assert_eq!(resp.get_string("return_code"), "SUCCESS");
//! assert_eq!(resp.get_string("err_code"), "");
//! ```
//!
//! ## Sharp edges
//!
//! - [`BodyMap::encode_json`] is fail-soft: if a value cannot be represented in JSON the
//!   result is an empty string, not an error.
//! - The XML and URL encoders skip keys whose string form is empty, so an explicit `""`
//!   and a missing key encode the same way.
//! - A body map is a plain value with no internal locking. Share it across threads the
//!   way you would share any `IndexMap`.
//! - Decoders have no size limits; bound untrusted input before handing it over.

pub mod coerce;
pub mod error;
pub mod json;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod url;
pub mod value;
pub mod xml;

pub use coerce::coerce_to_string;
pub use error::{Error, Result};
pub use map::{BodyMap, MaybeBodyMap};
pub use options::{EncodeOptions, SpaceEncoding};
pub use ser::{to_value, ValueSerializer};
pub use value::{File, Number, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Order {
        out_trade_no: String,
        total_fee: u32,
        detail: Detail,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Detail {
        goods_id: String,
        quantity: u8,
    }

    #[test]
    fn test_typed_struct_through_all_codecs() {
        let order = Order {
            out_trade_no: "P20150806125346".to_string(),
            total_fee: 888,
            detail: Detail {
                goods_id: "G-1".to_string(),
                quantity: 2,
            },
        };

        let mut bm = BodyMap::new();
        bm.set_serialized("order", &order).unwrap();

        assert_eq!(bm.decode::<Order>("order").unwrap(), order);

        let xml = bm.encode_xml().unwrap();
        let from_xml = BodyMap::from_xml(&xml).unwrap();
        assert_eq!(from_xml.decode::<Order>("order").unwrap(), order);

        let from_json = BodyMap::from_json(bm.encode_json()).unwrap();
        assert_eq!(from_json, bm);
    }

    #[test]
    fn test_embeds_in_serde_structs() {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Envelope {
            version: String,
            body: BodyMap,
        }

        let envelope = Envelope {
            version: "v3".to_string(),
            body: bodymap! { "a": 1, "b": { "c": "d" } },
        };
        let json = serde_json::to_string(&envelope).unwrap();
        assert_eq!(json, r#"{"version":"v3","body":{"a":1,"b":{"c":"d"}}}"#);
        assert_eq!(serde_json::from_str::<Envelope>(&json).unwrap(), envelope);
    }
}
