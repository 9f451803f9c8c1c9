//! Flat XML codec for [`BodyMap`].
//!
//! The wire shape is one level deep, with every value carried as CDATA text:
//!
//! ```text
//! <xml><appid><![CDATA[wx123456]]></appid><total_fee><![CDATA[100]]></total_fee></xml>
//! ```
//!
//! ## Encoding
//!
//! - A map with no keys produces no output at all, not even the root.
//! - Each key becomes a child element named after it, in iteration order.
//! - Values go through [`coerce_to_string`](crate::coerce_to_string); keys whose string
//!   form is empty are left out. A map whose keys are all empty therefore encodes as
//!   `<xml></xml>`.
//! - A value containing `]]>` is split across two CDATA sections so the document stays
//!   well formed.
//!
//! ## Decoding
//!
//! The root element may have any name. Each child becomes a string entry keyed by its
//! local name. CDATA and escaped character data are both accepted and concatenated,
//! a self-closing child decodes to `""`, and elements nested deeper than one level are
//! skipped. Entries decoded before a parse error stay in the map.

use crate::{coerce_to_string, BodyMap, EncodeOptions, Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

const CDATA_END: &str = "]]>";

impl BodyMap {
    /// Encodes the map as a flat `<xml>` document with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying writer fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// assert!(bm.encode_xml().unwrap().is_empty());
    ///
    /// bm.set("appid", "wx123").set("total_fee", 100).set("attach", "");
    /// assert_eq!(
    ///     String::from_utf8(bm.encode_xml().unwrap()).unwrap(),
    ///     "<xml><appid><![CDATA[wx123]]></appid><total_fee><![CDATA[100]]></total_fee></xml>"
    /// );
    /// ```
    pub fn encode_xml(&self) -> Result<Vec<u8>> {
        self.encode_xml_with_options(&EncodeOptions::default())
    }

    /// Encodes the map as a flat XML document using `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the underlying writer fails.
    pub fn encode_xml_with_options(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let mut writer = Writer::new(Vec::with_capacity(64 + self.len() * 32));
        if options.xml_declaration {
            write(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
        }

        let root = options.xml_root.as_str();
        write(&mut writer, Event::Start(BytesStart::new(root)))?;
        for (key, value) in self.iter() {
            let text = coerce_to_string(value);
            if text.is_empty() {
                log::trace!("skipping XML child {:?} with an empty value", key);
                continue;
            }
            if key.is_empty() {
                log::debug!("skipping XML child with an empty element name");
                continue;
            }
            write(&mut writer, Event::Start(BytesStart::new(key.as_str())))?;
            for section in cdata_sections(&text) {
                write(&mut writer, Event::CData(BytesCData::new(section)))?;
            }
            write(&mut writer, Event::End(BytesEnd::new(key.as_str())))?;
        }
        write(&mut writer, Event::End(BytesEnd::new(root)))?;

        Ok(writer.into_inner())
    }

    /// Reads a flat XML document and stores each child as a string entry.
    ///
    /// Empty input is not an error; it simply adds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed XML: mismatched or unmatched end tags,
    /// bad escapes, invalid UTF-8, or a document that ends inside an element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::BodyMap;
    ///
    /// let mut bm = BodyMap::new();
    /// bm.decode_xml(b"<xml><return_code><![CDATA[SUCCESS]]></return_code><total_fee>1</total_fee></xml>")
    ///     .unwrap();
    ///
    /// assert_eq!(bm.get_string("return_code"), "SUCCESS");
    /// assert_eq!(bm.get_string("total_fee"), "1");
    /// ```
    pub fn decode_xml(&mut self, xml: &[u8]) -> Result<()> {
        let mut reader = Reader::from_reader(xml);
        let mut depth = 0usize;
        let mut current: Option<(String, String)> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|err| Error::parse(reader.buffer_position() as u64, err))?;
            match event {
                Event::Start(start) => {
                    if depth == 1 {
                        current = Some((element_name(&start, &reader)?, String::new()));
                    }
                    depth += 1;
                }
                Event::Empty(start) => {
                    if depth == 1 {
                        self.set(element_name(&start, &reader)?, "");
                    }
                }
                Event::End(_) => {
                    depth = depth.saturating_sub(1);
                    if depth == 1 {
                        if let Some((key, text)) = current.take() {
                            self.set(key, text);
                        }
                    }
                }
                Event::Text(text) if depth == 2 => {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| Error::parse(reader.buffer_position() as u64, err))?;
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(&unescaped);
                    }
                }
                Event::CData(data) if depth == 2 => {
                    let chunk = std::str::from_utf8(&data)
                        .map_err(|err| Error::parse(reader.buffer_position() as u64, err))?;
                    if let Some((_, buf)) = current.as_mut() {
                        buf.push_str(chunk);
                    }
                }
                Event::Eof => {
                    if depth > 0 {
                        return Err(Error::parse(
                            reader.buffer_position() as u64,
                            "unexpected end of document",
                        ));
                    }
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    /// Builds a new map from a flat XML document.
    ///
    /// # Errors
    ///
    /// Same as [`BodyMap::decode_xml`].
    pub fn from_xml(xml: &[u8]) -> Result<BodyMap> {
        let mut bm = BodyMap::new();
        bm.decode_xml(xml)?;
        Ok(bm)
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| Error::io(&err.to_string()))
}

fn element_name(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<String> {
    let local = start.local_name();
    std::str::from_utf8(local.as_ref())
        .map(str::to_string)
        .map_err(|err| Error::parse(reader.buffer_position() as u64, err))
}

/// Splits `text` so that no section contains the CDATA terminator.
fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find(CDATA_END) {
        // "]]" closes one section, ">" opens the next
        sections.push(&rest[..idx + 2]);
        rest = &rest[idx + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SpaceEncoding, Value};

    fn xml_string(bm: &BodyMap) -> String {
        String::from_utf8(bm.encode_xml().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_map_has_no_document() {
        assert!(BodyMap::new().encode_xml().unwrap().is_empty());
    }

    #[test]
    fn test_all_empty_values_keep_the_root() {
        let mut bm = BodyMap::new();
        bm.set("blank", "").set("nothing", Value::Null);
        assert_eq!(xml_string(&bm), "<xml></xml>");
    }

    #[test]
    fn test_values_are_cdata_wrapped_in_order() {
        let mut bm = BodyMap::new();
        bm.set("b", "<&>").set("a", 1.5).set("c", true);
        assert_eq!(
            xml_string(&bm),
            "<xml><b><![CDATA[<&>]]></b><a><![CDATA[1.5]]></a><c><![CDATA[true]]></c></xml>"
        );
    }

    #[test]
    fn test_nested_map_is_flattened_to_json_text() {
        let mut bm = BodyMap::new();
        bm.set_nested("detail", |d| {
            d.set("goods_id", "1");
        });
        assert_eq!(
            xml_string(&bm),
            r#"<xml><detail><![CDATA[{"goods_id":"1"}]]></detail></xml>"#
        );
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("]]>]]>"), vec!["]]", ">]]", ">"]);

        let mut bm = BodyMap::new();
        bm.set("k", "x]]>y");
        let encoded = bm.encode_xml().unwrap();
        assert_eq!(
            String::from_utf8(encoded.clone()).unwrap(),
            "<xml><k><![CDATA[x]]]]><![CDATA[>y]]></k></xml>"
        );
        assert_eq!(BodyMap::from_xml(&encoded).unwrap().get_string("k"), "x]]>y");
    }

    #[test]
    fn test_options_change_root_and_declaration() {
        let mut bm = BodyMap::new();
        bm.set("a", "1");
        let options = EncodeOptions::new()
            .with_xml_root("request")
            .with_xml_declaration(true)
            .with_space_encoding(SpaceEncoding::Percent);
        let xml = String::from_utf8(bm.encode_xml_with_options(&options).unwrap()).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><request><a><![CDATA[1]]></a></request>"#
        );
    }

    #[test]
    fn test_decode_empty_input_adds_nothing() {
        let mut bm = BodyMap::new();
        bm.decode_xml(b"").unwrap();
        bm.decode_xml(b"   ").unwrap();
        assert!(bm.is_empty());
    }

    #[test]
    fn test_decode_mixed_text_forms() {
        let bm = BodyMap::from_xml(
            b"<?xml version=\"1.0\"?>\n<xml>\n  <a><![CDATA[x]]>&amp;y</a>\n  <b/>\n  <c>  spaced  </c>\n</xml>\n",
        )
        .unwrap();
        assert_eq!(bm.get_string("a"), "x&y");
        assert_eq!(bm.get_any("b"), Some(&Value::from("")));
        assert_eq!(bm.get_string("c"), "  spaced  ");
        assert_eq!(bm.len(), 3);
    }

    #[test]
    fn test_decode_skips_deeper_elements() {
        let bm = BodyMap::from_xml(b"<xml><a>top<inner>deep</inner></a><b>2</b></xml>").unwrap();
        assert_eq!(bm.get_string("a"), "top");
        assert_eq!(bm.get_string("b"), "2");
        assert!(!bm.contains_key("inner"));
    }

    #[test]
    fn test_decode_overwrites_and_stores_strings() {
        let mut bm = BodyMap::new();
        bm.set("total_fee", 1);
        bm.decode_xml(b"<xml><total_fee>2</total_fee></xml>").unwrap();
        assert_eq!(bm.get_any("total_fee"), Some(&Value::from("2")));
    }

    #[test]
    fn test_decode_malformed_is_parse_error() {
        let cases: [&[u8]; 4] = [
            b"<xml><a>1</b></xml>",
            b"<xml><a>1</a>",
            b"<xml><a>&bogus;</a></xml>",
            b"</xml>",
        ];
        for bad in cases {
            let result = BodyMap::from_xml(bad);
            assert!(
                matches!(result, Err(Error::Parse { .. })),
                "accepted {:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn test_decode_keeps_entries_before_error() {
        let mut bm = BodyMap::new();
        let result = bm.decode_xml(b"<xml><a>1</a><b>2</c></xml>");
        assert!(result.is_err());
        assert_eq!(bm.get_string("a"), "1");
        assert!(!bm.contains_key("b"));
    }
}
