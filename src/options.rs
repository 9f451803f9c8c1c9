//! Configuration options for the XML and URL-parameter encoders.
//!
//! - [`EncodeOptions`]: main configuration struct
//! - [`SpaceEncoding`]: how a space is written in URL parameters
//!
//! The defaults reproduce the wire formats most payment gateways expect: `+` for spaces,
//! a bare `<xml>` root and no XML declaration.
//!
//! ## Examples
//!
//! ```rust
//! use bodymap::{BodyMap, EncodeOptions, SpaceEncoding};
//!
//! let mut bm = BodyMap::new();
//! bm.set("body", "a b");
//!
//! assert_eq!(bm.encode_url_params(), "body=a+b");
//!
//! let options = EncodeOptions::new().with_space_encoding(SpaceEncoding::Percent);
//! assert_eq!(bm.encode_url_params_with_options(&options), "body=a%20b");
//! ```

/// How a space character is written by the URL-parameter encoder.
///
/// Both choices escape a literal `+` as `%2B`, so the output stays unambiguous.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpaceEncoding {
    /// `application/x-www-form-urlencoded` style: space becomes `+`.
    #[default]
    Plus,
    /// RFC 3986 style: space becomes `%20`.
    Percent,
}

impl SpaceEncoding {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpaceEncoding::Plus => "+",
            SpaceEncoding::Percent => "%20",
        }
    }
}

/// Configuration for [`BodyMap`](crate::BodyMap) encoders.
///
/// # Examples
///
/// ```rust
/// use bodymap::{EncodeOptions, SpaceEncoding};
///
/// let options = EncodeOptions::new()
///     .with_space_encoding(SpaceEncoding::Percent)
///     .with_xml_declaration(true)
///     .with_xml_root("request");
///
/// assert_eq!(options.xml_root, "request");
/// assert!(options.xml_declaration);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub space_encoding: SpaceEncoding,
    pub xml_declaration: bool,
    pub xml_root: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            space_encoding: SpaceEncoding::default(),
            xml_declaration: false,
            xml_root: "xml".to_string(),
        }
    }
}

impl EncodeOptions {
    /// Creates default options (`+` for spaces, `<xml>` root, no declaration).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::{EncodeOptions, SpaceEncoding};
    ///
    /// let options = EncodeOptions::new();
    /// assert_eq!(options.space_encoding, SpaceEncoding::Plus);
    /// assert_eq!(options.xml_root, "xml");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_space_encoding(mut self, space_encoding: SpaceEncoding) -> Self {
        self.space_encoding = space_encoding;
        self
    }

    /// Prepends `<?xml version="1.0" encoding="UTF-8"?>` to non-empty XML output.
    #[must_use]
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }

    /// Sets the name of the XML root element.
    #[must_use]
    pub fn with_xml_root(mut self, root: impl Into<String>) -> Self {
        self.xml_root = root.into();
        self
    }
}
