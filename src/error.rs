//! Error types for body map codecs and accessors.
//!
//! Every fallible operation on a [`BodyMap`](crate::BodyMap) returns [`Result`], and no
//! operation panics on bad input. The one deliberate exception to error propagation is
//! [`BodyMap::encode_json`](crate::BodyMap::encode_json), which reports marshal failure
//! as an empty string.
//!
//! ## Error Categories
//!
//! - **Nil map**: a definite result was requested from an absent map
//! - **Decode**: malformed JSON text or JSON that does not fit the requested type
//! - **Parse**: malformed XML, with the byte offset where the reader gave up
//! - **Validation**: required keys that are missing or coerce to an empty string
//!
//! ## Examples
//!
//! ```rust
//! use bodymap::{BodyMap, Error};
//!
//! let mut bm = BodyMap::new();
//! bm.set("appid", "wx123456");
//!
//! match bm.check_required(&["appid", "mch_id", "nonce_str"]) {
//!     Err(Error::Validation(keys)) => assert_eq!(keys, vec!["mch_id", "nonce_str"]),
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors produced by the map and its codecs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The map is absent where a definite result is required
    #[error("body map is nil")]
    NilMap,

    /// JSON text was malformed or did not match the target shape
    #[error("decode error: {0}")]
    Decode(String),

    /// XML input was malformed
    #[error("XML parse error at byte {position}: {msg}")]
    Parse { position: u64, msg: String },

    /// One or more required keys were missing or empty
    #[error("{} : cannot be empty", .0.join(", "))]
    Validation(Vec<String>),

    /// A value shape that cannot be stored in a body map
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error while writing encoded output
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a decode error from any displayable cause.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::Error;
    ///
    /// let err = Error::decode("expected value at line 1 column 1");
    /// assert!(err.to_string().starts_with("decode error"));
    /// ```
    pub fn decode<T: fmt::Display>(msg: T) -> Self {
        Error::Decode(msg.to_string())
    }

    /// Creates an XML parse error at the given byte offset.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::Error;
    ///
    /// let err = Error::parse(12, "unexpected end of document");
    /// assert!(err.to_string().contains("byte 12"));
    /// ```
    pub fn parse<T: fmt::Display>(position: u64, msg: T) -> Self {
        Error::Parse {
            position,
            msg: msg.to_string(),
        }
    }

    /// Creates a validation error naming every offending key, in the order given.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bodymap::Error;
    ///
    /// let err = Error::validation(vec!["b".to_string(), "c".to_string()]);
    /// assert_eq!(err.to_string(), "b, c : cannot be empty");
    /// ```
    pub fn validation(keys: Vec<String>) -> Self {
        Error::Validation(keys)
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
