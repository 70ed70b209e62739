//! # confsync Codec
//!
//! Auto-detecting JSON/YAML decoder for confsync.
//!
//! Raw configuration values arrive as text from the config center or from
//! the local fallback file. This crate turns them into typed values:
//!
//! 1. If the text is syntactically valid JSON, decode it as JSON
//! 2. Otherwise decode it as YAML
//!
//! The order matters. A document that happens to be valid JSON is never
//! retried as YAML, even if JSON decoding into the target type fails.
//!
//! ## Usage
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let from_json: BTreeMap<String, u32> = confsync_codec::decode(br#"{"workers": 4}"#).unwrap();
//! let from_yaml: BTreeMap<String, u32> = confsync_codec::decode(b"workers: 4").unwrap();
//! assert_eq!(from_json, from_yaml);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod error;
mod format;

pub use decoder::{decode, decode_as, decode_str};
pub use error::{CodecError, CodecResult};
pub use format::{is_valid_json, Format};
