//! Typed decoding with format auto-detection.

use crate::error::{CodecError, CodecResult};
use crate::format::Format;
use serde::de::DeserializeOwned;

/// Decodes a raw configuration value into a fresh `T`.
///
/// The format is chosen by [`Format::detect`]. A value that is valid JSON is
/// only ever decoded as JSON; if it does not fit `T`, the YAML decoder is not
/// tried.
///
/// Decoding produces a new value and never touches existing state, so a
/// failure cannot leave a half-updated destination behind.
///
/// # Errors
///
/// Returns [`CodecError::Empty`] for blank input, [`CodecError::Json`] when
/// JSON input does not match `T`, and [`CodecError::Yaml`] otherwise.
///
/// # Example
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Server {
///     port: u16,
/// }
///
/// let from_json: Server = confsync_codec::decode(br#"{"port": 8080}"#).unwrap();
/// let from_yaml: Server = confsync_codec::decode(b"port: 8080").unwrap();
/// assert_eq!(from_json, from_yaml);
/// ```
pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> CodecResult<T> {
    decode_as(raw, Format::detect(raw))
}

/// Decodes a raw string value. See [`decode`].
pub fn decode_str<T: DeserializeOwned>(raw: &str) -> CodecResult<T> {
    decode(raw.as_bytes())
}

/// Decodes a raw value with an explicit format, skipping detection.
///
/// # Errors
///
/// Returns an error if the input is blank or does not decode as `format`.
pub fn decode_as<T: DeserializeOwned>(raw: &[u8], format: Format) -> CodecResult<T> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Err(CodecError::Empty);
    }

    match format {
        Format::Json => Ok(serde_json::from_slice(raw)?),
        Format::Yaml => Ok(serde_yaml::from_slice(raw)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Database {
        host: String,
        port: u16,
        #[serde(default)]
        replicas: Vec<String>,
    }

    #[test]
    fn decodes_json() {
        let db: Database =
            decode(br#"{"host": "db.local", "port": 5432, "replicas": ["r1"]}"#).unwrap();
        assert_eq!(db.host, "db.local");
        assert_eq!(db.port, 5432);
        assert_eq!(db.replicas, vec!["r1".to_string()]);
    }

    #[test]
    fn decodes_yaml() {
        let raw = "host: db.local\nport: 5432\nreplicas:\n  - r1\n  - r2\n";
        let db: Database = decode_str(raw).unwrap();
        assert_eq!(db.port, 5432);
        assert_eq!(db.replicas.len(), 2);
    }

    #[test]
    fn json_shape_mismatch_is_json_error() {
        // Valid JSON, wrong shape: YAML is never attempted.
        let err = decode::<Database>(br#"{"host": "db.local"}"#).unwrap_err();
        assert!(matches!(err, CodecError::Json { .. }));
    }

    #[test]
    fn garbage_is_yaml_error() {
        let err = decode::<Database>(b"host: [unclosed").unwrap_err();
        assert!(matches!(err, CodecError::Yaml { .. }));
    }

    #[test]
    fn yaml_shape_mismatch_is_yaml_error() {
        let err = decode::<Database>(b"host: db.local\nport: not-a-number\n").unwrap_err();
        assert!(matches!(err, CodecError::Yaml { .. }));
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(decode::<Database>(b"").unwrap_err(), CodecError::Empty);
        assert_eq!(decode::<Database>(b" \n\t").unwrap_err(), CodecError::Empty);
    }

    #[test]
    fn decode_as_skips_detection() {
        let map: BTreeMap<String, u32> = decode_as(b"{\"a\": 1}", Format::Yaml).unwrap();
        assert_eq!(map.get("a"), Some(&1));

        let err = decode_as::<BTreeMap<String, u32>>(b"a: 1", Format::Json).unwrap_err();
        assert!(matches!(err, CodecError::Json { .. }));
    }
}
