//! Format detection.

use serde::de::IgnoredAny;
use std::fmt;

/// A supported textual encoding of configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON. Checked first.
    Json,
    /// YAML. Used for everything that is not syntactically valid JSON.
    Yaml,
}

impl Format {
    /// Detects the format of a raw value.
    ///
    /// Input that parses as JSON is JSON, even when it would also be valid
    /// YAML (every JSON document is). Everything else is treated as YAML.
    pub fn detect(raw: &[u8]) -> Self {
        if is_valid_json(raw) {
            Format::Json
        } else {
            Format::Yaml
        }
    }

    /// Returns the lowercase name of the format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if `raw` is one complete, syntactically valid JSON value.
pub fn is_valid_json(raw: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json_object() {
        assert_eq!(Format::detect(br#"{"port": 8080}"#), Format::Json);
        assert_eq!(Format::detect(b"  [1, 2, 3]\n"), Format::Json);
    }

    #[test]
    fn json_scalars_are_json() {
        assert_eq!(Format::detect(b"42"), Format::Json);
        assert_eq!(Format::detect(b"\"text\""), Format::Json);
    }

    #[test]
    fn detects_yaml() {
        assert_eq!(Format::detect(b"port: 8080\nhost: localhost\n"), Format::Yaml);
        assert_eq!(Format::detect(b"- a\n- b\n"), Format::Yaml);
    }

    #[test]
    fn trailing_garbage_is_not_json() {
        assert_eq!(Format::detect(br#"{"a": 1} extra"#), Format::Yaml);
        assert_eq!(Format::detect(br#"{"a": 1,}"#), Format::Yaml);
    }

    #[test]
    fn display_name() {
        assert_eq!(Format::Json.to_string(), "json");
        assert_eq!(Format::Yaml.to_string(), "yaml");
    }
}
