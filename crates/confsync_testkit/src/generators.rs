//! Property-based test generators using proptest.

use crate::fixtures::{DatabaseConfig, ServiceConfig};
use confsync_engine::Format;
use proptest::prelude::*;

/// Strategy for identifiers that stay plain strings in YAML.
pub fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{2,15}")
        .expect("Invalid regex")
        .prop_filter("YAML keyword", |s| {
            !matches!(s.as_str(), "yes" | "no" | "true" | "false" | "null" | "off" | "on")
        })
}

/// Strategy for service configurations.
pub fn service_strategy() -> impl Strategy<Value = ServiceConfig> {
    (
        word_strategy(),
        any::<u16>(),
        0u32..256,
        prop::collection::vec(word_strategy(), 0..4),
        word_strategy(),
        1u32..1024,
    )
        .prop_map(
            |(name, port, workers, features, db, max_connections)| ServiceConfig {
                name,
                port,
                workers,
                features,
                database: DatabaseConfig {
                    url: format!("postgres://db.local/{db}"),
                    max_connections,
                },
            },
        )
}

/// Strategy for the two supported encodings.
pub fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Json), Just(Format::Yaml)]
}

/// Strategy for a service configuration together with its raw text in a
/// randomly chosen encoding.
pub fn raw_service_strategy() -> impl Strategy<Value = (ServiceConfig, String)> {
    (service_strategy(), format_strategy()).prop_map(|(service, format)| {
        let raw = match format {
            Format::Json => service.to_json(),
            Format::Yaml => service.to_yaml(),
        };
        (service, raw)
    })
}
