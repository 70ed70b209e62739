//! # confsync Testkit
//!
//! Test utilities for confsync.
//!
//! This crate provides:
//! - Sample configuration types and temporary fallback directories
//! - Remote connectors that fail on demand
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confsync_testkit::prelude::*;
//!
//! #[test]
//! fn falls_back() {
//!     let env = TestEnv::new();
//!     env.write_fallback(&sample_service().to_json());
//!     // ... apply with a dead remote
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod remote;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::remote::*;
}

pub use fixtures::*;
pub use generators::*;
pub use remote::*;
