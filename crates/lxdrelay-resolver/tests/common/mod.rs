//! Common test infrastructure for lxdrelay-resolver tests
//!
//! # Modules
//!
//! - `constants`: owners, image names, URLs and checksum fixtures
//! - `builders`: Fluent builders for Release and ReleaseAsset
//! - `fake_source`: In-memory `ReleaseSource` with call counters
//! - `mock_server`: Wiremock setup helpers for the GitHub client tests

// Each test binary uses a different subset of the helpers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod fake_source;
pub mod mock_server;

pub use builders::*;
pub use constants::*;
pub use fake_source::*;
pub use mock_server::*;
