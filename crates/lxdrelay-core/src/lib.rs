//! # lxdrelay-core
//!
//! Core library for lxdrelay providing:
//! - Runtime configuration types (server, GitHub, network, logging)
//! - Layered configuration loading (embedded defaults, file, environment)
//! - Shared error types

pub mod config;
pub mod error;
pub mod types;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use types::{GitHubConfig, LogFormat, LoggingConfig, NetworkConfig, RuntimeConfig, ServerConfig};
