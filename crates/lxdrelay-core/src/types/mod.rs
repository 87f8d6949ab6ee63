//! Configuration type definitions

pub mod runtime_config;

pub use runtime_config::*;
