//! Command implementations

pub mod resolve;
pub mod serve;
pub mod version;
