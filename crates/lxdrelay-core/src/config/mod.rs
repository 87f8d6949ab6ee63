//! Configuration loading

mod hierarchical_loader;

pub use hierarchical_loader::{HierarchicalConfigLoader, CONFIG_FILE_NAME, DEFAULT_CONFIG_DIR};
