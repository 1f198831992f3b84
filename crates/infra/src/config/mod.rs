//! Configuration loading and persistence
//!
//! This module provides utilities for loading client configuration
//! from environment variables, files, or a [`FileAdapter`](envase_core::FileAdapter).

pub mod loader;

// Re-export commonly used items
pub use loader::{
    load, load_from_env, load_from_file, load_with_adapter, parse_config, probe_config_paths,
    save_with_adapter,
};
