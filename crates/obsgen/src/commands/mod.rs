//! CLI command implementations

pub mod config;
pub mod objstore_env;
pub mod postprocess;
