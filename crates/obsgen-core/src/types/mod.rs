//! Type definitions for obsgen

mod config_types;
mod monitoring;
mod objstore;
mod template;

pub use config_types::*;
pub use monitoring::*;
pub use objstore::*;
pub use template::*;
