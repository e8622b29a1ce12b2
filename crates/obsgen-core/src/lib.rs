//! # obsgen-core
//!
//! Post-processing for generated Observatorium manifests:
//! - Object storage env synthesis for Thanos containers
//! - ServiceMonitor relabeling for the app-sre Prometheus
//! - Image pull secrets, template parameter ordering
//! - A template pipeline driven by obsgen.yaml

pub mod config;
pub mod error;
pub mod manifest;
pub mod objstore;
pub mod pipeline;
pub mod types;

pub use config::ObsgenConfig;
pub use error::{Error, Result};
pub use manifest::{
    add_quay_pull_secret, execute_if_some, post_process_service_monitor, sort_template_params,
};
pub use objstore::{delete_objstore_env, objstore_env_vars};
pub use pipeline::{PostProcessor, Report};
