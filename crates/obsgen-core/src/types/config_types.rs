//! obsgen.yaml configuration types

use serde::{Deserialize, Serialize};

/// Namespace the app-sre Prometheus watches for ServiceMonitors
pub const DEFAULT_MONITORING_NAMESPACE: &str = "openshift-customer-monitoring";

/// Value of the `prometheus` label the app-sre Prometheus selects on
pub const DEFAULT_PROMETHEUS_LABEL: &str = "app-sre";

/// Image pull secret attached to every ServiceAccount
pub const DEFAULT_PULL_SECRET: &str = "quay.io";

/// Root of obsgen.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObsgenConfigFile {
    /// Namespace the manifests are deployed to. Used as the ServiceMonitor
    /// namespace selector and name prefix.
    pub namespace: String,

    #[serde(default = "default_monitoring_namespace")]
    pub monitoring_namespace: String,

    #[serde(default = "default_prometheus_label")]
    pub prometheus_label: String,

    #[serde(default = "default_pull_secret")]
    pub pull_secret: String,

    /// Secret holding the S3 credentials. Workload env is left alone when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objstore_secret: Option<String>,

    #[serde(default = "default_true")]
    pub sort_parameters: bool,
}

fn default_monitoring_namespace() -> String {
    DEFAULT_MONITORING_NAMESPACE.to_string()
}

fn default_prometheus_label() -> String {
    DEFAULT_PROMETHEUS_LABEL.to_string()
}

fn default_pull_secret() -> String {
    DEFAULT_PULL_SECRET.to_string()
}

fn default_true() -> bool {
    true
}

impl ObsgenConfigFile {
    /// Create a configuration with defaults for the given namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            monitoring_namespace: default_monitoring_namespace(),
            prometheus_label: default_prometheus_label(),
            pull_secret: default_pull_secret(),
            objstore_secret: None,
            sort_parameters: true,
        }
    }

    pub fn with_objstore_secret(mut self, secret: impl Into<String>) -> Self {
        self.objstore_secret = Some(secret.into());
        self
    }
}
