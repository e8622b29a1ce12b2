//! Small rewrites applied to generated Observatorium objects

use k8s_openapi::api::core::v1::{LocalObjectReference, ServiceAccount};

use crate::types::{
    Parameter, ServiceMonitor, DEFAULT_MONITORING_NAMESPACE, DEFAULT_PROMETHEUS_LABEL,
    DEFAULT_PULL_SECRET,
};

/// Label the app-sre Prometheus uses to pick up ServiceMonitors
pub const PROMETHEUS_LABEL_KEY: &str = "prometheus";

/// Make a ServiceMonitor visible to the app-sre Prometheus.
///
/// Moves it to the monitoring namespace, points its namespace selector at
/// `namespace_selector` and prefixes its name with that namespace so that
/// monitors of different tenants cannot collide.
pub fn post_process_service_monitor(
    service_monitor: &mut ServiceMonitor,
    namespace_selector: &str,
) {
    relabel_service_monitor(
        service_monitor,
        namespace_selector,
        DEFAULT_MONITORING_NAMESPACE,
        DEFAULT_PROMETHEUS_LABEL,
    );
}

/// [`post_process_service_monitor`] with explicit namespace and label value
pub fn relabel_service_monitor(
    service_monitor: &mut ServiceMonitor,
    namespace_selector: &str,
    monitoring_namespace: &str,
    prometheus: &str,
) {
    let meta = &mut service_monitor.metadata;
    meta.namespace = Some(monitoring_namespace.to_string());
    meta.labels
        .get_or_insert_with(Default::default)
        .insert(PROMETHEUS_LABEL_KEY.to_string(), prometheus.to_string());
    meta.name = Some(format!(
        "{}-{}",
        namespace_selector,
        meta.name.as_deref().unwrap_or_default()
    ));

    service_monitor.spec.namespace_selector.match_names = vec![namespace_selector.to_string()];
}

/// Append the quay.io pull secret to a ServiceAccount
pub fn add_quay_pull_secret(sa: &mut ServiceAccount) {
    add_pull_secret(sa, DEFAULT_PULL_SECRET);
}

/// Append an image pull secret reference. Duplicates are not checked.
pub fn add_pull_secret(sa: &mut ServiceAccount, secret: &str) {
    sa.image_pull_secrets
        .get_or_insert_with(Vec::new)
        .push(LocalObjectReference {
            name: secret.to_string(),
        });
}

/// Sort template parameters by name
pub fn sort_template_params(mut params: Vec<Parameter>) -> Vec<Parameter> {
    params.sort_by(|a, b| a.name.cmp(&b.name));
    params
}

/// Call `f` with `param` if a callback was supplied
pub fn execute_if_some<T, F>(f: Option<F>, param: T)
where
    F: FnOnce(T),
{
    if let Some(f) = f {
        f(param);
    }
}
