//! Template post-processing pipeline
//!
//! Walks the objects of a generated OpenShift Template and applies the
//! rewrites from [`crate::manifest`] and [`crate::objstore`] according to
//! obsgen.yaml.

use k8s_openapi::api::core::v1::EnvVar;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::manifest::{
    execute_if_some, relabel_service_monitor, sort_template_params,
};
use crate::objstore::replace_objstore_env;
use crate::types::{ObsgenConfigFile, ServiceMonitor, Template, SERVICE_MONITOR_KIND};

/// Callback run on an object after obsgen's own rewrite
pub type Hook<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// Workload kinds with a pod template under `spec.template.spec`
const POD_TEMPLATE_KINDS: &[&str] = &["Deployment", "StatefulSet", "DaemonSet", "Job"];

const CONTAINER_LISTS: &[&str] = &["initContainers", "containers"];

/// What a pipeline run changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub service_monitors: usize,
    pub service_accounts: usize,
    pub containers: usize,
    pub parameters_sorted: bool,
}

pub struct PostProcessor {
    config: ObsgenConfigFile,
    on_service_monitor: Option<Hook<ServiceMonitor>>,
    on_service_account: Option<Hook<Value>>,
    on_workload: Option<Hook<Value>>,
}

impl PostProcessor {
    pub fn new(config: ObsgenConfigFile) -> Self {
        Self {
            config,
            on_service_monitor: None,
            on_service_account: None,
            on_workload: None,
        }
    }

    pub fn on_service_monitor(
        mut self,
        hook: impl Fn(&mut ServiceMonitor) + Send + Sync + 'static,
    ) -> Self {
        self.on_service_monitor = Some(Box::new(hook));
        self
    }

    /// Hook receiving the raw ServiceAccount object after the pull secret check
    pub fn on_service_account(
        mut self,
        hook: impl Fn(&mut Value) + Send + Sync + 'static,
    ) -> Self {
        self.on_service_account = Some(Box::new(hook));
        self
    }

    /// Hook receiving the raw workload object after its env was rewritten
    pub fn on_workload(mut self, hook: impl Fn(&mut Value) + Send + Sync + 'static) -> Self {
        self.on_workload = Some(Box::new(hook));
        self
    }

    /// Apply every rewrite to `template` in place
    pub fn process_template(&self, template: &mut Template) -> Result<Report> {
        let mut report = Report::default();

        for object in template.objects.iter_mut() {
            let kind = object
                .get("kind")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            debug!("Processing {} '{}'", kind, object_name(object));

            match kind.as_str() {
                SERVICE_MONITOR_KIND => {
                    self.process_service_monitor(object)?;
                    report.service_monitors += 1;
                }
                "ServiceAccount" => {
                    if self.process_service_account(object)? {
                        report.service_accounts += 1;
                    }
                }
                k if POD_TEMPLATE_KINDS.contains(&k) || k == "CronJob" => {
                    report.containers += self.process_workload(object)?;
                }
                _ => {}
            }
        }

        if self.config.sort_parameters {
            template.parameters = sort_template_params(std::mem::take(&mut template.parameters));
            report.parameters_sorted = true;
        }

        info!(
            "Post-processed template: {} ServiceMonitor(s), {} ServiceAccount(s), {} container(s)",
            report.service_monitors, report.service_accounts, report.containers
        );

        Ok(report)
    }

    fn process_service_monitor(&self, object: &mut Value) -> Result<()> {
        let mut sm: ServiceMonitor = from_object(object)?;
        relabel_service_monitor(
            &mut sm,
            &self.config.namespace,
            &self.config.monitoring_namespace,
            &self.config.prometheus_label,
        );
        execute_if_some(self.on_service_monitor.as_deref(), &mut sm);
        *object = to_object(&sm)?;
        Ok(())
    }

    /// Returns whether the pull secret was added.
    ///
    /// Edits `imagePullSecrets` in place; the rest of the object may hold
    /// `${{PARAM}}` placeholders a typed ServiceAccount would reject.
    fn process_service_account(&self, object: &mut Value) -> Result<bool> {
        let name = object_name(object);
        let Some(fields) = object.as_object_mut() else {
            return Err(Error::invalid_manifest("ServiceAccount", name, "not a map"));
        };

        let secrets = fields
            .entry("imagePullSecrets")
            .or_insert_with(|| Value::Array(Vec::new()));
        if secrets.is_null() {
            *secrets = Value::Array(Vec::new());
        }
        let Some(secrets) = secrets.as_array_mut() else {
            return Err(Error::invalid_manifest(
                "ServiceAccount",
                name,
                "imagePullSecrets is not a list",
            ));
        };

        let pull_secret = self.config.pull_secret.as_str();
        let added = if secrets
            .iter()
            .any(|r| r.get("name").and_then(Value::as_str) == Some(pull_secret))
        {
            debug!("ServiceAccount '{}' already references {}", name, pull_secret);
            false
        } else {
            secrets.push(json!({ "name": pull_secret }));
            true
        };

        execute_if_some(self.on_service_account.as_deref(), object);
        Ok(added)
    }

    /// Returns the number of containers whose env was rewritten
    fn process_workload(&self, object: &mut Value) -> Result<usize> {
        let mut rewritten = 0;

        if let Some(secret) = self.config.objstore_secret.as_deref() {
            let kind = object
                .get("kind")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let name = object_name(object);

            if let Some(pod_spec) = pod_spec_mut(object) {
                for list in CONTAINER_LISTS {
                    let Some(containers) = pod_spec.get_mut(*list).and_then(Value::as_array_mut)
                    else {
                        continue;
                    };
                    for container in containers.iter_mut() {
                        if rewrite_container_env(container, secret)
                            .map_err(|e| Error::invalid_manifest(&kind, &name, e.to_string()))?
                        {
                            rewritten += 1;
                        }
                    }
                }
            }
        }

        execute_if_some(self.on_workload.as_deref(), object);
        Ok(rewritten)
    }
}

/// Locate the pod spec of a workload object
fn pod_spec_mut(object: &mut Value) -> Option<&mut Value> {
    let spec = object.get_mut("spec")?;
    let spec = if spec.get("jobTemplate").is_some() {
        spec.get_mut("jobTemplate")?.get_mut("spec")?
    } else {
        spec
    };
    spec.get_mut("template")?.get_mut("spec")
}

fn rewrite_container_env(container: &mut Value, secret: &str) -> Result<bool> {
    let Some(env_value) = container.get_mut("env") else {
        return Ok(false);
    };
    // Parse a copy so a malformed env leaves the container as it was
    let mut env: Vec<EnvVar> = serde_json::from_value(env_value.clone())?;
    let replaced = replace_objstore_env(&mut env, secret);
    *env_value = serde_json::to_value(&env)?;
    Ok(replaced)
}

fn object_name(object: &Value) -> String {
    object
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_string()
}

fn from_object<T: DeserializeOwned>(object: &Value) -> Result<T> {
    serde_json::from_value(object.clone()).map_err(|e| {
        let kind = object
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or("object");
        Error::invalid_manifest(kind, object_name(object), e.to_string())
    })
}

fn to_object<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
