//! OpenShift Template (template.openshift.io/v1)
//!
//! Objects are kept as raw JSON values: generated templates put `${{PARAM}}`
//! placeholders into integer fields, which typed Kubernetes structs reject.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TEMPLATE_API_VERSION: &str = "template.openshift.io/v1";
pub const TEMPLATE_KIND: &str = "Template";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default = "default_api_version")]
    pub api_version: String,

    #[serde(default = "default_kind")]
    pub kind: String,

    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub objects: Vec<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// `message`, `labels` and anything else we do not touch
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_api_version() -> String {
    TEMPLATE_API_VERSION.to_string()
}

fn default_kind() -> String {
    TEMPLATE_KIND.to_string()
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta {
                name: Some(name.into()),
                ..Default::default()
            },
            objects: Vec::new(),
            parameters: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

/// A template parameter substituted by `oc process`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Generator name, e.g. "expression"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate: Option<String>,

    /// Input for the generator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
