//! Thanos object storage configuration types
//!
//! Mirrors the `objstore.yaml` document Thanos components read from the
//! `OBJSTORE_CONFIG` environment variable.

use serde::{Deserialize, Serialize};

/// Object storage provider discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ObjProvider {
    /// Amazon S3 and S3-compatible stores
    #[default]
    #[serde(rename = "S3")]
    S3,
}

/// Top-level bucket configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Storage provider
    #[serde(rename = "type")]
    pub provider: ObjProvider,

    /// Provider-specific settings
    pub config: S3Config,

    /// Optional key prefix inside the bucket
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
}

/// S3 provider settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub region: String,
}

impl BucketConfig {
    /// Create an S3 bucket configuration
    pub fn s3(
        bucket: impl Into<String>,
        endpoint: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            provider: ObjProvider::S3,
            config: S3Config {
                bucket: bucket.into(),
                endpoint: endpoint.into(),
                region: region.into(),
            },
            prefix: String::new(),
        }
    }
}
