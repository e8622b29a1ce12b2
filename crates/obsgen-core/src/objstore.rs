//! Object storage environment for Thanos containers
//!
//! The credentials secret generated by app-interface exposes the bucket,
//! region and endpoint as separate keys. Thanos wants a single
//! `OBJSTORE_CONFIG` document instead, so that document is built from
//! `$(VAR)` references to the individual variables and the kubelet expands
//! them when the container starts.

use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, SecretKeySelector};

use crate::types::BucketConfig;

/// Variable carrying the rendered objstore.yaml
pub const OBJSTORE_CONFIG_ENV: &str = "OBJSTORE_CONFIG";

pub const AWS_ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const OBJ_STORE_BUCKET_ENV: &str = "OBJ_STORE_BUCKET";
pub const OBJ_STORE_REGION_ENV: &str = "OBJ_STORE_REGION";
pub const OBJ_STORE_ENDPOINT_ENV: &str = "OBJ_STORE_ENDPOINT";

/// (variable, secret key) pairs, in output order
const SECRET_BINDINGS: [(&str, &str); 5] = [
    (AWS_ACCESS_KEY_ID_ENV, "aws_access_key_id"),
    (AWS_SECRET_ACCESS_KEY_ENV, "aws_secret_access_key"),
    (OBJ_STORE_BUCKET_ENV, "bucket"),
    (OBJ_STORE_REGION_ENV, "aws_region"),
    (OBJ_STORE_ENDPOINT_ENV, "endpoint"),
];

/// Kubernetes dependent-variable reference, e.g. `$(OBJ_STORE_BUCKET)`
pub fn env_placeholder(var: &str) -> String {
    format!("$({var})")
}

/// Build an env var that reads `key` from the secret `secret`
pub fn env_from_secret(name: &str, secret: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret.to_string(),
                key: key.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The objstore.yaml document with every value left for the kubelet to expand
pub fn objstore_bucket_config() -> BucketConfig {
    BucketConfig::s3(
        env_placeholder(OBJ_STORE_BUCKET_ENV),
        env_placeholder(OBJ_STORE_ENDPOINT_ENV),
        env_placeholder(OBJ_STORE_REGION_ENV),
    )
}

/// Env vars a Thanos container needs to reach the bucket behind `objstore_secret`.
///
/// The first five entries read the secret, the last one is the literal
/// `OBJSTORE_CONFIG` document referencing them. The secret name is not
/// validated.
///
/// # Panics
///
/// Panics if the fixed bucket document fails to serialize, which can only
/// happen through a programming error in [`BucketConfig`].
pub fn objstore_env_vars(objstore_secret: &str) -> Vec<EnvVar> {
    let objstore_cfg = serde_yaml_ng::to_string(&objstore_bucket_config())
        .unwrap_or_else(|e| panic!("failed to serialize objstore config: {e}"));

    let mut env: Vec<EnvVar> = SECRET_BINDINGS
        .iter()
        .map(|(name, key)| env_from_secret(name, objstore_secret, key))
        .collect();

    env.push(EnvVar {
        name: OBJSTORE_CONFIG_ENV.to_string(),
        value: Some(objstore_cfg),
        ..Default::default()
    });

    env
}

/// Drop the first `OBJSTORE_CONFIG` entry, keeping the others in order.
///
/// The Observatorium defaults ship their own `OBJSTORE_CONFIG` for every
/// Thanos component; it has to go before [`objstore_env_vars`] is appended.
pub fn delete_objstore_env(mut env: Vec<EnvVar>) -> Vec<EnvVar> {
    if let Some(pos) = env.iter().position(|e| e.name == OBJSTORE_CONFIG_ENV) {
        env.remove(pos);
    }
    env
}

/// Replace the default objstore env of a container with the secret-backed one.
///
/// Returns `false` and leaves `env` untouched when it carries no
/// `OBJSTORE_CONFIG`.
pub fn replace_objstore_env(env: &mut Vec<EnvVar>, objstore_secret: &str) -> bool {
    if !env.iter().any(|e| e.name == OBJSTORE_CONFIG_ENV) {
        return false;
    }
    let kept = delete_objstore_env(std::mem::take(env));
    *env = kept;
    env.extend(objstore_env_vars(objstore_secret));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret_ref(env: &EnvVar) -> (&str, &str) {
        let selector = env
            .value_from
            .as_ref()
            .and_then(|v| v.secret_key_ref.as_ref())
            .expect("expected secret key ref");
        (selector.name.as_str(), selector.key.as_str())
    }

    fn literal(name: &str, value: &str) -> EnvVar {
        EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_objstore_env_vars_order() {
        let env = objstore_env_vars("s3-creds");
        let names: Vec<&str> = env.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "AWS_ACCESS_KEY_ID",
                "AWS_SECRET_ACCESS_KEY",
                "OBJ_STORE_BUCKET",
                "OBJ_STORE_REGION",
                "OBJ_STORE_ENDPOINT",
                "OBJSTORE_CONFIG",
            ]
        );
    }

    #[test]
    fn test_objstore_env_vars_secret_refs() {
        let env = objstore_env_vars("s3-creds");
        assert_eq!(secret_ref(&env[0]), ("s3-creds", "aws_access_key_id"));
        assert_eq!(secret_ref(&env[1]), ("s3-creds", "aws_secret_access_key"));
        assert_eq!(secret_ref(&env[2]), ("s3-creds", "bucket"));
        assert_eq!(secret_ref(&env[3]), ("s3-creds", "aws_region"));
        assert_eq!(secret_ref(&env[4]), ("s3-creds", "endpoint"));
        for e in &env[..5] {
            assert!(e.value.is_none());
        }
    }

    #[test]
    fn test_objstore_config_references_bindings() {
        let env = objstore_env_vars("s3-creds");
        let last = env.last().unwrap();
        assert!(last.value_from.is_none());

        let cfg: BucketConfig = serde_yaml_ng::from_str(last.value.as_deref().unwrap()).unwrap();
        assert_eq!(cfg.config.bucket, env_placeholder(&env[2].name));
        assert_eq!(cfg.config.region, env_placeholder(&env[3].name));
        assert_eq!(cfg.config.endpoint, env_placeholder(&env[4].name));
        assert_eq!(cfg.config.bucket, "$(OBJ_STORE_BUCKET)");
    }

    #[test]
    fn test_empty_secret_name_passes_through() {
        let env = objstore_env_vars("");
        assert_eq!(env.len(), 6);
        assert_eq!(secret_ref(&env[0]).0, "");
    }

    #[test]
    fn test_delete_objstore_env_preserves_order() {
        let env = vec![
            literal("A", "1"),
            literal("OBJSTORE_CONFIG", "type: FILESYSTEM"),
            literal("B", "2"),
            literal("C", "3"),
        ];
        let out = delete_objstore_env(env);
        let names: Vec<&str> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_delete_objstore_env_removes_only_first() {
        let env = vec![
            literal("OBJSTORE_CONFIG", "first"),
            literal("A", "1"),
            literal("OBJSTORE_CONFIG", "second"),
        ];
        let out = delete_objstore_env(env);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].value.as_deref(), Some("second"));
    }

    #[test]
    fn test_delete_objstore_env_no_match() {
        let env = vec![literal("A", "1"), literal("B", "2")];
        let out = delete_objstore_env(env.clone());
        assert_eq!(out, env);
    }

    #[test]
    fn test_replace_objstore_env() {
        let mut env = vec![literal("OBJSTORE_CONFIG", "old"), literal("DEBUG", "1")];
        assert!(replace_objstore_env(&mut env, "thanos-s3"));
        assert_eq!(env.len(), 7);
        assert_eq!(env[0].name, "DEBUG");
        assert_eq!(env[6].name, OBJSTORE_CONFIG_ENV);
        assert_ne!(env[6].value.as_deref(), Some("old"));
    }

    #[test]
    fn test_replace_objstore_env_without_default() {
        let mut env = vec![literal("DEBUG", "1")];
        assert!(!replace_objstore_env(&mut env, "thanos-s3"));
        assert_eq!(env, vec![literal("DEBUG", "1")]);
    }
}
