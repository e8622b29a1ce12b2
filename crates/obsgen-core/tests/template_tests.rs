//! End-to-end post-processing of a generated Observatorium template
//!
//! Run with: cargo test --package obsgen-core --test template_tests

use obsgen_core::objstore::{env_placeholder, OBJSTORE_CONFIG_ENV};
use obsgen_core::types::{BucketConfig, ObsgenConfigFile, Template};
use obsgen_core::{PostProcessor, Report};

const METRICS_TEMPLATE: &str = r#"
apiVersion: template.openshift.io/v1
kind: Template
metadata:
  name: observatorium-metrics
objects:
  - apiVersion: v1
    kind: ServiceAccount
    metadata:
      name: observatorium-thanos
      labels:
        app.kubernetes.io/part-of: observatorium
  - apiVersion: apps/v1
    kind: StatefulSet
    metadata:
      name: observatorium-thanos-store
    spec:
      replicas: ${{STORE_REPLICAS}}
      template:
        spec:
          serviceAccountName: observatorium-thanos
          containers:
            - name: thanos
              image: quay.io/thanos/thanos:${THANOS_IMAGE_TAG}
              args:
                - store
                - --objstore.config=$(OBJSTORE_CONFIG)
              env:
                - name: OBJSTORE_CONFIG
                  valueFrom:
                    secretKeyRef:
                      name: thanos-objectstorage
                      key: thanos.yaml
                - name: HOST_IP_ADDRESS
                  valueFrom:
                    fieldRef:
                      fieldPath: status.hostIP
  - apiVersion: monitoring.coreos.com/v1
    kind: ServiceMonitor
    metadata:
      name: observatorium-thanos-store
      namespace: observatorium
      labels:
        app.kubernetes.io/name: thanos-store
    spec:
      endpoints:
        - port: http
          relabelings:
            - sourceLabels: [namespace, pod]
              separator: /
              targetLabel: instance
      selector:
        matchLabels:
          app.kubernetes.io/name: thanos-store
  - apiVersion: v1
    kind: Service
    metadata:
      name: observatorium-thanos-store
    spec:
      ports:
        - name: grpc
          port: 10901
parameters:
  - name: THANOS_IMAGE_TAG
    value: v0.32.5
  - name: NAMESPACE
    value: rhobs
  - name: STORE_REPLICAS
    value: "2"
"#;

fn process(config: ObsgenConfigFile) -> (Template, Report) {
    let mut template: Template = serde_yaml_ng::from_str(METRICS_TEMPLATE).unwrap();
    let report = PostProcessor::new(config)
        .process_template(&mut template)
        .unwrap();
    (template, report)
}

#[test]
fn full_template_is_post_processed() {
    let (template, report) =
        process(ObsgenConfigFile::new("rhobs").with_objstore_secret("rhobs-tenant-s3"));

    assert_eq!(
        report,
        Report {
            service_monitors: 1,
            service_accounts: 1,
            containers: 1,
            parameters_sorted: true,
        }
    );

    let names: Vec<&str> = template.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["NAMESPACE", "STORE_REPLICAS", "THANOS_IMAGE_TAG"]);

    let sa = &template.objects[0];
    assert_eq!(sa["imagePullSecrets"][0]["name"], "quay.io");
    assert_eq!(sa["metadata"]["labels"]["app.kubernetes.io/part-of"], "observatorium");

    let sts = &template.objects[1];
    assert_eq!(sts["spec"]["replicas"], "${{STORE_REPLICAS}}");
    let env = sts["spec"]["template"]["spec"]["containers"][0]["env"]
        .as_array()
        .unwrap();
    let env_names: Vec<&str> = env.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(
        env_names,
        vec![
            "HOST_IP_ADDRESS",
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "OBJ_STORE_BUCKET",
            "OBJ_STORE_REGION",
            "OBJ_STORE_ENDPOINT",
            OBJSTORE_CONFIG_ENV,
        ]
    );
    assert_eq!(env[3]["valueFrom"]["secretKeyRef"]["name"], "rhobs-tenant-s3");
    assert_eq!(env[3]["valueFrom"]["secretKeyRef"]["key"], "bucket");

    let objstore: BucketConfig =
        serde_yaml_ng::from_str(env[6]["value"].as_str().unwrap()).unwrap();
    assert_eq!(objstore.config.bucket, env_placeholder("OBJ_STORE_BUCKET"));
    assert_eq!(objstore.config.endpoint, env_placeholder("OBJ_STORE_ENDPOINT"));
    assert_eq!(objstore.config.region, env_placeholder("OBJ_STORE_REGION"));

    let sm = &template.objects[2];
    assert_eq!(sm["metadata"]["name"], "rhobs-observatorium-thanos-store");
    assert_eq!(sm["metadata"]["namespace"], "openshift-customer-monitoring");
    assert_eq!(sm["metadata"]["labels"]["prometheus"], "app-sre");
    assert_eq!(sm["metadata"]["labels"]["app.kubernetes.io/name"], "thanos-store");
    assert_eq!(sm["spec"]["namespaceSelector"]["matchNames"][0], "rhobs");
    assert_eq!(
        sm["spec"]["endpoints"][0]["relabelings"][0]["targetLabel"],
        "instance"
    );

    let svc = &template.objects[3];
    assert_eq!(svc["spec"]["ports"][0]["port"], 10901);
}

#[test]
fn processed_template_serializes_back_to_yaml() {
    let (template, _) = process(ObsgenConfigFile::new("rhobs").with_objstore_secret("s3"));

    let yaml = serde_yaml_ng::to_string(&template).unwrap();
    let reparsed: Template = serde_yaml_ng::from_str(&yaml).unwrap();
    assert_eq!(reparsed, template);
    assert!(yaml.contains("${{STORE_REPLICAS}}"));
}

#[test]
fn custom_monitoring_settings_are_used() {
    let mut config = ObsgenConfigFile::new("telemeter");
    config.monitoring_namespace = "monitoring".to_string();
    config.prometheus_label = "telemeter".to_string();
    config.pull_secret = "registry.redhat.io".to_string();

    let (template, report) = process(config);
    assert_eq!(report.containers, 0);

    let sm = &template.objects[2];
    assert_eq!(sm["metadata"]["namespace"], "monitoring");
    assert_eq!(sm["metadata"]["labels"]["prometheus"], "telemeter");
    assert_eq!(template.objects[0]["imagePullSecrets"][0]["name"], "registry.redhat.io");
}
