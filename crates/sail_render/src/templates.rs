//! Fixed manifest templates.
//!
//! Templates are rendered against a serialized
//! [`RenderedApplication`](sail_resolver::RenderedApplication) with two helpers,
//! `uppercase` and `lowercase`. Block tags always share their line with other
//! text so whitespace is kept exactly as written.

use std::fmt;

pub const SERVICE_ACCOUNT_TEMPLATE: &str = r#"apiVersion: v1
kind: ServiceAccount
metadata:
  name: {{lowercase release_name}}-{{lowercase name}}
  namespace: {{namespace}}
  labels:
    app: {{name}}
    release: {{release_name}}
    version: {{tag}}
"#;

pub const SERVICE_TEMPLATE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{lowercase release_name}}-{{lowercase name}}
  namespace: {{namespace}}
  labels:
    app: {{name}}
    release: {{release_name}}
    version: {{tag}}
spec:
  type: {{#if service.type}}{{service.type}}{{else}}ClusterIP{{/if}}
  ports:
  - name: http
    port: 80
    targetPort: http
    protocol: TCP
  selector:
    app: {{name}}
    release: {{release_name}}
"#;

pub const DEPLOYMENT_TEMPLATE: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{lowercase release_name}}-{{lowercase name}}
  namespace: {{namespace}}
  labels:
    app: {{name}}
    release: {{release_name}}
    version: {{tag}}
  annotations:{{#if annotations}}
    {{#each annotations}}{{@key}}: {{this}}
    {{/each}}{{/if}}
spec:
  replicas: {{replicas}}
  selector:
    matchLabels:
      app: {{name}}
      release: {{release_name}}
  template:
    metadata:
      labels:
        app: {{name}}
        release: {{release_name}}
    spec:
      serviceAccountName: {{lowercase release_name}}-{{lowercase name}}
      containers:
       - name: {{name}}
         image: {{name}}:{{tag}}
         imagePullPolicy: IfNotPresent
         {{#if entrypoint}}command: [{{#each entrypoint}}'{{this}}', {{/each}}]{{/if}}
         {{#if command}}args: [{{#each command}}'{{this}}', {{/each}}]{{/if}}

         {{#if container_port~}}ports:
         - name: http
           containerPort: {{container_port}}
           protocol: TCP {{~/if}}
         {{#if liveness_probe~}}livenessProbe:
           httpGet:
             path: {{liveness_probe}}
             port: http
           initialDelaySeconds: 30
           timeoutSeconds: 100{{~/if}}
         {{#if readiness_probe~}}readinessProbe:
           httpGet:
             path: {{readiness_probe}}
             port: http
           initialDelaySeconds: 30
           timeoutSeconds: 100 {{~/if}}
         resources:
           limits:
             cpu: "{{limits.cpu}}"
             memory:  "{{limits.memory}}"
           requests:
             cpu:  "{{limits.cpu}}"
             memory:  "{{limits.memory}}"
         env:{{#each env_vars}}
          - name: "{{uppercase @key}}"
            value: "{{this}}"{{/each}}
      affinity:
      nodeSelector:{{#each node_selector}}
        {{@key}}: {{this}}{{/each}}
      tolerations:
"#;

pub const JOB_TEMPLATE: &str = r#"apiVersion: batch/v1
kind: Job
metadata:
  name: {{lowercase release_name}}-{{lowercase name}}
  namespace: {{namespace}}
  labels:
    app: {{name}}
    release: {{release_name}}
    version: {{tag}}
  annotations:{{#if annotations}}
    {{#each annotations}}{{@key}}: {{this}}
    {{/each}}{{/if}}
spec:
  {{#if replicas~}}completions: {{replicas}}{{else}}completions: 1{{~/if}}
  {{#if parallelism~}}parallelism: {{parallelism}}{{~/if}}
  {{#if backoff_limit~}}backoffLimit: {{backoff_limit}}{{~/if}}
  {{#if active_deadline_seconds~}}activeDeadlineSeconds: {{active_deadline_seconds}}{{~/if}}
  {{#if ttl_seconds_after_finished~}}ttlSecondsAfterFinished: {{ttl_seconds_after_finished}}{{~/if}}
  template:
    spec:
      serviceAccountName: {{lowercase release_name}}-{{lowercase name}}
      containers:
       - name: {{name}}
         image: {{name}}:{{tag}}
         imagePullPolicy: IfNotPresent
         {{#if entrypoint}}command: [{{#each entrypoint}}'{{this}}', {{/each}}]{{/if}}
         {{#if command}}args: [{{#each command}}'{{this}}', {{/each}}]{{/if}}

         resources:
           limits:
             cpu: "{{limits.cpu}}"
             memory:  "{{limits.memory}}"
           requests:
             cpu:  "{{limits.cpu}}"
             memory:  "{{limits.memory}}"
         env:{{#each env_vars}}
          - name: "{{uppercase @key}}"
            value: "{{this}}"{{/each}}
      restartPolicy: {{#if restart_policy}}{{restart_policy}}{{else}}Never{{/if}}
      affinity:
      nodeSelector:{{#each node_selector}}
        {{@key}}: {{this}}{{/each}}
      tolerations:
"#;

pub const CONFIG_MAP_TEMPLATE: &str = r#"apiVersion: v1
kind: ConfigMap
metadata:
  name: {{lowercase release_name}}-{{lowercase name}}
  namespace: {{namespace}}
  labels:
    app: {{name}}
    release: {{release_name}}
    version: {{tag}}
data:{{#each config_maps}}{{#each this}}
  {{@key}}: {{this}}{{/each}}{{/each}}
"#;

/// The manifests an application can produce, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestTemplate {
    ServiceAccount,
    Deployment,
    Job,
    Service,
    ConfigMap,
}

impl ManifestTemplate {
    pub fn all() -> [ManifestTemplate; 5] {
        [
            ManifestTemplate::ServiceAccount,
            ManifestTemplate::Deployment,
            ManifestTemplate::Job,
            ManifestTemplate::Service,
            ManifestTemplate::ConfigMap,
        ]
    }

    /// Registry name of the template.
    pub fn name(&self) -> &'static str {
        match self {
            ManifestTemplate::ServiceAccount => "ServiceAccountTemplate",
            ManifestTemplate::Deployment => "DeploymentTemplate",
            ManifestTemplate::Job => "JobTemplate",
            ManifestTemplate::Service => "ServiceTemplate",
            ManifestTemplate::ConfigMap => "ConfigMapTemplate",
        }
    }

    /// Lower-case kind used in file names and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            ManifestTemplate::ServiceAccount => "serviceaccount",
            ManifestTemplate::Deployment => "deployment",
            ManifestTemplate::Job => "job",
            ManifestTemplate::Service => "service",
            ManifestTemplate::ConfigMap => "configmap",
        }
    }

    pub fn body(&self) -> &'static str {
        match self {
            ManifestTemplate::ServiceAccount => SERVICE_ACCOUNT_TEMPLATE,
            ManifestTemplate::Deployment => DEPLOYMENT_TEMPLATE,
            ManifestTemplate::Job => JOB_TEMPLATE,
            ManifestTemplate::Service => SERVICE_TEMPLATE,
            ManifestTemplate::ConfigMap => CONFIG_MAP_TEMPLATE,
        }
    }

    /// `<app>-<kind>.yaml`
    pub fn file_name(&self, app: &str) -> String {
        format!("{}-{}.yaml", app, self.kind())
    }
}

impl fmt::Display for ManifestTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
