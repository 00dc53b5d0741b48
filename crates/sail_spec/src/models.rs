//! Data models for application and shared definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_version() -> String {
    "latest".to_string()
}

/// The identity a caller asks to generate manifests for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

impl ApplicationRequest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl FromStr for ApplicationRequest {
    type Err = String;

    /// Parse `name[:version]`, defaulting the version to `latest`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = match s.split_once(':') {
            Some((name, version)) => (name, version),
            None => (s, "latest"),
        };
        if name.is_empty() || version.is_empty() {
            return Err(format!("invalid application '{}', expected name[:version]", s));
        }
        Ok(Self::new(name, version))
    }
}

impl fmt::Display for ApplicationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// On-disk declaration of one deployable application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationDefinition {
    pub name: String,
    /// Workload kind; unset means `Deployment`.
    pub kind: Option<String>,
    #[serde(rename = "liveness_probe", alias = "livenessProbe")]
    pub liveness_probe: Option<String>,
    #[serde(rename = "readiness_probe", alias = "readinessProbe")]
    pub readiness_probe: Option<String>,
    pub annotations: BTreeMap<String, String>,
    /// `resourceName/envType` references.
    pub resources: Vec<String>,
    /// `mixinSet/type` references.
    pub mixins: Vec<String>,
    /// Per-environment sizing templates.
    pub template: Vec<EnvironmentTemplate>,
    pub service: ServiceSpec,
    pub parallelism: Option<u32>,
    pub backoff_limit: Option<u32>,
    pub active_deadline_seconds: Option<u32>,
    pub ttl_seconds_after_finished: Option<u32>,
    pub restart_policy: Option<String>,
    pub volume_mounts: Vec<VolumeMount>,
    /// Each value is a literal or a `file:/<path>` indirection.
    pub config_maps: Vec<BTreeMap<String, String>>,
    pub node_selector: BTreeMap<String, String>,
}

/// Service exposure of an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceSpec {
    pub enabled: bool,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub port: Option<u16>,
    pub target_port: Option<u16>,
}

/// Sizing for one deployment environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentTemplate {
    pub name: String,
    pub replica: Option<u32>,
    /// `cpu`, `memory` tier keys and a literal `replicas` count.
    pub config: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    pub name: String,
    pub mount_path: String,
}

/// A shared, environment-parameterized attribute bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceDefinition {
    pub name: String,
    pub spec: ResourceSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSpec {
    pub template: Vec<ResourceTemplate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTemplate {
    pub name: String,
    pub element: BTreeMap<String, String>,
    /// Optional `infraName/infraEnvType` reference.
    pub infra: Option<String>,
}

impl ResourceDefinition {
    /// First template declared for `env_type`.
    pub fn find_template(&self, env_type: &str) -> Option<&ResourceTemplate> {
        self.spec.template.iter().find(|t| t.name == env_type)
    }
}

/// An attribute bundle reached through a resource template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureDefinition {
    pub name: String,
    pub spec: InfrastructureSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureSpec {
    pub template: Vec<InfrastructureTemplate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureTemplate {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

impl InfrastructureDefinition {
    pub fn find_template(&self, env_type: &str) -> Option<&InfrastructureTemplate> {
        self.spec.template.iter().find(|t| t.name == env_type)
    }
}

/// A named list of typed mixins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MixinSetDefinition {
    pub name: String,
    pub mixin: Vec<Mixin>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mixin {
    /// The mixin type matched against `mixinSet/type` references.
    #[serde(alias = "type")]
    pub name: String,
    pub env: BTreeMap<String, String>,
    pub cmd: Vec<String>,
    pub entrypoint: Vec<String>,
}

impl MixinSetDefinition {
    pub fn find_mixin(&self, mixin_type: &str) -> Option<&Mixin> {
        self.mixin.iter().find(|m| m.name == mixin_type)
    }
}

/// One rendered manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentItem {
    pub name: String,
    pub kind: String,
    pub path: PathBuf,
}

/// Everything a generation run emitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentItemSummary {
    pub namespace: String,
    pub environment: String,
    pub release_name: String,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<DeploymentItem>,
    /// Soft failures, prefixed with the application they came from.
    pub warnings: Vec<String>,
}

impl DeploymentItemSummary {
    pub fn new(
        namespace: impl Into<String>,
        environment: impl Into<String>,
        release_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            environment: environment.into(),
            release_name: release_name.into(),
            generated_at: Utc::now(),
            items: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Items emitted for one application.
    pub fn items_for(&self, app: &str) -> Vec<&DeploymentItem> {
        self.items.iter().filter(|i| i.name == app).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_request_from_str() {
        let req: ApplicationRequest = "busybox:1.36".parse().unwrap();
        assert_eq!(req, ApplicationRequest::new("busybox", "1.36"));

        let req: ApplicationRequest = "nginx".parse().unwrap();
        assert_eq!(req.version, "latest");

        assert!(":1.0".parse::<ApplicationRequest>().is_err());
        assert!("nginx:".parse::<ApplicationRequest>().is_err());
    }

    #[test]
    fn test_application_definition_yaml() {
        let app: ApplicationDefinition = serde_yaml::from_str(
            r#"
name: eod-job
kind: Job
liveness_probe: /health
annotations:
  team: payments
resources:
  - cassandra/test1
mixins:
  - java/java-default
template:
  - name: test
    config:
      cpu: c1
      memory: m1
      replicas: "2"
service:
  enabled: true
  port: 8080
backoffLimit: 3
restartPolicy: OnFailure
volumeMounts:
  - name: data
    mountPath: /data
configMaps:
  - app.env: production
nodeSelector:
  pool: batch
"#,
        )
        .unwrap();

        assert_eq!(app.kind.as_deref(), Some("Job"));
        assert_eq!(app.liveness_probe.as_deref(), Some("/health"));
        assert_eq!(app.template[0].config["cpu"], "c1");
        assert!(app.service.enabled);
        assert_eq!(app.service.port, Some(8080));
        assert_eq!(app.backoff_limit, Some(3));
        assert_eq!(app.volume_mounts[0].mount_path, "/data");
        assert_eq!(app.config_maps[0]["app.env"], "production");
        assert_eq!(app.node_selector["pool"], "batch");
    }

    #[test]
    fn test_find_template_first_match() {
        let resource: ResourceDefinition = serde_yaml::from_str(
            r#"
name: cassandra
spec:
  template:
    - name: test1
      element:
        host: first
    - name: test1
      element:
        host: second
"#,
        )
        .unwrap();

        assert_eq!(resource.find_template("test1").unwrap().element["host"], "first");
        assert!(resource.find_template("prod").is_none());
    }

    #[test]
    fn test_mixin_type_alias() {
        let set: MixinSetDefinition = serde_yaml::from_str(
            r#"
name: java
mixin:
  - type: java-default
    cmd: ["java", "-jar", "app.jar"]
"#,
        )
        .unwrap();
        assert_eq!(set.find_mixin("java-default").unwrap().cmd.len(), 3);
    }
}
