//! The canonical per-application value set handed to the renderer.

use std::collections::BTreeMap;

use sail_spec::{ServiceSpec, VolumeMount};
use serde::{Deserialize, Serialize};

/// Release-wide settings shared by every application of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseContext {
    pub release_name: String,
    pub environment: String,
    pub namespace: String,
}

impl ReleaseContext {
    pub fn new(
        release_name: impl Into<String>,
        environment: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            release_name: release_name.into(),
            environment: environment.into(),
            namespace: namespace.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
    pub cpu: String,
    pub memory: String,
}

/// Merged, environment-resolved values of one application.
///
/// Maps are ordered so rendering is deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderedApplication {
    pub name: String,
    pub tag: String,
    pub kind: Option<String>,
    pub namespace: String,
    pub release_name: String,
    pub annotations: BTreeMap<String, String>,
    pub node_selector: BTreeMap<String, String>,
    pub liveness_probe: Option<String>,
    pub readiness_probe: Option<String>,
    /// Set only when the service is enabled.
    pub container_port: Option<u16>,
    pub replicas: String,
    pub limits: ResourceLimits,
    pub env_vars: BTreeMap<String, String>,
    pub command: Vec<String>,
    pub entrypoint: Vec<String>,
    /// Present only when the service is enabled.
    pub service: Option<ServiceSpec>,
    pub parallelism: Option<u32>,
    pub backoff_limit: Option<u32>,
    pub active_deadline_seconds: Option<u32>,
    pub ttl_seconds_after_finished: Option<u32>,
    pub restart_policy: Option<String>,
    pub volume_mounts: Vec<VolumeMount>,
    /// Entries as YAML scalars: quoted literals or `|` block scalars.
    pub config_maps: Vec<BTreeMap<String, String>>,
}

impl RenderedApplication {
    pub fn service_enabled(&self) -> bool {
        self.service.as_ref().map_or(false, |s| s.enabled)
    }

    pub fn has_config_maps(&self) -> bool {
        self.config_maps.iter().any(|m| !m.is_empty())
    }
}
