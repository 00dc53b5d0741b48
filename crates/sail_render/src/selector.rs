//! Template selection.

use sail_resolver::RenderedApplication;

use crate::error::{RenderError, RenderResult};
use crate::templates::ManifestTemplate;

/// Workload kinds with a manifest template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadKind {
    Deployment,
    Job,
}

impl WorkloadKind {
    /// Unset or `Deployment` selects a Deployment; `Job` matches case-insensitively.
    pub fn from_kind(kind: Option<&str>) -> Option<Self> {
        match kind {
            None | Some("") | Some("Deployment") => Some(WorkloadKind::Deployment),
            Some(k) if k.eq_ignore_ascii_case("job") => Some(WorkloadKind::Job),
            Some(_) => None,
        }
    }

    pub fn template(&self) -> ManifestTemplate {
        match self {
            WorkloadKind::Deployment => ManifestTemplate::Deployment,
            WorkloadKind::Job => ManifestTemplate::Job,
        }
    }
}

/// Templates `app` needs, in rendering order.
pub fn required_templates(app: &RenderedApplication) -> RenderResult<Vec<ManifestTemplate>> {
    let workload = WorkloadKind::from_kind(app.kind.as_deref()).ok_or_else(|| {
        RenderError::UnsupportedKind {
            app: app.name.clone(),
            kind: app.kind.clone().unwrap_or_default(),
        }
    })?;

    let mut templates = vec![ManifestTemplate::ServiceAccount, workload.template()];
    if app.service_enabled() {
        templates.push(ManifestTemplate::Service);
    }
    if app.has_config_maps() {
        templates.push(ManifestTemplate::ConfigMap);
    }
    Ok(templates)
}
