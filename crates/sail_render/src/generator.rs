//! Top-level generation entry point.

use std::path::{Path, PathBuf};

use sail_resolver::{ApplicationAssembler, ReleaseContext, RenderedApplication};
use sail_spec::{ApplicationRequest, DefinitionSource, DefinitionStore, DeploymentItemSummary};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{RenderError, RenderResult};
use crate::renderer::ManifestRenderer;
use crate::selector::required_templates;
use crate::templates::ManifestTemplate;

/// Directories a generation run reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorPaths {
    pub app_dir: PathBuf,
    pub resource_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl GeneratorPaths {
    pub fn new(
        app_dir: impl Into<PathBuf>,
        resource_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            app_dir: app_dir.into(),
            resource_dir: resource_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// A release and the applications to generate for it, in order.
#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub release: ReleaseContext,
    pub apps: Vec<ApplicationRequest>,
}

impl ReleaseRequest {
    pub fn new(release: ReleaseContext, apps: Vec<ApplicationRequest>) -> Self {
        Self { release, apps }
    }
}

/// Result of resolving one application without writing anything.
#[derive(Debug, Clone, Serialize)]
pub struct CheckedApplication {
    pub values: RenderedApplication,
    pub templates: Vec<String>,
    pub warnings: Vec<String>,
}

/// Runs the resolve, select and render pipeline over a [`DefinitionSource`].
pub struct ManifestGenerator<S: DefinitionSource> {
    source: S,
    output_dir: PathBuf,
    renderer: ManifestRenderer,
}

impl ManifestGenerator<DefinitionStore> {
    /// Generator reading definitions from disk.
    pub fn from_paths(paths: &GeneratorPaths) -> RenderResult<Self> {
        let store = DefinitionStore::new(&paths.app_dir, &paths.resource_dir);
        Self::new(store, &paths.output_dir)
    }
}

impl<S: DefinitionSource> ManifestGenerator<S> {
    pub fn new(source: S, output_dir: impl AsRef<Path>) -> RenderResult<Self> {
        Ok(Self {
            source,
            output_dir: output_dir.as_ref().to_path_buf(),
            renderer: ManifestRenderer::new()?,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Generate manifests for every application of `request`, in order.
    ///
    /// Stops at the first failing application. Files already written for
    /// earlier applications are left in place.
    pub fn generate(&self, request: &ReleaseRequest) -> RenderResult<DeploymentItemSummary> {
        let release = &request.release;
        info!(
            "Generating {} application(s) for release {} ({}) in namespace {}",
            request.apps.len(),
            release.release_name,
            release.environment,
            release.namespace
        );

        let mut summary = DeploymentItemSummary::new(
            &release.namespace,
            &release.environment,
            &release.release_name,
        );
        let assembler = ApplicationAssembler::new(&self.source, release);

        for app in &request.apps {
            let assembled = assembler
                .assemble(app)
                .map_err(|e| RenderError::from(e).for_app(&app.name))?;

            let dir = self.output_dir.join(&app.name);
            let items = self
                .renderer
                .render_to_dir(&assembled.values, &dir)
                .map_err(|e| e.for_app(&app.name))?;

            info!("Generated {} manifest(s) for {}", items.len(), app);
            summary.items.extend(items);
            summary
                .warnings
                .extend(assembled.warnings.iter().map(|w| format!("{}: {}", app.name, w)));
        }

        if !summary.warnings.is_empty() {
            warn!("Generation finished with {} warning(s)", summary.warnings.len());
        }
        Ok(summary)
    }

    /// Resolve every application of `request` and select its templates
    /// without rendering.
    pub fn check(&self, request: &ReleaseRequest) -> RenderResult<Vec<CheckedApplication>> {
        let assembler = ApplicationAssembler::new(&self.source, &request.release);
        let mut checked = Vec::with_capacity(request.apps.len());

        for app in &request.apps {
            let assembled = assembler
                .assemble(app)
                .map_err(|e| RenderError::from(e).for_app(&app.name))?;
            let templates = required_templates(&assembled.values)
                .map_err(|e| e.for_app(&app.name))?;

            info!("{} resolves to {} manifest(s)", app, templates.len());
            checked.push(CheckedApplication {
                values: assembled.values,
                templates: templates.iter().map(ManifestTemplate::kind).map(String::from).collect(),
                warnings: assembled.warnings,
            });
        }

        Ok(checked)
    }
}

/// Generate manifests for `request` from the directories in `paths`.
pub fn generate(request: &ReleaseRequest, paths: &GeneratorPaths) -> RenderResult<DeploymentItemSummary> {
    ManifestGenerator::from_paths(paths)?.generate(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sail_spec::{
        ApplicationDefinition, DefinitionKind, InfrastructureDefinition, MixinSetDefinition,
        ResourceDefinition, SpecError, SpecResult,
    };
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// In-memory application definitions; every other lookup is missing.
    struct Apps(HashMap<String, ApplicationDefinition>);

    fn missing<T>(kind: DefinitionKind, name: &str) -> SpecResult<T> {
        Err(SpecError::NotFound {
            kind,
            name: name.to_string(),
            path: PathBuf::from(name),
        })
    }

    impl DefinitionSource for Apps {
        fn application(&self, name: &str) -> SpecResult<ApplicationDefinition> {
            match self.0.get(name) {
                Some(app) => Ok(app.clone()),
                None => missing(DefinitionKind::Application, name),
            }
        }

        fn resource(&self, name: &str) -> SpecResult<ResourceDefinition> {
            missing(DefinitionKind::Resource, name)
        }

        fn infrastructure(&self, name: &str) -> SpecResult<InfrastructureDefinition> {
            missing(DefinitionKind::Infrastructure, name)
        }

        fn mixin_set(&self, name: &str) -> SpecResult<MixinSetDefinition> {
            missing(DefinitionKind::MixinSet, name)
        }

        fn config_file(&self, path: &str) -> SpecResult<String> {
            missing(DefinitionKind::ConfigFile, path)
        }
    }

    fn apps(defs: &[(&str, &str)]) -> Apps {
        Apps(
            defs.iter()
                .map(|(name, yaml)| (name.to_string(), serde_yaml::from_str(yaml).unwrap()))
                .collect(),
        )
    }

    fn request(names: &[&str]) -> ReleaseRequest {
        ReleaseRequest::new(
            ReleaseContext::new("Release-2", "test", "apps"),
            names
                .iter()
                .map(|n| ApplicationRequest::new(*n, "latest"))
                .collect(),
        )
    }

    #[test]
    fn test_generate_summary() {
        let dir = tempdir().unwrap();
        let source = apps(&[
            ("busybox", "template: []\n"),
            ("nginx", "service:\n  enabled: true\n  port: 80\n"),
        ]);
        let generator = ManifestGenerator::new(source, dir.path()).unwrap();

        let summary = generator.generate(&request(&["busybox", "nginx"])).unwrap();

        assert_eq!(summary.namespace, "apps");
        assert_eq!(summary.environment, "test");
        assert_eq!(summary.release_name, "Release-2");
        assert_eq!(summary.items.len(), 5);
        assert_eq!(summary.items_for("busybox").len(), 2);
        let kinds: Vec<_> = summary.items_for("nginx").iter().map(|i| i.kind.as_str()).collect();
        assert_eq!(kinds, vec!["serviceaccount", "deployment", "service"]);
        assert!(dir.path().join("nginx").join("nginx-service.yaml").exists());

        // Both applications fall back to the default tier.
        assert_eq!(summary.warnings.len(), 2);
        assert!(summary.warnings[0].starts_with("busybox: "));
    }

    #[test]
    fn test_first_failure_stops_run() {
        let dir = tempdir().unwrap();
        let source = apps(&[
            ("busybox", "{}\n"),
            ("later", "{}\n"),
        ]);
        let generator = ManifestGenerator::new(source, dir.path()).unwrap();

        let err = generator
            .generate(&request(&["busybox", "ghost", "later"]))
            .unwrap_err();

        assert!(err.to_string().starts_with("[app]: ghost, [error]: "));
        assert!(matches!(
            err.root(),
            RenderError::Resolve(_) | RenderError::Spec(_)
        ));
        assert!(dir.path().join("busybox").exists());
        assert!(!dir.path().join("later").exists());
    }

    #[test]
    fn test_check_writes_nothing() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let source = apps(&[("eod-job", "kind: Job\nconfigMaps:\n  - mode: batch\n")]);
        let generator = ManifestGenerator::new(source, &out).unwrap();

        let checked = generator.check(&request(&["eod-job"])).unwrap();

        assert_eq!(checked.len(), 1);
        assert_eq!(checked[0].templates, vec!["serviceaccount", "job", "configmap"]);
        assert_eq!(checked[0].warnings.len(), 1);
        assert!(!out.exists());
    }

    #[test]
    fn test_check_reports_unsupported_kind() {
        let dir = tempdir().unwrap();
        let source = apps(&[("cache", "kind: StatefulSet\n")]);
        let generator = ManifestGenerator::new(source, dir.path()).unwrap();

        let err = generator.check(&request(&["cache"])).unwrap_err();
        assert!(matches!(err.root(), RenderError::UnsupportedKind { .. }));
    }
}
