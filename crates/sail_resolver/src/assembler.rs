//! Assembly of the canonical per-application value set.

use std::collections::BTreeMap;

use sail_spec::{ApplicationDefinition, ApplicationRequest, DefinitionSource};
use tracing::{debug, info};

use crate::env::EnvVarResolver;
use crate::error::{ResolveError, ResolveResult};
use crate::mixin::MixinResolver;
use crate::tier::resolve_tier;
use crate::values::{ReleaseContext, RenderedApplication, ResourceLimits};

/// Marker for config map values read from a file.
pub const FILE_PREFIX: &str = "file:/";

const BLOCK_INDENT: &str = "    ";

/// Indentation of block content relative to its `data:` entry key.
const BLOCK_INDENT_INDICATOR: &str = "2";

/// An application's value set and the warnings raised while resolving it.
#[derive(Debug, Clone)]
pub struct AssembledApplication {
    pub values: RenderedApplication,
    pub warnings: Vec<String>,
}

/// Builds [`RenderedApplication`]s from definitions for one release.
pub struct ApplicationAssembler<'a, S: DefinitionSource + ?Sized> {
    source: &'a S,
    release: &'a ReleaseContext,
}

impl<'a, S: DefinitionSource + ?Sized> ApplicationAssembler<'a, S> {
    pub fn new(source: &'a S, release: &'a ReleaseContext) -> Self {
        Self { source, release }
    }

    /// Load the definition of `request` and resolve it for the release environment.
    pub fn assemble(&self, request: &ApplicationRequest) -> ResolveResult<AssembledApplication> {
        let definition = self.source.application(&request.name)?;
        self.assemble_definition(request, &definition)
    }

    /// Resolve an already loaded definition.
    pub fn assemble_definition(
        &self,
        request: &ApplicationRequest,
        definition: &ApplicationDefinition,
    ) -> ResolveResult<AssembledApplication> {
        info!(
            "Resolving {} for environment {}",
            request, self.release.environment
        );

        let mut values = RenderedApplication {
            name: request.name.clone(),
            tag: request.version.clone(),
            kind: definition.kind.clone().filter(|k| !k.is_empty()),
            namespace: self.release.namespace.clone(),
            release_name: self.release.release_name.clone(),
            annotations: definition.annotations.clone(),
            node_selector: definition.node_selector.clone(),
            liveness_probe: definition.liveness_probe.clone().filter(|p| !p.is_empty()),
            readiness_probe: definition.readiness_probe.clone().filter(|p| !p.is_empty()),
            parallelism: definition.parallelism,
            backoff_limit: definition.backoff_limit,
            active_deadline_seconds: definition.active_deadline_seconds,
            ttl_seconds_after_finished: definition.ttl_seconds_after_finished,
            restart_policy: definition.restart_policy.clone().filter(|p| !p.is_empty()),
            ..Default::default()
        };
        let mut warnings = Vec::new();

        if definition.service.enabled {
            values.service = Some(definition.service.clone());
            values.container_port = definition.service.port.or(definition.service.target_port);
        }
        values.config_maps = self.expand_config_maps(&request.name, definition)?;
        values.volume_mounts = definition.volume_mounts.clone();

        let tier = resolve_tier(definition, &self.release.environment)?;
        warnings.extend(tier.warnings);
        values.limits = ResourceLimits {
            cpu: tier.value.cpu,
            memory: tier.value.memory,
        };
        values.replicas = tier.value.replicas;

        let env = EnvVarResolver::new(self.source).resolve(definition)?;
        warnings.extend(env.warnings);
        values.env_vars = env.value;

        let mixins = MixinResolver::new(self.source).resolve(definition)?;
        warnings.extend(mixins.warnings);
        values.env_vars.extend(mixins.value.env);
        values.command = mixins.value.command;
        values.entrypoint = mixins.value.entrypoint;

        debug!(
            "Resolved {} with {} env vars and {} warnings",
            request.name,
            values.env_vars.len(),
            warnings.len()
        );

        Ok(AssembledApplication { values, warnings })
    }

    /// Turn every config map value into a YAML scalar ready to render under `data:`.
    ///
    /// `file:/<path>` values become the file's contents as a block scalar; all
    /// other values are double-quoted so they stay strings.
    fn expand_config_maps(
        &self,
        app: &str,
        definition: &ApplicationDefinition,
    ) -> ResolveResult<Vec<BTreeMap<String, String>>> {
        let mut expanded = Vec::with_capacity(definition.config_maps.len());

        for config_map in &definition.config_maps {
            let mut entries = BTreeMap::new();
            for (key, value) in config_map {
                let value = match value.strip_prefix(FILE_PREFIX) {
                    Some(path) => {
                        let content = self.source.config_file(path).map_err(|source| {
                            ResolveError::ConfigFile {
                                app: app.to_string(),
                                key: key.clone(),
                                source,
                            }
                        })?;
                        block_scalar(&content)
                    }
                    None => quoted_scalar(value),
                };
                entries.insert(key.clone(), value);
            }
            expanded.push(entries);
        }

        Ok(expanded)
    }
}

/// Format `content` as a literal block scalar nested under a `data:` key.
///
/// An indented first line would be taken as the block's indentation, so the
/// indentation is then stated explicitly.
fn block_scalar(content: &str) -> String {
    let content = content.trim_end_matches('\n');
    let mut block = String::from("|");
    let leading_indent = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .map_or(false, |line| line.starts_with([' ', '\t']));
    if leading_indent {
        block.push_str(BLOCK_INDENT_INDICATOR);
    }

    for line in content.lines() {
        block.push('\n');
        if !line.is_empty() {
            block.push_str(BLOCK_INDENT);
            block.push_str(line);
        }
    }
    block
}

/// Format `value` as a double-quoted YAML scalar.
fn quoted_scalar(value: &str) -> String {
    // JSON strings are valid double-quoted YAML scalars.
    serde_json::Value::from(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemorySource;
    use sail_spec::{DefinitionKind, SpecError};

    fn release() -> ReleaseContext {
        ReleaseContext::new("Release-2", "test", "apps")
    }

    #[test]
    fn test_block_scalar() {
        assert_eq!(block_scalar("a=1\n\nb=2\n"), "|\n    a=1\n\n    b=2");
        assert_eq!(block_scalar(""), "|");
    }

    #[test]
    fn test_block_scalar_indented_first_line() {
        assert_eq!(
            block_scalar("    server {}\nlisten 80;\n"),
            "|2\n        server {}\n    listen 80;"
        );
        assert_eq!(block_scalar("\n\tkey=1\n"), "|2\n\n    \tkey=1");
    }

    #[test]
    fn test_quoted_scalar() {
        assert_eq!(quoted_scalar("8080"), "\"8080\"");
        assert_eq!(quoted_scalar("true"), "\"true\"");
        assert_eq!(quoted_scalar(r#"say "hi" \ bye"#), r#""say \"hi\" \\ bye""#);
        assert_eq!(quoted_scalar("a\nb"), "\"a\\nb\"");
    }

    #[test]
    fn test_assemble_busybox() {
        let source = MemorySource::new().with(
            DefinitionKind::Application,
            "busybox",
            r#"
template:
  - name: test
    config:
      cpu: c1
      memory: m1
      replicas: "2"
"#,
        );
        let release = release();
        let assembled = ApplicationAssembler::new(&source, &release)
            .assemble(&ApplicationRequest::new("busybox", "latest"))
            .unwrap();

        let values = assembled.values;
        assert_eq!(values.name, "busybox");
        assert_eq!(values.tag, "latest");
        assert_eq!(values.namespace, "apps");
        assert_eq!(values.release_name, "Release-2");
        assert_eq!(values.replicas, "2");
        assert_eq!(values.limits.cpu, "1");
        assert_eq!(values.limits.memory, "1Gi");
        assert!(values.kind.is_none());
        assert!(values.service.is_none());
        assert!(!values.has_config_maps());
        assert!(assembled.warnings.is_empty());
    }

    #[test]
    fn test_service_copied_only_when_enabled() {
        let source = MemorySource::new()
            .with(
                DefinitionKind::Application,
                "nginx",
                "service:\n  enabled: true\n  port: 8080\n",
            )
            .with(
                DefinitionKind::Application,
                "worker",
                "service:\n  enabled: false\n  port: 8080\n",
            );
        let release = release();
        let assembler = ApplicationAssembler::new(&source, &release);

        let nginx = assembler
            .assemble(&ApplicationRequest::new("nginx", "1.25"))
            .unwrap();
        assert!(nginx.values.service_enabled());
        assert_eq!(nginx.values.container_port, Some(8080));

        let worker = assembler
            .assemble(&ApplicationRequest::new("worker", "1.0"))
            .unwrap();
        assert!(worker.values.service.is_none());
        assert_eq!(worker.values.container_port, None);
    }

    #[test]
    fn test_container_port_falls_back_to_target_port() {
        let source = MemorySource::new()
            .with(
                DefinitionKind::Application,
                "api",
                "service:\n  enabled: true\n  targetPort: 9000\n",
            )
            .with(DefinitionKind::Application, "bare", "service:\n  enabled: true\n");
        let release = release();
        let assembler = ApplicationAssembler::new(&source, &release);

        let api = assembler.assemble(&ApplicationRequest::new("api", "1.0")).unwrap();
        assert_eq!(api.values.container_port, Some(9000));

        let bare = assembler.assemble(&ApplicationRequest::new("bare", "1.0")).unwrap();
        assert!(bare.values.service_enabled());
        assert_eq!(bare.values.container_port, None);
    }

    #[test]
    fn test_config_map_file_indirection() {
        let source = MemorySource::new()
            .with(
                DefinitionKind::Application,
                "eod-job",
                r#"
kind: Job
configMaps:
  - mode: batch
    application.properties: file:/config/application.properties
"#,
            )
            .with(
                DefinitionKind::ConfigFile,
                "config/application.properties",
                "threads=4\nretries=2\n",
            );
        let release = release();
        let values = ApplicationAssembler::new(&source, &release)
            .assemble(&ApplicationRequest::new("eod-job", "latest"))
            .unwrap()
            .values;

        let config = &values.config_maps[0];
        assert_eq!(config["mode"], "\"batch\"");
        assert_eq!(
            config["application.properties"],
            "|\n    threads=4\n    retries=2"
        );
    }

    #[test]
    fn test_missing_config_file_is_fatal() {
        let source = MemorySource::new().with(
            DefinitionKind::Application,
            "eod-job",
            "configMaps:\n  - settings: file:/missing.conf\n",
        );
        let release = release();
        let err = ApplicationAssembler::new(&source, &release)
            .assemble(&ApplicationRequest::new("eod-job", "latest"))
            .unwrap_err();

        match err {
            ResolveError::ConfigFile { key, source, .. } => {
                assert_eq!(key, "settings");
                assert!(matches!(source, SpecError::NotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_mixin_env_overrides_resource_env() {
        let source = MemorySource::new()
            .with(
                DefinitionKind::Application,
                "orders",
                "resources: [redis/test]\nmixins: [base/default]\n",
            )
            .with(
                DefinitionKind::Resource,
                "redis",
                "name: redis\nspec:\n  template:\n    - name: test\n      element:\n        host: redis.test\n",
            )
            .with(
                DefinitionKind::MixinSet,
                "base",
                "name: base\nmixin:\n  - name: default\n    env:\n      REDIS_HOST: localhost\n    entrypoint: [\"/bin/sh\"]\n",
            );
        let release = release();
        let assembled = ApplicationAssembler::new(&source, &release)
            .assemble(&ApplicationRequest::new("orders", "2.0"))
            .unwrap();

        assert_eq!(assembled.values.env_vars["REDIS_HOST"], "localhost");
        assert_eq!(assembled.values.entrypoint, vec!["/bin/sh"]);
        // Only the default-tier warning.
        assert_eq!(assembled.warnings.len(), 1);
    }

    #[test]
    fn test_unknown_environment_aborts() {
        let source = MemorySource::new().with(
            DefinitionKind::Application,
            "busybox",
            "template:\n  - name: prod\n",
        );
        let release = release();
        let err = ApplicationAssembler::new(&source, &release)
            .assemble(&ApplicationRequest::new("busybox", "latest"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnknownEnvironment { .. }));
        assert_eq!(
            err.to_string(),
            "unknown environment test for application busybox"
        );
    }

    #[test]
    fn test_default_tier_warning_names_application() {
        let source = MemorySource::new().with(DefinitionKind::Application, "busybox", "{}\n");
        let release = release();
        let assembled = ApplicationAssembler::new(&source, &release)
            .assemble(&ApplicationRequest::new("busybox", "latest"))
            .unwrap();

        assert_eq!(assembled.warnings.len(), 1);
        assert!(assembled.warnings[0].ends_with("for application busybox"));
    }
}
