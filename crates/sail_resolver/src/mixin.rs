//! Mixin resolution.

use std::collections::BTreeMap;

use sail_spec::{ApplicationDefinition, DefinitionSource, Reference, ReferenceKind};
use tracing::debug;

use crate::error::ResolveResult;
use crate::outcome::{Outcome, Resolution};

/// What the matching mixins of an application contribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixinValues {
    pub env: BTreeMap<String, String>,
    pub command: Vec<String>,
    pub entrypoint: Vec<String>,
}

impl MixinValues {
    /// Environment accumulates; command and entrypoint are replaced.
    fn apply(&mut self, env: &BTreeMap<String, String>, command: &[String], entrypoint: &[String]) {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.command = command.to_vec();
        self.entrypoint = entrypoint.to_vec();
    }
}

/// Resolves an application's `mixinSet/type` references.
pub struct MixinResolver<'a, S: DefinitionSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: DefinitionSource + ?Sized> MixinResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Apply every mixin reference of `app` in declaration order.
    ///
    /// The last matching mixin decides command and entrypoint outright.
    pub fn resolve(&self, app: &ApplicationDefinition) -> ResolveResult<Resolution<MixinValues>> {
        let mut values = MixinValues::default();
        let mut warnings = Vec::new();

        for raw in &app.mixins {
            let reference = Reference::parse(ReferenceKind::Mixin, raw)?;
            let set = self.source.mixin_set(&reference.name)?;

            let outcome = match set.find_mixin(&reference.variant) {
                Some(mixin) => Outcome::Resolved(mixin),
                None => Outcome::skipped(format!(
                    "could not find matching mixin {} of app {}",
                    reference.variant, app.name
                )),
            };

            if let Some(mixin) = outcome.collect(&mut warnings) {
                debug!("Applying mixin {} to {}", reference, app.name);
                values.apply(&mixin.env, &mixin.cmd, &mixin.entrypoint);
            }
        }

        Ok(Resolution::with_warnings(values, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::testing::{app, MemorySource};
    use sail_spec::{DefinitionKind, SpecError};

    const JAVA: &str = r#"
name: java
mixin:
  - name: java-default
    env:
      JAVA_OPTS: -Xmx512m
      LANG: C.UTF-8
    cmd: ["-jar", "/app/app.jar"]
    entrypoint: ["java"]
  - name: java-debug
    env:
      JAVA_OPTS: -Xmx512m -agentlib:jdwp
"#;

    const OTEL: &str = r#"
name: otel
mixin:
  - name: agent
    env:
      OTEL_SERVICE_NAME: orders
    cmd: ["run"]
"#;

    #[test]
    fn test_single_mixin() {
        let source = MemorySource::new().with(DefinitionKind::MixinSet, "java", JAVA);
        let application = app("name: orders\nmixins: [java/java-default]\n");

        let values = MixinResolver::new(&source).resolve(&application).unwrap().value;
        assert_eq!(values.env["LANG"], "C.UTF-8");
        assert_eq!(values.command, vec!["-jar", "/app/app.jar"]);
        assert_eq!(values.entrypoint, vec!["java"]);
    }

    #[test]
    fn test_replace_command_accumulate_env() {
        let source = MemorySource::new()
            .with(DefinitionKind::MixinSet, "java", JAVA)
            .with(DefinitionKind::MixinSet, "otel", OTEL);
        let application = app("name: orders\nmixins: [java/java-default, otel/agent, java/java-debug]\n");

        let values = MixinResolver::new(&source).resolve(&application).unwrap().value;
        assert_eq!(values.env["LANG"], "C.UTF-8");
        assert_eq!(values.env["OTEL_SERVICE_NAME"], "orders");
        assert_eq!(values.env["JAVA_OPTS"], "-Xmx512m -agentlib:jdwp");
        // java-debug declares neither, and it matched last.
        assert!(values.command.is_empty());
        assert!(values.entrypoint.is_empty());
    }

    #[test]
    fn test_unmatched_type_is_skipped() {
        let source = MemorySource::new().with(DefinitionKind::MixinSet, "java", JAVA);
        let application = app("name: orders\nmixins: [java/java-default, java/graal]\n");

        let resolution = MixinResolver::new(&source).resolve(&application).unwrap();
        assert_eq!(resolution.value.entrypoint, vec!["java"]);
        assert_eq!(resolution.warnings.len(), 1);
        assert!(resolution.warnings[0].contains("graal"));
    }

    #[test]
    fn test_missing_mixin_set_is_fatal() {
        let source = MemorySource::new();
        let application = app("name: orders\nmixins: [python/default]\n");

        let err = MixinResolver::new(&source).resolve(&application).unwrap_err();
        assert!(matches!(err, ResolveError::Spec(SpecError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_mixin_reference() {
        let source = MemorySource::new().with(DefinitionKind::MixinSet, "java", JAVA);
        let application = app("name: orders\nmixins: [java]\n");

        let err = MixinResolver::new(&source).resolve(&application).unwrap_err();
        assert!(err.to_string().contains("java/java-default"));
        assert!(source.lookups.borrow().is_empty());
    }
}
