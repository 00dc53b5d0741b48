//! Environment variables sourced from resource and infrastructure definitions.

use std::collections::BTreeMap;

use sail_spec::{
    ApplicationDefinition, DefinitionSource, Reference, ReferenceKind, ResourceDefinition,
    ResourceTemplate,
};
use tracing::debug;

use crate::error::ResolveResult;
use crate::outcome::{Outcome, Resolution};

/// Environment variable name for `attribute` of resource `resource_name`.
///
/// Hyphens in the resource name become underscores and the result is upper-cased,
/// so `elasticsearch-user` + `host` gives `ELASTICSEARCH_USER_HOST`.
pub fn env_var_key(resource_name: &str, attribute: &str) -> String {
    format!("{}_{}", resource_name.replace('-', "_"), attribute).to_uppercase()
}

fn insert_prefixed(
    env_vars: &mut BTreeMap<String, String>,
    resource_name: &str,
    attributes: &BTreeMap<String, String>,
) {
    for (key, value) in attributes {
        env_vars.insert(env_var_key(resource_name, key), value.clone());
    }
}

/// Resolves an application's `resource/envType` references into environment variables.
pub struct EnvVarResolver<'a, S: DefinitionSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: DefinitionSource + ?Sized> EnvVarResolver<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Flatten every resource reference of `app` into one mapping.
    ///
    /// References are applied in declaration order, so later ones win on key
    /// collisions.
    pub fn resolve(
        &self,
        app: &ApplicationDefinition,
    ) -> ResolveResult<Resolution<BTreeMap<String, String>>> {
        let mut env_vars = BTreeMap::new();
        let mut warnings = Vec::new();

        for raw in &app.resources {
            let reference = Reference::parse(ReferenceKind::Resource, raw)?;
            let resource = self.source.resource(&reference.name)?;

            let Some(template) =
                matching_template(&app.name, &resource, &reference).collect(&mut warnings)
            else {
                continue;
            };
            debug!("Resolved resource {} for {}", reference, app.name);
            insert_prefixed(&mut env_vars, &reference.name, &template.element);

            if let Some(infra) = template.infra.as_deref().filter(|i| !i.is_empty()) {
                let outcome = self.infrastructure_attributes(&reference, infra)?;
                if let Some(attributes) = outcome.collect(&mut warnings) {
                    // Infrastructure attributes carry the resource's prefix.
                    insert_prefixed(&mut env_vars, &reference.name, &attributes);
                }
            }
        }

        Ok(Resolution::with_warnings(env_vars, warnings))
    }

    /// Attributes of the infrastructure a resource template points at.
    ///
    /// A malformed reference is fatal. An infrastructure definition that cannot be
    /// loaded, or has no template for the requested environment, is skipped.
    fn infrastructure_attributes(
        &self,
        resource: &Reference,
        raw: &str,
    ) -> ResolveResult<Outcome<BTreeMap<String, String>>> {
        let infra = Reference::parse(ReferenceKind::Infrastructure, raw)?;

        let definition = match self.source.infrastructure(&infra.name) {
            Ok(definition) => definition,
            Err(e) => {
                return Ok(Outcome::skipped(format!(
                    "could not load infrastructure {} of resource {}: {}",
                    infra.name, resource.name, e
                )))
            }
        };

        Ok(match definition.find_template(&infra.variant) {
            Some(template) => Outcome::Resolved(template.attributes.clone()),
            None => Outcome::skipped(format!(
                "could not find matching infra for env type {} of {}",
                infra.variant, raw
            )),
        })
    }
}

fn matching_template<'r>(
    app_name: &str,
    resource: &'r ResourceDefinition,
    reference: &Reference,
) -> Outcome<&'r ResourceTemplate> {
    match resource.find_template(&reference.variant) {
        Some(template) => Outcome::Resolved(template),
        None => Outcome::skipped(format!(
            "could not find matching env type {} of resource {} for app {}",
            reference.variant, reference.name, app_name
        )),
    }
}
