//! In-memory definitions for resolver tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use sail_spec::{
    ApplicationDefinition, DefinitionKind, DefinitionSource, InfrastructureDefinition,
    MixinSetDefinition, ResourceDefinition, SpecError, SpecResult,
};
use serde::de::DeserializeOwned;

/// Definitions keyed by kind and name, with a log of every lookup.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<(DefinitionKind, String), String>,
    pub lookups: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: DefinitionKind, name: &str, yaml: &str) -> Self {
        self.files.insert((kind, name.to_string()), yaml.to_string());
        self
    }

    fn get(&self, kind: DefinitionKind, name: &str) -> SpecResult<&String> {
        self.lookups.borrow_mut().push(format!("{}:{}", kind, name));
        self.files
            .get(&(kind, name.to_string()))
            .ok_or_else(|| SpecError::NotFound {
                kind,
                name: name.to_string(),
                path: PathBuf::from(format!("memory/{}", name)),
            })
    }

    fn load<T: DeserializeOwned>(&self, kind: DefinitionKind, name: &str) -> SpecResult<T> {
        let yaml = self.get(kind, name)?;
        serde_yaml::from_str(yaml).map_err(|e| SpecError::InvalidFormat {
            path: PathBuf::from(format!("memory/{}", name)),
            message: e.to_string(),
        })
    }
}

impl DefinitionSource for MemorySource {
    fn application(&self, name: &str) -> SpecResult<ApplicationDefinition> {
        let mut app: ApplicationDefinition = self.load(DefinitionKind::Application, name)?;
        if app.name.is_empty() {
            app.name = name.to_string();
        }
        Ok(app)
    }

    fn resource(&self, name: &str) -> SpecResult<ResourceDefinition> {
        self.load(DefinitionKind::Resource, name)
    }

    fn infrastructure(&self, name: &str) -> SpecResult<InfrastructureDefinition> {
        self.load(DefinitionKind::Infrastructure, name)
    }

    fn mixin_set(&self, name: &str) -> SpecResult<MixinSetDefinition> {
        self.load(DefinitionKind::MixinSet, name)
    }

    fn config_file(&self, path: &str) -> SpecResult<String> {
        self.get(DefinitionKind::ConfigFile, path).cloned()
    }
}

/// Parse an application definition from YAML.
pub fn app(yaml: &str) -> ApplicationDefinition {
    serde_yaml::from_str(yaml).unwrap()
}
