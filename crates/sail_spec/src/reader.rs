//! Definition file reading.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DefinitionKind, SpecError, SpecResult};
use crate::models::{
    ApplicationDefinition, InfrastructureDefinition, MixinSetDefinition, ResourceDefinition,
};

/// Source of definitions consumed by the resolvers.
///
/// Every call reads fresh; implementations do not cache.
pub trait DefinitionSource {
    fn application(&self, name: &str) -> SpecResult<ApplicationDefinition>;

    fn resource(&self, name: &str) -> SpecResult<ResourceDefinition>;

    fn infrastructure(&self, name: &str) -> SpecResult<InfrastructureDefinition>;

    fn mixin_set(&self, name: &str) -> SpecResult<MixinSetDefinition>;

    /// Contents of a file referenced from a config map (`file:/<path>`).
    fn config_file(&self, path: &str) -> SpecResult<String>;
}

/// Filesystem-backed definition store.
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    app_dir: PathBuf,
    resource_dir: PathBuf,
}

impl DefinitionStore {
    pub const RESOURCES_DIR: &'static str = "resources";
    pub const INFRASTRUCTURE_DIR: &'static str = "infrastructure";
    pub const MIXINS_DIR: &'static str = "mixins";

    pub fn new(app_dir: impl Into<PathBuf>, resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
            resource_dir: resource_dir.into(),
        }
    }

    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    /// Where a definition of the given kind is expected to live.
    pub fn definition_path(&self, kind: DefinitionKind, name: &str) -> PathBuf {
        let file = format!("{}.yaml", name);
        match kind {
            DefinitionKind::Application => self.app_dir.join(file),
            DefinitionKind::Resource => self.resource_dir.join(Self::RESOURCES_DIR).join(file),
            DefinitionKind::Infrastructure => {
                self.resource_dir.join(Self::INFRASTRUCTURE_DIR).join(file)
            }
            DefinitionKind::MixinSet => self.resource_dir.join(Self::MIXINS_DIR).join(file),
            // Absolute paths replace the app dir on join.
            DefinitionKind::ConfigFile => self.app_dir.join(name),
        }
    }

    /// Names of every application definition directly under the app dir.
    pub fn list_applications(&self) -> SpecResult<Vec<String>> {
        if !self.app_dir.exists() {
            return Err(SpecError::NotFound {
                kind: DefinitionKind::Application,
                name: "*".to_string(),
                path: self.app_dir.clone(),
            });
        }

        let mut names: Vec<String> = WalkDir::new(&self.app_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map_or(false, |ext| ext == "yaml")
            })
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
            })
            .collect();

        names.sort();
        Ok(names)
    }

    fn read(&self, kind: DefinitionKind, name: &str) -> SpecResult<(PathBuf, String)> {
        let path = self.definition_path(kind, name);
        debug!("Reading {} '{}' from {:?}", kind, name, path);

        match fs::read_to_string(&path) {
            Ok(content) => Ok((path, content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(SpecError::NotFound {
                kind,
                name: name.to_string(),
                path,
            }),
            Err(e) => Err(SpecError::Io(e)),
        }
    }

    fn load<T: DeserializeOwned>(&self, kind: DefinitionKind, name: &str) -> SpecResult<T> {
        let (path, content) = self.read(kind, name)?;
        serde_yaml::from_str(&content).map_err(|e| SpecError::InvalidFormat {
            path,
            message: e.to_string(),
        })
    }
}

impl DefinitionSource for DefinitionStore {
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
        self.read(DefinitionKind::ConfigFile, path)
            .map(|(_, content)| content)
    }
}
