//! Layered run configuration.
//!
//! Values come from an optional `sailgen.toml` and are overridden by
//! command-line flags (or their `SAILGEN_*` environment variables).

use std::fs;
use std::path::{Path, PathBuf};

use sail_render::GeneratorPaths;
use sail_resolver::ReleaseContext;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sailgen.toml";

pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_APP_DIR: &str = "apps";
pub const DEFAULT_RESOURCE_DIR: &str = "provider";
pub const DEFAULT_OUTPUT_DIR: &str = "out";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing required argument {flag} (or {key} in the config file)")]
    Missing {
        flag: &'static str,
        key: &'static str,
    },

    #[error("no applications given, use --app <name[:version]> or --all")]
    NoApplications,
}

/// `[release]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseSection {
    pub name: Option<String>,
    pub environment: Option<String>,
    pub namespace: Option<String>,
}

/// `[paths]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub app_dir: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Contents of a `sailgen.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SailConfig {
    pub release: ReleaseSection,
    pub paths: PathsSection,
}

/// Values given on the command line. `None` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub release_name: Option<String>,
    pub environment: Option<String>,
    pub namespace: Option<String>,
    pub app_dir: Option<PathBuf>,
    pub resource_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub release: ReleaseContext,
    pub paths: GeneratorPaths,
}

impl SailConfig {
    /// Load `explicit` if given, else `sailgen.toml` from `cwd` if present.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = cwd.join(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config from {:?}", path);
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge command-line overrides over the file values and apply defaults.
    pub fn merge(self, overrides: Overrides) -> Result<Settings, ConfigError> {
        let release_name = overrides
            .release_name
            .or(self.release.name)
            .ok_or(ConfigError::Missing {
                flag: "--release",
                key: "release.name",
            })?;
        let environment = overrides
            .environment
            .or(self.release.environment)
            .ok_or(ConfigError::Missing {
                flag: "--env",
                key: "release.environment",
            })?;
        let namespace = overrides
            .namespace
            .or(self.release.namespace)
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let paths = GeneratorPaths::new(
            overrides
                .app_dir
                .or(self.paths.app_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_APP_DIR)),
            overrides
                .resource_dir
                .or(self.paths.resource_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCE_DIR)),
            overrides
                .output_dir
                .or(self.paths.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        );

        Ok(Settings {
            release: ReleaseContext::new(release_name, environment, namespace),
            paths,
        })
    }
}
