//! CLI command definitions.
//!
//! Both subcommands share the release selection flags in [`ReleaseArgs`] and
//! merge them over the config file through [`load_settings`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sail_render::ReleaseRequest;
use sail_spec::{ApplicationRequest, DefinitionStore};
use tracing::debug;

use crate::config::{ConfigError, Overrides, SailConfig, Settings};

pub mod check;
pub mod generate;

/// sailgen - Kubernetes manifest generator
#[derive(Parser)]
#[command(name = "sailgen")]
#[command(version, about = "sailgen - Kubernetes manifest generator")]
#[command(long_about = r#"
sailgen renders Kubernetes manifests for a release of applications. Each
application definition is resolved against shared resource, infrastructure
and mixin definitions for one environment, then rendered from fixed templates.

COMMANDS:
  generate  → Render manifests into <output-dir>/<app>/
  check     → Resolve applications and report warnings without writing

CONFIGURATION:
  Flags override values from sailgen.toml (or --config <path>):

    [release]
    name = "Release-2"
    environment = "test"
    namespace = "apps"

    [paths]
    app_dir = "apps"
    resource_dir = "provider"
    output_dir = "out"

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Definition or resolution error
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file (defaults to ./sailgen.toml when present)
    #[arg(short, long, global = true, env = "SAILGEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render manifests for a release
    Generate(generate::GenerateArgs),

    /// Resolve applications without writing manifests
    Check(check::CheckArgs),
}

/// Release and application selection shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Release name
    #[arg(short, long, env = "SAILGEN_RELEASE")]
    pub release: Option<String>,

    /// Target environment (selects per-environment templates)
    #[arg(short, long = "env", env = "SAILGEN_ENV")]
    pub environment: Option<String>,

    /// Kubernetes namespace
    #[arg(short, long, env = "SAILGEN_NAMESPACE")]
    pub namespace: Option<String>,

    /// Application to process as name[:version], repeatable
    #[arg(short, long = "app", value_name = "NAME[:VERSION]")]
    pub apps: Vec<ApplicationRequest>,

    /// Process every application definition in the app directory
    #[arg(long, conflicts_with = "apps")]
    pub all: bool,

    /// Directory holding application definitions
    #[arg(long, env = "SAILGEN_APP_DIR")]
    pub app_dir: Option<PathBuf>,

    /// Directory holding resources/, infrastructure/ and mixins/
    #[arg(long, env = "SAILGEN_RESOURCE_DIR")]
    pub resource_dir: Option<PathBuf>,
}

impl ReleaseArgs {
    pub fn overrides(&self, output_dir: Option<PathBuf>) -> Overrides {
        Overrides {
            release_name: self.release.clone(),
            environment: self.environment.clone(),
            namespace: self.namespace.clone(),
            app_dir: self.app_dir.clone(),
            resource_dir: self.resource_dir.clone(),
            output_dir,
        }
    }
}

/// Merge the config file with the command line.
pub fn load_settings(config: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let file = SailConfig::load(config, &cwd)?;
    let settings = file.merge(overrides)?;
    debug!("Resolved settings: {:?}", settings);
    Ok(settings)
}

/// Build the release request from the selected applications.
pub fn release_request(args: &ReleaseArgs, settings: &Settings) -> Result<ReleaseRequest> {
    let apps = if args.all {
        let store = DefinitionStore::new(&settings.paths.app_dir, &settings.paths.resource_dir);
        store
            .list_applications()
            .context("Failed to list application definitions")?
            .into_iter()
            .map(|name| ApplicationRequest::new(name, "latest"))
            .collect()
    } else {
        args.apps.clone()
    };

    if apps.is_empty() {
        return Err(ConfigError::NoApplications.into());
    }

    Ok(ReleaseRequest::new(settings.release.clone(), apps))
}
