//! Error types for rendering.

use std::path::PathBuf;

use sail_resolver::ResolveError;
use sail_spec::SpecError;
use thiserror::Error;

/// Result type alias for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while selecting or rendering manifests.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("unsupported workload kind '{kind}' for application {app}")]
    UnsupportedKind { app: String, kind: String },

    #[error("Template registration failed: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Template {template} failed to render: {source}")]
    Rendering {
        template: String,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[app]: {app}, [error]: {source}")]
    Application {
        app: String,
        #[source]
        source: Box<RenderError>,
    },
}

impl RenderError {
    /// Attach the application being generated.
    pub fn for_app(self, app: &str) -> Self {
        match self {
            RenderError::Application { .. } => self,
            other => RenderError::Application {
                app: app.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The error underneath any application wrapper.
    pub fn root(&self) -> &RenderError {
        match self {
            RenderError::Application { source, .. } => source.root(),
            other => other,
        }
    }
}
