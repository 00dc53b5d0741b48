//! Error types for resolution.

use sail_spec::SpecError;
use thiserror::Error;

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Hard resolution failures. Any of these aborts generation.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("unknown environment {environment} for application {app}")]
    UnknownEnvironment { app: String, environment: String },

    #[error("config map entry '{key}' of application {app} could not be read: {source}")]
    ConfigFile {
        app: String,
        key: String,
        #[source]
        source: SpecError,
    },
}
