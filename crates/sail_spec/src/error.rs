//! Error types for the definition store.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::reference::ReferenceKind;

/// Result type alias for definition operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// The kind of file a definition lookup was after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Application,
    Resource,
    Infrastructure,
    MixinSet,
    ConfigFile,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DefinitionKind::Application => "application",
            DefinitionKind::Resource => "resource",
            DefinitionKind::Infrastructure => "infrastructure",
            DefinitionKind::MixinSet => "mixin set",
            DefinitionKind::ConfigFile => "config file",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while reading definitions.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("{kind} '{name}' not found at {path}")]
    NotFound {
        kind: DefinitionKind,
        name: String,
        path: PathBuf,
    },

    #[error("{kind} reference '{value}' must have the form name/type, eg: {example}")]
    MalformedReference {
        kind: ReferenceKind,
        value: String,
        example: &'static str,
    },

    #[error("Invalid definition format in file {path}: {message}")]
    InvalidFormat { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    /// Whether this error reports a missing definition file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SpecError::NotFound { .. })
    }
}
