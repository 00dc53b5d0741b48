//! `name/type` references between definitions.

use std::fmt;

use crate::error::{SpecError, SpecResult};

const SEPARATOR: char = '/';

/// What a reference points at. Only used to shape error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Resource,
    Infrastructure,
    Mixin,
}

impl ReferenceKind {
    fn example(&self) -> &'static str {
        match self {
            ReferenceKind::Resource => "cassandra/test1",
            ReferenceKind::Infrastructure => "cassandra-a/test",
            ReferenceKind::Mixin => "java/java-default",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Resource => f.write_str("resource"),
            ReferenceKind::Infrastructure => f.write_str("infrastructure"),
            ReferenceKind::Mixin => f.write_str("mixin"),
        }
    }
}

/// A parsed `name/variant` reference.
///
/// The variant is an environment type for resources and infrastructure and a
/// mixin type for mixin sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub variant: String,
}

impl Reference {
    /// Parse a raw reference. Exactly two non-empty segments are accepted.
    pub fn parse(kind: ReferenceKind, raw: &str) -> SpecResult<Self> {
        let malformed = || SpecError::MalformedReference {
            kind,
            value: raw.to_string(),
            example: kind.example(),
        };

        let (name, variant) = raw.split_once(SEPARATOR).ok_or_else(malformed)?;
        if name.is_empty() || variant.is_empty() || variant.contains(SEPARATOR) {
            return Err(malformed());
        }

        Ok(Self {
            name: name.to_string(),
            variant: variant.to_string(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, SEPARATOR, self.variant)
    }
}
