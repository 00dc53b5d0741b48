//! Soft resolution outcomes.

use tracing::warn;

/// Result of one resolution step that is allowed to come up empty.
///
/// A `Skipped` step contributes nothing and does not stop the run; hard
/// failures travel separately as [`crate::ResolveError`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Resolved(T),
    Skipped(String),
}

impl<T> Outcome<T> {
    /// Build a skipped outcome, logging the reason as a warning.
    pub fn skipped(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!("{}", reason);
        Outcome::Skipped(reason)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }

    /// Take the value, moving a skip reason into `warnings`.
    pub fn collect(self, warnings: &mut Vec<String>) -> Option<T> {
        match self {
            Outcome::Resolved(value) => Some(value),
            Outcome::Skipped(reason) => {
                warnings.push(reason);
                None
            }
        }
    }
}

/// A resolved value together with the warnings raised while producing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

impl<T> Resolution<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<String>) -> Self {
        Self { value, warnings }
    }
}
