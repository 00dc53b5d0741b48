//! # sail_resolver
//!
//! Turns an application definition into one environment-resolved value set.
//!
//! Resolution runs in a fixed order for every application:
//!
//! 1. **Resource tier**: per-environment cpu/memory tiers and replicas
//! 2. **Environment variables**: attributes of referenced resources and, through
//!    them, infrastructure definitions
//! 3. **Mixins**: shared environment, command and entrypoint overrides
//!
//! Two failure paths are kept apart. Hard failures (malformed references, missing
//! definitions, unknown environments) are returned as [`ResolveError`] and stop the
//! run. Soft failures (a definition without the requested environment or type) are
//! logged, recorded as warnings and contribute nothing.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sail_resolver::{ApplicationAssembler, ReleaseContext};
//! use sail_spec::{ApplicationRequest, DefinitionStore};
//!
//! let store = DefinitionStore::new("apps", "provider");
//! let release = ReleaseContext::new("Release-2", "test", "apps");
//! let assembler = ApplicationAssembler::new(&store, &release);
//!
//! let assembled = assembler
//!     .assemble(&ApplicationRequest::new("busybox", "latest"))
//!     .unwrap();
//! println!("replicas: {}", assembled.values.replicas);
//! ```

pub mod assembler;
pub mod env;
pub mod error;
pub mod mixin;
pub mod outcome;
pub mod tier;
pub mod values;

#[cfg(test)]
pub(crate) mod testing;

pub use assembler::{ApplicationAssembler, AssembledApplication};
pub use env::{env_var_key, EnvVarResolver};
pub use error::{ResolveError, ResolveResult};
pub use mixin::{MixinResolver, MixinValues};
pub use outcome::{Outcome, Resolution};
pub use tier::{resolve_tier, CpuTier, MemoryTier, ResourceTier};
pub use values::{ReleaseContext, RenderedApplication, ResourceLimits};
