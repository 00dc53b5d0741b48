//! # sail_spec
//!
//! Definition model and definition store for sailgen.
//!
//! Applications are declared in small YAML files and refer to shared
//! definitions by `name/type` references:
//!
//! - **Resources**: environment-parameterized attribute bundles (e.g. a datastore's
//!   connection facts), optionally pointing at an infrastructure definition
//! - **Infrastructure**: attribute bundles reached transitively through a resource
//! - **Mixin sets**: typed bundles of command, entrypoint and environment overrides
//!
//! ## Layout
//!
//! ```text
//! <app_dir>/<name>.yaml
//! <resource_dir>/resources/<name>.yaml
//! <resource_dir>/infrastructure/<name>.yaml
//! <resource_dir>/mixins/<name>.yaml
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use sail_spec::{DefinitionSource, DefinitionStore, Reference, ReferenceKind};
//!
//! let store = DefinitionStore::new("apps", "provider");
//! let app = store.application("busybox").unwrap();
//!
//! for raw in &app.resources {
//!     let reference = Reference::parse(ReferenceKind::Resource, raw).unwrap();
//!     let resource = store.resource(&reference.name).unwrap();
//!     println!("{} has {} templates", resource.name, resource.spec.template.len());
//! }
//! ```

pub mod error;
pub mod models;
pub mod reader;
pub mod reference;

pub use error::{DefinitionKind, SpecError, SpecResult};
pub use models::*;
pub use reader::{DefinitionSource, DefinitionStore};
pub use reference::{Reference, ReferenceKind};
