//! # sail_render
//!
//! Manifest selection and rendering for sailgen.
//!
//! Every application gets a service account manifest and exactly one workload
//! manifest (Deployment or Job). A Service manifest is added when the service is
//! enabled and a ConfigMap manifest when the application declares config entries.
//! Files land in `<output_dir>/<app>/<app>-<kind>.yaml`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sail_render::{generate, GeneratorPaths, ReleaseRequest};
//! use sail_resolver::ReleaseContext;
//! use sail_spec::ApplicationRequest;
//!
//! let request = ReleaseRequest::new(
//!     ReleaseContext::new("Release-2", "test", "apps"),
//!     vec![
//!         ApplicationRequest::new("busybox", "latest"),
//!         ApplicationRequest::new("eod-job", "latest"),
//!     ],
//! );
//! let paths = GeneratorPaths::new("apps", "provider", "tmp");
//!
//! let summary = generate(&request, &paths).unwrap();
//! for item in &summary.items {
//!     println!("{} {} {}", item.name, item.kind, item.path.display());
//! }
//! ```

pub mod error;
pub mod generator;
pub mod renderer;
pub mod selector;
pub mod templates;

pub use error::{RenderError, RenderResult};
pub use generator::{generate, CheckedApplication, GeneratorPaths, ManifestGenerator, ReleaseRequest};
pub use renderer::ManifestRenderer;
pub use selector::{required_templates, WorkloadKind};
pub use templates::ManifestTemplate;
