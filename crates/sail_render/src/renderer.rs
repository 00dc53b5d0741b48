//! Manifest rendering.

use std::fs;
use std::path::Path;

use handlebars::{handlebars_helper, Handlebars};
use sail_resolver::RenderedApplication;
use sail_spec::DeploymentItem;
use tracing::debug;

use crate::error::{RenderError, RenderResult};
use crate::selector::required_templates;
use crate::templates::ManifestTemplate;

/// Renders manifest templates for resolved applications.
pub struct ManifestRenderer {
    handlebars: Handlebars<'static>,
}

impl ManifestRenderer {
    /// Create a renderer with every manifest template registered.
    pub fn new() -> RenderResult<Self> {
        let mut handlebars = Handlebars::new();
        // Manifests are YAML, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("uppercase", Box::new(uppercase));
        handlebars.register_helper("lowercase", Box::new(lowercase));

        for template in ManifestTemplate::all() {
            handlebars.register_template_string(template.name(), template.body())?;
        }

        Ok(Self { handlebars })
    }

    /// Render one template against `app`.
    pub fn render(&self, template: ManifestTemplate, app: &RenderedApplication) -> RenderResult<String> {
        self.handlebars
            .render(template.name(), app)
            .map_err(|source| RenderError::Rendering {
                template: template.name().to_string(),
                source,
            })
    }

    /// Render every template `app` requires into `dir`.
    ///
    /// `dir` is created if missing; existing files are overwritten.
    pub fn render_to_dir(
        &self,
        app: &RenderedApplication,
        dir: &Path,
    ) -> RenderResult<Vec<DeploymentItem>> {
        let templates = required_templates(app)?;

        fs::create_dir_all(dir).map_err(|source| RenderError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut items = Vec::with_capacity(templates.len());
        for template in templates {
            let content = self.render(template, app)?;
            let path = dir.join(template.file_name(&app.name));
            fs::write(&path, content).map_err(|source| RenderError::Write {
                path: path.clone(),
                source,
            })?;
            debug!("Rendered {} to {:?}", template, path);

            items.push(DeploymentItem {
                name: app.name.clone(),
                kind: template.kind().to_string(),
                path,
            });
        }

        Ok(items)
    }
}

// Case helpers for object names and env var keys.
handlebars_helper!(uppercase: |value: str| value.to_uppercase());
handlebars_helper!(lowercase: |value: str| value.to_lowercase());
