//! Generate command - Render manifests for a release.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use sail_render::ManifestGenerator;
use sail_spec::DeploymentItemSummary;

use super::{load_settings, release_request, ReleaseArgs};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Directory manifests are written to
    #[arg(short, long, env = "SAILGEN_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: GenerateArgs, config: Option<&Path>, quiet: bool) -> Result<()> {
    let settings = load_settings(config, args.release.overrides(args.output_dir.clone()))?;
    let request = release_request(&args.release, &settings)?;

    info!(
        "Generating release {} into {:?}",
        settings.release.release_name, settings.paths.output_dir
    );

    let generator = ManifestGenerator::from_paths(&settings.paths)
        .context("Failed to initialize the template renderer")?;
    let summary = generator.generate(&request)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", json);
    } else if !quiet {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &DeploymentItemSummary) {
    println!(
        "📦 Release {} ({}) in namespace {}",
        summary.release_name, summary.environment, summary.namespace
    );

    let mut current = None;
    for item in &summary.items {
        if current != Some(item.name.as_str()) {
            println!("   {}", item.name);
            current = Some(item.name.as_str());
        }
        println!("      - {:<15} {}", item.kind, item.path.display());
    }

    for warning in &summary.warnings {
        println!("   ⚠️  {}", warning);
    }

    println!();
    println!("✅ Generated {} manifest(s)", summary.items.len());
}
