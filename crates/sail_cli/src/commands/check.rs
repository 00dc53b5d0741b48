//! Check command - Resolve applications without writing manifests.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use sail_render::{CheckedApplication, ManifestGenerator};

use super::{load_settings, release_request, ReleaseArgs};

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Print the resolved values as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: CheckArgs, config: Option<&Path>, quiet: bool) -> Result<()> {
    let settings = load_settings(config, args.release.overrides(None))?;
    let request = release_request(&args.release, &settings)?;

    info!(
        "Checking {} application(s) for environment {}",
        request.apps.len(),
        settings.release.environment
    );

    let generator = ManifestGenerator::from_paths(&settings.paths)
        .context("Failed to initialize the template renderer")?;
    let checked = generator.check(&request)?;

    if args.json {
        let json = serde_json::to_string_pretty(&checked).context("Failed to serialize results")?;
        println!("{}", json);
    } else if !quiet {
        print_results(&checked);
    }

    Ok(())
}

fn print_results(checked: &[CheckedApplication]) {
    let mut warnings = 0;

    for app in checked {
        println!(
            "📋 {}:{} → {}",
            app.values.name,
            app.values.tag,
            app.templates.join(", ")
        );
        println!(
            "   cpu {}, memory {}, replicas {}, {} env var(s)",
            app.values.limits.cpu,
            app.values.limits.memory,
            app.values.replicas,
            app.values.env_vars.len()
        );
        for warning in &app.warnings {
            println!("   ⚠️  {}", warning);
        }
        warnings += app.warnings.len();
    }

    println!();
    if warnings == 0 {
        println!("✅ All applications resolved cleanly");
    } else {
        println!("✅ All applications resolved with {} warning(s)", warnings);
    }
}
