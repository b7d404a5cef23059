use anyhow::Result;
use clap::Parser;

use bump_deploy::config;
use bump_deploy::deploy::Orchestrator;
use bump_deploy::manifest::JsonManifestStore;
use bump_deploy::reconciler;
use bump_deploy::runner::ShellRunner;
use bump_deploy::ui;
use bump_deploy::version::BumpKind;

#[derive(clap::Parser)]
#[command(
    name = "bump-deploy",
    about = "Bump manifest versions, commit the change, and deploy a release branch"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, help = "Custom configuration file path", global = true)]
    config: Option<String>,

    #[arg(
        long,
        help = "Log commands and writes without performing them",
        global = true
    )]
    dry_run: bool,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Bump versions, commit, push, and publish the deploy branch
    Deploy {
        #[arg(help = "Versioning mode: major, minor, patch, or prerelease")]
        mode: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let Command::Deploy { mode } = args.command;

    // Fatal validation happens before any manifest is touched or command runs.
    let kind = match mode.parse::<BumpKind>() {
        Ok(kind) => kind,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    if args.dry_run {
        ui::display_status("Dry run: nothing will be written or executed");
    }

    let mut store = JsonManifestStore::new(args.dry_run);
    let outcome = match reconciler::reconcile(&config.filepaths, config.sync_versions, kind, &mut store)
    {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let runner = ShellRunner::new(args.dry_run);
    let orchestrator = Orchestrator::new(&config, &runner);
    let result = orchestrator.run(&outcome.units);

    if !result.success() {
        ui::display_error("There were errors.");
        std::process::exit(1);
    }

    let versions: Vec<&str> = outcome
        .units
        .iter()
        .map(|u| u.resolved_version.as_str())
        .collect();
    ui::display_success(&format!(
        "Bumped {} {} to {}",
        outcome.manifests.len(),
        if outcome.manifests.len() == 1 {
            "manifest"
        } else {
            "manifests"
        },
        versions.join(", ")
    ));

    Ok(())
}
