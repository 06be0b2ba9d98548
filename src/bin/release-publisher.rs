//! Release Publisher CLI
//!
//! Versioned release assistant for Python packages

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{LevelFilter, debug};
use release_publisher::core::config::OutputConfig;
use release_publisher::{
    ConfigLoadOptions, ConfigLoader, PreparedRelease, PublishReport, PyPiRegistry,
    ReleaseConfig, ReleaseError, SafeCommandExecutor, check_tag, prepare_release,
    read_package_info, run_release, ui, version,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process;

/// Versioned release assistant for Python packages
#[derive(Parser)]
#[command(name = "release-publisher")]
#[command(version)]
#[command(about = "Versioned release assistant for Python packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project path (defaults to current directory)
    #[arg(long, global = true, value_name = "DIR")]
    project: Option<PathBuf>,

    /// Configuration file (defaults to <project>/.release-publisher.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, release, upload and document the tagged version
    Publish {
        /// Release tag, e.g. v1.2.0
        #[arg(long)]
        tag: String,
    },

    /// Show the release decision for the tagged version without publishing
    Plan {
        /// Release tag, e.g. v1.2.0
        #[arg(long)]
        tag: String,
    },

    /// Validate version strings
    CheckVersion {
        /// Versions to check, e.g. 1.2.0 2.0.0rc1
        #[arg(value_name = "VERSION", required = true)]
        versions: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            if let Some(release_error) = e.downcast_ref::<ReleaseError>() {
                for action in release_error.suggested_actions() {
                    eprintln!("  - {}", action);
                }
            }
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        ui::set_color(false);
    }

    match &cli.command {
        Commands::CheckVersion { versions } => Ok(check_version_command(versions)),
        Commands::Plan { tag } => {
            let project = cli.project.clone().unwrap_or_else(|| PathBuf::from("."));
            let config = load_config(&project, &cli).await?;
            plan_command(&project, &config, tag).await
        }
        Commands::Publish { tag } => {
            let project = cli.project.clone().unwrap_or_else(|| PathBuf::from("."));
            let config = load_config(&project, &cli).await?;
            publish_command(&project, &config, tag, cli.dry_run).await
        }
    }
}

/// Level forced on the logger; `None` leaves `RUST_LOG` in charge
fn log_level(verbose: bool, rust_log_set: bool) -> Option<LevelFilter> {
    if verbose {
        Some(LevelFilter::Debug)
    } else if rust_log_set {
        None
    } else {
        Some(LevelFilter::Info)
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(level) = log_level(verbose, std::env::var_os("RUST_LOG").is_some()) {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).init();
}

async fn load_config(project: &Path, cli: &Cli) -> Result<ReleaseConfig> {
    let cli_args = cli.no_color.then(|| ReleaseConfig {
        output: Some(OutputConfig { color: Some(false) }),
        ..Default::default()
    });

    let config = ConfigLoader::load(ConfigLoadOptions {
        project_path: project.to_path_buf(),
        config_file: cli.config.clone(),
        cli_args,
        env: std::env::vars().collect::<HashMap<_, _>>(),
        skip_global: false,
    })
    .await?;

    ui::set_color(config.color());
    debug!("effective configuration: {:?}", config);
    Ok(config)
}

fn check_version_command(versions: &[String]) -> i32 {
    let mut exit_code = 0;

    for raw in versions {
        match version::parse(raw) {
            Ok(parsed) => println!(
                "{}  title={}  pre-release={}",
                parsed,
                parsed.title(),
                parsed.is_prerelease()
            ),
            Err(e) => {
                ui::display_error(&e.to_string());
                exit_code = 1;
            }
        }
    }

    exit_code
}

async fn prepare(project: &Path, config: &ReleaseConfig, tag: &str) -> Result<PreparedRelease> {
    let manifest = project.join(config.manifest_path());
    let package = read_package_info(&manifest).await?;
    check_tag(tag, &package)?;

    let registry = PyPiRegistry::new(config.index_url(), config.registry_timeout())?;
    let prepared = prepare_release(package, &registry, config).await?;
    Ok(prepared)
}

async fn plan_command(project: &Path, config: &ReleaseConfig, tag: &str) -> Result<i32> {
    let prepared = prepare(project, config, tag).await?;

    ui::display_decision(
        &prepared.package.name,
        &prepared.package.version,
        prepared.history.len(),
        &prepared.info,
        &prepared.plan,
    );

    if !prepared.info.is_new {
        ui::display_warning(&format!(
            "{} {} is already published; publish would refuse it",
            prepared.package.name, prepared.package.version
        ));
    }

    Ok(0)
}

async fn publish_command(
    project: &Path,
    config: &ReleaseConfig,
    tag: &str,
    dry_run: bool,
) -> Result<i32> {
    let manifest = project.join(config.manifest_path());
    let package = read_package_info(&manifest)
        .await
        .with_context(|| format!("reading {}", manifest.display()))?;

    ui::display_status(&format!(
        "Releasing {} {}{}",
        package.name,
        package.version,
        if dry_run { " (dry run)" } else { "" }
    ));

    let registry = PyPiRegistry::new(config.index_url(), config.registry_timeout())?;
    let executor = SafeCommandExecutor::new(project)?;

    let report = run_release(
        tag, package, project, config, &registry, &executor, dry_run,
    )
    .await?;

    display_report(&report);
    Ok(0)
}

fn display_report(report: &PublishReport) {
    let elapsed = report.finished_at - report.started_at;

    if report.dry_run {
        ui::display_success(&format!(
            "Dry run of {} {} complete: {} step(s) would run",
            report.package,
            report.version,
            report.steps.len()
        ));
    } else {
        ui::display_success(&format!(
            "Released {} {} ({} step(s), {:.1}s)",
            report.package,
            report.version,
            report.steps.len(),
            elapsed.num_milliseconds() as f64 / 1000.0
        ));
    }

    if !report.skipped.is_empty() {
        let skipped: Vec<String> = report.skipped.iter().map(ToString::to_string).collect();
        println!("  Skipped: {}", skipped.join(", "));
    }
}
