//! Operator-facing terminal output

use crate::decision::PackageVersionInfo;
use crate::orchestration::{DocsPlan, ReleasePlan, StepKind};
use crate::security::ExternalCommand;
use crate::version::Version;
use console::style;

/// Enable or disable styling on both output streams
pub fn set_color(enabled: bool) {
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_warning(message: &str) {
    eprintln!("{} {}", style("WARNING:").yellow().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_step(step: StepKind, command: &ExternalCommand, dry_run: bool) {
    if dry_run {
        println!(
            "{} {} {}",
            style(format!("[{}]", step)).cyan(),
            style("(dry-run)").dim(),
            command
        );
    } else {
        println!("{} $ {}", style(format!("[{}]", step)).cyan().bold(), command);
    }
}

pub fn display_skipped(step: StepKind, reason: &str) {
    println!(
        "{} {}",
        style(format!("[{}]", step)).dim(),
        style(format!("skipped: {}", reason)).dim()
    );
}

fn flag(value: bool) -> console::StyledObject<&'static str> {
    if value {
        style("yes").green()
    } else {
        style("no").red()
    }
}

pub fn display_decision(
    package: &str,
    version: &Version,
    history_len: usize,
    info: &PackageVersionInfo,
    plan: &ReleasePlan,
) {
    println!(
        "\n{} {} {}",
        style("Release decision for").bold(),
        style(package).bold(),
        style(version).bold()
    );
    println!("  Published versions:  {}", history_len);
    println!("  Pre-release:         {}", flag(version.is_prerelease()));
    println!("  New version:         {}", flag(info.is_new));
    println!("  Newest version:      {}", flag(info.is_last));
    println!("  Major unstable:      {}", flag(info.is_major_unstable));

    let docs = match &plan.docs {
        DocsPlan::Disabled => "disabled".to_string(),
        DocsPlan::Deploy { alias: None } => format!("deploy {}", version.title()),
        DocsPlan::Deploy { alias: Some(alias) } => {
            format!("deploy {} as '{}'", version.title(), alias)
        }
    };
    println!("  Documentation:       {}\n", docs);
}
