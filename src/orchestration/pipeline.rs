//! End-to-end release flow
//!
//! tag check -> manifest -> registry history -> decision -> plan -> publish

use super::plan::ReleasePlan;
use super::release_publisher::{PublishReport, ReleasePublisher};
use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseError, Result};
use crate::decision::{PackageVersionInfo, decide};
use crate::registry::{RegistryClient, fetch_history};
use crate::security::CommandRunner;
use crate::validation::PackageInfo;
use crate::version::{Version, parse_tag};
use log::info;
use std::collections::BTreeSet;
use std::path::Path;

/// Everything known about a release before any command runs
#[derive(Debug, Clone)]
pub struct PreparedRelease {
    pub package: PackageInfo,
    pub history: BTreeSet<Version>,
    pub info: PackageVersionInfo,
    pub plan: ReleasePlan,
}

impl PreparedRelease {
    /// Refuse to publish a version the registry already has
    pub fn ensure_new(&self) -> Result<()> {
        if self.info.is_new {
            Ok(())
        } else {
            Err(ReleaseError::AlreadyPublished {
                package: self.package.name.clone(),
                version: self.package.version.to_string(),
            })
        }
    }
}

/// The release tag must name exactly the version declared in the manifest.
pub fn check_tag(tag: &str, package: &PackageInfo) -> Result<Version> {
    let tagged = parse_tag(tag)?;
    if tagged != package.version {
        return Err(ReleaseError::VersionMismatch {
            tag: tag.to_string(),
            declared: package.version.to_string(),
        });
    }
    Ok(tagged)
}

/// Look up the published history and derive the decision and plan.
pub async fn prepare_release(
    package: PackageInfo,
    registry: &dyn RegistryClient,
    config: &ReleaseConfig,
) -> Result<PreparedRelease> {
    let history = fetch_history(registry, &package.name).await?;
    let info = decide(&package.version, &history);

    let mut plan = ReleasePlan::from_decision(&package.version, &info, config.latest_alias());
    if !config.docs_enabled() {
        plan = plan.without_docs();
    }

    info!(
        "{} {}: last={} new={} major_unstable={}",
        package.name, package.version, info.is_last, info.is_new, info.is_major_unstable
    );

    Ok(PreparedRelease {
        package,
        history,
        info,
        plan,
    })
}

/// Run the full release for `tag`.
///
/// Fails before any command runs when the tag disagrees with the manifest,
/// the registry is unreachable, or the version is already published.
pub async fn run_release(
    tag: &str,
    package: PackageInfo,
    project_path: &Path,
    config: &ReleaseConfig,
    registry: &dyn RegistryClient,
    runner: &dyn CommandRunner,
    dry_run: bool,
) -> Result<PublishReport> {
    check_tag(tag, &package)?;

    let prepared = prepare_release(package, registry, config).await?;
    prepared.ensure_new()?;

    ReleasePublisher::new(project_path, config, runner).publish(
        &prepared.package,
        &prepared.plan,
        dry_run,
    )
}
