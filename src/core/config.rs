//! Configuration structures and types for release-publisher
//!
//! Every field is optional in the file; the accessor methods resolve the
//! effective value with the built-in defaults.

use crate::orchestration::StepKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default project manifest
pub const DEFAULT_MANIFEST: &str = "pyproject.toml";

/// Default directory the build step writes distributions to
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Default license file attached to hosting releases
pub const DEFAULT_LICENSE_FILE: &str = "LICENSE";

/// Default registry request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default documentation alias for the newest stable release
pub const DEFAULT_LATEST_ALIAS: &str = "latest";

/// Root configuration object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReleaseConfig {
    /// Extend from base configuration file (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Project layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectConfig>,

    /// Package index used for history lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistryConfig>,

    /// External commands for each release step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<CommandsConfig>,

    /// Documentation deployment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<DocsConfig>,

    /// Terminal output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

/// Project layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectConfig {
    /// Manifest declaring name and version (default: pyproject.toml)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,

    /// Build output directory (default: dist)
    #[serde(skip_serializing_if = "Option::is_none", rename = "distDir")]
    pub dist_dir: Option<String>,

    /// License file attached to releases (default: LICENSE)
    #[serde(skip_serializing_if = "Option::is_none", rename = "licenseFile")]
    pub license_file: Option<String>,
}

/// Package index configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegistryConfig {
    /// Index base URL (default: https://pypi.org)
    #[serde(skip_serializing_if = "Option::is_none", rename = "indexUrl")]
    pub index_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none", rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

/// External command templates, as argument vectors.
///
/// Step-specific arguments (tag, files, titles) are appended by the publisher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CommandsConfig {
    /// Build command (default: python -m build)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<Vec<String>>,

    /// Hosting release command (default: gh release create)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<Vec<String>>,

    /// Registry publish command (default: twine upload)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish: Option<Vec<String>>,

    /// Documentation deploy command (default: mike deploy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<Vec<String>>,

    /// Steps never run by this project
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<Vec<StepKind>>,
}

/// Documentation deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DocsConfig {
    /// Deploy documentation at all (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Alias pointing at the newest stable release (default: latest)
    #[serde(skip_serializing_if = "Option::is_none", rename = "latestAlias")]
    pub latest_alias: Option<String>,
}

/// Terminal output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    /// Colored output (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

fn argv(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl ReleaseConfig {
    pub fn manifest_path(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.manifest.as_deref())
            .unwrap_or(DEFAULT_MANIFEST)
    }

    pub fn dist_dir(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.dist_dir.as_deref())
            .unwrap_or(DEFAULT_DIST_DIR)
    }

    pub fn license_file(&self) -> &str {
        self.project
            .as_ref()
            .and_then(|p| p.license_file.as_deref())
            .unwrap_or(DEFAULT_LICENSE_FILE)
    }

    pub fn index_url(&self) -> &str {
        self.registry
            .as_ref()
            .and_then(|r| r.index_url.as_deref())
            .unwrap_or(crate::registry::pypi::DEFAULT_INDEX_URL)
    }

    pub fn registry_timeout(&self) -> Duration {
        Duration::from_secs(
            self.registry
                .as_ref()
                .and_then(|r| r.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn build_command(&self) -> Vec<String> {
        self.commands
            .as_ref()
            .and_then(|c| c.build.clone())
            .unwrap_or_else(|| argv(&["python", "-m", "build"]))
    }

    pub fn release_command(&self) -> Vec<String> {
        self.commands
            .as_ref()
            .and_then(|c| c.release.clone())
            .unwrap_or_else(|| argv(&["gh", "release", "create"]))
    }

    pub fn publish_command(&self) -> Vec<String> {
        self.commands
            .as_ref()
            .and_then(|c| c.publish.clone())
            .unwrap_or_else(|| argv(&["twine", "upload"]))
    }

    pub fn docs_command(&self) -> Vec<String> {
        self.commands
            .as_ref()
            .and_then(|c| c.docs.clone())
            .unwrap_or_else(|| argv(&["mike", "deploy"]))
    }

    pub fn is_skipped(&self, step: StepKind) -> bool {
        self.commands
            .as_ref()
            .and_then(|c| c.skip.as_ref())
            .is_some_and(|skip| skip.contains(&step))
    }

    pub fn docs_enabled(&self) -> bool {
        self.docs.as_ref().and_then(|d| d.enabled).unwrap_or(true)
    }

    pub fn latest_alias(&self) -> &str {
        self.docs
            .as_ref()
            .and_then(|d| d.latest_alias.as_deref())
            .unwrap_or(DEFAULT_LATEST_ALIAS)
    }

    pub fn color(&self) -> bool {
        self.output.as_ref().and_then(|o| o.color).unwrap_or(true)
    }
}
