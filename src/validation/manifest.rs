//! Project metadata - reads the package name and declared version
//!
//! Supports PEP 621 `[project]` tables and the older `[tool.poetry]` layout.
//!
//! # Example
//!
//! ```no_run
//! use release_publisher::validation::manifest::read_package_info;
//! use std::path::Path;
//!
//! # async fn example() -> release_publisher::Result<()> {
//! let package = read_package_info(Path::new("pyproject.toml")).await?;
//! println!("{} {}", package.name, package.version);
//! # Ok(())
//! # }
//! ```

use crate::core::error::{ReleaseError, Result};
use crate::version::{self, Version};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// Name and declared version of the package being released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Version,
}

#[derive(Debug, Deserialize)]
struct PyProject {
    project: Option<ProjectTable>,
    tool: Option<ToolTable>,
}

#[derive(Debug, Deserialize)]
struct ToolTable {
    poetry: Option<ProjectTable>,
}

#[derive(Debug, Deserialize)]
struct ProjectTable {
    name: Option<String>,
    version: Option<String>,
}

/// Read `{name, version}` from a pyproject.toml file
pub async fn read_package_info(path: &Path) -> Result<PackageInfo> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ReleaseError::Manifest(format!("Failed to read {}: {}", path.display(), e)))?;

    parse_package_info(&content)
        .map_err(|e| match e {
            ReleaseError::Manifest(message) => {
                ReleaseError::Manifest(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
}

/// Parse `{name, version}` from pyproject.toml content.
///
/// The declared version goes through the strict version parser, so a
/// malformed version surfaces as `ReleaseError::MalformedVersion`.
pub fn parse_package_info(content: &str) -> Result<PackageInfo> {
    let parsed: PyProject = toml::from_str(content)
        .map_err(|e| ReleaseError::Manifest(format!("Invalid TOML: {}", e)))?;

    // `[project]` when present, otherwise `[tool.poetry]`; both fields come
    // from the same table.
    let (section, table) = match (parsed.project, parsed.tool.and_then(|tool| tool.poetry)) {
        (Some(project), _) => ("project", project),
        (None, Some(poetry)) => ("tool.poetry", poetry),
        (None, None) => {
            return Err(ReleaseError::Manifest(
                "Missing [project] or [tool.poetry] table".to_string(),
            ));
        }
    };

    let name = table.name.ok_or_else(|| {
        ReleaseError::Manifest(format!("Missing required field: {}.name", section))
    })?;

    let raw_version = table.version.ok_or_else(|| {
        ReleaseError::Manifest(format!("Missing required field: {}.version", section))
    })?;

    Ok(PackageInfo {
        name,
        version: version::parse(&raw_version)?,
    })
}
