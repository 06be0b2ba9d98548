//! PyPI registry client using the JSON API

use super::RegistryClient;
use crate::core::error::{ReleaseError, Result};
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Public PyPI index
pub const DEFAULT_INDEX_URL: &str = "https://pypi.org";

lazy_static! {
    /// Separator runs collapsed by PEP 503 name normalization
    static ref NAME_SEPARATORS: Regex = Regex::new(r"[-_.]+").expect("separator pattern is valid");
}

/// PEP 503 normalized project name (`Config_Man` -> `config-man`)
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS.replace_all(name, "-").to_lowercase()
}

/// Project document returned by `GET /pypi/<name>/json`
#[derive(Debug, Deserialize)]
struct PyPiProject {
    #[serde(default)]
    releases: HashMap<String, serde_json::Value>,
}

/// PyPI registry client
pub struct PyPiRegistry {
    client: reqwest::Client,
    index_url: String,
}

impl PyPiRegistry {
    /// Create a client for the index at `index_url`
    pub fn new(index_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("release-publisher/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, index_url))
    }

    /// Create a client around an already configured HTTP client
    pub fn with_client(client: reqwest::Client, index_url: impl Into<String>) -> Self {
        Self {
            client,
            index_url: index_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn project_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.index_url, normalize_name(package))
    }
}

#[async_trait]
impl RegistryClient for PyPiRegistry {
    fn name(&self) -> &str {
        "pypi"
    }

    async fn release_identifiers(&self, package: &str) -> Result<Vec<String>> {
        let url = self.project_url(package);
        debug!("GET {}", url);

        let unavailable = |message: String| ReleaseError::RegistryUnavailable {
            package: package.to_string(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} has never been published", package);
            return Ok(Vec::new());
        }

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        let project = response
            .json::<PyPiProject>()
            .await
            .map_err(|e| unavailable(format!("invalid response body: {}", e)))?;

        Ok(project.releases.into_keys().collect())
    }
}
