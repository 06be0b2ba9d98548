//! Registry history lookup
//!
//! Fetches the release identifiers a package index knows about and turns
//! them into the set of published versions. Identifiers outside the version
//! grammar are dropped; the history is only as complete as the grammar allows.

pub mod pypi;

use crate::core::error::{ReleaseError, Result};
use crate::version::{self, Version};
use async_trait::async_trait;
use log::debug;
use std::collections::BTreeSet;

pub use pypi::PyPiRegistry;

/// Read-only access to a package index
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Registry name (e.g., "pypi")
    fn name(&self) -> &str;

    /// Every release identifier published for `package`, verbatim.
    ///
    /// An unknown package yields an empty list. Transport failures are
    /// reported as `ReleaseError::RegistryUnavailable` and never retried.
    async fn release_identifiers(&self, package: &str) -> Result<Vec<String>>;
}

/// Published history of `package` as parsed versions.
pub async fn fetch_history(
    registry: &dyn RegistryClient,
    package: &str,
) -> Result<BTreeSet<Version>> {
    let identifiers = registry.release_identifiers(package).await?;
    let history = parse_history(identifiers)?;

    debug!(
        "{}: {} published versions of {} within the version grammar",
        registry.name(),
        history.len(),
        package
    );

    Ok(history)
}

/// Parse release identifiers, skipping the ones that are not valid versions.
pub fn parse_history<I, S>(identifiers: I) -> Result<BTreeSet<Version>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut history = BTreeSet::new();

    for identifier in identifiers {
        match version::parse(identifier.as_ref()) {
            Ok(version) => {
                history.insert(version);
            }
            Err(ReleaseError::MalformedVersion { input, reason }) => {
                debug!("skipping published release '{}': {}", input, reason);
            }
            Err(other) => return Err(other),
        }
    }

    Ok(history)
}
