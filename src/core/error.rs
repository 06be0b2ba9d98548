//! Error handling for release publishing
//!
//! Every fatal condition of a release run maps to one variant here, with a
//! stable error code and recovery guidance for the operator.

use thiserror::Error;

/// Main error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    // Input errors
    #[error("malformed version '{input}': {reason}")]
    MalformedVersion { input: String, reason: String },

    #[error("tag {tag} does not match the declared version {declared}")]
    VersionMismatch { tag: String, declared: String },

    // Decision errors
    #[error("{package} {version} is already published")]
    AlreadyPublished { package: String, version: String },

    // Network errors
    #[error("registry unavailable while looking up {package}: {message}")]
    RegistryUnavailable { package: String, message: String },

    // Command execution errors
    #[error("step '{step}' failed: {message}")]
    ExternalStepFailure { step: String, message: String },

    // Ambient errors
    #[error("configuration error: {0}")]
    Config(String),

    #[error("project metadata error: {0}")]
    Manifest(String),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    pub(crate) fn malformed(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedVersion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error can be fixed by the operator and the run retried.
    ///
    /// A failed external step is the one state that may leave a partial
    /// release behind (e.g. published to the registry but docs not deployed),
    /// so it needs manual follow-up instead of a plain rerun.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ExternalStepFailure { .. })
    }

    /// Get suggested actions for this error
    pub fn suggested_actions(&self) -> Vec<&'static str> {
        match self {
            Self::MalformedVersion { .. } => vec![
                "Use the form MAJOR.MINOR.PATCH with an optional aN, bN or rcN suffix",
                "Tags must carry a leading 'v' (e.g. v1.2.0rc1)",
            ],
            Self::VersionMismatch { .. } => vec![
                "Update the version in pyproject.toml to match the tag",
                "Or delete the tag and re-tag the correct commit",
            ],
            Self::AlreadyPublished { .. } => {
                vec!["Bump the version before tagging a new release"]
            }
            Self::RegistryUnavailable { .. } => vec![
                "Check network access to the package index",
                "Re-run the release once the index is reachable",
            ],
            Self::ExternalStepFailure { .. } => vec![
                "Inspect the command output above",
                "Steps completed before the failure were not rolled back; finish them manually",
            ],
            Self::Config(_) => vec!["Check .release-publisher.yaml and RELEASE_* variables"],
            Self::Manifest(_) => {
                vec!["Make sure pyproject.toml declares a project name and version"]
            }
        }
    }

    /// Get error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedVersion { .. } => "MALFORMED_VERSION",
            Self::VersionMismatch { .. } => "VERSION_MISMATCH",
            Self::AlreadyPublished { .. } => "ALREADY_PUBLISHED",
            Self::RegistryUnavailable { .. } => "REGISTRY_UNAVAILABLE",
            Self::ExternalStepFailure { .. } => "EXTERNAL_STEP_FAILURE",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Manifest(_) => "MANIFEST_ERROR",
        }
    }
}
