//! Release plan - what the publisher does for a given decision

use crate::decision::PackageVersionInfo;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four release steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    Build,
    HostRelease,
    RegistryPublish,
    DocsDeploy,
}

impl StepKind {
    pub const ALL: [StepKind; 4] = [
        StepKind::Build,
        StepKind::HostRelease,
        StepKind::RegistryPublish,
        StepKind::DocsDeploy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Build => "build",
            StepKind::HostRelease => "host-release",
            StepKind::RegistryPublish => "registry-publish",
            StepKind::DocsDeploy => "docs-deploy",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documentation handling for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocsPlan {
    Disabled,
    Deploy { alias: Option<String> },
}

/// Publish plan derived from a release decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub docs: DocsPlan,
}

impl ReleasePlan {
    /// Map a decision onto a plan.
    ///
    /// | pre-release | last | major unstable | docs            |
    /// |-------------|------|----------------|-----------------|
    /// | yes         | yes  | yes            | deploy          |
    /// | yes         | otherwise             | disabled        |
    /// | no          | yes  | -              | deploy + alias  |
    /// | no          | no   | -              | deploy          |
    pub fn from_decision(
        version: &Version,
        info: &PackageVersionInfo,
        latest_alias: &str,
    ) -> Self {
        let docs = if version.is_prerelease() {
            if info.is_last && info.is_major_unstable {
                DocsPlan::Deploy { alias: None }
            } else {
                DocsPlan::Disabled
            }
        } else if info.is_last {
            DocsPlan::Deploy {
                alias: Some(latest_alias.to_string()),
            }
        } else {
            DocsPlan::Deploy { alias: None }
        };

        ReleasePlan { docs }
    }

    /// Same plan with documentation deployment turned off
    pub fn without_docs(self) -> Self {
        ReleasePlan {
            docs: DocsPlan::Disabled,
        }
    }

    pub fn deploys_docs(&self) -> bool {
        matches!(self.docs, DocsPlan::Deploy { .. })
    }

    pub fn alias(&self) -> Option<&str> {
        match &self.docs {
            DocsPlan::Deploy { alias } => alias.as_deref(),
            DocsPlan::Disabled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::parse;

    fn info(is_last: bool, is_major_unstable: bool) -> PackageVersionInfo {
        PackageVersionInfo {
            is_last,
            is_new: true,
            is_major_unstable,
        }
    }

    fn plan(raw: &str, is_last: bool, is_major_unstable: bool) -> ReleasePlan {
        ReleasePlan::from_decision(&parse(raw).unwrap(), &info(is_last, is_major_unstable), "latest")
    }

    #[test]
    fn test_prerelease_of_unstable_major_deploys_docs_without_alias() {
        let plan = plan("2.0.0a1", true, true);
        assert_eq!(plan.docs, DocsPlan::Deploy { alias: None });
    }

    #[test]
    fn test_other_prereleases_skip_docs() {
        assert_eq!(plan("2.0.0b1", true, false).docs, DocsPlan::Disabled);
        assert_eq!(plan("2.0.0b1", false, true).docs, DocsPlan::Disabled);
        assert_eq!(plan("2.0.0b1", false, false).docs, DocsPlan::Disabled);
    }

    #[test]
    fn test_newest_final_release_moves_latest_alias() {
        for unstable in [true, false] {
            let plan = plan("1.4.0", true, unstable);
            assert_eq!(plan.alias(), Some("latest"));
            assert!(plan.deploys_docs());
        }
    }

    #[test]
    fn test_backport_release_deploys_docs_without_alias() {
        for unstable in [true, false] {
            let plan = plan("1.3.2", false, unstable);
            assert_eq!(plan.docs, DocsPlan::Deploy { alias: None });
        }
    }

    #[test]
    fn test_custom_alias_name() {
        let plan = ReleasePlan::from_decision(&parse("3.0.0").unwrap(), &info(true, true), "stable");
        assert_eq!(plan.alias(), Some("stable"));
    }

    #[test]
    fn test_without_docs() {
        let plan = plan("1.4.0", true, false).without_docs();
        assert!(!plan.deploys_docs());
        assert_eq!(plan.alias(), None);
    }

    #[test]
    fn test_step_kind_names() {
        let names: Vec<&str> = StepKind::ALL.iter().map(StepKind::as_str).collect();
        assert_eq!(names, ["build", "host-release", "registry-publish", "docs-deploy"]);

        let parsed: StepKind = serde_yaml::from_str("registry-publish").unwrap();
        assert_eq!(parsed, StepKind::RegistryPublish);
    }
}
