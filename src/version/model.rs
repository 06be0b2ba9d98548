use std::fmt;

/// Pre-release stage of a version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrereleaseType {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PrereleaseType {
    /// Suffix written between the patch number and the pre-release id
    pub fn tag(self) -> &'static str {
        match self {
            PrereleaseType::Alpha => "a",
            PrereleaseType::Beta => "b",
            PrereleaseType::ReleaseCandidate => "rc",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "a" => Some(PrereleaseType::Alpha),
            "b" => Some(PrereleaseType::Beta),
            "rc" => Some(PrereleaseType::ReleaseCandidate),
            _ => None,
        }
    }
}

/// Pre-release stage together with its number, e.g. `rc2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prerelease {
    pub kind: PrereleaseType,
    pub id: u64,
}

/// A parsed release version.
///
/// The pre-release stage and its number travel together, so a version
/// either has both or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Option<Prerelease>,
}

impl Version {
    /// Create a final release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    /// Create a pre-release version
    pub fn prerelease(major: u64, minor: u64, patch: u64, kind: PrereleaseType, id: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre: Some(Prerelease { kind, id }),
        }
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn pre(&self) -> Option<Prerelease> {
        self.pre
    }

    pub fn prerelease_type(&self) -> Option<PrereleaseType> {
        self.pre.map(|p| p.kind)
    }

    pub fn prerelease_id(&self) -> Option<u64> {
        self.pre.map(|p| p.id)
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    /// Documentation line this version is deployed under.
    ///
    /// 0.x releases are unstable and each gets its own docs; from 1.0 on,
    /// every release of a major shares one `"{major}.X"` line.
    pub fn title(&self) -> String {
        if self.major == 0 {
            self.to_string()
        } else {
            format!("{}.X", self.major)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = self.pre {
            write!(f, "{}{}", pre.kind.tag(), pre.id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_final() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
    }

    #[test]
    fn test_display_prerelease() {
        let cases = [
            (PrereleaseType::Alpha, "2.0.0a1"),
            (PrereleaseType::Beta, "2.0.0b1"),
            (PrereleaseType::ReleaseCandidate, "2.0.0rc1"),
        ];
        for (kind, expected) in cases {
            assert_eq!(Version::prerelease(2, 0, 0, kind, 1).to_string(), expected);
        }
    }

    #[test]
    fn test_prerelease_fields_travel_together() {
        let final_release = Version::new(1, 0, 0);
        assert_eq!(final_release.prerelease_type(), None);
        assert_eq!(final_release.prerelease_id(), None);
        assert!(!final_release.is_prerelease());

        let rc = Version::prerelease(1, 0, 0, PrereleaseType::ReleaseCandidate, 3);
        assert_eq!(rc.prerelease_type(), Some(PrereleaseType::ReleaseCandidate));
        assert_eq!(rc.prerelease_id(), Some(3));
        assert!(rc.is_prerelease());
    }

    #[test]
    fn test_title_unstable_major() {
        assert_eq!(Version::new(0, 4, 1).title(), "0.4.1");
        assert_eq!(
            Version::prerelease(0, 5, 0, PrereleaseType::Beta, 2).title(),
            "0.5.0b2"
        );
    }

    #[test]
    fn test_title_stable_major() {
        assert_eq!(Version::new(1, 7, 3).title(), "1.X");
        assert_eq!(
            Version::prerelease(3, 0, 0, PrereleaseType::Alpha, 1).title(),
            "3.X"
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = Version::prerelease(1, 0, 0, PrereleaseType::Alpha, 1);
        let b = Version::prerelease(1, 0, 0, PrereleaseType::Alpha, 2);
        assert_ne!(a, b);
        assert_eq!(a, Version::prerelease(1, 0, 0, PrereleaseType::Alpha, 1));
    }

    #[test]
    fn test_tag_lookup() {
        assert_eq!(PrereleaseType::from_tag("a"), Some(PrereleaseType::Alpha));
        assert_eq!(PrereleaseType::from_tag("rc"), Some(PrereleaseType::ReleaseCandidate));
        assert_eq!(PrereleaseType::from_tag("alpha"), None);
        assert_eq!(PrereleaseType::from_tag("c"), None);
    }
}
