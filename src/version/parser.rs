use super::model::{PrereleaseType, Version};
use crate::core::error::{ReleaseError, Result};
use lazy_static::lazy_static;
use regex::Regex;

/// Prefix every release tag carries in front of its version
pub const TAG_PREFIX: char = 'v';

const EXPECTED_FORMAT: &str = "expected MAJOR.MINOR.PATCH with an optional aN, bN or rcN suffix";

lazy_static! {
    // Numbers without leading zeros, so every accepted string renders back unchanged.
    static ref VERSION_PATTERN: Regex = Regex::new(
        r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:(a|b|rc)(0|[1-9][0-9]*))?$"
    )
    .expect("version pattern is valid");
}

/// Parse a version string such as `1.2.0` or `2.0.0rc1`.
///
/// Only the strict subset `major.minor.patch[(a|b|rc)N]` is accepted: no
/// surrounding whitespace, no `v` prefix, and none of the dev/post/epoch/local
/// segments other tools allow.
pub fn parse(raw: &str) -> Result<Version> {
    let captures = VERSION_PATTERN
        .captures(raw)
        .ok_or_else(|| ReleaseError::malformed(raw, EXPECTED_FORMAT))?;

    let number = |index: usize| -> Result<u64> {
        captures[index]
            .parse::<u64>()
            .map_err(|_| ReleaseError::malformed(raw, "numeric component is too large"))
    };

    let major = number(1)?;
    let minor = number(2)?;
    let patch = number(3)?;

    match captures.get(4) {
        None => Ok(Version::new(major, minor, patch)),
        Some(tag) => {
            let kind = PrereleaseType::from_tag(tag.as_str())
                .ok_or_else(|| ReleaseError::malformed(raw, EXPECTED_FORMAT))?;
            Ok(Version::prerelease(major, minor, patch, kind, number(5)?))
        }
    }
}

/// Parse a release tag such as `v1.2.0`; the `v` prefix is mandatory.
pub fn parse_tag(tag: &str) -> Result<Version> {
    let raw = tag
        .strip_prefix(TAG_PREFIX)
        .ok_or_else(|| ReleaseError::malformed(tag, "release tags must start with 'v'"))?;
    parse(raw)
}
