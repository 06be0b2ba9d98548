//! Release decision engine
//!
//! Computes where the current version stands against everything already
//! published. Pure: no I/O, no failure modes.

use crate::version::Version;
use std::collections::BTreeSet;

/// Standing of the version being released relative to the published history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageVersionInfo {
    /// Greater than every published version
    pub is_last: bool,
    /// Not published yet (exact match only)
    pub is_new: bool,
    /// No final release has been published for this major yet
    pub is_major_unstable: bool,
}

/// Decide the standing of `current` against `history`.
pub fn decide(current: &Version, history: &BTreeSet<Version>) -> PackageVersionInfo {
    let is_new = !history.contains(current);

    let Some(newest) = history.last() else {
        return PackageVersionInfo {
            is_last: true,
            is_new: true,
            is_major_unstable: true,
        };
    };

    let is_last = current > newest;
    let is_major_unstable = history
        .iter()
        .filter(|v| v.major() == current.major())
        .all(Version::is_prerelease);

    PackageVersionInfo {
        is_last,
        is_new,
        is_major_unstable,
    }
}
