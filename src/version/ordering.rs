use super::model::{PrereleaseType, Version};
use std::cmp::Ordering;

/// `(major, minor, patch, stage rank, pre-release id or 0)`
pub type SortKey = (u64, u64, u64, u8, u64);

/// Rank of a final release; higher than every pre-release stage.
const FINAL_RANK: u8 = 3;

fn stage_rank(kind: PrereleaseType) -> u8 {
    match kind {
        PrereleaseType::Alpha => 0,
        PrereleaseType::Beta => 1,
        PrereleaseType::ReleaseCandidate => 2,
    }
}

/// Sort key whose lexicographic order is the release order.
///
/// `major.minor.patch` dominate; for an equal triple alpha < beta < rc <
/// final, and within a stage the higher id wins.
pub fn sort_key(version: &Version) -> SortKey {
    let (rank, id) = match version.pre() {
        Some(pre) => (stage_rank(pre.kind), pre.id),
        None => (FINAL_RANK, 0),
    };
    (version.major(), version.minor(), version.patch(), rank, id)
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        sort_key(self).cmp(&sort_key(other))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::parse;
    use proptest::prelude::*;

    fn v(raw: &str) -> Version {
        parse(raw).unwrap()
    }

    #[test]
    fn test_sort_key_values() {
        assert_eq!(sort_key(&v("1.2.0")), (1, 2, 0, 3, 0));
        assert_eq!(sort_key(&v("2.0.0a1")), (2, 0, 0, 0, 1));
        assert_eq!(sort_key(&v("2.0.0b4")), (2, 0, 0, 1, 4));
        assert_eq!(sort_key(&v("2.0.0rc2")), (2, 0, 0, 2, 2));
    }

    #[test]
    fn test_prerelease_precedence() {
        assert!(v("1.0.0a1") < v("1.0.0b1"));
        assert!(v("1.0.0b1") < v("1.0.0rc1"));
        assert!(v("1.0.0rc1") < v("1.0.0"));
    }

    #[test]
    fn test_prerelease_id_precedence() {
        assert!(v("1.0.0a1") < v("1.0.0a2"));
        assert!(v("1.0.0rc9") < v("1.0.0rc10"));
        assert!(v("1.0.0a10") < v("1.0.0b1"));
    }

    #[test]
    fn test_numeric_precedence_dominates() {
        assert!(v("1.0.1a1") > v("1.0.0"));
        assert!(v("2.0.0a1") < v("2.0.1a1"));
        assert!(v("1.2.0") < v("2.0.0a1"));
        assert!(v("1.10.0") > v("1.9.0"));
    }

    #[test]
    fn test_sorting_a_collection() {
        let mut versions = vec![
            v("1.0.0"),
            v("2.0.0a1"),
            v("1.0.0rc1"),
            v("0.9.0"),
            v("1.1.0"),
            v("1.0.0b2"),
        ];
        versions.sort();
        let rendered: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(
            rendered,
            ["0.9.0", "1.0.0b2", "1.0.0rc1", "1.0.0", "1.1.0", "2.0.0a1"]
        );
    }

    fn any_version() -> impl Strategy<Value = Version> {
        let stage = prop_oneof![
            Just(None),
            Just(Some(PrereleaseType::Alpha)),
            Just(Some(PrereleaseType::Beta)),
            Just(Some(PrereleaseType::ReleaseCandidate)),
        ];
        (0u64..4, 0u64..4, 0u64..4, stage, 0u64..4).prop_map(
            |(major, minor, patch, stage, id)| match stage {
                Some(kind) => Version::prerelease(major, minor, patch, kind, id),
                None => Version::new(major, minor, patch),
            },
        )
    }

    proptest! {
        #[test]
        fn prop_order_agrees_with_equality(x in any_version(), y in any_version()) {
            prop_assert_eq!(x.cmp(&y) == Ordering::Equal, x == y);
        }

        #[test]
        fn prop_order_is_antisymmetric(x in any_version(), y in any_version()) {
            prop_assert_eq!(x.cmp(&y), y.cmp(&x).reverse());
        }

        #[test]
        fn prop_order_is_transitive(
            x in any_version(),
            y in any_version(),
            z in any_version(),
        ) {
            if x < y && y < z {
                prop_assert!(x < z);
            }
            if x <= y && y <= z {
                prop_assert!(x <= z);
            }
        }

        #[test]
        fn prop_rendered_versions_parse_back(x in any_version()) {
            prop_assert_eq!(parse(&x.to_string()).unwrap(), x);
        }
    }
}
