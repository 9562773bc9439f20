//! Version comparison for installed kegs.
//!
//! Keg directories are named after the package version with an optional
//! `_N` revision suffix (e.g. `3.3.2_1`). Components are compared numerically
//! when both sides are numbers and lexically otherwise.

use std::cmp::Ordering;

/// Version comparator - pure functions over version strings.
pub struct VersionComparator;

impl VersionComparator {
    /// Compare two package versions, including revision suffixes.
    pub fn compare(a: &str, b: &str) -> Ordering {
        let (a_version, a_revision) = Self::split_revision(a);
        let (b_version, b_revision) = Self::split_revision(b);

        Self::compare_components(a_version, b_version).then(a_revision.cmp(&b_revision))
    }

    /// Whether no installed version reaches `latest`.
    ///
    /// Returns false when nothing is installed: a package that is not
    /// installed cannot be outdated.
    pub fn is_outdated<'a>(installed: impl IntoIterator<Item = &'a str>, latest: &str) -> bool {
        let mut any = false;
        for version in installed {
            any = true;
            if Self::compare(version, latest) != Ordering::Less {
                return false;
            }
        }
        any
    }

    /// Format the version string of a formula the way kegs are named.
    pub fn pkg_version(version: &str, revision: u32) -> String {
        if revision > 0 {
            format!("{}_{}", version, revision)
        } else {
            version.to_string()
        }
    }

    fn split_revision(version: &str) -> (&str, u32) {
        let version = version.strip_prefix('v').unwrap_or(version);
        match version.rsplit_once('_') {
            Some((base, rev)) => match rev.parse::<u32>() {
                Ok(rev) => (base, rev),
                Err(_) => (version, 0),
            },
            None => (version, 0),
        }
    }

    fn compare_components(a: &str, b: &str) -> Ordering {
        let mut a_parts = a.split(['.', '-', '+']);
        let mut b_parts = b.split(['.', '-', '+']);

        loop {
            match (a_parts.next(), b_parts.next()) {
                (None, None) => return Ordering::Equal,
                // "1.0" == "1.0.0", but "1.0.1" > "1.0"
                (Some(x), None) => {
                    if x.parse::<u64>().is_ok_and(|n| n == 0) {
                        continue;
                    }
                    return Ordering::Greater;
                }
                (None, Some(y)) => {
                    if y.parse::<u64>().is_ok_and(|n| n == 0) {
                        continue;
                    }
                    return Ordering::Less;
                }
                (Some(x), Some(y)) => {
                    let ordering = match (x.parse::<u64>(), y.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        _ => x.cmp(y),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
            }
        }
    }
}
