//! Installed packages that an install would push into an upgrade.

use log::{debug, warn};

use super::SizedSet;
use crate::graph::PackageGraph;

/// Append every installed, outdated package that directly depends on a
/// member of `sized`.
///
/// Only one hop is taken: membership is checked against `sized` as passed
/// in, not against dependents added during the scan. If installed packages
/// cannot be enumerated the set is returned unchanged.
#[tracing::instrument(skip(graph, sized), fields(sized = sized.len()))]
pub fn augment_with_installed_dependents<G: PackageGraph + ?Sized>(
    graph: &G,
    sized: SizedSet,
    enabled: bool,
    check_dependencies: bool,
) -> SizedSet {
    if !enabled || !check_dependencies {
        return sized;
    }

    let installed = match graph.installed_packages() {
        Ok(installed) => installed,
        Err(e) => {
            warn!("Skipping installed dependents in the size estimate: {}", e);
            return sized;
        }
    };

    let mut augmented = sized.clone();
    for package in installed {
        if sized.contains(&package) || !graph.is_outdated(&package) {
            continue;
        }
        let depends_on_target = graph
            .direct_dependencies(&package)
            .iter()
            .any(|dependency| sized.contains(dependency));
        if depends_on_target {
            debug!("Including outdated dependent {} in the size estimate", package);
            augmented.insert(package);
        }
    }

    augmented
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MockPackageGraph;
    use crate::package::Package;
    use crate::test_utils::{FakeNode, mock_graph};

    fn sized(names: &[&str]) -> SizedSet {
        names.iter().map(|n| Package::new(*n)).collect()
    }

    fn graph() -> MockPackageGraph {
        mock_graph(vec![
            FakeNode::new("openssl@3").deps(&["ca-certificates"]).outdated().installed(),
            FakeNode::new("curl").deps(&["openssl@3"]).outdated().installed(),
            FakeNode::new("wget").deps(&["openssl@3"]).installed(),
            FakeNode::new("git").deps(&["curl"]).outdated().installed(),
            FakeNode::new("ca-certificates").installed(),
            FakeNode::new("node").deps(&["openssl@3"]).outdated(),
        ])
    }

    #[test]
    fn test_adds_outdated_installed_dependents() {
        let result = augment_with_installed_dependents(&graph(), sized(&["openssl@3"]), true, true);

        // wget is up to date, git only depends on curl, node is not installed
        assert_eq!(result.names(), vec!["openssl@3", "curl"]);
    }

    #[test]
    fn test_disabled_leaves_set_unchanged() {
        let graph = MockPackageGraph::new();
        let input = sized(&["openssl@3"]);

        let result = augment_with_installed_dependents(&graph, input.clone(), false, true);
        assert_eq!(result, input);

        let result = augment_with_installed_dependents(&graph, input.clone(), true, false);
        assert_eq!(result, input);
    }

    #[test]
    fn test_enumeration_failure_leaves_set_unchanged() {
        let mut graph = MockPackageGraph::new();
        graph
            .expect_installed_packages()
            .returning(|| Err(anyhow::anyhow!("permission denied")));

        let input = sized(&["openssl@3"]);
        let result = augment_with_installed_dependents(&graph, input.clone(), true, true);
        assert_eq!(result, input);
    }

    #[test]
    fn test_existing_members_are_not_duplicated() {
        let result =
            augment_with_installed_dependents(&graph(), sized(&["curl", "openssl@3"]), true, true);
        assert_eq!(result.names(), vec!["curl", "openssl@3", "git"]);
    }
}
