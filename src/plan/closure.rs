//! Sizing closure: which dependencies an install would also upgrade.

use log::debug;
use std::collections::HashSet;

use super::SizedSet;
use crate::graph::PackageGraph;
use crate::package::Package;

/// Inputs of the per-node prune decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneContext {
    /// Whether an outdated dependency counts as something the install will upgrade.
    pub allow_upgrade_candidates: bool,
}

/// Whether `dependency` stays out of the sizing closure.
///
/// A dependency is kept only when it has dependencies of its own, is an
/// outdated upgrade candidate, and has a bottle to estimate from.
pub fn should_exclude<G: PackageGraph + ?Sized>(
    graph: &G,
    dependency: &Package,
    context: &PruneContext,
) -> bool {
    if graph.direct_dependencies(dependency).is_empty() {
        return true;
    }
    if !context.allow_upgrade_candidates || !graph.is_outdated(dependency) {
        return true;
    }
    !graph.has_bottle(dependency)
}

/// Seed packages plus every non-pruned transitive dependency.
///
/// Excluded dependencies are not descended into; their siblings still are.
#[tracing::instrument(skip(graph, seed), fields(seed = seed.len()))]
pub fn expand<G: PackageGraph + ?Sized>(
    graph: &G,
    seed: &[Package],
    check_dependencies: bool,
    allow_upgrade_candidates: bool,
) -> SizedSet {
    let context = PruneContext {
        allow_upgrade_candidates,
    };
    let mut sized = SizedSet::new();
    let mut visited: HashSet<String> = seed.iter().map(|p| p.name().to_string()).collect();

    for package in seed {
        sized.insert(package.clone());
        if !check_dependencies {
            continue;
        }

        let mut pending: Vec<Package> = graph.direct_dependencies(package);
        pending.reverse();

        while let Some(dependency) = pending.pop() {
            if !visited.insert(dependency.name().to_string()) {
                continue;
            }
            if should_exclude(graph, &dependency, &context) {
                debug!("Pruned {} from the size estimate of {}", dependency, package);
                continue;
            }

            let mut children = graph.direct_dependencies(&dependency);
            children.reverse();
            pending.extend(children);
            sized.insert(dependency);
        }
    }

    sized
}
