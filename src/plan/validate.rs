//! Narrowing the requested packages to those that need action.

use log::{info, warn};
use std::fmt;

use super::{InstallDecision, PlanError};
use crate::graph::PackageGraph;
use crate::package::Package;

/// Flags that need a compiler unless a bottle can be used instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildFlag {
    Head,
    BuildBottle,
    BuildFromSource,
}

impl BuildFlag {
    pub fn as_flag(&self) -> &'static str {
        match self {
            BuildFlag::Head => "--HEAD",
            BuildFlag::BuildBottle => "--build-bottle",
            BuildFlag::BuildFromSource => "--build-from-source",
        }
    }
}

impl fmt::Display for BuildFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// Options carried through to the installation phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallOptions {
    pub force: bool,
    pub only_dependencies: bool,
    pub skip_link: bool,
    pub ignore_dependencies: bool,
    pub build_flags: Vec<BuildFlag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    Install,
    Upgrade,
    Reinstall,
    DependenciesOnly,
}

impl PlannedAction {
    /// Verb shown when handing the plan over.
    pub fn verb(&self) -> &'static str {
        match self {
            PlannedAction::Install => "Installing",
            PlannedAction::Upgrade => "Upgrading",
            PlannedAction::Reinstall => "Reinstalling",
            PlannedAction::DependenciesOnly => "Installing dependencies for",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPackage {
    pub package: Package,
    pub action: PlannedAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub packages: Vec<PlannedPackage>,
    pub options: InstallOptions,
}

impl InstallPlan {
    /// The planned packages, in request order, as a closure seed.
    pub fn seed(&self) -> Vec<Package> {
        self.packages.iter().map(|p| p.package.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    Proceed(InstallPlan),
    /// Every requested package was already taken care of.
    NothingToDo,
}

/// Check build flags against the environment, then keep only the requested
/// packages the decision service wants to act on.
#[tracing::instrument(
    skip(graph, decision, requested, options),
    fields(requested = requested.len())
)]
pub fn validate<G, D>(
    graph: &G,
    decision: &D,
    requested: &[Package],
    env_has_build_toolchain: bool,
    mut options: InstallOptions,
) -> Result<PlanOutcome, PlanError>
where
    G: PackageGraph + ?Sized,
    D: InstallDecision + ?Sized,
{
    if !env_has_build_toolchain && !options.build_flags.is_empty() {
        if requested.iter().all(|p| graph.has_bottle(p)) {
            warn!(
                "No compiler found; ignoring {} and installing from bottles.",
                flag_names(&options.build_flags).join(" ")
            );
            options.build_flags.clear();
        } else {
            return Err(PlanError::BuildFlags {
                flags: flag_names(&options.build_flags),
            });
        }
    }

    let packages: Vec<PlannedPackage> = requested
        .iter()
        .filter(|p| decision.should_act(p, &options))
        .map(|p| PlannedPackage {
            package: p.clone(),
            action: classify(graph, p, &options),
        })
        .collect();

    if packages.is_empty() && !requested.is_empty() {
        info!("Nothing to install");
        return Ok(PlanOutcome::NothingToDo);
    }

    Ok(PlanOutcome::Proceed(InstallPlan { packages, options }))
}

fn classify<G: PackageGraph + ?Sized>(
    graph: &G,
    package: &Package,
    options: &InstallOptions,
) -> PlannedAction {
    if options.only_dependencies {
        PlannedAction::DependenciesOnly
    } else if !graph.is_installed(package) {
        PlannedAction::Install
    } else if graph.is_outdated(package) {
        PlannedAction::Upgrade
    } else {
        PlannedAction::Reinstall
    }
}

fn flag_names(flags: &[BuildFlag]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for flag in flags {
        let name = flag.as_flag().to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
