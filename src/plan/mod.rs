//! Install planning and size estimation.
//!
//! # Structure
//!
//! - `validate` - Narrow the requested packages and check build flags
//! - `closure` - Outdated dependencies an install would also upgrade
//! - `dependents` - Installed packages pulled in by the install
//! - `sizes` - Download, installed and net size totals
//! - `confirm` - Render the estimate and ask before proceeding
//!
//! [`Planner`] strings these together in the order the install command needs.

mod closure;
mod confirm;
mod decision;
mod dependents;
mod error;
mod sized_set;
mod sizes;
mod toolchain;
mod validate;

use log::debug;

use crate::graph::PackageGraph;
use crate::package::Package;

pub use closure::{PruneContext, expand, should_exclude};
pub use confirm::{INVALID_INPUT, PROMPT, ask, confirm, parse_response, render_estimate};
pub use decision::{InstallDecision, KegInstallDecision};
pub use dependents::augment_with_installed_dependents;
pub use error::PlanError;
pub use sized_set::SizedSet;
pub use sizes::{SizeSummary, total_sizes};
pub use toolchain::has_build_toolchain;
pub use validate::{
    BuildFlag, InstallOptions, InstallPlan, PlanOutcome, PlannedAction, PlannedPackage, validate,
};

#[cfg(test)]
pub use decision::MockInstallDecision;

/// Environment-derived switches, resolved once by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanConfig {
    pub check_installed_dependents: bool,
    pub upgrade_on_install: bool,
    pub env_has_build_toolchain: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            check_installed_dependents: true,
            upgrade_on_install: true,
            env_has_build_toolchain: true,
        }
    }
}

pub struct Planner<'g, G: PackageGraph + ?Sized> {
    graph: &'g G,
    config: PlanConfig,
}

impl<'g, G: PackageGraph + ?Sized> Planner<'g, G> {
    pub fn new(graph: &'g G, config: PlanConfig) -> Self {
        Self { graph, config }
    }

    /// Resolve names to packages, failing with every unknown name at once.
    ///
    /// Names resolving to the same package are kept once, in request order.
    pub fn resolve(&self, names: &[String]) -> Result<Vec<Package>, PlanError> {
        let mut resolved = SizedSet::new();
        let mut missing = Vec::new();

        for name in names {
            match self.graph.lookup(name) {
                Some(package) => {
                    resolved.insert(package);
                }
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(PlanError::UnresolvableTarget { names: missing });
        }
        Ok(resolved.iter().cloned().collect())
    }

    pub fn plan<D: InstallDecision + ?Sized>(
        &self,
        decision: &D,
        requested: &[Package],
        options: InstallOptions,
    ) -> Result<PlanOutcome, PlanError> {
        validate(
            self.graph,
            decision,
            requested,
            self.config.env_has_build_toolchain,
            options,
        )
    }

    /// Size the packages touched by `plan`: the planned packages, the
    /// dependencies they would upgrade and the installed dependents they
    /// would push into an upgrade.
    #[tracing::instrument(skip(self, plan))]
    pub fn estimate(&self, plan: &InstallPlan) -> (SizedSet, SizeSummary) {
        let check_dependencies = !plan.options.ignore_dependencies;

        let sized = expand(
            self.graph,
            &plan.seed(),
            check_dependencies,
            self.config.upgrade_on_install,
        );
        let sized = augment_with_installed_dependents(
            self.graph,
            sized,
            self.config.check_installed_dependents,
            check_dependencies,
        );
        let summary = total_sizes(self.graph, &sized);

        debug!("Sized {} packages: {:?}", sized.len(), summary);
        (sized, summary)
    }
}
