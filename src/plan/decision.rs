use log::warn;

use super::InstallOptions;
use crate::graph::PackageGraph;
use crate::package::Package;

/// Per-package gate deciding whether a requested package needs any action.
#[cfg_attr(test, mockall::automock)]
pub trait InstallDecision {
    fn should_act(&self, package: &Package, options: &InstallOptions) -> bool;
}

/// Decides from the package's kegs: anything missing is installed, outdated
/// kegs are upgraded when upgrade-on-install is enabled, up-to-date kegs are
/// only touched with `--force` or `--only-dependencies`.
pub struct KegInstallDecision<'g, G: PackageGraph + ?Sized> {
    graph: &'g G,
    upgrade_on_install: bool,
}

impl<'g, G: PackageGraph + ?Sized> KegInstallDecision<'g, G> {
    pub fn new(graph: &'g G, upgrade_on_install: bool) -> Self {
        Self {
            graph,
            upgrade_on_install,
        }
    }
}

impl<G: PackageGraph + ?Sized> InstallDecision for KegInstallDecision<'_, G> {
    fn should_act(&self, package: &Package, options: &InstallOptions) -> bool {
        if !self.graph.is_installed(package) {
            return true;
        }
        if options.force || options.only_dependencies {
            return true;
        }
        if self.graph.is_outdated(package) {
            if self.upgrade_on_install {
                return true;
            }
            warn!(
                "{} is installed but outdated. Unset BREWPLAN_NO_INSTALL_UPGRADE to upgrade it.",
                package
            );
            return false;
        }

        warn!("{} is already installed and up-to-date.", package);
        false
    }
}
