//! Package graph access.
//!
//! The planning core only ever asks questions about packages through
//! [`PackageGraph`]; [`IndexGraph`] answers them from the local formula index,
//! the cellar and the bottle registry.

mod cellar;
mod fetcher;
mod index_graph;

use anyhow::Result;

use crate::package::{Bottle, Keg, Package};

pub use cellar::Cellar;
pub use fetcher::{ANONYMOUS_TOKEN, BottleFetcher, HttpBottleFetcher};
pub use index_graph::IndexGraph;

#[cfg(test)]
pub use fetcher::MockBottleFetcher;

#[cfg_attr(test, mockall::automock)]
pub trait PackageGraph {
    /// Resolve a user-supplied name (or alias) to a package.
    fn lookup(&self, name: &str) -> Option<Package>;

    fn direct_dependencies(&self, package: &Package) -> Vec<Package>;

    /// At least one keg of the package is in the cellar.
    fn is_installed(&self, package: &Package) -> bool;

    /// Installed, and a newer version than every installed keg exists.
    fn is_outdated(&self, package: &Package) -> bool;

    /// A bottle exists for the current platform.
    fn has_bottle(&self, package: &Package) -> bool;

    /// Size metadata of the package's bottle; may hit the network.
    ///
    /// Returns `Ok(None)` when the package has no bottle. Calling it again for
    /// the same package returns the same answer.
    fn bottle_metadata(&self, package: &Package) -> Result<Option<Bottle>>;

    fn installed_kegs(&self, package: &Package) -> Result<Vec<Keg>>;

    /// Every package with at least one installed keg.
    fn installed_packages(&self) -> Result<Vec<Package>>;
}
