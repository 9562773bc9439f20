use anyhow::Result;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;

use super::{BottleFetcher, Cellar, PackageGraph};
use crate::package::{Bottle, FormulaIndex, Keg, Package, VersionComparator};
use crate::runtime::Runtime;

/// Package graph backed by the formula index, the cellar and a bottle fetcher.
pub struct IndexGraph<'a, R: Runtime, F: BottleFetcher> {
    index: FormulaIndex,
    cellar: Cellar<'a, R>,
    fetcher: F,
    bottle_tag: String,
    bottles: RefCell<HashMap<String, Bottle>>,
}

impl<'a, R: Runtime, F: BottleFetcher> IndexGraph<'a, R, F> {
    pub fn new(
        index: FormulaIndex,
        cellar: Cellar<'a, R>,
        fetcher: F,
        bottle_tag: impl Into<String>,
    ) -> Self {
        Self {
            index,
            cellar,
            fetcher,
            bottle_tag: bottle_tag.into(),
            bottles: RefCell::new(HashMap::new()),
        }
    }
}

impl<R: Runtime, F: BottleFetcher> PackageGraph for IndexGraph<'_, R, F> {
    fn lookup(&self, name: &str) -> Option<Package> {
        self.index.resolve_name(name).map(Package::new)
    }

    fn direct_dependencies(&self, package: &Package) -> Vec<Package> {
        self.index
            .get(package.name())
            .map(|f| f.dependencies.iter().map(Package::new).collect())
            .unwrap_or_default()
    }

    fn is_installed(&self, package: &Package) -> bool {
        match self.cellar.versions(package.name()) {
            Ok(versions) => !versions.is_empty(),
            Err(e) => {
                warn!("Could not read installed versions of {}: {}", package, e);
                false
            }
        }
    }

    fn is_outdated(&self, package: &Package) -> bool {
        let Some(latest) = self.index.get(package.name()).and_then(|f| f.pkg_version()) else {
            return false;
        };

        match self.cellar.versions(package.name()) {
            Ok(installed) => {
                VersionComparator::is_outdated(installed.iter().map(String::as_str), &latest)
            }
            Err(e) => {
                warn!("Could not read installed versions of {}: {}", package, e);
                false
            }
        }
    }

    fn has_bottle(&self, package: &Package) -> bool {
        self.index
            .get(package.name())
            .and_then(|f| f.bottle_file(&self.bottle_tag))
            .is_some()
    }

    #[tracing::instrument(skip(self))]
    fn bottle_metadata(&self, package: &Package) -> Result<Option<Bottle>> {
        let Some(formula) = self.index.get(package.name()) else {
            return Ok(None);
        };
        let Some((tag, file)) = formula.bottle_file(&self.bottle_tag) else {
            return Ok(None);
        };

        if let Some(bottle) = self.bottles.borrow().get(package.name()) {
            debug!("Using cached bottle metadata for {}", package);
            return Ok(Some(*bottle));
        }

        let bottle = self.fetcher.fetch(formula, file, tag)?;
        self.bottles
            .borrow_mut()
            .insert(package.name().to_string(), bottle);
        Ok(Some(bottle))
    }

    fn installed_kegs(&self, package: &Package) -> Result<Vec<Keg>> {
        self.cellar.kegs(package.name())
    }

    fn installed_packages(&self) -> Result<Vec<Package>> {
        Ok(self
            .cellar
            .installed_names()?
            .into_iter()
            .map(Package::new)
            .collect())
    }
}
