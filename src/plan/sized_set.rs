use std::collections::HashSet;

use crate::package::Package;

/// Insertion-ordered set of packages, deduplicated by package name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizedSet {
    packages: Vec<Package>,
    names: HashSet<String>,
}

impl SizedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the package unless one with the same name is already present.
    pub fn insert(&mut self, package: Package) -> bool {
        if !self.names.insert(package.name().to_string()) {
            return false;
        }
        self.packages.push(package);
        true
    }

    pub fn contains(&self, package: &Package) -> bool {
        self.names.contains(package.name())
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Package> {
        self.packages.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.packages.iter().map(Package::name).collect()
    }
}

impl FromIterator<Package> for SizedSet {
    fn from_iter<I: IntoIterator<Item = Package>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<Package> for SizedSet {
    fn extend<I: IntoIterator<Item = Package>>(&mut self, iter: I) {
        for package in iter {
            self.insert(package);
        }
    }
}

impl<'a> IntoIterator for &'a SizedSet {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}
