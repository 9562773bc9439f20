use std::fmt;
use std::path::PathBuf;

/// Handle to a formula known to the package graph.
///
/// Identity is the formula name: two handles with the same name denote the
/// same package no matter where they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Package {
    name: String,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// One installed version of a package, e.g. `Cellar/wget/1.24.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keg {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    disk_usage: u64,
}

impl Keg {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        path: PathBuf,
        disk_usage: u64,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            path,
            disk_usage,
        }
    }

    /// Bytes occupied on disk by this keg.
    pub fn disk_usage(&self) -> u64 {
        self.disk_usage
    }
}

/// Size metadata of a prebuilt bottle, both in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bottle {
    pub download_size: Option<u64>,
    pub installed_size: Option<u64>,
}
