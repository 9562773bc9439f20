//! Installed kegs under `<prefix>/Cellar`.

use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::package::Keg;
use crate::runtime::Runtime;

/// Read-only view of the cellar directory.
pub struct Cellar<'a, R: Runtime> {
    runtime: &'a R,
    root: PathBuf,
}

impl<'a, R: Runtime> Cellar<'a, R> {
    pub fn new(runtime: &'a R, root: PathBuf) -> Self {
        Self { runtime, root }
    }

    /// Names of every package with at least one keg.
    #[tracing::instrument(skip(self))]
    pub fn installed_names(&self) -> Result<Vec<String>> {
        if !self.runtime.exists(&self.root) {
            debug!("Cellar {:?} does not exist", self.root);
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for rack in self.runtime.read_dir(&self.root)? {
            if !self.runtime.is_dir(&rack) {
                continue;
            }
            let Some(name) = file_name(&rack) else {
                continue;
            };
            if !self.keg_dirs(&rack)?.is_empty() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Installed versions of a package, without measuring them.
    pub fn versions(&self, name: &str) -> Result<Vec<String>> {
        let rack = self.root.join(name);
        if !self.runtime.is_dir(&rack) {
            return Ok(vec![]);
        }
        Ok(self
            .keg_dirs(&rack)?
            .iter()
            .filter_map(|dir| file_name(dir))
            .collect())
    }

    /// Installed kegs of a package with their disk usage.
    #[tracing::instrument(skip(self))]
    pub fn kegs(&self, name: &str) -> Result<Vec<Keg>> {
        let rack = self.root.join(name);
        if !self.runtime.is_dir(&rack) {
            return Ok(vec![]);
        }

        let mut kegs = Vec::new();
        for dir in self.keg_dirs(&rack)? {
            let Some(version) = file_name(&dir) else {
                continue;
            };
            let usage = self.disk_usage(&dir)?;
            debug!("Keg {:?} uses {} bytes", dir, usage);
            kegs.push(Keg::new(name, version, dir, usage));
        }
        Ok(kegs)
    }

    /// Total size of regular files below `path`. Symlinks are counted by
    /// their own size and never followed.
    pub fn disk_usage(&self, path: &Path) -> Result<u64> {
        let mut total = 0u64;
        let mut pending = vec![path.to_path_buf()];

        while let Some(current) = pending.pop() {
            if self.runtime.is_symlink(&current) {
                total += self.runtime.file_size(&current)?;
            } else if self.runtime.is_dir(&current) {
                pending.extend(self.runtime.read_dir(&current)?);
            } else {
                total += self.runtime.file_size(&current)?;
            }
        }

        Ok(total)
    }

    fn keg_dirs(&self, rack: &Path) -> Result<Vec<PathBuf>> {
        let mut dirs: Vec<PathBuf> = self
            .runtime
            .read_dir(rack)?
            .into_iter()
            .filter(|p| self.runtime.is_dir(p) && !self.runtime.is_symlink(p))
            .filter(|p| file_name(p).is_some_and(|n| !n.starts_with('.')))
            .collect();
        dirs.sort();
        Ok(dirs)
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
