use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

#[cfg(not(target_os = "macos"))]
const LINUXBREW_PREFIX: &str = "/home/linuxbrew/.linuxbrew";

/// Get the default installation prefix
#[tracing::instrument(skip(runtime))]
pub fn default_prefix<R: Runtime>(runtime: &R) -> Result<PathBuf> {
    if let Some(prefix) = system_prefix(runtime) {
        return Ok(prefix);
    }
    let home_dir = runtime
        .home_dir()
        .context("Could not find home directory")?;
    Ok(home_dir.join(".brewplan"))
}

#[cfg(all(target_os = "macos", target_arch = "aarch64"))]
fn system_prefix<R: Runtime>(_runtime: &R) -> Option<PathBuf> {
    Some(PathBuf::from("/opt/homebrew"))
}

#[cfg(all(target_os = "macos", not(target_arch = "aarch64")))]
fn system_prefix<R: Runtime>(_runtime: &R) -> Option<PathBuf> {
    Some(PathBuf::from("/usr/local"))
}

#[cfg(not(target_os = "macos"))]
fn system_prefix<R: Runtime>(runtime: &R) -> Option<PathBuf> {
    let prefix = PathBuf::from(LINUXBREW_PREFIX);
    runtime.is_dir(&prefix).then_some(prefix)
}

pub fn cellar_dir(prefix: &Path) -> PathBuf {
    prefix.join("Cellar")
}

pub fn default_index_path(prefix: &Path) -> PathBuf {
    prefix.join("var").join("brewplan").join("formula.json")
}
