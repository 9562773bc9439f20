//! Local formula index.
//!
//! The index is a JSON array shaped like the public formula API
//! (`formula.json`); only the fields needed for planning are read.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use super::version::VersionComparator;
use crate::runtime::Runtime;

/// Platform tag for bottles that work everywhere.
pub const ALL_BOTTLE_TAG: &str = "all";

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FormulaInfo {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub versions: FormulaVersions,
    #[serde(default)]
    pub revision: u32,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub bottle: BottleInfo,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FormulaVersions {
    #[serde(default)]
    pub stable: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BottleInfo {
    #[serde(default)]
    pub stable: Option<BottleSpec>,
}

/// Where the bottles of a formula live and which platforms have one.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BottleSpec {
    #[serde(default)]
    pub rebuild: u32,
    pub root_url: String,
    #[serde(default)]
    pub files: BTreeMap<String, BottleFile>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BottleFile {
    pub sha256: String,
}

impl FormulaInfo {
    /// Stable version with revision suffix, matching keg directory names.
    pub fn pkg_version(&self) -> Option<String> {
        self.versions
            .stable
            .as_deref()
            .map(|v| VersionComparator::pkg_version(v, self.revision))
    }

    /// The bottle file for `tag`, falling back to an `all` bottle, along
    /// with the tag it was published under.
    pub fn bottle_file(&self, tag: &str) -> Option<(&str, &BottleFile)> {
        let spec = self.bottle.stable.as_ref()?;
        spec.files
            .get_key_value(tag)
            .or_else(|| spec.files.get_key_value(ALL_BOTTLE_TAG))
            .map(|(tag, file)| (tag.as_str(), file))
    }

    /// Rebuild number of the stable bottle, `0` when there is none.
    pub fn bottle_rebuild(&self) -> u32 {
        self.bottle.stable.as_ref().map_or(0, |spec| spec.rebuild)
    }

    /// OCI image index URL holding the bottle manifests of this version.
    pub fn bottle_manifest_url(&self) -> Option<String> {
        let spec = self.bottle.stable.as_ref()?;
        let version = self.pkg_version()?;
        let tag = if spec.rebuild > 0 {
            format!("{}-{}", version, spec.rebuild)
        } else {
            version
        };

        Some(format!(
            "{}/{}/manifests/{}",
            spec.root_url.trim_end_matches('/'),
            image_name(&self.name),
            tag
        ))
    }
}

/// Registry image name of a formula: `@` becomes a path separator and `+` an `x`.
fn image_name(formula: &str) -> String {
    formula.to_lowercase().replace('@', "/").replace('+', "x")
}

/// All formulae known to this installation, by name.
#[derive(Debug, Default)]
pub struct FormulaIndex {
    formulae: HashMap<String, FormulaInfo>,
    aliases: HashMap<String, String>,
}

impl FormulaIndex {
    /// Load the index from a JSON file.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        let content = runtime
            .read_to_string(path)
            .with_context(|| format!("Failed to read formula index {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse formula index {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let formulae: Vec<FormulaInfo> = serde_json::from_str(content)?;
        Ok(Self::from_formulae(formulae))
    }

    pub fn from_formulae(formulae: impl IntoIterator<Item = FormulaInfo>) -> Self {
        let mut index = Self::default();
        for formula in formulae {
            for alias in &formula.aliases {
                index.aliases.insert(alias.clone(), formula.name.clone());
            }
            if let Some(full_name) = &formula.full_name
                && full_name != &formula.name
            {
                index.aliases.insert(full_name.clone(), formula.name.clone());
            }
            index.formulae.insert(formula.name.clone(), formula);
        }
        index
    }

    pub fn get(&self, name: &str) -> Option<&FormulaInfo> {
        self.formulae.get(name)
    }

    /// Canonical name for a user-supplied name, alias or full name.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        if let Some(formula) = self.formulae.get(name) {
            return Some(&formula.name);
        }
        let canonical = self.aliases.get(name)?;
        self.formulae.get(canonical).map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.formulae.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulae.is_empty()
    }
}
