//! Bottle size metadata from the bottle registry.
//!
//! Bottles are published as OCI images; the image index lists one manifest
//! per platform, annotated with the bottle digest and its sizes.

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;

use crate::http::HttpClient;
use crate::package::{Bottle, BottleFile, FormulaInfo};

const OCI_INDEX_MEDIA_TYPE: &str = "application/vnd.oci.image.index.v1+json";

/// Token accepted by public registries for anonymous pulls.
pub const ANONYMOUS_TOKEN: &str = "QQ==";

const DIGEST_ANNOTATION: &str = "sh.brew.bottle.digest";
const SIZE_ANNOTATION: &str = "sh.brew.bottle.size";
const INSTALLED_SIZE_ANNOTATION: &str = "sh.brew.bottle.installed_size";
const REF_NAME_ANNOTATION: &str = "org.opencontainers.image.ref.name";

/// Fetches size metadata for one bottle.
#[cfg_attr(test, mockall::automock)]
pub trait BottleFetcher {
    fn fetch(&self, formula: &FormulaInfo, file: &BottleFile, tag: &str) -> Result<Bottle>;
}

#[derive(Deserialize, Debug, Default)]
struct ImageIndex {
    #[serde(default)]
    manifests: Vec<ManifestEntry>,
}

#[derive(Deserialize, Debug, Default)]
struct ManifestEntry {
    #[serde(default)]
    annotations: HashMap<String, String>,
}

/// Reads bottle sizes from the registry's image index.
pub struct HttpBottleFetcher {
    http: HttpClient,
    token: String,
}

impl HttpBottleFetcher {
    pub fn new(http: HttpClient, token: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
        }
    }
}

impl BottleFetcher for HttpBottleFetcher {
    #[tracing::instrument(skip(self, formula, file), fields(formula = %formula.name))]
    fn fetch(&self, formula: &FormulaInfo, file: &BottleFile, tag: &str) -> Result<Bottle> {
        let url = formula
            .bottle_manifest_url()
            .with_context(|| format!("{} has no stable bottle", formula.name))?;
        debug!("Fetching bottle manifest for {} from {}", formula.name, url);

        let authorization = format!("Bearer {}", self.token);
        let index: ImageIndex = self
            .http
            .get_json_with_headers(
                &url,
                &[
                    ("Accept", OCI_INDEX_MEDIA_TYPE),
                    ("Authorization", authorization.as_str()),
                ],
            )
            .with_context(|| format!("Failed to fetch bottle manifest for {}", formula.name))?;

        let rebuild = formula.bottle_rebuild();
        let annotations = select_manifest(&index, file, tag, rebuild).with_context(|| {
            format!(
                "Bottle manifest for {} has no entry for {}",
                formula.name, tag
            )
        })?;

        Ok(Bottle {
            download_size: parse_size(annotations, SIZE_ANNOTATION),
            installed_size: parse_size(annotations, INSTALLED_SIZE_ANNOTATION),
        })
    }
}

/// Prefer the manifest carrying our bottle's digest, then one tagged for our platform.
///
/// Ref names end in `.<tag>`, or `.<tag>.<rebuild>` for rebuilt bottles.
fn select_manifest<'i>(
    index: &'i ImageIndex,
    file: &BottleFile,
    tag: &str,
    rebuild: u32,
) -> Option<&'i HashMap<String, String>> {
    let by_digest = index.manifests.iter().find(|m| {
        m.annotations
            .get(DIGEST_ANNOTATION)
            .is_some_and(|d| d == &file.sha256)
    });
    if let Some(entry) = by_digest {
        return Some(&entry.annotations);
    }

    let suffix = format!(".{}", tag);
    let rebuilt_suffix = format!(".{}.{}", tag, rebuild);
    index
        .manifests
        .iter()
        .find(|m| {
            m.annotations.get(REF_NAME_ANNOTATION).is_some_and(|r| {
                r.ends_with(&suffix) || (rebuild > 0 && r.ends_with(&rebuilt_suffix))
            })
        })
        .map(|m| &m.annotations)
}

fn parse_size(annotations: &HashMap<String, String>, key: &str) -> Option<u64> {
    annotations.get(key).and_then(|v| v.trim().parse().ok())
}
