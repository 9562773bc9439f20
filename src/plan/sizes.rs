//! Download, installed and net size totals over a sized set.

use log::{debug, warn};

use super::SizedSet;
use crate::graph::PackageGraph;
use crate::package::{Bottle, Keg, Package};

/// Byte totals of an install estimate.
///
/// `net` is the installed size minus what existing kegs of the same packages
/// already occupy, so it is negative when the install frees space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeSummary {
    pub download: u64,
    pub installed: u64,
    pub net: i64,
}

/// Sum bottle sizes over `sized`.
///
/// Packages without a bottle, or whose metadata cannot be fetched, add
/// nothing. Unknown sizes count as zero. A package only contributes to `net`
/// when it has installed kegs and a known installed size.
#[tracing::instrument(skip(graph, sized), fields(sized = sized.len()))]
pub fn total_sizes<G: PackageGraph + ?Sized>(graph: &G, sized: &SizedSet) -> SizeSummary {
    let mut summary = SizeSummary::default();

    for package in sized {
        if !graph.has_bottle(package) {
            debug!("{} has no bottle, leaving it out of the estimate", package);
            continue;
        }

        let bottle = match graph.bottle_metadata(package) {
            Ok(Some(bottle)) => bottle,
            Ok(None) => continue,
            Err(e) => {
                warn!("Could not fetch bottle metadata for {}: {:#}", package, e);
                continue;
            }
        };

        summary.download += bottle.download_size.unwrap_or(0);
        summary.installed += bottle.installed_size.unwrap_or(0);

        if let Some(delta) = net_contribution(graph, package, &bottle) {
            summary.net += delta;
        }
    }

    debug!("Estimated sizes: {:?}", summary);
    summary
}

fn net_contribution<G: PackageGraph + ?Sized>(
    graph: &G,
    package: &Package,
    bottle: &Bottle,
) -> Option<i64> {
    let installed_size = bottle.installed_size?;

    let kegs = match graph.installed_kegs(package) {
        Ok(kegs) => kegs,
        Err(e) => {
            warn!("Could not measure installed kegs of {}: {:#}", package, e);
            return None;
        }
    };
    if kegs.is_empty() {
        return None;
    }

    let existing: u64 = kegs.iter().map(Keg::disk_usage).sum();
    Some(to_signed(installed_size) - to_signed(existing))
}

fn to_signed(bytes: u64) -> i64 {
    i64::try_from(bytes).unwrap_or(i64::MAX)
}
