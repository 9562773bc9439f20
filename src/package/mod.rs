//! Package model: formula handles, kegs, bottles and the formula index.

mod index;
mod model;
mod version;

pub use index::{
    ALL_BOTTLE_TAG, BottleFile, BottleInfo, BottleSpec, FormulaIndex, FormulaInfo, FormulaVersions,
};
pub use model::{Bottle, Keg, Package};
pub use version::VersionComparator;
