pub mod config;
mod install;
mod paths;

pub use config::Config;
pub use install::{InstallRequest, install, run};
pub use paths::{cellar_dir, default_index_path, default_prefix};
