use thiserror::Error;

/// Failures that abort planning before any network or interactive work.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("No available formula with the name \"{}\".", .names.join("\", \""))]
    UnresolvableTarget { names: Vec<String> },

    #[error(
        "The following flags:\n  {}\nrequire a compiler to be installed, but none was found.\nInstall a C compiler, or remove the flags to install from bottles where available.",
        .flags.join(" ")
    )]
    BuildFlags { flags: Vec<String> },
}
