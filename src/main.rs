use anyhow::Result;
use brewplan::commands::{Config, InstallRequest, install};
use brewplan::plan::{BuildFlag, InstallOptions};
use clap::Parser;
use std::path::PathBuf;

/// brewplan - install planner
///
/// Works out what installing formulae would do: which packages need action,
/// which outdated dependencies and dependents would be upgraded along the way,
/// and how much would be downloaded and installed.
///
/// Examples:
///   brewplan install wget             # Plan installing wget
///   brewplan install --ask wget curl  # Show the size estimate and confirm first
#[derive(Parser, Debug)]
#[command(author, version = env!("BREWPLAN_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Installation prefix (overrides defaults; also via BREWPLAN_PREFIX)
    #[arg(long, env = "BREWPLAN_PREFIX", value_name = "PATH", global = true)]
    pub prefix: Option<PathBuf>,

    /// Formula index JSON (defaults to <prefix>/var/brewplan/formula.json)
    #[arg(long, env = "BREWPLAN_INDEX", value_name = "FILE", global = true)]
    pub index: Option<PathBuf>,

    /// Bottle tag to estimate sizes for (defaults to the host platform)
    #[arg(long, env = "BREWPLAN_BOTTLE_TAG", value_name = "TAG", global = true)]
    pub bottle_tag: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Plan installing one or more formulae
    Install(InstallArgs),
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Formula names or aliases
    #[arg(value_name = "FORMULA", required = true)]
    pub formulae: Vec<String>,

    /// Show the size estimate and ask before proceeding
    #[arg(long)]
    pub ask: bool,

    /// Show what would be installed without asking
    #[arg(long = "dry-run", short = 'n')]
    pub dry_run: bool,

    /// Act on formulae even when already installed
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Only install the dependencies of the formulae
    #[arg(long = "only-dependencies")]
    pub only_dependencies: bool,

    /// Skip dependencies, both for installing and for the size estimate
    #[arg(long = "ignore-dependencies")]
    pub ignore_dependencies: bool,

    /// Do not link the installed kegs into the prefix
    #[arg(long = "skip-link")]
    pub skip_link: bool,

    /// Build from the development branch
    #[arg(long = "HEAD")]
    pub head: bool,

    /// Build a bottle from source
    #[arg(long = "build-bottle")]
    pub build_bottle: bool,

    /// Compile from source even when a bottle exists
    #[arg(long = "build-from-source", short = 's')]
    pub build_from_source: bool,
}

impl InstallArgs {
    fn into_request(self) -> InstallRequest {
        let mut build_flags = Vec::new();
        if self.head {
            build_flags.push(BuildFlag::Head);
        }
        if self.build_bottle {
            build_flags.push(BuildFlag::BuildBottle);
        }
        if self.build_from_source {
            build_flags.push(BuildFlag::BuildFromSource);
        }

        InstallRequest {
            formulae: self.formulae,
            options: InstallOptions {
                force: self.force,
                only_dependencies: self.only_dependencies,
                skip_link: self.skip_link,
                ignore_dependencies: self.ignore_dependencies,
                build_flags,
            },
            ask: self.ask,
            dry_run: self.dry_run,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = brewplan::runtime::RealRuntime;

    match cli.command {
        Commands::Install(args) => {
            let config = Config::load(&runtime, cli.prefix, cli.index, cli.bottle_tag)?;
            install(&runtime, &config, args.into_request())?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from(["brewplan", "install", "wget", "curl"]).unwrap();
        let Commands::Install(args) = cli.command;
        assert_eq!(args.formulae, vec!["wget", "curl"]);
        assert!(!args.ask);
    }

    #[test]
    fn test_cli_build_flags_map_in_order() {
        let cli = Cli::try_parse_from([
            "brewplan",
            "install",
            "-s",
            "--HEAD",
            "--skip-link",
            "wget",
        ])
        .unwrap();
        let Commands::Install(args) = cli.command;
        let request = args.into_request();

        assert_eq!(
            request.options.build_flags,
            vec![BuildFlag::Head, BuildFlag::BuildFromSource]
        );
        assert!(request.options.skip_link);
    }

    #[test]
    fn test_cli_global_prefix_parsing() {
        let cli = Cli::try_parse_from(["brewplan", "--prefix", "/tmp", "install", "wget"]).unwrap();
        assert_eq!(cli.prefix, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_cli_install_requires_formula() {
        assert!(Cli::try_parse_from(["brewplan", "install"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["brewplan", "wget"]).is_err());
    }
}
