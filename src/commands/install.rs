use anyhow::{Result, bail};
use log::{debug, info};
use std::io::{self, BufRead, Write};

use super::config::Config;
use crate::graph::{Cellar, HttpBottleFetcher, IndexGraph, PackageGraph};
use crate::package::FormulaIndex;
use crate::plan::{
    InstallOptions, InstallPlan, KegInstallDecision, PlanConfig, PlanOutcome, Planner, confirm,
    render_estimate,
};
use crate::runtime::Runtime;

/// What the user asked the install command to do.
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    pub formulae: Vec<String>,
    pub options: InstallOptions,
    pub ask: bool,
    pub dry_run: bool,
}

#[tracing::instrument(skip(runtime, config, request))]
pub fn install<R: Runtime>(runtime: &R, config: &Config, request: InstallRequest) -> Result<()> {
    let index = FormulaIndex::load(runtime, &config.index_path)?;
    info!("Loaded {} formulae from {}", index.len(), config.index_path.display());

    let fetcher = HttpBottleFetcher::new(config.http_client()?, config.registry_token.clone());
    let cellar = Cellar::new(runtime, config.cellar.clone());
    let graph = IndexGraph::new(index, cellar, fetcher, config.bottle_tag.clone());

    let request = InstallRequest {
        ask: request.ask || config.ask,
        ..request
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run(&graph, config.plan, request, &mut input, &mut output)
}

/// Plan, optionally estimate and confirm, then hand the plan over.
#[tracing::instrument(skip(graph, request, input, output))]
pub fn run<G, I, O>(
    graph: &G,
    plan_config: PlanConfig,
    request: InstallRequest,
    input: &mut I,
    output: &mut O,
) -> Result<()>
where
    G: PackageGraph + ?Sized,
    I: BufRead,
    O: Write,
{
    let planner = Planner::new(graph, plan_config);
    let requested = planner.resolve(&request.formulae)?;
    let decision = KegInstallDecision::new(graph, plan_config.upgrade_on_install);

    let plan = match planner.plan(&decision, &requested, request.options)? {
        PlanOutcome::Proceed(plan) => plan,
        PlanOutcome::NothingToDo => {
            debug!("Nothing to do for {:?}", request.formulae);
            return Ok(());
        }
    };

    if request.dry_run {
        let (sized, summary) = planner.estimate(&plan);
        render_estimate(&summary, &sized, output)?;
        writeln!(output, "==> Dry run: nothing will be installed")?;
        print_plan(&plan, output)?;
        return Ok(());
    }

    if request.ask {
        let (sized, summary) = planner.estimate(&plan);
        if !confirm(&summary, &sized, input, output)? {
            bail!("Installation aborted.");
        }
    }

    print_plan(&plan, output)
}

fn print_plan<O: Write>(plan: &InstallPlan, output: &mut O) -> Result<()> {
    for planned in &plan.packages {
        writeln!(output, "==> {} {}", planned.action.verb(), planned.package)?;
    }
    if plan.options.skip_link {
        writeln!(output, "Kegs will not be linked into the prefix.")?;
    }
    if !plan.options.build_flags.is_empty() {
        let flags: Vec<&str> = plan.options.build_flags.iter().map(|f| f.as_flag()).collect();
        writeln!(output, "Building from source with {}", flags.join(" "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{BuildFlag, PlanError};
    use crate::test_utils::{FakeNode, mock_graph};
    use std::io::Cursor;

    fn graph() -> crate::graph::MockPackageGraph {
        mock_graph(vec![
            FakeNode::new("wget").deps(&["openssl@3"]).bottle(Some(2048), Some(4096)),
            FakeNode::new("openssl@3")
                .deps(&["ca-certificates"])
                .outdated()
                .bottle(Some(1024), Some(8192))
                .kegs(&[10240]),
            FakeNode::new("ca-certificates").installed(),
            FakeNode::new("jq").installed(),
            FakeNode::new("cmake"),
        ])
    }

    fn request(formulae: &[&str]) -> InstallRequest {
        InstallRequest {
            formulae: formulae.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn execute(request: InstallRequest, answer: &str) -> (Result<()>, String) {
        let graph = graph();
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = run(&graph, PlanConfig::default(), request, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_install_prints_plan() {
        let (result, out) = execute(request(&["wget", "openssl@3"]), "");

        result.unwrap();
        assert_eq!(out, "==> Installing wget\n==> Upgrading openssl@3\n");
    }

    #[test]
    fn test_ask_confirmed_shows_estimate_then_plan() {
        let mut req = request(&["wget"]);
        req.ask = true;

        let (result, out) = execute(req, "y\n");

        result.unwrap();
        assert!(out.contains("Formulae (2): wget, openssl@3\n"));
        assert!(out.contains("Download Size: 3KB\n"));
        assert!(out.contains("Install Size:  12KB\n"));
        assert!(out.contains("Net Install Size: -2KB\n"));
        assert!(out.ends_with("==> Installing wget\n"));
    }

    #[test]
    fn test_ask_rejected_aborts() {
        let mut req = request(&["wget"]);
        req.ask = true;

        let (result, out) = execute(req, "maybe\nn\n");

        assert_eq!(result.unwrap_err().to_string(), "Installation aborted.");
        assert!(!out.contains("==> Installing"));
    }

    #[test]
    fn test_dry_run_never_prompts() {
        let mut req = request(&["wget"]);
        req.ask = true;
        req.dry_run = true;

        let (result, out) = execute(req, "");

        result.unwrap();
        assert!(out.contains("Download Size"));
        assert!(!out.contains("Do you want to proceed"));
        assert!(out.contains("==> Dry run: nothing will be installed\n==> Installing wget\n"));
    }

    #[test]
    fn test_unknown_formula_is_reported() {
        let (result, _) = execute(request(&["wget", "nosuch"]), "");

        let err = result.unwrap_err();
        assert_eq!(
            err.downcast_ref::<PlanError>(),
            Some(&PlanError::UnresolvableTarget {
                names: vec!["nosuch".to_string()],
            })
        );
    }

    #[test]
    fn test_up_to_date_request_is_nothing_to_do() {
        let (result, out) = execute(request(&["jq"]), "");

        result.unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_build_flags_fail_before_prompting() {
        let mut req = request(&["cmake"]);
        req.ask = true;
        req.options.build_flags = vec![BuildFlag::BuildFromSource];
        let graph = graph();
        let config = PlanConfig {
            env_has_build_toolchain: false,
            ..Default::default()
        };
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        let err = run(&graph, config, req, &mut input, &mut output).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PlanError>(),
            Some(PlanError::BuildFlags { .. })
        ));
        assert!(output.is_empty());
    }
}
