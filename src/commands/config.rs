use anyhow::Result;
use log::debug;
use reqwest::blocking::Client;
use std::path::PathBuf;

use super::paths::{cellar_dir, default_index_path, default_prefix};
use crate::graph::ANONYMOUS_TOKEN;
use crate::http::HttpClient;
use crate::plan::{PlanConfig, has_build_toolchain};
use crate::platform::Platform;
use crate::runtime::Runtime;

pub const NO_INSTALLED_DEPENDENTS_CHECK: &str = "BREWPLAN_NO_INSTALLED_DEPENDENTS_CHECK";
pub const NO_INSTALL_UPGRADE: &str = "BREWPLAN_NO_INSTALL_UPGRADE";
pub const ASK: &str = "BREWPLAN_ASK";
pub const REGISTRY_TOKEN: &str = "BREWPLAN_REGISTRY_TOKEN";

/// Everything the install command needs, resolved once from flags and the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub prefix: PathBuf,
    pub cellar: PathBuf,
    pub index_path: PathBuf,
    pub bottle_tag: String,
    pub registry_token: String,
    pub ask: bool,
    pub plan: PlanConfig,
}

impl Config {
    pub fn load<R: Runtime>(
        runtime: &R,
        prefix: Option<PathBuf>,
        index_path: Option<PathBuf>,
        bottle_tag: Option<String>,
    ) -> Result<Self> {
        let prefix = match prefix {
            Some(path) => path,
            None => default_prefix(runtime)?,
        };
        let index_path = index_path.unwrap_or_else(|| default_index_path(&prefix));
        let bottle_tag = bottle_tag.unwrap_or_else(|| Platform::detect().bottle_tag());

        let registry_token = match runtime.env_var(REGISTRY_TOKEN) {
            Ok(token) if !token.is_empty() => {
                debug!("Using {} for bottle manifests", REGISTRY_TOKEN);
                token
            }
            _ => ANONYMOUS_TOKEN.to_string(),
        };

        let plan = PlanConfig {
            check_installed_dependents: !env_flag(runtime, NO_INSTALLED_DEPENDENTS_CHECK),
            upgrade_on_install: !env_flag(runtime, NO_INSTALL_UPGRADE),
            env_has_build_toolchain: has_build_toolchain(runtime),
        };

        let config = Self {
            cellar: cellar_dir(&prefix),
            prefix,
            index_path,
            bottle_tag,
            registry_token,
            ask: env_flag(runtime, ASK),
            plan,
        };
        debug!(
            "Using prefix {}, index {}, bottle tag {}",
            config.prefix.display(),
            config.index_path.display(),
            config.bottle_tag
        );
        Ok(config)
    }

    pub fn http_client(&self) -> Result<HttpClient> {
        let client = Client::builder()
            .user_agent(concat!("brewplan/", env!("BREWPLAN_VERSION")))
            .build()?;
        Ok(HttpClient::new(client))
    }
}

/// A toggle is on when set to anything but empty, `0` or `false`.
fn env_flag<R: Runtime>(runtime: &R, key: &str) -> bool {
    match runtime.env_var(key) {
        Ok(value) => {
            let value = value.trim();
            !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use std::collections::HashMap;
    use std::env::VarError;

    /// Mock runtime whose environment holds exactly `vars`.
    fn runtime_with_env(vars: &[(&str, &str)]) -> MockRuntime {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(move |key| vars.get(key).cloned().ok_or(VarError::NotPresent));
        runtime.expect_find_executable().returning(|_| None);
        runtime
    }

    #[test]
    fn test_defaults_with_explicit_prefix() {
        // --- Setup ---
        let runtime = runtime_with_env(&[]);

        // --- Execute ---
        let config = Config::load(
            &runtime,
            Some(PathBuf::from("/p")),
            None,
            Some("x86_64_linux".into()),
        )
        .unwrap();

        // --- Verify ---
        assert_eq!(config.cellar, PathBuf::from("/p/Cellar"));
        assert_eq!(config.index_path, PathBuf::from("/p/var/brewplan/formula.json"));
        assert_eq!(config.bottle_tag, "x86_64_linux");
        assert_eq!(config.registry_token, ANONYMOUS_TOKEN);
        assert!(!config.ask);
        assert_eq!(
            config.plan,
            PlanConfig {
                check_installed_dependents: true,
                upgrade_on_install: true,
                env_has_build_toolchain: false,
            }
        );
    }

    #[test]
    fn test_environment_toggles() {
        // --- Setup ---
        let runtime = runtime_with_env(&[
            (NO_INSTALLED_DEPENDENTS_CHECK, "1"),
            (NO_INSTALL_UPGRADE, "true"),
            (ASK, "yes"),
            (REGISTRY_TOKEN, "secret"),
            ("CC", "clang"),
        ]);

        // --- Execute ---
        let config = Config::load(
            &runtime,
            Some(PathBuf::from("/p")),
            Some(PathBuf::from("/tmp/index.json")),
            None,
        )
        .unwrap();

        // --- Verify ---
        assert_eq!(config.index_path, PathBuf::from("/tmp/index.json"));
        assert_eq!(config.registry_token, "secret");
        assert!(config.ask);
        assert!(!config.plan.check_installed_dependents);
        assert!(!config.plan.upgrade_on_install);
        assert!(config.plan.env_has_build_toolchain);
    }

    #[test]
    fn test_env_flag_false_values() {
        let runtime = runtime_with_env(&[("A", "0"), ("B", "FALSE"), ("C", ""), ("D", "on")]);
        assert!(!env_flag(&runtime, "A"));
        assert!(!env_flag(&runtime, "B"));
        assert!(!env_flag(&runtime, "C"));
        assert!(env_flag(&runtime, "D"));
        assert!(!env_flag(&runtime, "MISSING"));
    }
}
