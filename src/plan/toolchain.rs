use log::debug;

use crate::runtime::Runtime;

const COMPILERS: &[&str] = &["cc", "clang", "gcc"];

/// Whether a C compiler is available for source builds.
///
/// A non-empty `CC` wins; otherwise the usual compiler names are looked up on `PATH`.
#[tracing::instrument(skip(runtime))]
pub fn has_build_toolchain<R: Runtime + ?Sized>(runtime: &R) -> bool {
    if let Ok(cc) = runtime.env_var("CC")
        && !cc.trim().is_empty()
    {
        debug!("Using compiler from CC: {}", cc);
        return true;
    }

    match COMPILERS.iter().find_map(|name| runtime.find_executable(name)) {
        Some(path) => {
            debug!("Found compiler at {:?}", path);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use std::env::VarError;
    use std::path::PathBuf;

    #[test]
    fn test_cc_env_var_is_enough() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq("CC"))
            .returning(|_| Ok("clang".into()));
        runtime.expect_find_executable().never();

        assert!(has_build_toolchain(&runtime));
    }

    #[test]
    fn test_falls_back_to_path_lookup() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .returning(|_| Err(VarError::NotPresent));
        runtime
            .expect_find_executable()
            .returning(|name| (name == "gcc").then(|| PathBuf::from("/usr/bin/gcc")));

        assert!(has_build_toolchain(&runtime));
    }

    #[test]
    fn test_no_compiler_anywhere() {
        let mut runtime = MockRuntime::new();
        runtime.expect_env_var().returning(|_| Ok("  ".into()));
        runtime.expect_find_executable().times(3).returning(|_| None);

        assert!(!has_build_toolchain(&runtime));
    }
}
