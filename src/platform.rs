//! Host platform detection for bottle selection.

/// macOS release bottles are looked up for when the host tag is not overridden.
const MACOS_CODENAME: &str = "sequoia";

#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub os: String,
    pub arch: String,
}

impl Platform {
    /// Detect the current platform
    pub fn detect() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: Self::detect_arch(),
        }
    }

    fn detect_arch() -> String {
        #[cfg(target_arch = "x86_64")]
        {
            "x86_64".to_string()
        }
        #[cfg(target_arch = "aarch64")]
        {
            "arm64".to_string()
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            std::env::consts::ARCH.to_string()
        }
    }

    /// Bottle tag used to pick files from the index, e.g. `arm64_sequoia`
    /// or `x86_64_linux`.
    pub fn bottle_tag(&self) -> String {
        match (self.os.as_str(), self.arch.as_str()) {
            ("macos", "x86_64") => MACOS_CODENAME.to_string(),
            ("macos", arch) => format!("{}_{}", arch, MACOS_CODENAME),
            (os, arch) => format!("{}_{}", arch, os),
        }
    }
}
