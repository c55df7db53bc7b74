//! Host platform detection

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ToolchainError;
use crate::Result;

/// Operating systems a toolchain can be installed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    MacOs,
    Linux,
    Windows,
}

impl Os {
    /// Map a Rust target OS name (`std::env::consts::OS`).
    pub fn from_target(name: &str) -> Result<Self> {
        match name {
            "macos" => Ok(Os::MacOs),
            "linux" => Ok(Os::Linux),
            "windows" => Ok(Os::Windows),
            other => Err(ToolchainError::UnsupportedPlatform(other.to_string())),
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Os::MacOs => "macos",
            Os::Linux => "linux",
            Os::Windows => "windows",
        };
        write!(f, "{}", name)
    }
}

/// Build agent platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    /// CPU architecture (`x86_64`, `aarch64`, ...)
    pub arch: String,
    /// Distribution release on Linux (e.g. `22.04`)
    pub release: Option<String>,
}

impl Platform {
    pub fn new(os: Os, arch: &str) -> Self {
        Platform {
            os,
            arch: arch.to_string(),
            release: None,
        }
    }

    /// Detect the platform this process runs on.
    pub fn detect() -> Result<Self> {
        let os = Os::from_target(std::env::consts::OS)?;
        let release = match os {
            Os::Linux => std::fs::read_to_string("/etc/os-release")
                .ok()
                .and_then(|content| parse_os_release(&content)),
            _ => None,
        };
        let platform = Platform {
            os,
            arch: std::env::consts::ARCH.to_string(),
            release,
        };
        debug!(os = %platform.os, arch = %platform.arch, release = ?platform.release, "detected platform");
        Ok(platform)
    }
}

/// Extract `VERSION_ID` from an os-release file.
pub fn parse_os_release(content: &str) -> Option<String> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("VERSION_ID="))
        .map(|value| value.trim_matches('"').trim_matches('\'').to_string())
        .find(|value| !value.is_empty())
}
