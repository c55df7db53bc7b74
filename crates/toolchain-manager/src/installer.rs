//! Toolchain installation
//!
//! `ToolchainInstaller` is the opaque "make version X available" capability.
//! `CommandInstaller` implements it by probing `<tool> --version` and running
//! a configured install command.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::ToolchainError;
use crate::platform::{Os, Platform};
use crate::version::{parse_version_output, ToolchainVersion};
use crate::Result;

/// Install and query a toolchain.
#[async_trait]
pub trait ToolchainInstaller: Send + Sync {
    /// Name of the toolchain binary.
    fn tool(&self) -> &str;

    /// Currently installed version, or `None` if the tool is absent.
    async fn installed_version(&self) -> Result<Option<String>>;

    /// Install `version` on `platform`.
    async fn install(&self, version: &ToolchainVersion, platform: &Platform) -> Result<()>;
}

/// Make sure `requested` is installed and return the installed version string.
///
/// Skips the install when the current toolchain already satisfies the
/// request. After installing, anything other than a matching version is
/// an error.
pub async fn ensure_toolchain<I>(
    installer: &I,
    platform: &Platform,
    requested: &ToolchainVersion,
) -> Result<String>
where
    I: ToolchainInstaller + ?Sized,
{
    if let Some(current) = installer.installed_version().await? {
        if requested.satisfied_by(&current) {
            info!(event = "toolchain.install.skipped", tool = installer.tool(), version = %current);
            return Ok(current);
        }
        debug!(tool = installer.tool(), current = %current, requested = %requested, "installed version does not match");
    }

    info!(
        event = "toolchain.install.started",
        tool = installer.tool(),
        version = %requested,
        os = %platform.os,
        arch = %platform.arch,
    );
    installer.install(requested, platform).await?;

    let actual = installer
        .installed_version()
        .await?
        .ok_or_else(|| ToolchainError::NotInstalled(installer.tool().to_string()))?;
    if !requested.satisfied_by(&actual) {
        warn!(event = "toolchain.install.mismatch", requested = %requested, actual = %actual);
        return Err(ToolchainError::VersionMismatch {
            requested: requested.to_string(),
            actual,
        });
    }

    info!(event = "toolchain.install.finished", tool = installer.tool(), version = %actual);
    Ok(actual)
}

/// Command installer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Toolchain binary name
    pub tool: String,
    /// Shell command template; `{version}`, `{os}` and `{arch}` are substituted
    pub install_command: Option<String>,
    /// Upper bound for the install command
    pub timeout_secs: u64,
    /// Upper bound for the `<tool> --version` probe
    pub probe_timeout_secs: u64,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        InstallerConfig {
            tool: std::env::var("VERDICT_TOOLCHAIN").unwrap_or_else(|_| "swift".to_string()),
            install_command: std::env::var("VERDICT_INSTALL_COMMAND")
                .ok()
                .filter(|c| !c.trim().is_empty()),
            timeout_secs: std::env::var("VERDICT_INSTALL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1800),
            probe_timeout_secs: std::env::var("VERDICT_PROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }
}

impl InstallerConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Set the toolchain binary name
    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tool = tool.to_string();
        self
    }

    /// Set the install command template
    pub fn with_install_command(mut self, command: &str) -> Self {
        self.install_command = Some(command.to_string());
        self
    }

    /// Set the install timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the version probe timeout
    pub fn with_probe_timeout_secs(mut self, probe_timeout_secs: u64) -> Self {
        self.probe_timeout_secs = probe_timeout_secs;
        self
    }
}

/// Substitute placeholders in an install command template.
pub fn expand_template(template: &str, version: &ToolchainVersion, platform: &Platform) -> String {
    template
        .replace("{version}", &version.to_string())
        .replace("{os}", &platform.os.to_string())
        .replace("{arch}", &platform.arch)
}

/// Installer backed by shell commands.
pub struct CommandInstaller {
    config: InstallerConfig,
}

impl CommandInstaller {
    pub fn new(config: InstallerConfig) -> Self {
        CommandInstaller { config }
    }

    /// Create installer from environment variables
    pub fn from_env() -> Self {
        Self::new(InstallerConfig::from_env())
    }

    fn shell(os: Os, script: &str) -> Command {
        let mut command = match os {
            Os::Windows => {
                let mut c = Command::new("cmd");
                c.args(["/C", script]);
                c
            }
            Os::MacOs | Os::Linux => {
                let mut c = Command::new("sh");
                c.args(["-c", script]);
                c
            }
        };
        command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl ToolchainInstaller for CommandInstaller {
    fn tool(&self) -> &str {
        &self.config.tool
    }

    async fn installed_version(&self) -> Result<Option<String>> {
        let mut probe = Command::new(&self.config.tool);
        probe
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let output = tokio::time::timeout(
            Duration::from_secs(self.config.probe_timeout_secs),
            probe.output(),
        )
        .await
        .map_err(|_| ToolchainError::Timeout {
            command: format!("{} --version", self.config.tool),
            secs: self.config.probe_timeout_secs,
        })?;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !output.status.success() {
            debug!(tool = %self.config.tool, status = ?output.status.code(), "version probe failed");
            return Ok(None);
        }

        // Some toolchains print the banner on stderr.
        let mut banner = String::from_utf8_lossy(&output.stdout).to_string();
        banner.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(parse_version_output(&banner, &self.config.tool))
    }

    async fn install(&self, version: &ToolchainVersion, platform: &Platform) -> Result<()> {
        let template = self
            .config
            .install_command
            .as_deref()
            .ok_or(ToolchainError::InstallerNotConfigured)?;
        let script = expand_template(template, version, platform);
        debug!(command = %script, "running install command");

        let child = Self::shell(platform.os, &script).spawn()?;
        let output = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| ToolchainError::Timeout {
            command: script.clone(),
            secs: self.config.timeout_secs,
        })??;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            info!(target: "toolchain.install", "{}", line);
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(ToolchainError::InstallFailed {
                version: version.to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
