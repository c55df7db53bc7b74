//! Error types for toolchain-manager

use thiserror::Error;

/// Errors that can occur while installing or verifying a toolchain
#[derive(Error, Debug)]
pub enum ToolchainError {
    /// Host operating system is not supported
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Requested version string is not a dotted numeric version
    #[error("Invalid toolchain version: {0:?}")]
    InvalidVersion(String),

    /// No install command configured
    #[error("No install command configured (set VERDICT_INSTALL_COMMAND)")]
    InstallerNotConfigured,

    /// Install command exited unsuccessfully
    #[error("Installing {version} failed with exit code {exit_code}: {stderr}")]
    InstallFailed {
        version: String,
        exit_code: i32,
        stderr: String,
    },

    /// A command did not finish in time
    #[error("Command {command:?} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    /// Toolchain binary not found after install
    #[error("{0} is not installed or not in PATH")]
    NotInstalled(String),

    /// Installed version differs from the requested one
    #[error("Failed to set up requested version: requested {requested}, actual {actual}")]
    VersionMismatch { requested: String, actual: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
