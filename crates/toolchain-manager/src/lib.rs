//! Toolchain-Manager: install a requested toolchain on a build agent
//!
//! Detects the host platform, validates the requested version, installs it
//! through a [`ToolchainInstaller`] and verifies what ended up on `PATH`.
//! The verdict publisher treats all of this as an opaque capability that
//! returns the installed version string.

pub mod error;
pub mod installer;
pub mod platform;
pub mod version;

pub use error::ToolchainError;
pub use installer::{
    ensure_toolchain, expand_template, CommandInstaller, InstallerConfig, ToolchainInstaller,
};
pub use platform::{parse_os_release, Os, Platform};
pub use version::{parse_version_output, ToolchainVersion};

/// Result type for toolchain operations
pub type Result<T> = std::result::Result<T, ToolchainError>;
