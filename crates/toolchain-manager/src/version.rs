//! Toolchain version parsing and matching

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ToolchainError;
use crate::Result;

/// Requested toolchain version: one to three numeric components.
///
/// A shorter request matches any installed version it prefixes,
/// so `5.9` is satisfied by `5.9.2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolchainVersion {
    components: Vec<u64>,
}

impl ToolchainVersion {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let components = text
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| ToolchainError::InvalidVersion(text.to_string()))?;
        if components.is_empty() || components.len() > 3 {
            return Err(ToolchainError::InvalidVersion(text.to_string()));
        }
        Ok(ToolchainVersion { components })
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Whether an installed version string satisfies this request.
    pub fn satisfied_by(&self, installed: &str) -> bool {
        match ToolchainVersion::parse(installed) {
            Ok(installed) => installed.components.starts_with(&self.components),
            Err(_) => false,
        }
    }
}

impl std::fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .components
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{}", joined)
    }
}

/// Extract the version from a `<tool> --version` banner.
///
/// Prefers the number following `<tool> version`, since banners such as
/// `swift-driver version: 1.87.3 Apple Swift version 5.9.2` mention
/// several versions. Falls back to the first dotted number.
pub fn parse_version_output(output: &str, tool: &str) -> Option<String> {
    let named = Regex::new(&format!(
        r"(?i)\b{}\s+version:?\s+(\d+(?:\.\d+)+)",
        regex::escape(tool)
    ))
    .ok()?;
    if let Some(caps) = named.captures(output) {
        return Some(caps[1].to_string());
    }
    let dotted = Regex::new(r"\b(\d+(?:\.\d+)+)\b").ok()?;
    dotted.captures(output).map(|caps| caps[1].to_string())
}
