//! GitHub client configuration
//!
//! Defaults come from the environment a GitHub Actions runner provides.

use serde::{Deserialize, Serialize};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitHub REST client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// REST base URL (GitHub Enterprise installs use `<host>/api/v3`)
    pub api_url: String,
    /// Bearer token; required for every call
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Per-request timeout; expiry is a transport error
    pub timeout_secs: u64,
    /// User-Agent header (required by the GitHub API)
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        GitHubConfig {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_secs: std::env::var("VERDICT_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("verdict/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GitHubConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific API endpoint, ignoring the environment
    pub fn new(api_url: &str) -> Self {
        GitHubConfig {
            api_url: api_url.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("verdict/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Set request timeout
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
