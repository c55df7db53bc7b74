//! Error types for verdict-core

use thiserror::Error;
use verdict_report::ReportError;

/// Collaborator call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListComments,
    CreateComment,
    UpdateComment,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::ListComments => "list comments",
            Operation::CreateComment => "create comment",
            Operation::UpdateComment => "update comment",
        };
        write!(f, "{}", name)
    }
}

/// Errors that abort a verdict run.
#[derive(Error, Debug)]
pub enum VerdictError {
    /// Report rejected before any network call
    #[error("Invalid build report: {0}")]
    Input(#[from] ReportError),

    /// Network failure, non-success status or undecodable response
    #[error("Failed to {operation} on {target}: {reason}")]
    Transport {
        operation: Operation,
        target: String,
        reason: String,
    },

    /// Credential missing or rejected
    #[error("Authorization failed for {target}: {reason} (check the token and that it may write issue comments)")]
    Authorization { target: String, reason: String },

    /// Client could not be configured
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl VerdictError {
    pub fn transport(operation: Operation, target: impl ToString, reason: impl Into<String>) -> Self {
        VerdictError::Transport {
            operation,
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    /// True for every failure talking to the collaborator, authorization included.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            VerdictError::Transport { .. } | VerdictError::Authorization { .. }
        )
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, VerdictError::Authorization { .. })
    }
}

/// Result type for verdict operations
pub type Result<T> = std::result::Result<T, VerdictError>;
