//! Pull request and comment identities

use serde::{Deserialize, Serialize};

use crate::error::VerdictError;
use crate::Result;

/// Target pull request (GitHub treats pull requests as issues for comments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub owner: String,
    pub repository: String,
    pub issue_number: u64,
}

impl PullRequestRef {
    pub fn new(owner: &str, repository: &str, issue_number: u64) -> Self {
        PullRequestRef {
            owner: owner.to_string(),
            repository: repository.to_string(),
            issue_number,
        }
    }

    /// Build from an `owner/repo` slug such as `GITHUB_REPOSITORY`.
    pub fn from_slug(slug: &str, issue_number: u64) -> Result<Self> {
        let (owner, repository) = slug
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| {
                VerdictError::Config(format!("expected owner/repo, got {:?}", slug))
            })?;
        if issue_number == 0 {
            return Err(VerdictError::Config("issue number must be positive".to_string()));
        }
        Ok(PullRequestRef::new(owner, repository, issue_number))
    }
}

impl std::fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.issue_number)
    }
}

/// Opaque comment identifier assigned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub String);

impl From<u64> for CommentId {
    fn from(id: u64) -> Self {
        CommentId(id.to_string())
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment as listed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteComment {
    pub id: CommentId,
    pub body: String,
}

impl RemoteComment {
    pub fn new(id: impl Into<CommentId>, body: &str) -> Self {
        RemoteComment {
            id: id.into(),
            body: body.to_string(),
        }
    }
}

/// One page of a comment listing.
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    /// Comments in server order, oldest first
    pub comments: Vec<RemoteComment>,
    /// Whether the server advertised another page
    pub has_next: bool,
}
