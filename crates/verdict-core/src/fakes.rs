//! In-memory fake of the comment collaborator (testing only)
//!
//! `MemoryCommentApi` keeps comments per pull request, pages them like the
//! server does, counts calls, and can be told to fail a specific operation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::CommentApi;
use crate::error::{Operation, VerdictError};
use crate::pr::{CommentId, CommentPage, PullRequestRef, RemoteComment};
use crate::Result;

/// Failure the fake should report for an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeFailure {
    /// Credential rejected (HTTP 401)
    Unauthorized,
    /// Non-success status
    Status(u16),
    /// Response body could not be decoded
    Malformed,
}

#[derive(Debug, Default)]
struct FakeState {
    comments: HashMap<PullRequestRef, Vec<RemoteComment>>,
    next_id: u64,
    list_calls: usize,
    creates: usize,
    updates: usize,
    failures: HashMap<Operation, FakeFailure>,
}

/// In-memory comment store implementing [`CommentApi`].
#[derive(Debug)]
pub struct MemoryCommentApi {
    state: Mutex<FakeState>,
    page_size: usize,
}

impl Default for MemoryCommentApi {
    fn default() -> Self {
        MemoryCommentApi {
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..FakeState::default()
            }),
            page_size: 100,
        }
    }
}

impl MemoryCommentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve listings in pages of `page_size` comments.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Add an existing comment (e.g. from a human or a previous run).
    pub fn seed(&self, pr: &PullRequestRef, body: &str) -> CommentId {
        let mut state = self.state.lock().unwrap();
        insert_comment(&mut state, pr, body)
    }

    /// Make every subsequent call of `operation` fail.
    pub fn fail(&self, operation: Operation, failure: FakeFailure) {
        let mut state = self.state.lock().unwrap();
        state.failures.insert(operation, failure);
    }

    /// Snapshot of the comments on `pr`, oldest first.
    pub fn comments(&self, pr: &PullRequestRef) -> Vec<RemoteComment> {
        let state = self.state.lock().unwrap();
        state.comments.get(pr).cloned().unwrap_or_default()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }

    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn update_calls(&self) -> usize {
        self.state.lock().unwrap().updates
    }

    /// Total writes (create + update) observed.
    pub fn write_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.creates + state.updates
    }
}

fn insert_comment(state: &mut FakeState, pr: &PullRequestRef, body: &str) -> CommentId {
    state.next_id += 1;
    let id = CommentId::from(state.next_id);
    state
        .comments
        .entry(pr.clone())
        .or_default()
        .push(RemoteComment {
            id: id.clone(),
            body: body.to_string(),
        });
    id
}

fn check_failure(state: &FakeState, operation: Operation, pr: &PullRequestRef) -> Result<()> {
    match state.failures.get(&operation) {
        None => Ok(()),
        Some(FakeFailure::Unauthorized) => Err(VerdictError::Authorization {
            target: pr.to_string(),
            reason: format!("{} returned HTTP 401", operation),
        }),
        Some(FakeFailure::Status(status)) => Err(VerdictError::transport(
            operation,
            pr,
            format!("HTTP {}", status),
        )),
        Some(FakeFailure::Malformed) => Err(VerdictError::transport(
            operation,
            pr,
            "malformed response body",
        )),
    }
}

#[async_trait]
impl CommentApi for MemoryCommentApi {
    async fn list_comments(&self, pr: &PullRequestRef, page: u32) -> Result<CommentPage> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        check_failure(&state, Operation::ListComments, pr)?;

        let all = state.comments.get(pr).map(Vec::as_slice).unwrap_or_default();
        let start = (page.max(1) as usize - 1) * self.page_size;
        let end = (start + self.page_size).min(all.len());
        let comments = all.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        Ok(CommentPage {
            comments,
            has_next: end < all.len(),
        })
    }

    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<CommentId> {
        let mut state = self.state.lock().unwrap();
        state.creates += 1;
        check_failure(&state, Operation::CreateComment, pr)?;
        Ok(insert_comment(&mut state, pr, body))
    }

    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        id: &CommentId,
        body: &str,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.updates += 1;
        check_failure(&state, Operation::UpdateComment, pr)?;

        let comment = state
            .comments
            .get_mut(pr)
            .and_then(|comments| comments.iter_mut().find(|c| &c.id == id))
            .ok_or_else(|| {
                VerdictError::transport(
                    Operation::UpdateComment,
                    format!("{} (comment {})", pr, id),
                    "HTTP 404",
                )
            })?;
        comment.body = body.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr() -> PullRequestRef {
        PullRequestRef::new("octo", "widgets", 7)
    }

    #[tokio::test]
    async fn create_assigns_fresh_ids() {
        let api = MemoryCommentApi::new();
        let a = api.create_comment(&pr(), "a").await.unwrap();
        let b = api.create_comment(&pr(), "b").await.unwrap();

        assert_ne!(a, b);
        assert_eq!(api.comments(&pr()).len(), 2);
        assert_eq!(api.create_calls(), 2);
    }

    #[tokio::test]
    async fn pages_split_at_page_size() {
        let api = MemoryCommentApi::new().with_page_size(2);
        for body in ["a", "b", "c"] {
            api.seed(&pr(), body);
        }

        let first = api.list_comments(&pr(), 1).await.unwrap();
        let second = api.list_comments(&pr(), 2).await.unwrap();
        let third = api.list_comments(&pr(), 3).await.unwrap();

        assert_eq!(first.comments.len(), 2);
        assert!(first.has_next);
        assert_eq!(second.comments.len(), 1);
        assert!(!second.has_next);
        assert!(third.comments.is_empty());
    }

    #[tokio::test]
    async fn update_unknown_comment_is_transport_error() {
        let api = MemoryCommentApi::new();
        let err = api
            .update_comment(&pr(), &CommentId::from(1u64), "x")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            VerdictError::Transport {
                operation: Operation::UpdateComment,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn comments_are_scoped_per_pull_request() {
        let api = MemoryCommentApi::new();
        let other = PullRequestRef::new("octo", "widgets", 8);
        api.seed(&pr(), "mine");
        api.seed(&other, "theirs");

        let page = api.list_comments(&pr(), 1).await.unwrap();
        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].body, "mine");
    }

    #[tokio::test]
    async fn injected_failure_is_reported() {
        let api = MemoryCommentApi::new();
        api.fail(Operation::CreateComment, FakeFailure::Unauthorized);

        let err = api.create_comment(&pr(), "x").await.unwrap_err();
        assert!(err.is_authorization());
        assert!(api.comments(&pr()).is_empty());
    }
}
