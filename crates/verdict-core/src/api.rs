//! Comment collaborator interface
//!
//! `CommentApi` is the narrow surface the locator and publisher need from a
//! code host: paged listing, create, full-body update. The GitHub REST client
//! and the in-memory fake both implement it.

use async_trait::async_trait;
use futures::stream::{self, Stream, TryStreamExt};

use crate::error::VerdictError;
use crate::pr::{CommentId, CommentPage, PullRequestRef, RemoteComment};
use crate::Result;

/// Comment operations on a pull request. Credentials are owned by the implementor
/// and attached to every call.
#[async_trait]
pub trait CommentApi: Send + Sync {
    /// Fetch one page of comments (1-based), oldest first.
    async fn list_comments(&self, pr: &PullRequestRef, page: u32) -> Result<CommentPage>;

    /// Create a comment and return its server-assigned id.
    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<CommentId>;

    /// Replace the body of an existing comment.
    async fn update_comment(&self, pr: &PullRequestRef, id: &CommentId, body: &str)
        -> Result<()>;
}

/// Lazily walk every comment on `pr` in listing order.
///
/// Pages are requested only as the stream is polled. The stream ends after
/// the last advertised page, or at the first empty page.
pub fn comment_stream<'a, A>(
    api: &'a A,
    pr: &'a PullRequestRef,
) -> impl Stream<Item = Result<RemoteComment>> + 'a
where
    A: CommentApi + ?Sized,
{
    stream::try_unfold(Some(1u32), move |page| async move {
        let Some(page) = page else {
            return Ok::<_, VerdictError>(None);
        };
        let batch = api.list_comments(pr, page).await?;
        let next = (batch.has_next && !batch.comments.is_empty()).then(|| page + 1);
        let comments = stream::iter(batch.comments.into_iter().map(Ok::<_, VerdictError>));
        Ok(Some((comments, next)))
    })
    .try_flatten()
}
