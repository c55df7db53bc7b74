//! Create or update the verdict comment

use serde::Serialize;

use crate::api::CommentApi;
use crate::obs;
use crate::pr::{CommentId, PullRequestRef};
use crate::Result;

/// Which write was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishAction {
    Created,
    Updated,
}

impl std::fmt::Display for PublishAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishAction::Created => write!(f, "created"),
            PublishAction::Updated => write!(f, "updated"),
        }
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Published {
    pub comment_id: CommentId,
    pub action: PublishAction,
}

/// Write `body` to the pull request: update `existing` when given, otherwise
/// create a new comment.
///
/// Issues exactly one write and never retries.
pub async fn publish<A>(
    api: &A,
    pr: &PullRequestRef,
    body: &str,
    existing: Option<&CommentId>,
) -> Result<Published>
where
    A: CommentApi + ?Sized,
{
    let published = match existing {
        Some(id) => {
            api.update_comment(pr, id, body).await?;
            Published {
                comment_id: id.clone(),
                action: PublishAction::Updated,
            }
        }
        None => Published {
            comment_id: api.create_comment(pr, body).await?,
            action: PublishAction::Created,
        },
    };
    obs::emit_comment_published(pr, published.action, &published.comment_id);
    Ok(published)
}
