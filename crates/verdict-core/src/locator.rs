//! Find the verdict comment previously published on a pull request

use futures::TryStreamExt;
use verdict_report::contains_marker;

use crate::api::{comment_stream, CommentApi};
use crate::obs;
use crate::pr::{CommentId, PullRequestRef};
use crate::Result;

/// Outcome of a full scan of the comment listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Located {
    /// First verdict comment in listing order
    pub first: Option<CommentId>,
    /// Further verdict comments; non-empty only if an earlier race duplicated it
    pub duplicates: Vec<CommentId>,
    /// Number of comments inspected
    pub scanned: usize,
}

/// Return the id of the first comment carrying the verdict marker.
///
/// Stops listing as soon as a match is seen. "Not found" is `Ok(None)`;
/// listing failures are errors, never "not found".
pub async fn find_existing<A>(api: &A, pr: &PullRequestRef) -> Result<Option<CommentId>>
where
    A: CommentApi + ?Sized,
{
    let mut verdicts = Box::pin(
        comment_stream(api, pr).try_filter(|c| futures::future::ready(contains_marker(&c.body))),
    );
    Ok(verdicts.try_next().await?.map(|c| c.id))
}

/// Scan the whole listing, keeping the first verdict comment and recording
/// any duplicates so they can be reported.
pub async fn locate<A>(api: &A, pr: &PullRequestRef) -> Result<Located>
where
    A: CommentApi + ?Sized,
{
    let mut comments = Box::pin(comment_stream(api, pr));
    let mut located = Located::default();

    while let Some(comment) = comments.try_next().await? {
        located.scanned += 1;
        if !contains_marker(&comment.body) {
            continue;
        }
        if located.first.is_none() {
            located.first = Some(comment.id);
        } else {
            located.duplicates.push(comment.id);
        }
    }

    obs::emit_locate_finished(pr, located.scanned, located.first.as_ref());
    if let Some(kept) = &located.first {
        if !located.duplicates.is_empty() {
            obs::emit_ambiguous_verdicts(pr, kept, &located.duplicates);
        }
    }
    Ok(located)
}
