//! Structured observability hooks for the verdict run.
//!
//! Every run is instrumented with a span tagged with the target pull
//! request; lifecycle events are emitted at `info!` (ambiguity at `warn!`).
//! Set `RUST_LOG=verdict_core=debug` to see per-page listing detail.

use tracing::{info, warn};

use crate::pr::{CommentId, PullRequestRef};
use crate::publisher::PublishAction;

/// Span scoped to one pull request; attach with `tracing::Instrument`.
pub fn verdict_span(pr: &PullRequestRef) -> tracing::Span {
    tracing::info_span!("verdict.run", pr = %pr)
}

/// Emit event: listing scanned, with the comment that will be reused (if any).
pub fn emit_locate_finished(pr: &PullRequestRef, scanned: usize, found: Option<&CommentId>) {
    info!(
        event = "verdict.locate.finished",
        pr = %pr,
        scanned = scanned,
        found = found.map(|id| id.0.as_str()).unwrap_or("none"),
    );
}

/// Emit event: more than one verdict comment exists; the first is kept.
pub fn emit_ambiguous_verdicts(pr: &PullRequestRef, kept: &CommentId, duplicates: &[CommentId]) {
    let ignored = duplicates
        .iter()
        .map(|id| id.0.as_str())
        .collect::<Vec<_>>()
        .join(",");
    warn!(
        event = "verdict.locate.ambiguous",
        pr = %pr,
        kept = %kept,
        ignored = %ignored,
    );
}

/// Emit event: the verdict comment was written.
pub fn emit_comment_published(pr: &PullRequestRef, action: PublishAction, id: &CommentId) {
    info!(
        event = "verdict.comment.published",
        pr = %pr,
        action = %action,
        comment_id = %id,
    );
}

/// Emit event: the run aborted.
pub fn emit_run_failed(pr: &PullRequestRef, error: &dyn std::fmt::Display) {
    warn!(event = "verdict.run.failed", pr = %pr, error = %error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_span_create() {
        let _span = verdict_span(&PullRequestRef::new("octo", "widgets", 7)).entered();
        emit_locate_finished(&PullRequestRef::new("octo", "widgets", 7), 0, None);
    }
}
