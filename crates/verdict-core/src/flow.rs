//! One verdict run: validate, render, locate, publish
//!
//! ```text
//! START -> locate -> FOUND(id)  -> update(id) -> DONE
//!                 -> NOT_FOUND  -> create()   -> DONE
//! ```
//!
//! Steps run strictly in sequence; the create/update decision depends on
//! the listing. Two runs racing on the same pull request can both see
//! NOT_FOUND and both create a comment; the API offers no lock to prevent it.

use rand::Rng;
use tracing::{info, Instrument};
use verdict_report::{render, BuildReport};

use crate::api::CommentApi;
use crate::locator::locate;
use crate::obs;
use crate::pr::PullRequestRef;
use crate::publisher::{publish, Published};
use crate::Result;

/// Render `report` and publish it as the verdict comment on `pr`.
///
/// The report is validated before any network call.
pub async fn publish_verdict<A, R>(
    api: &A,
    pr: &PullRequestRef,
    report: &BuildReport,
    rng: &mut R,
) -> Result<Published>
where
    A: CommentApi + ?Sized,
    R: Rng + ?Sized,
{
    report.validate()?;
    let body = render(report, rng);
    publish_rendered(api, pr, &body).await
}

/// Publish an already-rendered verdict body on `pr`.
pub async fn publish_rendered<A>(api: &A, pr: &PullRequestRef, body: &str) -> Result<Published>
where
    A: CommentApi + ?Sized,
{
    let outcome = async {
        info!(bytes = body.len(), "publishing verdict");
        let located = locate(api, pr).await?;
        publish(api, pr, body, located.first.as_ref()).await
    }
    .instrument(obs::verdict_span(pr))
    .await;

    if let Err(err) = &outcome {
        obs::emit_run_failed(pr, err);
    }
    outcome
}
