//! End-to-end verdict runs against the in-memory comment API.

use rand::rngs::StdRng;
use rand::SeedableRng;
use verdict_core::fakes::MemoryCommentApi;
use verdict_core::{publish_verdict, PublishAction, PullRequestRef};
use verdict_report::{contains_marker, BuildInfo, BuildReport, Finding, Tier};

fn pr() -> PullRequestRef {
    PullRequestRef::new("owner", "repo", 7)
}

fn report(coverage: f64, warnings: Vec<Finding>, errors: Vec<Finding>) -> BuildReport {
    BuildReport::new(BuildInfo::new("MockApp", "1.0.0", "100"), warnings, errors, coverage)
        .expect("valid report")
}

fn verdicts(api: &MemoryCommentApi) -> Vec<String> {
    api.comments(&pr())
        .into_iter()
        .map(|c| c.body)
        .filter(|body| contains_marker(body))
        .collect()
}

/// First run on a pull request with no comments creates the verdict.
#[tokio::test]
async fn test_first_run_creates_comment() {
    let api = MemoryCommentApi::new();
    let mut rng = StdRng::seed_from_u64(1);

    let published = publish_verdict(&api, &pr(), &report(96.0, vec![], vec![]), &mut rng)
        .await
        .expect("publish failed");

    assert_eq!(published.action, PublishAction::Created);
    let comments = api.comments(&pr());
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, published.comment_id);

    let body = &comments[0].body;
    assert!(contains_marker(body));
    assert!(body.contains("96"));
    assert!(!body.contains("Errors"));
    assert!(!body.contains("Warnings"));
    assert!(Tier::High.decorations().iter().any(|url| body.contains(url)));
}

/// Second run finds the earlier verdict and rewrites it in place.
#[tokio::test]
async fn test_second_run_updates_same_comment() {
    let api = MemoryCommentApi::new();
    let mut rng = StdRng::seed_from_u64(2);

    let first = publish_verdict(&api, &pr(), &report(96.0, vec![], vec![]), &mut rng)
        .await
        .expect("first run failed");

    let failing = report(42.0, vec![], vec![Finding::new("boom").at("/x.ext")]);
    let second = publish_verdict(&api, &pr(), &failing, &mut rng)
        .await
        .expect("second run failed");

    assert_eq!(second.action, PublishAction::Updated);
    assert_eq!(second.comment_id, first.comment_id);

    let comments = api.comments(&pr());
    assert_eq!(comments.len(), 1, "comment count must stay at one");
    let body = &comments[0].body;
    assert!(body.contains("### 🚨 Errors: **1 Found**"));
    assert!(body.contains("boom"));
    assert!(body.contains("`/x.ext`"));
    assert!(Tier::Low.decorations().iter().any(|url| body.contains(url)));
    assert_eq!(api.create_calls(), 1);
    assert_eq!(api.update_calls(), 1);
}

/// Running twice converges on one verdict reflecting the latest report.
#[tokio::test]
async fn test_idempotent_convergence() {
    let api = MemoryCommentApi::new();
    api.seed(&pr(), "Thanks for the PR!");
    let mut rng = StdRng::seed_from_u64(3);

    for coverage in [70.0, 85.5, 85.5] {
        publish_verdict(&api, &pr(), &report(coverage, vec![], vec![]), &mut rng)
            .await
            .expect("publish failed");
    }

    let verdicts = verdicts(&api);
    assert_eq!(verdicts.len(), 1);
    assert!(verdicts[0].contains("85.5%"));
    assert_eq!(api.comments(&pr()).len(), 2, "human comment is untouched");
}

/// Verdict located on a later page is still reused.
#[tokio::test]
async fn test_verdict_on_later_page_is_updated() {
    let api = MemoryCommentApi::new().with_page_size(3);
    for i in 0..7 {
        api.seed(&pr(), &format!("review comment {i}"));
    }
    let existing = api.seed(&pr(), "## Verdict ⚖️\n\nstale");
    api.seed(&pr(), "one more");

    let published = publish_verdict(
        &api,
        &pr(),
        &report(55.0, vec![Finding::new("deprecated")], vec![]),
        &mut StdRng::seed_from_u64(4),
    )
    .await
    .expect("publish failed");

    assert_eq!(published.comment_id, existing);
    assert_eq!(published.action, PublishAction::Updated);
    assert_eq!(api.create_calls(), 0);
}

/// Duplicates left by a past race: the first is updated, the rest are left alone.
#[tokio::test]
async fn test_duplicate_verdicts_update_first() {
    let api = MemoryCommentApi::new();
    let first = api.seed(&pr(), "## Verdict ⚖️ from run A");
    let second = api.seed(&pr(), "## Verdict ⚖️ from run B");

    let published = publish_verdict(
        &api,
        &pr(),
        &report(90.0, vec![], vec![]),
        &mut StdRng::seed_from_u64(5),
    )
    .await
    .expect("publish failed");

    assert_eq!(published.comment_id, first);
    let comments = api.comments(&pr());
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1].id, second);
    assert_eq!(comments[1].body, "## Verdict ⚖️ from run B");
}

/// Verdicts on different pull requests are independent.
#[tokio::test]
async fn test_pull_requests_are_isolated() {
    let api = MemoryCommentApi::new();
    let other = PullRequestRef::new("owner", "repo", 8);
    let mut rng = StdRng::seed_from_u64(6);

    publish_verdict(&api, &pr(), &report(10.0, vec![], vec![]), &mut rng)
        .await
        .expect("publish failed");
    let on_other = publish_verdict(&api, &other, &report(10.0, vec![], vec![]), &mut rng)
        .await
        .expect("publish failed");

    assert_eq!(on_other.action, PublishAction::Created);
    assert_eq!(api.comments(&pr()).len(), 1);
    assert_eq!(api.comments(&other).len(), 1);
}
