//! GitHub REST client against a local mock server.

use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use verdict_core::{
    find_existing, publish_rendered, CommentId, GitHubClient, GitHubConfig, Operation,
    PublishAction, PullRequestRef, VerdictError,
};

const COMMENTS_PATH: &str = "/repos/octo/widgets/issues/7/comments";

fn pr() -> PullRequestRef {
    PullRequestRef::new("octo", "widgets", 7)
}

fn client(server: &ServerGuard) -> GitHubClient {
    GitHubClient::new(
        GitHubConfig::new(&server.url())
            .with_token("t0ken")
            .with_timeout_secs(5),
    )
    .expect("client builds")
}

fn page_query(page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("per_page".into(), "100".into()),
        Matcher::UrlEncoded("page".into(), page.to_string()),
    ])
}

async fn mock_listing(
    server: &mut ServerGuard,
    page: u32,
    body: serde_json::Value,
    next: Option<u32>,
) -> Mock {
    let mut mock = server
        .mock("GET", COMMENTS_PATH)
        .match_query(page_query(page))
        .match_header("authorization", "Bearer t0ken")
        .match_header("accept", "application/vnd.github+json")
        .match_header("x-github-api-version", "2022-11-28")
        .with_status(200)
        .with_header("content-type", "application/json");
    if let Some(next) = next {
        let link = format!(
            "<{}{}?per_page=100&page={}>; rel=\"next\"",
            server.url(),
            COMMENTS_PATH,
            next
        );
        mock = mock.with_header("link", &link);
    }
    mock.with_body(body.to_string()).create_async().await
}

#[tokio::test]
async fn test_link_header_paging_then_update() {
    let mut server = Server::new_async().await;
    let first = mock_listing(
        &mut server,
        1,
        json!([{"id": 1, "body": null}, {"id": 2, "body": "LGTM"}]),
        Some(2),
    )
    .await;
    let second = mock_listing(
        &mut server,
        2,
        json!([{"id": 3, "body": "## Verdict ⚖️\n\nstale"}]),
        None,
    )
    .await;

    let body = "## Verdict ⚖️\n\n| `a\\|b` | \"quoted\" |\n";
    let update = server
        .mock("PATCH", "/repos/octo/widgets/issues/comments/3")
        .match_header("authorization", "Bearer t0ken")
        .match_body(Matcher::Json(json!({ "body": body })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 3, "body": body}).to_string())
        .create_async()
        .await;
    let create = server
        .mock("POST", COMMENTS_PATH)
        .expect(0)
        .create_async()
        .await;

    let published = publish_rendered(&client(&server), &pr(), body)
        .await
        .expect("publish failed");

    assert_eq!(published.action, PublishAction::Updated);
    assert_eq!(published.comment_id, CommentId::from(3u64));
    first.assert_async().await;
    second.assert_async().await;
    update.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_create_when_no_verdict_listed() {
    let mut server = Server::new_async().await;
    let _listing = mock_listing(&mut server, 1, json!([{"id": 1, "body": "LGTM"}]), None).await;
    let create = server
        .mock("POST", COMMENTS_PATH)
        .match_body(Matcher::Json(json!({"body": "## Verdict ⚖️ fresh"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(json!({"id": 55, "body": "## Verdict ⚖️ fresh"}).to_string())
        .create_async()
        .await;

    let published = publish_rendered(&client(&server), &pr(), "## Verdict ⚖️ fresh")
        .await
        .expect("publish failed");

    assert_eq!(published.action, PublishAction::Created);
    assert_eq!(published.comment_id, CommentId::from(55u64));
    create.assert_async().await;
}

#[tokio::test]
async fn test_unauthorized_listing_is_authorization_error() {
    let mut server = Server::new_async().await;
    let _listing = server
        .mock("GET", COMMENTS_PATH)
        .match_query(page_query(1))
        .with_status(401)
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create_async()
        .await;
    let writes = server
        .mock("POST", COMMENTS_PATH)
        .expect(0)
        .create_async()
        .await;

    let err = publish_rendered(&client(&server), &pr(), "## Verdict")
        .await
        .unwrap_err();

    assert!(err.is_authorization());
    assert!(err.to_string().contains("Bad credentials"));
    writes.assert_async().await;
}

#[tokio::test]
async fn test_garbage_listing_is_transport_error() {
    let mut server = Server::new_async().await;
    let _listing = server
        .mock("GET", COMMENTS_PATH)
        .match_query(page_query(1))
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = find_existing(&client(&server), &pr()).await.unwrap_err();

    assert!(matches!(
        err,
        VerdictError::Transport {
            operation: Operation::ListComments,
            ..
        }
    ));
    assert!(!err.is_authorization());
}

#[tokio::test]
async fn test_failed_update_is_not_retried() {
    let mut server = Server::new_async().await;
    let _listing =
        mock_listing(&mut server, 1, json!([{"id": 9, "body": "## Verdict old"}]), None).await;
    let update = server
        .mock("PATCH", "/repos/octo/widgets/issues/comments/9")
        .with_status(502)
        .with_body("upstream")
        .expect(1)
        .create_async()
        .await;

    let err = publish_rendered(&client(&server), &pr(), "## Verdict new")
        .await
        .unwrap_err();

    assert!(err.is_transport());
    assert!(err.to_string().contains("HTTP 502"));
    update.assert_async().await;
}
