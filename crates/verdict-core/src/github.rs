//! GitHub REST implementation of [`CommentApi`]
//!
//! Issue comments endpoints:
//! - `GET   /repos/{owner}/{repo}/issues/{number}/comments?per_page=100&page=N`
//! - `POST  /repos/{owner}/{repo}/issues/{number}/comments`
//! - `PATCH /repos/{owner}/{repo}/issues/comments/{id}`
//!
//! Request bodies are JSON-encoded by serde; the markdown is passed through
//! untouched.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::CommentApi;
use crate::config::GitHubConfig;
use crate::error::{Operation, VerdictError};
use crate::pr::{CommentId, CommentPage, PullRequestRef, RemoteComment};
use crate::Result;

const API_VERSION: &str = "2022-11-28";
const PER_PAGE: u32 = 100;
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Deserialize)]
struct IssueComment {
    id: u64,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// GitHub REST client holding the bearer credential.
pub struct GitHubClient {
    config: GitHubConfig,
    http_client: reqwest::Client,
}

impl GitHubClient {
    /// Create a client. A missing token is an authorization failure.
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let token = config
            .token
            .as_deref()
            .ok_or_else(|| VerdictError::Authorization {
                target: config.base_url().to_string(),
                reason: "no token configured (set GITHUB_TOKEN)".to_string(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
            VerdictError::Authorization {
                target: config.base_url().to_string(),
                reason: "token contains characters not allowed in a header".to_string(),
            }
        })?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VerdictError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(GitHubClient {
            config,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GitHubConfig::from_env())
    }

    fn comments_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.config.base_url(),
            pr.owner,
            pr.repository,
            pr.issue_number
        )
    }

    fn comment_url(&self, pr: &PullRequestRef, id: &CommentId) -> String {
        format!(
            "{}/repos/{}/{}/issues/comments/{}",
            self.config.base_url(),
            pr.owner,
            pr.repository,
            id
        )
    }

    /// Send a request and map every failure mode onto the error taxonomy.
    async fn send(
        &self,
        operation: Operation,
        target: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("request timed out after {}s", self.config.timeout_secs)
            } else {
                format!("request failed: {}", e)
            };
            VerdictError::transport(operation, target, reason)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(operation, target, status, &body))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        operation: Operation,
        target: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let bytes = response.bytes().await.map_err(|e| {
            VerdictError::transport(operation, target, format!("failed to read response: {}", e))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            VerdictError::transport(operation, target, format!("malformed response body: {}", e))
        })
    }
}

/// Map a non-success status to an error. 401 and 403 mean the credential was refused.
pub fn status_error(
    operation: Operation,
    target: &str,
    status: StatusCode,
    body: &str,
) -> VerdictError {
    let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => VerdictError::Authorization {
            target: target.to_string(),
            reason: format!("{} returned HTTP {}: {}", operation, status.as_u16(), snippet),
        },
        _ => VerdictError::transport(
            operation,
            target,
            format!("HTTP {}: {}", status.as_u16(), snippet),
        ),
    }
}

/// Whether a `Link` response header advertises a next page.
pub fn has_next_page(link: Option<&str>) -> bool {
    link.map(|value| {
        value.split(',').any(|part| {
            part.split(';')
                .skip(1)
                .any(|param| param.trim().replace(' ', "") == "rel=\"next\"")
        })
    })
    .unwrap_or(false)
}

#[async_trait]
impl CommentApi for GitHubClient {
    async fn list_comments(&self, pr: &PullRequestRef, page: u32) -> Result<CommentPage> {
        let target = pr.to_string();
        let request = self
            .http_client
            .get(self.comments_url(pr))
            .query(&[("per_page", PER_PAGE), ("page", page)]);
        let response = self.send(Operation::ListComments, &target, request).await?;

        let has_next = has_next_page(
            response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok()),
        );
        let listed: Vec<IssueComment> =
            Self::decode(Operation::ListComments, &target, response).await?;
        debug!(pr = %pr, page = page, count = listed.len(), has_next = has_next, "listed comments");

        Ok(CommentPage {
            comments: listed
                .into_iter()
                .map(|c| RemoteComment {
                    id: CommentId::from(c.id),
                    body: c.body.unwrap_or_default(),
                })
                .collect(),
            has_next,
        })
    }

    async fn create_comment(&self, pr: &PullRequestRef, body: &str) -> Result<CommentId> {
        let target = pr.to_string();
        let request = self
            .http_client
            .post(self.comments_url(pr))
            .json(&CommentBody { body });
        let response = self.send(Operation::CreateComment, &target, request).await?;

        let created: IssueComment =
            Self::decode(Operation::CreateComment, &target, response).await?;
        Ok(CommentId::from(created.id))
    }

    async fn update_comment(
        &self,
        pr: &PullRequestRef,
        id: &CommentId,
        body: &str,
    ) -> Result<()> {
        let target = format!("{} (comment {})", pr, id);
        let request = self
            .http_client
            .patch(self.comment_url(pr, id))
            .json(&CommentBody { body });
        let response = self.send(Operation::UpdateComment, &target, request).await?;

        // Decode so a garbled success response is still reported.
        let _: IssueComment = Self::decode(Operation::UpdateComment, &target, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(GitHubConfig::new("https://api.github.com/").with_token("t0ken"))
            .expect("client builds")
    }

    #[test]
    fn missing_token_is_authorization_error() {
        let err = GitHubClient::new(GitHubConfig::new("https://api.github.com"))
            .err()
            .expect("should fail without token");
        assert!(err.is_authorization());
    }

    #[test]
    fn urls_follow_issue_comment_endpoints() {
        let client = client();
        let pr = PullRequestRef::new("octo", "widgets", 7);
        assert_eq!(
            client.comments_url(&pr),
            "https://api.github.com/repos/octo/widgets/issues/7/comments"
        );
        assert_eq!(
            client.comment_url(&pr, &CommentId::from(99u64)),
            "https://api.github.com/repos/octo/widgets/issues/comments/99"
        );
    }

    #[test]
    fn link_header_next_detection() {
        let both = r#"<https://api.github.com/x?page=2>; rel="next", <https://api.github.com/x?page=5>; rel="last""#;
        let last_only = r#"<https://api.github.com/x?page=1>; rel="prev", <https://api.github.com/x?page=1>; rel="first""#;
        assert!(has_next_page(Some(both)));
        assert!(!has_next_page(Some(last_only)));
        assert!(!has_next_page(None));
    }

    #[test]
    fn unauthorized_and_forbidden_map_to_authorization() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = status_error(Operation::CreateComment, "octo/widgets#7", status, "Bad credentials");
            assert!(err.is_authorization());
            assert!(err.to_string().contains("Bad credentials"));
        }
    }

    #[test]
    fn other_statuses_map_to_transport() {
        let err = status_error(
            Operation::ListComments,
            "octo/widgets#7",
            StatusCode::BAD_GATEWAY,
            "upstream",
        );
        assert!(matches!(
            err,
            VerdictError::Transport {
                operation: Operation::ListComments,
                ..
            }
        ));
        assert!(err.to_string().contains("HTTP 502"));
    }

    #[test]
    fn error_body_is_truncated() {
        let long = "x".repeat(1000);
        let err = status_error(
            Operation::UpdateComment,
            "octo/widgets#7",
            StatusCode::NOT_FOUND,
            &long,
        );
        assert!(err.to_string().len() < 400);
    }

    #[test]
    fn comment_body_is_json_encoded() {
        let body = "## Verdict ⚖️\n\n| `a` | \"quoted\" |\n";
        let encoded = serde_json::to_string(&CommentBody { body }).unwrap();
        assert!(encoded.contains("\\n"));
        assert!(encoded.contains("\\\"quoted\\\""));
        let decoded: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded["body"], body);
    }

    #[test]
    fn listing_decodes_null_body() {
        let listed: Vec<IssueComment> =
            serde_json::from_str(r###"[{"id": 1, "body": null}, {"id": 2, "body": "## Verdict"}]"###)
                .unwrap();
        assert_eq!(listed[0].body, None);
        assert_eq!(listed[1].id, 2);
    }
}
