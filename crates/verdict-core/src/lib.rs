//! Verdict Core: one verdict comment per pull request
//!
//! Publishes a rendered build report as a pull-request comment and keeps it
//! unique across runs by updating the previous verdict in place.
//!
//! - `CommentApi`: collaborator trait (list / create / update comments)
//! - `GitHubClient`: GitHub REST implementation (reqwest)
//! - `locator`: finds the existing verdict comment by its marker
//! - `publisher`: issues exactly one create or update
//! - `flow`: the sequential locate-then-publish run
//!
//! No state is kept between runs; which comment exists is rediscovered each time.

pub mod api;
pub mod config;
pub mod error;
pub mod fakes;
pub mod flow;
pub mod github;
pub mod locator;
pub mod obs;
pub mod pr;
pub mod publisher;
pub mod telemetry;

pub use api::{comment_stream, CommentApi};
pub use config::GitHubConfig;
pub use error::{Operation, Result, VerdictError};
pub use flow::{publish_rendered, publish_verdict};
pub use github::GitHubClient;
pub use locator::{find_existing, locate, Located};
pub use pr::{CommentId, CommentPage, PullRequestRef, RemoteComment};
pub use publisher::{publish, PublishAction, Published};
pub use telemetry::init_tracing;

/// Verdict core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
