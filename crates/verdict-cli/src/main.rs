//! Verdict CLI - CI build verdicts on pull requests
//!
//! The `verdict` command turns a build report into a single, self-updating
//! pull-request comment.
//!
//! ## Commands
//!
//! - `comment`: render the report and create or update the verdict comment
//! - `render`: print the rendered markdown without touching the network
//! - `setup`: make sure the requested toolchain is installed

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use toolchain_manager::{
    ensure_toolchain, CommandInstaller, InstallerConfig, Platform, ToolchainInstaller,
    ToolchainVersion,
};
use verdict_core::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use verdict_core::{
    publish_verdict, CommentApi, GitHubClient, GitHubConfig, Published, PullRequestRef,
};
use verdict_report::{render, BuildReport};

#[derive(Parser)]
#[command(name = "verdict")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build verdict comments for pull requests", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the verdict comment on a pull request
    Comment {
        /// Path to the build report (JSON)
        #[arg(short, long)]
        report: PathBuf,

        /// Repository as OWNER/REPO
        #[arg(long, env = "GITHUB_REPOSITORY")]
        repository: String,

        /// Pull request number (read from the workflow event payload if omitted)
        #[arg(long, env = "VERDICT_ISSUE_NUMBER")]
        issue: Option<u64>,

        /// API token
        #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// REST API base URL
        #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,

        /// Per-request timeout in seconds
        #[arg(long, env = "VERDICT_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,

        /// Seed for decoration selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the rendered verdict without publishing it
    Render {
        /// Path to the build report (JSON)
        #[arg(short, long)]
        report: PathBuf,

        /// Seed for decoration selection (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Install the requested toolchain if it is missing
    Setup {
        /// Toolchain version to install, e.g. 5.9 or 5.9.2
        #[arg(long = "toolchain-version")]
        requested: String,

        /// Toolchain binary name
        #[arg(long, env = "VERDICT_TOOLCHAIN", default_value = "swift")]
        tool: String,

        /// Install command template ({version}, {os}, {arch} are substituted)
        #[arg(long, env = "VERDICT_INSTALL_COMMAND")]
        install_command: Option<String>,

        /// Install timeout in seconds
        #[arg(long, env = "VERDICT_INSTALL_TIMEOUT_SECS", default_value = "1800")]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    verdict_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Comment {
            report,
            repository,
            issue,
            token,
            api_url,
            timeout_secs,
            seed,
        } => {
            let mut config = GitHubConfig::new(&api_url).with_timeout_secs(timeout_secs);
            if let Some(token) = token.as_deref() {
                config = config.with_token(token);
            }
            cmd_comment(config, &report, &repository, issue, seed).await
        }
        Commands::Render { report, seed } => cmd_render(&report, seed),
        Commands::Setup {
            requested,
            tool,
            install_command,
            timeout_secs,
        } => {
            let mut config = InstallerConfig::default()
                .with_tool(&tool)
                .with_timeout_secs(timeout_secs);
            config.install_command = install_command.filter(|c| !c.trim().is_empty());
            cmd_setup(&CommandInstaller::new(config), &requested).await
        }
    }
}

fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Read and validate a build report
fn load_report(path: &Path) -> Result<BuildReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    BuildReport::from_json(&text).with_context(|| format!("Invalid report {}", path.display()))
}

/// Pull request number from a workflow event payload (`GITHUB_EVENT_PATH`)
fn issue_from_event(path: &Path) -> Result<u64> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event payload {}", path.display()))?;
    let event: Value = serde_json::from_str(&text).context("Event payload is not valid JSON")?;

    event
        .get("pull_request")
        .and_then(|pr| pr.get("number"))
        .or_else(|| event.get("issue").and_then(|issue| issue.get("number")))
        .or_else(|| event.get("number"))
        .and_then(Value::as_u64)
        .context("Event payload does not reference a pull request")
}

fn resolve_issue(issue: Option<u64>) -> Result<u64> {
    if let Some(issue) = issue {
        return Ok(issue);
    }
    match std::env::var_os("GITHUB_EVENT_PATH") {
        Some(path) => issue_from_event(Path::new(&path)),
        None => bail!("No pull request number: pass --issue or run inside a pull_request workflow"),
    }
}

/// Append `key=value` to a workflow output file
fn append_output(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    writeln!(file, "{}={}", key, value).context("Failed to write workflow output")?;
    Ok(())
}

fn write_github_output(key: &str, value: &str) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT") {
        Some(path) => append_output(Path::new(&path), key, value),
        None => Ok(()),
    }
}

/// Validate, render and publish; the report is checked before any request.
async fn run_comment<A>(
    api: &A,
    pr: &PullRequestRef,
    report_path: &Path,
    seed: Option<u64>,
) -> Result<Published>
where
    A: CommentApi + ?Sized,
{
    let report = load_report(report_path)?;
    let mut rng = rng_from_seed(seed);
    publish_verdict(api, pr, &report, &mut rng)
        .await
        .with_context(|| format!("Failed to publish verdict on {}", pr))
}

async fn cmd_comment(
    config: GitHubConfig,
    report_path: &Path,
    repository: &str,
    issue: Option<u64>,
    seed: Option<u64>,
) -> Result<()> {
    let issue = resolve_issue(issue)?;
    let pr = PullRequestRef::from_slug(repository, issue)?;
    let client = GitHubClient::new(config).context("Failed to create GitHub client")?;

    let published = run_comment(&client, &pr, report_path, seed).await?;
    write_github_output("comment-id", &published.comment_id.to_string())?;
    println!("{} {}", published.action, published.comment_id);
    Ok(())
}

fn cmd_render(report_path: &Path, seed: Option<u64>) -> Result<()> {
    let report = load_report(report_path)?;
    let mut rng = rng_from_seed(seed);
    print!("{}", render(&report, &mut rng));
    Ok(())
}

async fn cmd_setup<I>(installer: &I, requested: &str) -> Result<()>
where
    I: ToolchainInstaller + ?Sized,
{
    let requested = ToolchainVersion::parse(requested)?;
    let platform = Platform::detect().context("Failed to detect platform")?;
    info!(os = %platform.os, arch = %platform.arch, release = ?platform.release, "detected platform");

    let installed = ensure_toolchain(installer, &platform, &requested)
        .await
        .with_context(|| format!("Failed to set up {} {}", installer.tool(), requested))?;
    write_github_output("toolchain-version", &installed)?;
    println!("{}", installed);
    Ok(())
}
