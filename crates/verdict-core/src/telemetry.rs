//! Log output for the `verdict` binary.
//!
//! stdout carries the command's result (rendered markdown, `created <id>`,
//! the installed toolchain version), so every log line goes to stderr.
//! Piping `verdict render` into a file therefore yields clean markdown.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber on stderr.
///
/// `RUST_LOG` wins over `level` when set. `json` switches to one JSON object
/// per line for CI log collectors. Module targets are only shown at debug
/// level and below. The first call wins; later calls do nothing.
pub fn init_tracing(json: bool, level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(level >= Level::DEBUG);
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing(false, Level::INFO);
        init_tracing(true, Level::DEBUG);
    }
}
