use anyhow::Context as _;
use log::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the process-wide log subscriber.
///
/// Log lines go to stderr so stdout carries only results. `log` records from
/// the library crates are bridged into the subscriber. `RUST_LOG`, when set,
/// replaces `level`.
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(filter(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_names(true)
                .with_target(true),
        )
        .try_init()
        .context("failed to install log subscriber")
}

fn filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()))
}

