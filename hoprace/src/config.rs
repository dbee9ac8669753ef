use std::num::NonZero;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, bail};
use clap::Parser;
use hoprace_dispatch::DEFAULT_PIPE_SIZE;
use log::LevelFilter;

/// Command line and environment settings of the `hoprace` binary.
///
/// Every flag falls back to an environment variable, and a `.env` file in the
/// working directory is loaded before parsing.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hoprace",
    version,
    about = "Solves a batch of hopping race tracks concurrently"
)]
pub struct CliArgs {
    /// Batch file with the test cases.
    ///
    /// Environment variable: `HOPRACE_FILE`
    #[arg(long, env = "HOPRACE_FILE", default_value = "default.txt")]
    pub file: PathBuf,

    /// Capacity of the task queue and of the result queue.
    ///
    /// Environment variable: `HOPRACE_PIPE_SIZE`
    #[arg(long, env = "HOPRACE_PIPE_SIZE", default_value_t = DEFAULT_PIPE_SIZE)]
    pub pipe_size: usize,

    /// Number of worker threads. Defaults to the available parallelism.
    ///
    /// Environment variable: `HOPRACE_POOL_SIZE`
    #[arg(long, env = "HOPRACE_POOL_SIZE")]
    pub pool_size: Option<usize>,

    /// Minimum level of log lines written to stderr. `RUST_LOG`, when set,
    /// takes precedence.
    ///
    /// Environment variable: `HOPRACE_LOG_LEVEL`
    #[arg(long, env = "HOPRACE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// How long to wait for busy workers when shutting down.
    ///
    /// Environment variable: `HOPRACE_SHUTDOWN_TIMEOUT_MS`
    #[arg(long, env = "HOPRACE_SHUTDOWN_TIMEOUT_MS", default_value_t = 5000)]
    pub shutdown_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub file: PathBuf,
    pub pipe_size: usize,
    pub pool_size: usize,
    pub log_level: LevelFilter,
    pub shutdown_timeout: Duration,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.pipe_size == 0 {
            bail!("HOPRACE_PIPE_SIZE must be greater than 0");
        }
        let pool_size = match args.pool_size {
            Some(0) => bail!("HOPRACE_POOL_SIZE must be greater than 0"),
            Some(n) => n,
            None => thread::available_parallelism().map_or(1, NonZero::get),
        };
        let log_level: LevelFilter = args
            .log_level
            .parse()
            .map_err(|_| anyhow!("unknown log level {:?}", args.log_level))?;

        Ok(Self {
            file: args.file,
            pipe_size: args.pipe_size,
            pool_size,
            log_level,
            shutdown_timeout: Duration::from_millis(args.shutdown_timeout_ms),
        })
    }
}
