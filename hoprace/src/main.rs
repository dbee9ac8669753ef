//! hoprace: solves a batch file of hopping race tracks on a worker pool and
//! prints one line per test case.

mod config;
mod input;
mod telemetry;

use std::io::{self, Write};
use std::thread;

use anyhow::{Context as _, anyhow, bail};
use clap::Parser;
use crossbeam::channel::{Receiver, bounded, select};
use hoprace_dispatch::{DispatchError, Dispatcher, Logger, Report, Task};

use config::{CliArgs, RunConfig};

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let config = RunConfig::try_from(CliArgs::parse())?;
    telemetry::init(config.log_level)?;

    let tasks = input::parse_file(&config.file).inspect_err(|err| {
        log::error!(
            "failed to parse test cases file={} error=\"{err:#}\"",
            config.file.display()
        );
    })?;
    log::debug!("start processing test cases count={}", tasks.len());

    let mut dispatcher = Dispatcher::builder()
        .pipe_size(config.pipe_size)
        .pool_size(config.pool_size)
        .logger(Logger::global())
        .start()
        .context("failed to start dispatcher")?;

    let interrupt = interrupt_channel()?;
    let total = tasks.len();
    let feeder = spawn_feeder(&dispatcher, tasks)?;

    let drained = drain(
        dispatcher.results(),
        &interrupt,
        total,
        &mut io::stdout().lock(),
    )?;
    if drained.interrupted {
        log::warn!(
            "interrupted, stopping dispatcher pending={}",
            total - drained.received
        );
    }

    // A feeder blocked on a full queue returns once the dispatcher is stopped.
    if let Err(err) = dispatcher.stop(config.shutdown_timeout) {
        log::warn!("dispatcher did not stop cleanly error=\"{err}\"");
    }
    let fed = feeder
        .join()
        .map_err(|_| anyhow!("feeder thread panicked"))?;

    if drained.interrupted {
        bail!(
            "interrupted after {} of {total} test cases",
            drained.received
        );
    }
    fed.context("failed to submit test cases")?;
    log::debug!("all test cases processed failed={}", drained.failed);
    Ok(())
}

/// A channel that receives a message on SIGINT or SIGTERM.
fn interrupt_channel() -> anyhow::Result<Receiver<()>> {
    let (tx, rx) = bounded(1);
    ctrlc::set_handler(move || {
        log::info!("received shutdown signal");
        let _ = tx.try_send(());
    })
    .context("failed to install signal handler")?;
    Ok(rx)
}

/// Submit every task from a separate thread so results can be drained while
/// the task queue is full.
fn spawn_feeder(
    dispatcher: &Dispatcher,
    tasks: Vec<Task>,
) -> anyhow::Result<thread::JoinHandle<Result<(), DispatchError>>> {
    let submitter = dispatcher.submitter()?;
    thread::Builder::new()
        .name("hoprace-feeder".to_string())
        .spawn(move || tasks.into_iter().try_for_each(|task| submitter.submit(task)))
        .context("failed to spawn feeder thread")
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Drained {
    received: usize,
    failed: usize,
    interrupted: bool,
}

enum Event {
    Report(Report),
    Closed,
    Interrupted,
}

/// Write result lines to `out` until `total` reports arrived, the result
/// channel closed, or an interrupt came in. Failed tasks are logged only.
fn drain(
    results: &Receiver<Report>,
    interrupt: &Receiver<()>,
    total: usize,
    out: &mut impl Write,
) -> anyhow::Result<Drained> {
    let mut drained = Drained::default();
    while drained.received < total {
        let event = select! {
            recv(results) -> report => report.map_or(Event::Closed, Event::Report),
            recv(interrupt) -> _ => Event::Interrupted,
        };
        let report = match event {
            Event::Report(report) => report,
            Event::Closed => {
                log::warn!("result channel closed early");
                break;
            }
            Event::Interrupted => {
                drained.interrupted = true;
                break;
            }
        };
        drained.received += 1;
        match report.outcome {
            Ok(line) => {
                writeln!(out, "{line}").context("failed to write result")?;
                log::info!("test case processed id={} result=\"{line}\"", report.id);
            }
            Err(err) => {
                drained.failed += 1;
                log::error!("test case failed id={} error=\"{err}\"", report.id);
            }
        }
    }
    out.flush().context("failed to flush results")?;
    Ok(drained)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(id: u32) -> Report {
        Report {
            id,
            outcome: Ok(format!("Test case #{id}: No solution.")),
        }
    }

    #[test]
    fn drain_prints_lines_and_counts_failures() {
        let (tx, results) = bounded(4);
        let (_signal, interrupt) = bounded(1);
        tx.send(ok(2)).unwrap();
        tx.send(Report {
            id: 1,
            outcome: Err(DispatchError::InvalidGrid { rows: 0, cols: 3 }),
        })
        .unwrap();
        tx.send(ok(3)).unwrap();

        let mut out = Vec::new();
        let drained = drain(&results, &interrupt, 3, &mut out).unwrap();
        assert_eq!(
            drained,
            Drained {
                received: 3,
                failed: 1,
                interrupted: false
            }
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Test case #2: No solution.\nTest case #3: No solution.\n"
        );
    }

    #[test]
    fn drain_stops_on_interrupt() {
        let (tx, results) = bounded(4);
        let (signal, interrupt) = bounded(1);
        tx.send(ok(1)).unwrap();

        let mut out = Vec::new();
        let handle = thread::spawn(move || {
            thread::sleep(std::time::Duration::from_millis(50));
            signal.send(()).unwrap();
            tx
        });
        let drained = drain(&results, &interrupt, 5, &mut out).unwrap();
        drop(handle.join().unwrap());

        assert!(drained.interrupted);
        assert_eq!(drained.received, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "Test case #1: No solution.\n");
    }

    #[test]
    fn drain_stops_when_results_close() {
        let (tx, results) = bounded(1);
        let (_signal, interrupt) = bounded(1);
        tx.send(ok(1)).unwrap();
        drop(tx);

        let mut out = Vec::new();
        let drained = drain(&results, &interrupt, 2, &mut out).unwrap();
        assert_eq!(drained.received, 1);
        assert!(!drained.interrupted);
    }
}
