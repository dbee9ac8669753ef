use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use hoprace_core::Context;

use crate::error::{DispatchError, Result};
use crate::worker::Worker;

/// Fixed set of worker threads sharing one [`Context`].
pub(crate) struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    exits: Receiver<usize>,
    alive: usize,
}

/// Reports a worker's exit, including an exit by panic.
struct ExitGuard {
    id: usize,
    exits: Sender<usize>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let _ = self.exits.send(self.id);
    }
}

impl WorkerPool {
    /// Start `size` workers numbered from 1, each built by `make`.
    ///
    /// If a thread cannot be spawned the context is cancelled, so the
    /// workers already running wind down on their own.
    pub(crate) fn spawn(
        size: usize,
        ctx: &Context,
        mut make: impl FnMut(usize) -> Worker,
    ) -> Result<Self> {
        let (exit_tx, exits) = channel::unbounded();
        let mut handles = Vec::with_capacity(size);
        for id in 1..=size {
            let worker = make(id);
            let guard = ExitGuard {
                id,
                exits: exit_tx.clone(),
            };
            let worker_ctx = ctx.clone();
            let spawned = thread::Builder::new()
                .name(format!("hoprace-worker-{id}"))
                .spawn(move || {
                    let _guard = guard;
                    worker.run(worker_ctx);
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    ctx.cancel();
                    return Err(DispatchError::Spawn(err.to_string()));
                }
            }
        }
        Ok(Self {
            alive: handles.len(),
            handles,
            exits,
        })
    }

    /// Number of workers that have not exited yet.
    pub(crate) fn alive(&self) -> usize {
        self.alive
    }

    /// Wait up to `timeout` for every worker to exit, then join them.
    ///
    /// Returns how many workers panicked. On timeout the pool keeps track of
    /// the remaining workers, so waiting again is allowed.
    pub(crate) fn wait(&mut self, timeout: Duration) -> Result<usize> {
        let deadline = Instant::now() + timeout;
        while self.alive > 0 {
            match self.exits.recv_deadline(deadline) {
                Ok(_) => self.alive -= 1,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(DispatchError::ShutdownTimeout(timeout));
                }
                Err(RecvTimeoutError::Disconnected) => self.alive = 0,
            }
        }
        let panicked = self
            .handles
            .drain(..)
            .map(JoinHandle::join)
            .filter(|joined| joined.is_err())
            .count();
        Ok(panicked)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hoprace_core::Point;

    use super::*;
    use crate::logger::Logger;
    use crate::logger::testing::Capture;
    use crate::processor::Processor;
    use crate::task::{Report, Task};

    fn pool_of(
        size: usize,
        ctx: &Context,
        processor: Arc<dyn Processor>,
    ) -> (WorkerPool, Sender<Task>, Receiver<Report>) {
        let (task_tx, task_rx) = channel::unbounded();
        let (report_tx, report_rx) = channel::unbounded();
        let log = Logger::new(Arc::new(Capture::default()));
        let pool = WorkerPool::spawn(size, ctx, |id| Worker {
            id,
            tasks: task_rx.clone(),
            reports: report_tx.clone(),
            processor: Arc::clone(&processor),
            log: log.clone(),
        })
        .unwrap();
        (pool, task_tx, report_rx)
    }

    #[test]
    fn workers_are_named() {
        let ctx = Context::new();
        let names = move |_: &Task| -> crate::Result<String> {
            Ok(thread::current().name().unwrap_or_default().to_string())
        };
        let (mut pool, tasks, reports) = pool_of(2, &ctx, Arc::new(names));
        assert_eq!(pool.alive(), 2);
        tasks.send(Task::new(1, 1, 1, Point::ZERO, Point::ZERO)).unwrap();
        let report = reports.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(report.line().unwrap().starts_with("hoprace-worker-"));
        ctx.cancel();
        assert_eq!(pool.wait(Duration::from_secs(5)), Ok(0));
        assert_eq!(pool.alive(), 0);
    }

    #[test]
    fn closed_queue_drains_the_pool() {
        let ctx = Context::new();
        let (mut pool, tasks, _reports) =
            pool_of(3, &ctx, Arc::new(crate::processor::GridProcessor));
        drop(tasks);
        assert_eq!(pool.wait(Duration::from_secs(5)), Ok(0));
    }

    #[test]
    fn wait_times_out_on_busy_workers() {
        let ctx = Context::new();
        let (started_tx, started_rx) = channel::unbounded();
        let slow = move |_: &Task| -> crate::Result<String> {
            let _ = started_tx.send(());
            thread::sleep(Duration::from_millis(300));
            Ok(String::new())
        };
        let (mut pool, tasks, _reports) = pool_of(1, &ctx, Arc::new(slow));
        tasks.send(Task::new(1, 1, 1, Point::ZERO, Point::ZERO)).unwrap();
        started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        ctx.cancel();

        let timeout = Duration::from_millis(10);
        assert_eq!(
            pool.wait(timeout),
            Err(DispatchError::ShutdownTimeout(timeout))
        );
        assert_eq!(pool.alive(), 1);
        assert_eq!(pool.wait(Duration::from_secs(5)), Ok(0));
    }

    #[test]
    fn panics_are_counted() {
        let ctx = Context::new();
        let boom = |_: &Task| -> crate::Result<String> { panic!("boom") };
        let (mut pool, tasks, _reports) = pool_of(1, &ctx, Arc::new(boom));
        tasks.send(Task::new(1, 1, 1, Point::ZERO, Point::ZERO)).unwrap();
        assert_eq!(pool.wait(Duration::from_secs(5)), Ok(1));
    }
}
