use std::fmt;
use std::num::NonZero;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use hoprace_core::Context;

use crate::error::{DispatchError, Result};
use crate::logger::Logger;
use crate::pool::WorkerPool;
use crate::processor::{GridProcessor, Processor};
use crate::task::{Report, Task};
use crate::worker::Worker;

/// Default capacity of the task and report queues.
pub const DEFAULT_PIPE_SIZE: usize = 16;

/// Grace period the drop handler gives running workers.
const DROP_TIMEOUT: Duration = Duration::from_millis(100);

/// Configures and starts a [`Dispatcher`].
pub struct DispatcherBuilder {
    pipe_size: usize,
    pool_size: usize,
    log: Logger,
    processor: Arc<dyn Processor>,
}

impl DispatcherBuilder {
    /// Capacity of the task queue and of the report queue.
    pub fn pipe_size(mut self, size: usize) -> Self {
        self.pipe_size = size;
        self
    }

    /// Number of worker threads.
    pub fn pool_size(mut self, size: usize) -> Self {
        self.pool_size = size;
        self
    }

    pub fn logger(mut self, log: Logger) -> Self {
        self.log = log;
        self
    }

    /// Replace the default [`GridProcessor`].
    pub fn processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processor = Arc::new(processor);
        self
    }

    /// Create the queues and spawn the workers.
    ///
    /// A zero pipe or pool size is not an error: the dispatcher starts
    /// inert, rejects every submission with [`DispatchError::Disabled`] and
    /// its result channel is empty and closed.
    pub fn start(self) -> Result<Dispatcher> {
        let ctx = Context::new();
        let (pipe_size, pool_size) = (self.pipe_size, self.pool_size);
        if pipe_size == 0 || pool_size == 0 {
            self.log.warn(
                "dispatcher disabled",
                &[("pipe_size", &pipe_size), ("pool_size", &pool_size)],
            );
            let (_, reports) = channel::bounded(0);
            return Ok(Dispatcher {
                tasks: None,
                pending: None,
                reports,
                pool: None,
                ctx,
                log: self.log,
                disabled: true,
            });
        }

        let (task_tx, task_rx) = channel::bounded(pipe_size);
        let (report_tx, reports) = channel::bounded(pipe_size);
        let pool = WorkerPool::spawn(pool_size, &ctx, |id| Worker {
            id,
            tasks: task_rx.clone(),
            reports: report_tx.clone(),
            processor: Arc::clone(&self.processor),
            log: self.log.clone(),
        })?;
        // Workers hold the only report senders; the channel closes with them.
        drop(report_tx);

        self.log.info(
            "dispatcher started",
            &[("pipe_size", &pipe_size), ("pool_size", &pool_size)],
        );
        Ok(Dispatcher {
            tasks: Some(task_tx),
            pending: Some(task_rx),
            reports,
            pool: Some(pool),
            ctx,
            log: self.log,
            disabled: false,
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            pipe_size: DEFAULT_PIPE_SIZE,
            pool_size: thread::available_parallelism().map_or(1, NonZero::get),
            log: Logger::global(),
            processor: Arc::new(GridProcessor),
        }
    }
}

impl fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("pipe_size", &self.pipe_size)
            .field("pool_size", &self.pool_size)
            .finish_non_exhaustive()
    }
}

/// A bounded task queue drained by a fixed pool of workers.
///
/// Every accepted task yields exactly one [`Report`] on
/// [`results`](Dispatcher::results), in completion order. Stopping is two
/// phase: [`stop`](Dispatcher::stop) first closes intake and signals the
/// workers, then waits for them up to a deadline. Tasks still queued at that
/// point are discarded.
pub struct Dispatcher {
    tasks: Option<Sender<Task>>,
    pending: Option<Receiver<Task>>,
    reports: Receiver<Report>,
    pool: Option<WorkerPool>,
    ctx: Context,
    log: Logger,
    disabled: bool,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// Whether the dispatcher was started with a zero pipe or pool size.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether workers are running and intake is open.
    pub fn is_running(&self) -> bool {
        self.tasks.is_some() && !self.ctx.is_done()
    }

    /// Queue a task, blocking while the queue is full.
    pub fn submit(&self, task: Task) -> Result<()> {
        if self.disabled {
            return Err(DispatchError::Disabled);
        }
        match &self.tasks {
            Some(tasks) => send_task(tasks, &self.ctx, task),
            None => Err(DispatchError::Closed),
        }
    }

    /// A handle for submitting from other threads.
    pub fn submitter(&self) -> Result<Submitter> {
        if self.disabled {
            return Err(DispatchError::Disabled);
        }
        match &self.tasks {
            Some(tasks) => Ok(Submitter {
                tasks: tasks.clone(),
                ctx: self.ctx.clone(),
            }),
            None => Err(DispatchError::Closed),
        }
    }

    /// One report per processed task.
    pub fn results(&self) -> &Receiver<Report> {
        &self.reports
    }

    /// Close intake, cancel the workers and wait up to `timeout` for them.
    ///
    /// Stopping twice is a no-op. After a [`ShutdownTimeout`] the workers
    /// have been signalled already and a later call may wait again.
    ///
    /// [`ShutdownTimeout`]: DispatchError::ShutdownTimeout
    pub fn stop(&mut self, timeout: Duration) -> Result<()> {
        let Some(pool) = self.pool.as_mut() else {
            return Ok(());
        };
        self.tasks = None;
        self.ctx.cancel();
        self.log.debug(
            "stopping dispatcher",
            &[("timeout_ms", &timeout.as_millis())],
        );

        let panicked = match pool.wait(timeout) {
            Ok(panicked) => panicked,
            Err(err) => {
                self.log.warn(
                    "worker pool did not stop in time",
                    &[("alive", &pool.alive()), ("error", &err)],
                );
                return Err(err);
            }
        };
        self.pool = None;
        if panicked > 0 {
            self.log.warn("workers panicked", &[("count", &panicked)]);
        }
        if let Some(pending) = self.pending.take() {
            let discarded = pending.try_iter().count();
            if discarded > 0 {
                self.log.warn("discarded queued tasks", &[("count", &discarded)]);
            }
        }
        self.log.info("dispatcher stopped", &[]);
        Ok(())
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        let _ = self.stop(DROP_TIMEOUT);
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("disabled", &self.disabled)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Clonable submission handle of a running [`Dispatcher`].
///
/// Submissions fail with [`DispatchError::Closed`] once the dispatcher
/// stops.
#[derive(Clone, Debug)]
pub struct Submitter {
    tasks: Sender<Task>,
    ctx: Context,
}

impl Submitter {
    pub fn submit(&self, task: Task) -> Result<()> {
        send_task(&self.tasks, &self.ctx, task)
    }
}

fn send_task(tasks: &Sender<Task>, ctx: &Context, task: Task) -> Result<()> {
    if ctx.is_done() {
        return Err(DispatchError::Closed);
    }
    select! {
        send(tasks, task) -> res => res.map_err(|_| DispatchError::Closed),
        recv(ctx.done()) -> _ => Err(DispatchError::Closed),
    }
}
