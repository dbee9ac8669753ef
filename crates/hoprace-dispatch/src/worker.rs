use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender, TrySendError};
use crossbeam::select;
use hoprace_core::Context;

use crate::logger::Logger;
use crate::processor::Processor;
use crate::task::{Report, Task};

/// One consumer of the task queue.
pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) tasks: Receiver<Task>,
    pub(crate) reports: Sender<Report>,
    pub(crate) processor: Arc<dyn Processor>,
    pub(crate) log: Logger,
}

impl Worker {
    /// Take tasks until the context is cancelled or the queue closes.
    pub(crate) fn run(self, ctx: Context) {
        self.log.debug("worker started", &[("worker", &self.id)]);
        loop {
            // Cancellation wins over queued work.
            if ctx.is_done() {
                self.log.debug("worker stopping: cancelled", &[("worker", &self.id)]);
                return;
            }
            select! {
                recv(ctx.done()) -> _ => {
                    self.log.debug("worker stopping: cancelled", &[("worker", &self.id)]);
                    return;
                }
                recv(self.tasks) -> msg => {
                    let Ok(task) = msg else {
                        self.log.debug("worker stopping: queue closed", &[("worker", &self.id)]);
                        return;
                    };
                    if !self.handle(task, &ctx) {
                        self.log.debug("worker stopping: reports dropped", &[("worker", &self.id)]);
                        return;
                    }
                }
            }
        }
    }

    /// Process one task and deliver its report. Returns false once reports
    /// can no longer be delivered.
    fn handle(&self, task: Task, ctx: &Context) -> bool {
        let outcome = self.processor.process(&task);
        match &outcome {
            Ok(_) => self.log.debug(
                "task processed",
                &[("id", &task.id), ("worker", &self.id)],
            ),
            Err(err) => self.log.error(
                err,
                "failed to process task",
                &[("id", &task.id), ("worker", &self.id)],
            ),
        }
        self.deliver(Report { id: task.id, outcome }, ctx)
    }

    fn deliver(&self, report: Report, ctx: &Context) -> bool {
        match self.reports.try_send(report) {
            Ok(()) => true,
            Err(TrySendError::Disconnected(_)) => false,
            // Nobody drains the reports while stopping.
            Err(TrySendError::Full(report)) => select! {
                send(self.reports, report) -> res => res.is_ok(),
                recv(ctx.done()) -> _ => false,
            },
        }
    }
}
