//! Cooperative cancellation shared between a dispatcher and its workers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam::channel::{self, Receiver, Sender};

/// A cooperative-cancellation token.
///
/// Clones observe the same state. Besides the [`is_done`](Context::is_done)
/// flag, the token exposes a [`done`](Context::done) receiver that becomes
/// ready (disconnected) once [`cancel`](Context::cancel) is called, so it can
/// sit in a `select!` next to a work channel.
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        let (tx, rx) = channel::bounded(0);
        Self {
            done: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(tx))),
            signal: rx,
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Release);
        // Dropping the only sender disconnects every clone of `signal`.
        if let Ok(mut trigger) = self.trigger.lock() {
            trigger.take();
        }
    }

    /// Receiver that never yields a value and disconnects on cancellation.
    #[inline]
    pub fn done(&self) -> &Receiver<()> {
        &self.signal
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
