//! Injected logging capability.
//!
//! The dispatcher and its workers never reach for a process-wide logger on
//! their own; they log through the [`Logger`] they were given. By default
//! that handle forwards to whatever `log` backend the process installed.

use std::fmt::{self, Display, Write as _};
use std::sync::Arc;

use log::{Level, Log, Metadata, Record};

/// Structured key-value pairs attached to a log line.
pub type Fields<'a> = &'a [(&'a str, &'a dyn Display)];

/// A cheap, clonable logging handle.
#[derive(Clone)]
pub struct Logger {
    backend: Arc<dyn Log>,
    target: &'static str,
}

impl Logger {
    /// Log through the backend installed with the `log` crate.
    pub fn global() -> Self {
        Self::new(Arc::new(Global))
    }

    /// Log through an explicit backend.
    pub fn new(backend: Arc<dyn Log>) -> Self {
        Self {
            backend,
            target: "hoprace",
        }
    }

    /// Same backend, different target.
    pub fn with_target(mut self, target: &'static str) -> Self {
        self.target = target;
        self
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn debug(&self, msg: &str, fields: Fields<'_>) {
        self.emit(Level::Debug, msg, None, fields);
    }

    pub fn info(&self, msg: &str, fields: Fields<'_>) {
        self.emit(Level::Info, msg, None, fields);
    }

    pub fn warn(&self, msg: &str, fields: Fields<'_>) {
        self.emit(Level::Warn, msg, None, fields);
    }

    /// Error-level line with the error rendered as the `error` field.
    pub fn error(&self, err: &dyn std::error::Error, msg: &str, fields: Fields<'_>) {
        self.emit(Level::Error, msg, Some(err), fields);
    }

    fn emit(
        &self,
        level: Level,
        msg: &str,
        err: Option<&dyn std::error::Error>,
        fields: Fields<'_>,
    ) {
        let metadata = Metadata::builder()
            .level(level)
            .target(self.target)
            .build();
        if !self.backend.enabled(&metadata) {
            return;
        }
        let mut line = String::from(msg);
        for (key, value) in fields {
            let _ = write!(line, " {key}={value}");
        }
        if let Some(err) = err {
            let _ = write!(line, " error=\"{err}\"");
        }
        self.backend.log(
            &Record::builder()
                .metadata(metadata)
                .args(format_args!("{line}"))
                .build(),
        );
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::global()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Forwards to `log::logger()`, honouring `log::max_level()`.
struct Global;

impl Log for Global {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level() && log::logger().enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        log::logger().log(record);
    }

    fn flush(&self) {
        log::logger().flush();
    }
}
