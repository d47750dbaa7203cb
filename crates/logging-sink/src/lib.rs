#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging-sink` is the seam between the SLF4Fx session machinery and
//! whatever actually records forwarded log events. Sessions only ever need
//! "write `(category, level, message)` somewhere", so that is the whole
//! interface: the [`LogSink`] trait. The daemon installs a
//! [`TracingSink`] in production; tests install a [`RecordingSink`] and
//! assert on what reached it.
//!
//! # Design
//!
//! Sinks are shared across every connection of a server (`Arc<dyn
//! LogSink>`), so implementations must be `Send + Sync` and tolerate
//! concurrent calls. Forwarding is fire-and-forget by contract: a sink has
//! no way to push an error back into the protocol exchange, mirroring how
//! the original server hands records to its logging facade.

use std::sync::Mutex;

use protocol::LogLevel;

/// Destination for forwarded client log records.
pub trait LogSink: Send + Sync {
    /// Records one log event under the fully qualified `category`.
    ///
    /// `category` already includes the server's prefix and the
    /// authenticated application id; `message` is the client's text,
    /// verbatim.
    fn forward(&self, category: &str, level: LogLevel, message: &str);
}

/// Production sink that emits forwarded records as `tracing` events.
///
/// The four wire levels map one-to-one onto `tracing`'s `error!`, `warn!`,
/// `info!` and `debug!` macros. `tracing` targets must be string literals,
/// so the qualified category travels as a structured field instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn forward(&self, category: &str, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!(target: "slf4fx::forwarded", category, "{message}"),
            LogLevel::Warn => tracing::warn!(target: "slf4fx::forwarded", category, "{message}"),
            LogLevel::Info => tracing::info!(target: "slf4fx::forwarded", category, "{message}"),
            LogLevel::Debug => tracing::debug!(target: "slf4fx::forwarded", category, "{message}"),
        }
    }
}

/// One record captured by a [`RecordingSink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForwardedRecord {
    /// Fully qualified category the record was forwarded under.
    pub category: String,
    /// Severity of the record.
    pub level: LogLevel,
    /// Literal message text.
    pub message: String,
}

/// Test sink that captures forwarded records in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ForwardedRecord>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything forwarded so far.
    #[must_use]
    pub fn records(&self) -> Vec<ForwardedRecord> {
        self.lock().clone()
    }

    /// Drains and returns everything forwarded so far.
    pub fn take(&self) -> Vec<ForwardedRecord> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ForwardedRecord>> {
        // A panicking assertion in one test thread must not hide the
        // records from the asserting thread.
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl LogSink for RecordingSink {
    fn forward(&self, category: &str, level: LogLevel, message: &str) {
        self.lock().push(ForwardedRecord {
            category: category.to_owned(),
            level,
            message: message.to_owned(),
        });
    }
}
