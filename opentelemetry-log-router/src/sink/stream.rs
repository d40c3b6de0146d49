use crate::channel::LogSink;
use crate::record::LogRecord;
use chrono::{DateTime, Utc};
use opentelemetry::otel_debug;
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Where a [`StreamSink`] writes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamTarget {
    /// Process standard output
    Stdout,
    /// Process standard error
    Stderr,
    /// A caller supplied writer
    Writer,
}

/// A sink that writes one formatted line per record to a text stream.
///
/// Lines look like
/// `2024-01-31 10:15:02.123 [WARN] [app.service] app::service -: disk almost full free_mb=12`,
/// where the origin before `-:` is omitted when the record has none.
/// Write failures are reported through internal logs and otherwise ignored.
pub struct StreamSink {
    target: StreamTarget,
    writer: Mutex<Box<dyn Write + Send>>,
    is_shutdown: AtomicBool,
}

impl StreamSink {
    /// Writes to standard output.
    pub fn stdout() -> Self {
        Self::with_target(StreamTarget::Stdout, Box::new(io::stdout()))
    }

    /// Writes to standard error.
    pub fn stderr() -> Self {
        Self::with_target(StreamTarget::Stderr, Box::new(io::stderr()))
    }

    /// Writes to `writer`.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self::with_target(StreamTarget::Writer, Box::new(writer))
    }

    fn with_target(target: StreamTarget, writer: Box<dyn Write + Send>) -> Self {
        StreamSink {
            target,
            writer: Mutex::new(writer),
            is_shutdown: AtomicBool::new(false),
        }
    }

    /// Destination of this sink.
    pub fn target(&self) -> StreamTarget {
        self.target
    }
}

impl fmt::Debug for StreamSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamSink")
            .field("target", &self.target)
            .finish()
    }
}

/// Renders `record` as a single line, without the trailing newline.
pub(crate) fn format_record(record: &LogRecord) -> String {
    let datetime: DateTime<Utc> = record.timestamp().into();
    let mut line = format!(
        "{} [{}] [{}] ",
        datetime.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.namespace()
    );
    if let Some(origin) = record.origin() {
        let _ = write!(line, "{origin} ");
    }
    let _ = write!(line, "-: {}", record.message());
    for (key, value) in record.attributes() {
        let _ = write!(line, " {key}={value}");
    }
    line
}

impl LogSink for StreamSink {
    fn accept(&self, record: &LogRecord) {
        if self.is_shutdown.load(Ordering::Relaxed) {
            otel_debug!(name: "StreamSink.Accept.AfterShutdown");
            return;
        }
        let line = format_record(record);
        match self.writer.lock() {
            Ok(mut writer) => {
                if let Err(err) = writeln!(writer, "{line}") {
                    otel_debug!(
                        name: "StreamSink.Accept.WriteError",
                        error = format!("{err}")
                    );
                }
            }
            Err(_) => {
                otel_debug!(name: "StreamSink.Accept.MutexPoisoning");
            }
        }
    }

    fn force_flush(&self) -> OTelSdkResult {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| OTelSdkError::InternalFailure(format!("Failed to lock writer: {e}")))?;
        writer
            .flush()
            .map_err(|e| OTelSdkError::InternalFailure(format!("Failed to flush writer: {e}")))
    }

    fn shutdown(&self) -> OTelSdkResult {
        if self
            .is_shutdown
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        self.force_flush()
    }
}
