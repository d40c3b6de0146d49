//! Built-in [`LogSink`](crate::LogSink) implementations.
//!
//! - [`StreamSink`] writes one text line per record to stdout, stderr or any writer.
//! - [`OtelSink`] forwards records to an OpenTelemetry [`SdkLoggerProvider`].
//! - [`InMemorySink`] keeps records in memory for tests (feature `testing`).
//!
//! [`SdkLoggerProvider`]: opentelemetry_sdk::logs::SdkLoggerProvider
mod otel;
mod stream;

/// In-memory sink for testing purpose.
#[cfg(any(feature = "testing", test))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "testing", test))))]
pub mod in_memory;
#[cfg(any(feature = "testing", test))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "testing", test))))]
pub use in_memory::InMemorySink;

pub use otel::{OtelSink, INSTRUMENTATION_SCOPE_NAME};
pub use stream::{StreamSink, StreamTarget};
