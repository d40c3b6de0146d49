use crate::channel::LogSink;
use crate::record::LogRecord;
use opentelemetry::logs::{AnyValue, LogRecord as _, Logger, LoggerProvider};
use opentelemetry::otel_debug;
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{SdkLogger, SdkLoggerProvider};
use std::fmt;
use std::time::SystemTime;

/// Instrumentation scope name of the logger used by [`OtelSink`].
pub const INSTRUMENTATION_SCOPE_NAME: &str = "opentelemetry-log-router";

/// A sink that forwards records to an OpenTelemetry [`SdkLoggerProvider`].
///
/// The record namespace becomes the OpenTelemetry target, the message
/// becomes the body and every attribute is copied over. Batching, retry and
/// export happen in the provider's log processors, so `accept` only pays
/// for building the OpenTelemetry record.
///
/// The provider is shared: [`LogSink::shutdown`] flushes it but leaves the
/// shutdown to whoever owns it.
pub struct OtelSink {
    provider: SdkLoggerProvider,
    logger: SdkLogger,
}

impl OtelSink {
    /// Creates a sink emitting through a logger obtained from `provider`.
    pub fn new(provider: &SdkLoggerProvider) -> Self {
        OtelSink {
            provider: provider.clone(),
            logger: provider.logger(INSTRUMENTATION_SCOPE_NAME),
        }
    }
}

impl fmt::Debug for OtelSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtelSink")
    }
}

impl LogSink for OtelSink {
    fn accept(&self, record: &LogRecord) {
        let mut log_record = self.logger.create_log_record();
        log_record.set_target(record.namespace().to_string());
        log_record.set_timestamp(record.timestamp());
        log_record.set_observed_timestamp(SystemTime::now());
        log_record.set_severity_number(record.level().severity());
        log_record.set_severity_text(record.level().as_str());
        log_record.set_body(AnyValue::from(record.message().to_string()));
        for (key, value) in record.attributes() {
            log_record.add_attribute(key.clone(), AnyValue::from(value.clone()));
        }
        self.logger.emit(log_record);
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.provider.force_flush()
    }

    fn shutdown(&self) -> OTelSdkResult {
        otel_debug!(
            name: "OtelSink.Shutdown",
            message = "Flushing the shared logger provider; the provider owner is responsible for shutting it down."
        );
        self.provider.force_flush()
    }
}
