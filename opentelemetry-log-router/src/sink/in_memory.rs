use crate::channel::LogSink;
use crate::record::LogRecord;
use opentelemetry::otel_debug;
use opentelemetry_sdk::error::OTelSdkResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A sink that stores accepted records in memory.
///
/// Clones share the same storage, so a test can keep one handle and give
/// another to a [`Channel`](crate::Channel).
#[derive(Clone, Debug, Default)]
pub struct InMemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
    flushes: Arc<AtomicUsize>,
}

impl InMemorySink {
    /// Returns a copy of every record accepted so far, in acceptance order.
    pub fn get_accepted_records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// Number of times [`LogSink::force_flush`] was called.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Clears the stored records.
    pub fn reset(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl LogSink for InMemorySink {
    fn accept(&self, record: &LogRecord) {
        match self.records.lock() {
            Ok(mut records) => records.push(record.clone()),
            Err(_) => {
                otel_debug!(name: "InMemorySink.Accept.MutexPoisoning");
            }
        }
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
