use std::sync::{Arc, Mutex};

use opentelemetry_log_router::{Level, LogRecord, LogSink};
use opentelemetry_sdk::error::OTelSdkResult;

/// Sink recording every accepted record, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records()
            .iter()
            .map(|r| r.message().to_string())
            .collect()
    }

    #[allow(dead_code)]
    pub fn levels(&self) -> Vec<Level> {
        self.records().iter().map(|r| r.level()).collect()
    }
}

impl LogSink for RecordingSink {
    fn accept(&self, record: &LogRecord) {
        self.records.lock().unwrap().push(record.clone());
    }

    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }
}
