use crate::channel::Channel;
use crate::level::Level;
use crate::record::{AttributeValue, LogRecord};
use crate::table::RoutingTable;
use opentelemetry::{otel_debug, otel_info, otel_warn};
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// Dispatches log records to the channels selected by a [`RoutingTable`].
///
/// A router is built once at startup and shared, typically as
/// `Arc<Router>`. Routing never blocks on delivery and never fails: records
/// that match no channel are dropped.
#[derive(Debug)]
pub struct Router {
    table: RoutingTable,
    is_shutdown: AtomicBool,
}

impl Router {
    /// Creates a router over a validated table.
    pub fn new(table: RoutingTable) -> Self {
        Router {
            table,
            is_shutdown: AtomicBool::new(false),
        }
    }

    /// The routing table this router dispatches with.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Returns true when a record from `namespace` at `level` passes the
    /// namespace level gate. It may still match no channel.
    pub fn is_enabled(&self, namespace: &str, level: Level) -> bool {
        self.table
            .effective_level(namespace)
            .map_or(true, |threshold| level >= threshold)
    }

    /// Hands `record` to every qualifying channel and returns those channels,
    /// most specific namespace first.
    ///
    /// The namespace level gate is not applied here; see [`Router::emit`].
    pub fn route(&self, record: &LogRecord) -> Vec<&Channel> {
        if self.is_shutdown.load(Ordering::Relaxed) {
            otel_warn!(
                name: "Router.Route.AfterShutdown",
                message = "Records are being routed after Shutdown. They will be dropped."
            );
            return Vec::new();
        }
        let channels = self.table.select(record);
        for channel in &channels {
            channel.accept(record);
        }
        channels
    }

    /// Builds a record and routes it, unless the namespace level gate
    /// rejects it.
    pub fn emit<I, K, V>(
        &self,
        namespace: &str,
        level: Level,
        message: impl Into<String>,
        attributes: I,
    ) where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        if !self.is_enabled(namespace, level) {
            return;
        }
        let record = LogRecord::new(namespace, level, message).with_attributes(attributes);
        self.route(&record);
    }

    /// One channel per distinct sink, so shared sinks are flushed and shut
    /// down once.
    fn sink_owners(&self) -> Vec<&Channel> {
        let mut owners: Vec<&Channel> = Vec::new();
        for channel in self.table.channels() {
            if !owners.iter().any(|owner| owner.shares_sink_with(channel)) {
                owners.push(channel);
            }
        }
        owners
    }

    /// Flushes every sink.
    pub fn force_flush(&self) -> OTelSdkResult {
        let result: Vec<_> = self
            .sink_owners()
            .into_iter()
            .map(|channel| channel.force_flush())
            .collect();
        if result.iter().all(|r| r.is_ok()) {
            Ok(())
        } else {
            Err(OTelSdkError::InternalFailure(format!("errs: {:?}", result)))
        }
    }

    /// Shuts down every sink. Records routed afterwards are dropped.
    pub fn shutdown(&self) -> OTelSdkResult {
        otel_debug!(name: "Router.ShutdownInvokedByUser");
        if self
            .is_shutdown
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        let mut errors = Vec::new();
        for channel in self.sink_owners() {
            if let Err(err) = channel.shutdown() {
                otel_debug!(
                    name: "Router.ShutdownError",
                    channel = channel.name(),
                    error = format!("{err}")
                );
                errors.push(err);
            }
        }
        otel_info!(name: "Router.Shutdown", failed_channels = errors.len());
        if errors.is_empty() {
            Ok(())
        } else {
            Err(OTelSdkError::InternalFailure(format!(
                "Shutdown errors: {:?}",
                errors
            )))
        }
    }
}
