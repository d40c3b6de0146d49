//! run with `$ cargo run --example routing-basic`

/// This example builds a router by hand: `INFO` and `WARN` records go to
/// stdout, `ERROR` and above to stderr, and records from the `app` namespace
/// are also exported through OpenTelemetry with the stdout exporter.
/// Records are produced with the `log` crate macros through the bridge.
use std::sync::Arc;

use log::{error, info, warn};
use opentelemetry_log_router::sink::{OtelSink, StreamSink};
use opentelemetry_log_router::{Binding, Channel, Level, LogRouterBridge, Router, RoutingTable};
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::Resource;
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Surface the router's internal diagnostics.
    let filter_fmt = EnvFilter::new("info").add_directive("opentelemetry-log-router=debug".parse()?);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_thread_names(true)
        .with_filter(filter_fmt);
    tracing_subscriber::registry().with(fmt_layer).init();

    let logger_provider = SdkLoggerProvider::builder()
        .with_resource(
            Resource::builder()
                .with_service_name("routing-basic-example")
                .build(),
        )
        .with_simple_exporter(opentelemetry_stdout::LogExporter::default())
        .build();

    let table = RoutingTable::builder()
        .with_channel(
            Channel::builder("stdout", StreamSink::stdout())
                .with_maximum_level(Level::Warn)
                .build()?,
        )
        .with_channel(
            Channel::builder("stderr", StreamSink::stderr())
                .with_minimum_level(Level::Error)
                .build()?,
        )
        .with_channel(
            Channel::builder("otel", OtelSink::new(&logger_provider))
                .with_minimum_level(Level::Info)
                .build()?,
        )
        .with_binding("", Binding::new(["stderr", "stdout"]).with_level(Level::Info))
        .with_binding("app", Binding::new(["otel"]))
        .build()?;
    let router = Arc::new(Router::new(table));
    LogRouterBridge::new(Arc::clone(&router)).install()?;

    info!(target: "app.service.a", "hello from {}. My price is {}", "apple", 2.99);
    warn!(target: "app", user_id = "JP10-0213-7420-0001"; "login throttled");
    error!(target: "storage", "disk full");
    info!(target: "storage", "only on stdout");

    router.shutdown()?;
    logger_provider.shutdown()?;
    Ok(())
}
