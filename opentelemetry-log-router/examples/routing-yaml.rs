//! run with `$ cargo run --example routing-yaml`
//!
//! Set `OTEL_LOG_ROUTER_LEVEL=DEBUG` to lower the root namespace level.

/// This example builds the router and an OpenTelemetry logger provider from a
/// YAML document, then emits records directly through the router.
use opentelemetry_log_router::{Configurator, Level, RouterConfig};

const CONFIG: &str = r#"
channels:
  stdout:
    sink: stdout
    maximum_level: WARNING
  stderr:
    sink: stderr
    minimum_level: ERROR
  otel:
    sink: otel
    minimum_level: INFO
namespaces:
  "":
    channels: [stderr, stdout]
    level: INFO
  app:
    channels: [otel]
  azure.core.pipeline.policies.http_logging_policy:
    level: WARNING
resource:
  service.name: routing-yaml-example
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RouterConfig::from_yaml(CONFIG)?;
    let providers = Configurator::new()
        .configure_with_exporter(config, opentelemetry_stdout::LogExporter::default())?;
    let router = providers.router();

    router.emit(
        "app.service.a",
        Level::Info,
        "order accepted",
        [("order.id", 4711)],
    );
    router.emit("app", Level::Debug, "filtered by the root level", [("n", 1)]);
    router.emit(
        "azure.core.pipeline.policies.http_logging_policy",
        Level::Info,
        "filtered by the namespace level",
        [("n", 2)],
    );
    router.emit("worker", Level::Critical, "worker crashed", [("exit", 137)]);

    providers.shutdown()?;
    Ok(())
}
