//! # OpenTelemetry log router
//!
//! This crate routes log records from hierarchical, dot-separated namespaces
//! to level-bounded output channels: plain text streams such as stdout and
//! stderr, and an OpenTelemetry [`SdkLoggerProvider`].
//!
//! ```ascii
//!   +-----------+      +--------------+      +----------------------+
//!   | log!()    |      |              |      | Channel stdout       |
//!   | Router::  +------> RoutingTable +------> Channel stderr       |
//!   |   emit()  |      |  (ancestors) |      | Channel otel -> OTel |
//!   +-----------+      +--------------+      +----------------------+
//! ```
//!
//! A router is usually built from YAML with a [`Configurator`]:
//!
//! ```no_run
//! use opentelemetry_log_router::{Configurator, Level};
//!
//! let router = Configurator::new().configure_from_yaml(
//!     r#"
//!     channels:
//!       stdout: { sink: stdout, maximum_level: WARNING }
//!       stderr: { sink: stderr, minimum_level: ERROR }
//!     namespaces:
//!       "": { channels: [stderr, stdout], level: INFO }
//!     "#,
//! )?;
//! router.emit("app.service", Level::Warn, "disk almost full", [("percent", 93)]);
//! # Ok::<(), opentelemetry_log_router::ConfigError>(())
//! ```
//!
//! [`SdkLoggerProvider`]: opentelemetry_sdk::logs::SdkLoggerProvider
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/open-telemetry/opentelemetry-rust/main/assets/logo.svg"
)]

mod bridge;
mod channel;
mod error;
mod level;
pub mod namespace;
mod record;
mod router;
pub mod router_config;
pub mod sink;
mod table;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use opentelemetry::{otel_debug, otel_info};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::logs::{LogExporter, SdkLoggerProvider};

pub use bridge::LogRouterBridge;
pub use channel::{Channel, ChannelBuilder, LevelBounds, LogSink};
pub use error::{ConfigError, RouterResult};
pub use level::Level;
pub use record::{AttributeValue, LogRecord};
pub use router::Router;
pub use router_config::{ChannelConfig, NamespaceConfig, RouterConfig};
pub use table::{Binding, RoutingTable, RoutingTableBuilder};

use crate::sink::{OtelSink, StreamSink};

/// Environment variable overriding the level of the root namespace.
pub const LEVEL_ENV_VAR: &str = "OTEL_LOG_ROUTER_LEVEL";

/// Builds a [`Router`] from a [`RouterConfig`].
///
/// Channel sinks are resolved by name: sinks registered with
/// [`Configurator::with_sink`] first, then the built-in `stdout`, `stderr`
/// and `otel` sinks. The `otel` sink needs a logger provider, supplied with
/// [`Configurator::with_logger_provider`] or built by
/// [`Configurator::configure_with_exporter`].
#[derive(Debug, Default)]
pub struct Configurator {
    logger_provider: Option<SdkLoggerProvider>,
    sinks: HashMap<String, Arc<dyn LogSink>>,
}

impl Configurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logger provider used by channels with the `otel` sink.
    pub fn with_logger_provider(mut self, logger_provider: SdkLoggerProvider) -> Self {
        self.logger_provider = Some(logger_provider);
        self
    }

    /// Registers a sink under `name`. A registered sink shadows the built-in
    /// sink of the same name. Channels naming it share one instance.
    pub fn with_sink(mut self, name: impl Into<String>, sink: impl LogSink + 'static) -> Self {
        self.sinks.insert(name.into(), Arc::new(sink));
        self
    }

    pub fn configure_from_yaml(&self, router_config_str: &str) -> RouterResult<Router> {
        let config = RouterConfig::from_yaml(router_config_str)?;
        self.configure(config)
    }

    pub fn configure_from_yaml_file(&self, file_path: impl AsRef<Path>) -> RouterResult<Router> {
        let config = RouterConfig::from_yaml_file(file_path)?;
        self.configure(config)
    }

    /// Builds a router, applying the [`LEVEL_ENV_VAR`] override first.
    pub fn configure(&self, router_config: RouterConfig) -> RouterResult<Router> {
        self.build_router(router_config, self.logger_provider.as_ref())
    }

    /// Builds a logger provider exporting through `exporter` with a batch
    /// processor and the configured resource, then a router whose `otel`
    /// channels feed it.
    pub fn configure_with_exporter<E>(
        &self,
        router_config: RouterConfig,
        exporter: E,
    ) -> RouterResult<RouterProviders>
    where
        E: LogExporter + 'static,
    {
        let logger_provider = self.build_logs_sdk_provider(&router_config, exporter);
        let router = self.build_router(router_config, Some(&logger_provider))?;
        Ok(RouterProviders::new(router).with_logger_provider(logger_provider))
    }

    fn build_logs_sdk_provider<E>(
        &self,
        router_config: &RouterConfig,
        exporter: E,
    ) -> SdkLoggerProvider
    where
        E: LogExporter + 'static,
    {
        SdkLoggerProvider::builder()
            .with_resource(router_config.resource())
            .with_batch_exporter(exporter)
            .build()
    }

    fn build_router(
        &self,
        mut router_config: RouterConfig,
        logger_provider: Option<&SdkLoggerProvider>,
    ) -> RouterResult<Router> {
        if let Some(level) = Self::root_level_override()? {
            otel_info!(
                name: "Configurator.RootLevelOverride",
                variable = LEVEL_ENV_VAR,
                level = level.as_str()
            );
            router_config
                .namespaces
                .entry(namespace::ROOT.to_string())
                .or_default()
                .level = Some(level);
        }

        let mut otel_sink: Option<Arc<dyn LogSink>> = None;
        let mut builder = RoutingTable::builder();
        for (name, channel_config) in router_config.channels {
            let sink: Arc<dyn LogSink> = match self.sinks.get(&channel_config.sink) {
                Some(sink) => Arc::clone(sink),
                None => match channel_config.sink.as_str() {
                    "stdout" => Arc::new(StreamSink::stdout()),
                    "stderr" => Arc::new(StreamSink::stderr()),
                    "otel" => {
                        let provider = logger_provider
                            .ok_or_else(|| ConfigError::MissingLoggerProvider(name.clone()))?;
                        Arc::clone(
                            otel_sink.get_or_insert_with(|| Arc::new(OtelSink::new(provider))
                                as Arc<dyn LogSink>),
                        )
                    }
                    _ => {
                        return Err(ConfigError::UnknownSink {
                            channel: name,
                            sink: channel_config.sink.clone(),
                        })
                    }
                },
            };

            let mut channel_builder = Channel::builder_with_shared_sink(name, sink);
            if let Some(minimum) = channel_config.minimum_level {
                channel_builder = channel_builder.with_minimum_level(minimum);
            }
            if let Some(maximum) = channel_config.maximum_level {
                channel_builder = channel_builder.with_maximum_level(maximum);
            }
            builder = builder.with_channel(channel_builder.build()?);
        }

        for (ns, namespace_config) in router_config.namespaces {
            let mut binding =
                Binding::new(namespace_config.channels).with_propagate(namespace_config.propagate);
            if let Some(level) = namespace_config.level {
                binding = binding.with_level(level);
            }
            builder = builder.with_binding(ns, binding);
        }

        let table = builder.build()?;
        otel_debug!(
            name: "Configurator.RouterBuilt",
            channels = table.channels().len(),
            otel_enabled = logger_provider.is_some()
        );
        Ok(Router::new(table))
    }

    fn root_level_override() -> RouterResult<Option<Level>> {
        match std::env::var(LEVEL_ENV_VAR) {
            Ok(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidEnvironmentLevel {
                    variable: LEVEL_ENV_VAR,
                    value,
                }),
            Err(_) => Ok(None),
        }
    }
}

/// Holds a configured router and the logger provider built for it, if any.
#[derive(Debug)]
pub struct RouterProviders {
    router: Arc<Router>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl RouterProviders {
    pub fn new(router: Router) -> Self {
        RouterProviders {
            router: Arc::new(router),
            logger_provider: None,
        }
    }

    pub fn with_logger_provider(mut self, logger_provider: SdkLoggerProvider) -> Self {
        self.logger_provider = Some(logger_provider);
        self
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    pub fn logger_provider(&self) -> Option<&SdkLoggerProvider> {
        self.logger_provider.as_ref()
    }

    /// Shuts the router down, then the logger provider.
    pub fn shutdown(self) -> OTelSdkResult {
        self.router.shutdown()?;
        if let Some(logger_provider) = self.logger_provider {
            logger_provider.shutdown()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::InMemorySink;
    use opentelemetry_sdk::logs::InMemoryLogExporter;

    const SAMPLE: &str = r#"
    channels:
      stdout:
        sink: memory_out
        maximum_level: WARNING
      stderr:
        sink: memory_err
        minimum_level: ERROR
    namespaces:
      "":
        channels: [stderr, stdout]
        level: INFO
    "#;

    fn configurator() -> (Configurator, InMemorySink, InMemorySink) {
        let out = InMemorySink::default();
        let err = InMemorySink::default();
        let configurator = Configurator::new()
            .with_sink("memory_out", out.clone())
            .with_sink("memory_err", err.clone());
        (configurator, out, err)
    }

    const NONE: [(&str, AttributeValue); 0] = [];

    #[test]
    fn test_configure_empty() -> Result<(), ConfigError> {
        temp_env::with_var_unset(LEVEL_ENV_VAR, || {
            let router = Configurator::new().configure(RouterConfig::default())?;
            assert!(router.table().channels().is_empty());
            assert!(router.shutdown().is_ok());
            Ok(())
        })
    }

    #[test]
    fn test_configure_from_yaml_routes_by_level() {
        temp_env::with_var_unset(LEVEL_ENV_VAR, || {
            let (configurator, out, err) = configurator();
            let router = configurator.configure_from_yaml(SAMPLE).unwrap();

            router.emit("app", Level::Debug, "dropped", NONE);
            router.emit("app", Level::Info, "info", NONE);
            router.emit("app", Level::Critical, "critical", NONE);

            assert_eq!(out.get_accepted_records().len(), 1);
            assert_eq!(err.get_accepted_records()[0].message(), "critical");
        });
    }

    #[test]
    fn test_environment_overrides_root_level() {
        temp_env::with_var(LEVEL_ENV_VAR, Some("debug"), || {
            let (configurator, out, _err) = configurator();
            let router = configurator.configure_from_yaml(SAMPLE).unwrap();

            router.emit("app", Level::Debug, "now visible", NONE);
            assert_eq!(out.get_accepted_records().len(), 1);
        });
    }

    #[test]
    fn test_environment_override_without_root_binding() {
        temp_env::with_var(LEVEL_ENV_VAR, Some("ERROR"), || {
            let router = Configurator::new().configure(RouterConfig::default()).unwrap();
            assert!(!router.is_enabled("app", Level::Warn));
            assert!(router.is_enabled("app", Level::Error));
        });
    }

    #[test]
    fn test_invalid_environment_level() {
        temp_env::with_var(LEVEL_ENV_VAR, Some("chatty"), || {
            let err = Configurator::new()
                .configure(RouterConfig::default())
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidEnvironmentLevel { ref value, .. } if value == "chatty"
            ));
        });
    }

    #[test]
    fn test_unknown_sink() {
        temp_env::with_var_unset(LEVEL_ENV_VAR, || {
            let err = Configurator::new()
                .configure_from_yaml("channels: { file: { sink: file } }")
                .unwrap_err();
            assert!(matches!(err, ConfigError::UnknownSink { ref sink, .. } if sink == "file"));
        });
    }

    #[test]
    fn test_otel_sink_requires_provider() {
        temp_env::with_var_unset(LEVEL_ENV_VAR, || {
            let err = Configurator::new()
                .configure_from_yaml("channels: { otel: { sink: otel } }")
                .unwrap_err();
            assert!(matches!(err, ConfigError::MissingLoggerProvider(ref c) if c == "otel"));
        });
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        temp_env::with_var_unset(LEVEL_ENV_VAR, || {
            let err = Configurator::new()
                .configure_from_yaml(
                    "channels: { stdout: { sink: stdout, minimum_level: ERROR, maximum_level: INFO } }",
                )
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvertedBounds { .. }));
        });
    }

    #[test]
    fn test_configure_with_exporter() {
        temp_env::with_var_unset(LEVEL_ENV_VAR, || {
            let exporter = InMemoryLogExporter::default();
            let config = RouterConfig::from_yaml(
                r#"
                channels:
                  otel: { sink: otel, minimum_level: INFO }
                namespaces:
                  app: { channels: [otel] }
                resource:
                  service.name: test-service
                "#,
            )
            .unwrap();
            let providers = Configurator::new()
                .configure_with_exporter(config, exporter.clone())
                .unwrap();
            assert!(providers.logger_provider().is_some());

            providers
                .router()
                .emit("app.service", Level::Warn, "exported", [("attempt", 1)]);
            providers.router().emit("app", Level::Debug, "ignored", NONE);
            providers.router().force_flush().unwrap();

            let logs = exporter.get_emitted_logs().unwrap();
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].record.severity_text(), Some("WARN"));
            assert!(providers.shutdown().is_ok());
        });
    }

    #[test]
    fn test_router_providers_without_logger_provider() {
        let router = Router::new(RoutingTable::builder().build().unwrap());
        let providers = RouterProviders::new(router);
        assert!(providers.logger_provider().is_none());
        assert!(providers.shutdown().is_ok());
    }
}
