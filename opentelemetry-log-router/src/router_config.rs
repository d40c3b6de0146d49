//! # Router Configuration module
//!
//! This module defines the declarative configuration structures used to
//! build a [`Router`](crate::Router) from YAML.
//!
//! ```yaml
//! channels:
//!   stdout:
//!     sink: stdout
//!     maximum_level: WARNING
//!   stderr:
//!     sink: stderr
//!     minimum_level: ERROR
//!   otel:
//!     sink: otel
//!     minimum_level: INFO
//! namespaces:
//!   "":
//!     channels: [stderr, stdout]
//!     level: INFO
//!   app:
//!     channels: [otel]
//! resource:
//!   service.name: my-service
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use opentelemetry::KeyValue;
use opentelemetry_sdk::Resource;
use serde::Deserialize;

use crate::error::RouterResult;
use crate::level::Level;

/// Configuration for the router
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Channels by name
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelConfig>,

    /// Namespace bindings. The root namespace is the empty key `""`.
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceConfig>,

    /// Resource attributes for the logger provider built by
    /// [`Configurator::configure_with_exporter`](crate::Configurator::configure_with_exporter)
    #[serde(default)]
    pub resource: HashMap<String, String>,
}

/// Configuration for one channel
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// `stdout`, `stderr`, `otel`, or a sink registered with
    /// [`Configurator::with_sink`](crate::Configurator::with_sink)
    pub sink: String,

    /// Inclusive lower bound, lowest level when absent
    #[serde(default)]
    pub minimum_level: Option<Level>,

    /// Inclusive upper bound, unbounded when absent
    #[serde(default)]
    pub maximum_level: Option<Level>,
}

/// Configuration for one namespace binding
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Channels bound to the namespace, in delivery order
    #[serde(default)]
    pub channels: Vec<String>,

    /// Whether records continue to ancestor namespaces
    #[serde(default = "default_propagate")]
    pub propagate: bool,

    /// Minimum level for records from this namespace and its descendants
    #[serde(default)]
    pub level: Option<Level>,
}

fn default_propagate() -> bool {
    true
}

impl Default for NamespaceConfig {
    fn default() -> Self {
        NamespaceConfig {
            channels: Vec::new(),
            propagate: default_propagate(),
            level: None,
        }
    }
}

impl RouterConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a RouterConfig from a YAML string
    pub fn from_yaml(yaml_str: &str) -> RouterResult<Self> {
        let config: RouterConfig = serde_yaml::from_str(yaml_str)?;
        Ok(config)
    }

    /// Creates a RouterConfig from a YAML file
    pub fn from_yaml_file(file_path: impl AsRef<Path>) -> RouterResult<Self> {
        let yaml_str = std::fs::read_to_string(file_path)?;
        Self::from_yaml(&yaml_str)
    }

    /// Builds the OpenTelemetry resource described by the `resource` section.
    pub fn resource(&self) -> Resource {
        let mut resource_builder = Resource::builder();
        for (key, value) in &self.resource {
            resource_builder =
                resource_builder.with_attribute(KeyValue::new(key.clone(), value.clone()));
        }
        resource_builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use opentelemetry::Key;

    #[test]
    fn test_router_config_from_yaml() {
        let yaml_str = r#"
        channels:
          stdout:
            sink: stdout
            maximum_level: WARNING
          stderr:
            sink: stderr
            minimum_level: ERROR
        namespaces:
          "":
            channels: [stderr, stdout]
            level: INFO
          app:
            channels: [stdout]
            propagate: false
        resource:
          service.name: test-service
        "#;
        let config = RouterConfig::from_yaml(yaml_str).unwrap();

        assert_eq!(config.channels.len(), 2);
        let stdout = &config.channels["stdout"];
        assert_eq!(stdout.sink, "stdout");
        assert_eq!(stdout.minimum_level, None);
        assert_eq!(stdout.maximum_level, Some(Level::Warn));

        let root = &config.namespaces[""];
        assert_eq!(root.channels, ["stderr", "stdout"]);
        assert!(root.propagate);
        assert_eq!(root.level, Some(Level::Info));
        assert!(!config.namespaces["app"].propagate);

        assert_eq!(config.resource.get("service.name").unwrap(), "test-service");
    }

    #[test]
    fn test_router_config_default() {
        let config = RouterConfig::default();
        assert!(config.channels.is_empty());
        assert!(config.namespaces.is_empty());
        assert!(config.resource.is_empty());
    }

    #[test]
    fn test_router_config_rejects_unknown_field() {
        let yaml_str = r#"
        channels:
          stdout:
            sink: stdout
            colour: true
        "#;
        let err = RouterConfig::from_yaml(yaml_str).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn test_router_config_rejects_invalid_level() {
        let yaml_str = r#"
        channels:
          stdout:
            sink: stdout
            minimum_level: LOUD
        "#;
        let err = RouterConfig::from_yaml(yaml_str).unwrap_err();
        assert!(err.to_string().contains("invalid level `LOUD`"));
    }

    #[test]
    fn test_router_config_missing_file() {
        let err = RouterConfig::from_yaml_file("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_resource_from_config() {
        let yaml_str = r#"
        resource:
          service.name: test-service
          service.instance.id: instance-1
        "#;
        let resource = RouterConfig::from_yaml(yaml_str).unwrap().resource();
        assert_eq!(
            resource.get(&Key::new("service.name")),
            Some(opentelemetry::Value::from("test-service"))
        );
        assert_eq!(
            resource.get(&Key::new("service.instance.id")),
            Some(opentelemetry::Value::from("instance-1"))
        );
    }
}
