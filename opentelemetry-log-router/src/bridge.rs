//! Bridge from the [`log`] crate facade to a [`Router`].
use crate::level::Level;
use crate::record::{AttributeValue, LogRecord};
use crate::router::Router;
use log::kv::{self, VisitSource};
use log::{Metadata, Record};
use std::borrow::Cow;
use std::sync::Arc;

/// A [`log::Log`] implementation that feeds every `log` macro call into a
/// [`Router`].
///
/// The `log` target becomes the record namespace. Targets default to the
/// module path, so `::` separators are turned into `.`: a record logged from
/// `app::service` is routed as namespace `app.service`. The module path is
/// kept as the record origin.
#[derive(Debug, Clone)]
pub struct LogRouterBridge {
    router: Arc<Router>,
}

impl LogRouterBridge {
    /// Creates a bridge dispatching through `router`.
    pub fn new(router: Arc<Router>) -> Self {
        LogRouterBridge { router }
    }

    /// Registers the bridge as the global `log` logger.
    ///
    /// Filtering is left to the router, so the global max level is set to
    /// `Trace`.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }
}

impl log::Log for LogRouterBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.router
            .is_enabled(&namespace_of(metadata.target()), metadata.level().into())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut visitor = AttributeVisitor::default();
        // A failing visit leaves whatever was collected so far.
        let _ = record.key_values().visit(&mut visitor);

        let mut log_record = LogRecord::new(
            namespace_of(record.target()),
            Level::from(record.level()),
            record.args().to_string(),
        )
        .with_attributes(visitor.attributes);
        if let Some(module_path) = record.module_path() {
            log_record = log_record.with_origin(module_path);
        }
        self.router.route(&log_record);
    }

    fn flush(&self) {
        let _ = self.router.force_flush();
    }
}

/// Maps a `log` target to a namespace.
fn namespace_of(target: &str) -> Cow<'_, str> {
    if target.contains("::") {
        Cow::Owned(target.replace("::", "."))
    } else {
        Cow::Borrowed(target)
    }
}

#[derive(Default)]
struct AttributeVisitor {
    attributes: Vec<(String, AttributeValue)>,
}

impl<'kvs> VisitSource<'kvs> for AttributeVisitor {
    fn visit_pair(
        &mut self,
        key: kv::Key<'kvs>,
        value: kv::Value<'kvs>,
    ) -> Result<(), kv::Error> {
        let value = if let Some(b) = value.to_bool() {
            AttributeValue::Bool(b)
        } else if let Some(i) = value.to_i64() {
            AttributeValue::Int(i)
        } else if let Some(f) = value.to_f64() {
            AttributeValue::Double(f)
        } else if let Some(s) = value.to_borrowed_str() {
            AttributeValue::String(s.to_string())
        } else {
            AttributeValue::String(value.to_string())
        };
        self.attributes.push((key.as_str().to_string(), value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::sink::InMemorySink;
    use crate::table::{Binding, RoutingTable};
    use log::Log;

    fn bridge_with_sink() -> (LogRouterBridge, InMemorySink) {
        let sink = InMemorySink::default();
        let table = RoutingTable::builder()
            .with_channel(Channel::builder("memory", sink.clone()).build().unwrap())
            .with_binding("app", Binding::new(["memory"]).with_level(Level::Info))
            .build()
            .unwrap();
        (LogRouterBridge::new(Arc::new(Router::new(table))), sink)
    }

    #[test]
    fn maps_target_level_and_message() {
        let (bridge, sink) = bridge_with_sink();
        bridge.log(
            &Record::builder()
                .target("app.service")
                .level(log::Level::Warn)
                .args(format_args!("disk at {}%", 93))
                .build(),
        );

        let records = sink.get_accepted_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].namespace(), "app.service");
        assert_eq!(records[0].level(), Level::Warn);
        assert_eq!(records[0].message(), "disk at 93%");
    }

    #[test]
    fn module_path_target_routes_through_parent_namespace() {
        let (bridge, sink) = bridge_with_sink();
        bridge.log(
            &Record::builder()
                .target("app::service")
                .module_path(Some("app::service"))
                .level(log::Level::Info)
                .args(format_args!("from a module"))
                .build(),
        );
        bridge.log(
            &Record::builder()
                .target("app::service")
                .level(log::Level::Debug)
                .args(format_args!("below the app level"))
                .build(),
        );

        let records = sink.get_accepted_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].namespace(), "app.service");
        assert_eq!(records[0].origin(), Some("app::service"));
        assert!(!bridge.enabled(
            &Metadata::builder()
                .target("app::service")
                .level(log::Level::Debug)
                .build()
        ));
    }

    #[test]
    fn converts_key_values_to_attributes() {
        let (bridge, sink) = bridge_with_sink();
        let kvs: &[(&str, kv::Value)] = &[
            ("fruit", kv::Value::from("apple")),
            ("price", kv::Value::from(2.99)),
            ("count", kv::Value::from(3i64)),
            ("fresh", kv::Value::from(true)),
        ];
        bridge.log(
            &Record::builder()
                .target("app")
                .level(log::Level::Info)
                .args(format_args!("priced"))
                .key_values(&kvs)
                .build(),
        );

        let records = sink.get_accepted_records();
        let record = &records[0];
        assert_eq!(
            record.attribute("fruit"),
            Some(&AttributeValue::String("apple".into()))
        );
        assert_eq!(record.attribute("price"), Some(&AttributeValue::Double(2.99)));
        assert_eq!(record.attribute("count"), Some(&AttributeValue::Int(3)));
        assert_eq!(record.attribute("fresh"), Some(&AttributeValue::Bool(true)));
    }

    #[test]
    fn enabled_follows_namespace_level() {
        let (bridge, sink) = bridge_with_sink();
        let debug = Metadata::builder()
            .target("app")
            .level(log::Level::Debug)
            .build();
        assert!(!bridge.enabled(&debug));

        bridge.log(
            &Record::builder()
                .target("app")
                .level(log::Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        assert!(sink.get_accepted_records().is_empty());
    }

    #[test]
    fn flush_reaches_sinks() {
        let (bridge, sink) = bridge_with_sink();
        bridge.flush();
        assert_eq!(sink.flush_count(), 1);
    }
}
