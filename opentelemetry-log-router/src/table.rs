//! # Routing table
//!
//! The routing table binds namespaces to channels. It is assembled once with
//! [`RoutingTableBuilder`], validated, and never modified afterwards, so any
//! number of threads can route through it without locking.
use crate::channel::Channel;
use crate::error::{ConfigError, RouterResult};
use crate::level::Level;
use crate::namespace;
use crate::record::LogRecord;
use opentelemetry::otel_debug;
use std::collections::HashMap;

/// Index of a channel inside its routing table.
type ChannelId = usize;

/// Channels and settings attached to one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    channels: Vec<String>,
    propagate: bool,
    level: Option<Level>,
}

impl Binding {
    /// Binds the named channels, in order. Propagation is enabled and no
    /// namespace level is set.
    pub fn new<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Binding {
            channels: channels.into_iter().map(Into::into).collect(),
            propagate: true,
            level: None,
        }
    }

    /// A binding with no channels, useful to set only `propagate` or `level`.
    pub fn empty() -> Self {
        Self::new(std::iter::empty::<String>())
    }

    /// Whether records continue to the parent namespace's channels.
    pub fn with_propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// Sets the namespace level: records from this namespace or its
    /// descendants below `level` are discarded by [`Router::emit`].
    ///
    /// [`Router::emit`]: crate::Router::emit
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Names of the bound channels.
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Propagation flag.
    pub fn propagate(&self) -> bool {
        self.propagate
    }

    /// Namespace level, if set.
    pub fn level(&self) -> Option<Level> {
        self.level
    }
}

#[derive(Debug)]
struct ResolvedBinding {
    channels: Vec<ChannelId>,
    propagate: bool,
    level: Option<Level>,
}

/// Immutable mapping from namespaces to level-bounded channels.
#[derive(Debug)]
pub struct RoutingTable {
    channels: Vec<Channel>,
    bindings: HashMap<String, ResolvedBinding>,
}

impl RoutingTable {
    /// Starts building a routing table.
    pub fn builder() -> RoutingTableBuilder {
        RoutingTableBuilder::default()
    }

    /// Every registered channel, in registration order.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Looks up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name() == name)
    }

    /// Selects the channels that must receive `record`.
    ///
    /// Walks from the record's namespace towards the root, collecting bound
    /// channels until a binding with propagation disabled has been visited.
    /// A channel is kept when the record level lies within its bounds, and
    /// appears once even if bound at several ancestors. The result is in
    /// discovery order, most specific namespace first.
    pub fn select(&self, record: &LogRecord) -> Vec<&Channel> {
        let mut selected: Vec<ChannelId> = Vec::new();
        for ns in namespace::ancestors(record.namespace()) {
            let Some(binding) = self.bindings.get(ns) else {
                continue;
            };
            for &id in &binding.channels {
                if self.channels[id].admits(record.level()) && !selected.contains(&id) {
                    selected.push(id);
                }
            }
            if !binding.propagate {
                break;
            }
        }
        selected.into_iter().map(|id| &self.channels[id]).collect()
    }

    /// Namespace level inherited from the nearest binding on `namespace` or
    /// one of its ancestors that declares a level.
    pub fn effective_level(&self, namespace: &str) -> Option<Level> {
        namespace::ancestors(namespace)
            .filter_map(|ns| self.bindings.get(ns))
            .find_map(|binding| binding.level)
    }
}

/// Builder for [`RoutingTable`].
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    channels: Vec<Channel>,
    bindings: Vec<(String, Binding)>,
}

impl RoutingTableBuilder {
    /// Registers a channel. Names must be unique.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    /// Binds `binding` to `namespace`. Use `""` for the root namespace.
    pub fn with_binding(mut self, namespace: impl Into<String>, binding: Binding) -> Self {
        self.bindings.push((namespace.into(), binding));
        self
    }

    /// Validates channel names, namespaces and channel references, then
    /// freezes the table.
    pub fn build(self) -> RouterResult<RoutingTable> {
        let mut ids: HashMap<&str, ChannelId> = HashMap::with_capacity(self.channels.len());
        for (id, channel) in self.channels.iter().enumerate() {
            if ids.insert(channel.name(), id).is_some() {
                return Err(ConfigError::DuplicateChannel(channel.name().to_string()));
            }
        }

        let mut bindings = HashMap::with_capacity(self.bindings.len());
        for (ns, binding) in &self.bindings {
            namespace::validate(ns)?;
            if bindings.contains_key(ns.as_str()) {
                return Err(ConfigError::DuplicateNamespace(ns.clone()));
            }
            let mut resolved = Vec::with_capacity(binding.channels.len());
            for name in &binding.channels {
                let id = *ids
                    .get(name.as_str())
                    .ok_or_else(|| ConfigError::UnknownChannel {
                        namespace: ns.clone(),
                        channel: name.clone(),
                    })?;
                if !resolved.contains(&id) {
                    resolved.push(id);
                }
            }
            bindings.insert(
                ns.clone(),
                ResolvedBinding {
                    channels: resolved,
                    propagate: binding.propagate,
                    level: binding.level,
                },
            );
        }
        drop(ids);

        otel_debug!(
            name: "RoutingTable.Built",
            channels = self.channels.len(),
            namespaces = bindings.len()
        );
        Ok(RoutingTable {
            channels: self.channels,
            bindings,
        })
    }
}
