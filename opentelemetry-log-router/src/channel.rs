//! # Channels
//!
//! A [`Channel`] is a named output with inclusive level bounds. The router
//! decides which channels see a record; the channel hands it to its
//! [`LogSink`], which owns delivery.
//!
//! ```ascii
//!   +--------+----------+   +---------------------+   +------------------+
//!   |        |          |   |                     |   |                  |
//!   | Router | route()  +---> Channel [min, max]  +---> LogSink.accept() |
//!   |        |          |   |                     |   | (stream / OTel)  |
//!   +--------+----------+   +---------------------+   +------------------+
//! ```
use crate::error::{ConfigError, RouterResult};
use crate::level::Level;
use crate::record::LogRecord;
use opentelemetry_sdk::error::OTelSdkResult;
use std::fmt::Debug;
use std::sync::Arc;

/// The interface implemented by every destination of routed records.
pub trait LogSink: Send + Sync + Debug {
    /// Takes ownership of delivering `record`.
    ///
    /// Called concurrently from every thread that emits records. Sinks that
    /// deliver over the network must buffer and return immediately, and a
    /// delivery failure must be handled inside the sink rather than
    /// surfaced here.
    fn accept(&self, record: &LogRecord);

    /// Force the records lying in the sink's buffers to be delivered.
    fn force_flush(&self) -> OTelSdkResult {
        Ok(())
    }

    /// Shuts down the sink.
    fn shutdown(&self) -> OTelSdkResult {
        Ok(())
    }
}

/// Inclusive `[minimum, maximum]` level range. An absent maximum is unbounded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LevelBounds {
    minimum: Level,
    maximum: Option<Level>,
}

impl LevelBounds {
    /// Creates bounds, rejecting a minimum above the maximum.
    pub fn new(minimum: Level, maximum: Option<Level>) -> RouterResult<Self> {
        Self::for_channel("", minimum, maximum)
    }

    fn for_channel(channel: &str, minimum: Level, maximum: Option<Level>) -> RouterResult<Self> {
        match maximum {
            Some(maximum) if minimum > maximum => Err(ConfigError::InvertedBounds {
                channel: channel.to_string(),
                minimum,
                maximum,
            }),
            _ => Ok(LevelBounds { minimum, maximum }),
        }
    }

    /// Lower bound.
    pub fn minimum(&self) -> Level {
        self.minimum
    }

    /// Upper bound, if any.
    pub fn maximum(&self) -> Option<Level> {
        self.maximum
    }

    /// Returns true when `level` lies inside the bounds.
    pub fn contains(&self, level: Level) -> bool {
        self.minimum <= level && self.maximum.map_or(true, |maximum| level <= maximum)
    }
}

impl Default for LevelBounds {
    fn default() -> Self {
        LevelBounds {
            minimum: Level::MIN,
            maximum: None,
        }
    }
}

/// A named, level-bounded output.
#[derive(Debug, Clone)]
pub struct Channel {
    name: String,
    bounds: LevelBounds,
    sink: Arc<dyn LogSink>,
}

impl Channel {
    /// Starts building a channel that delivers to `sink`.
    pub fn builder(name: impl Into<String>, sink: impl LogSink + 'static) -> ChannelBuilder {
        ChannelBuilder::new(name, Arc::new(sink))
    }

    /// Same as [`Channel::builder`] for a sink that is already shared.
    pub fn builder_with_shared_sink(
        name: impl Into<String>,
        sink: Arc<dyn LogSink>,
    ) -> ChannelBuilder {
        ChannelBuilder::new(name, sink)
    }

    /// Channel name, unique within a routing table.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records below this level are dropped.
    pub fn minimum_level(&self) -> Level {
        self.bounds.minimum
    }

    /// Records above this level are dropped. `None` is unbounded.
    pub fn maximum_level(&self) -> Option<Level> {
        self.bounds.maximum
    }

    /// Level bounds of the channel.
    pub fn bounds(&self) -> LevelBounds {
        self.bounds
    }

    /// Returns true when a record at `level` falls inside the channel bounds.
    pub fn admits(&self, level: Level) -> bool {
        self.bounds.contains(level)
    }

    /// Hands `record` to the sink. Bounds are checked by the router, not here.
    pub fn accept(&self, record: &LogRecord) {
        self.sink.accept(record);
    }

    /// Returns true when both channels deliver to the same sink instance.
    pub(crate) fn shares_sink_with(&self, other: &Channel) -> bool {
        Arc::ptr_eq(&self.sink, &other.sink)
    }

    pub(crate) fn force_flush(&self) -> OTelSdkResult {
        self.sink.force_flush()
    }

    pub(crate) fn shutdown(&self) -> OTelSdkResult {
        self.sink.shutdown()
    }
}

/// Builder for [`Channel`].
#[derive(Debug)]
pub struct ChannelBuilder {
    name: String,
    minimum: Level,
    maximum: Option<Level>,
    sink: Arc<dyn LogSink>,
}

impl ChannelBuilder {
    fn new(name: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        ChannelBuilder {
            name: name.into(),
            minimum: Level::MIN,
            maximum: None,
            sink,
        }
    }

    /// Sets the inclusive lower bound. Defaults to [`Level::MIN`].
    pub fn with_minimum_level(mut self, level: Level) -> Self {
        self.minimum = level;
        self
    }

    /// Sets the inclusive upper bound. Unbounded by default.
    pub fn with_maximum_level(mut self, level: Level) -> Self {
        self.maximum = Some(level);
        self
    }

    /// Validates the bounds and creates the channel.
    pub fn build(self) -> RouterResult<Channel> {
        let bounds = LevelBounds::for_channel(&self.name, self.minimum, self.maximum)?;
        Ok(Channel {
            name: self.name,
            bounds,
            sink: self.sink,
        })
    }
}
