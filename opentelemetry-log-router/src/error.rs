//! Configuration errors.
//!
//! Every error in this module is raised while the router is being built.
//! Once a [`Router`](crate::Router) exists, routing itself never fails.
use crate::level::Level;
use thiserror::Error;

/// Result type returned by every fallible setup operation of this crate.
pub type RouterResult<T> = Result<T, ConfigError>;

/// Errors raised while building channels, routing tables or a router from
/// configuration.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// A channel's minimum level is above its maximum level.
    #[error("channel `{channel}` has minimum level {minimum} above maximum level {maximum}")]
    InvertedBounds {
        /// Channel name, or an empty string when the bounds are built on their own.
        channel: String,
        /// Configured minimum level.
        minimum: Level,
        /// Configured maximum level.
        maximum: Level,
    },

    /// A namespace binding refers to a channel that was never registered.
    #[error("namespace `{namespace}` refers to unknown channel `{channel}`")]
    UnknownChannel {
        /// Namespace holding the reference.
        namespace: String,
        /// Name of the missing channel.
        channel: String,
    },

    /// Two channels were registered under the same name.
    #[error("channel `{0}` is defined more than once")]
    DuplicateChannel(String),

    /// The same namespace was bound twice.
    #[error("namespace `{0}` is bound more than once")]
    DuplicateNamespace(String),

    /// A namespace has empty segments, e.g. `app..x` or `.app`.
    #[error("invalid namespace `{0}`: segments must be non-empty and separated by '.'")]
    InvalidNamespace(String),

    /// A level name could not be parsed.
    #[error("invalid level `{0}`")]
    InvalidLevel(String),

    /// The level override environment variable holds an invalid level.
    #[error("environment variable {variable} holds invalid level `{value}`")]
    InvalidEnvironmentLevel {
        /// Variable name.
        variable: &'static str,
        /// Raw value read from the environment.
        value: String,
    },

    /// A channel uses a sink name that is neither built in nor registered.
    #[error("channel `{channel}` uses unknown sink `{sink}`")]
    UnknownSink {
        /// Channel name.
        channel: String,
        /// Requested sink name.
        sink: String,
    },

    /// A channel forwards to OpenTelemetry but no logger provider was supplied.
    #[error("channel `{0}` uses the `otel` sink but no logger provider is configured")]
    MissingLoggerProvider(String),

    /// The YAML document could not be parsed.
    #[error("failed to parse router configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration file could not be read.
    #[error("failed to read router configuration: {0}")]
    Io(#[from] std::io::Error),
}
