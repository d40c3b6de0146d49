use crate::level::Level;
use opentelemetry::logs::AnyValue;
use std::borrow::Cow;
use std::fmt;
use std::time::SystemTime;

/// Value of a structured attribute attached to a [`LogRecord`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// A string value
    String(String),
    /// An integer value
    Int(i64),
    /// A double value
    Double(f64),
    /// A boolean value
    Bool(bool),
}

macro_rules! impl_trivial_from {
    ($t:ty, $variant:path) => {
        impl From<$t> for AttributeValue {
            fn from(val: $t) -> AttributeValue {
                $variant(val.into())
            }
        }
    };
}

impl_trivial_from!(i8, AttributeValue::Int);
impl_trivial_from!(i16, AttributeValue::Int);
impl_trivial_from!(i32, AttributeValue::Int);
impl_trivial_from!(i64, AttributeValue::Int);

impl_trivial_from!(u8, AttributeValue::Int);
impl_trivial_from!(u16, AttributeValue::Int);
impl_trivial_from!(u32, AttributeValue::Int);

impl_trivial_from!(f32, AttributeValue::Double);
impl_trivial_from!(f64, AttributeValue::Double);

impl_trivial_from!(String, AttributeValue::String);
impl_trivial_from!(&str, AttributeValue::String);

impl_trivial_from!(bool, AttributeValue::Bool);

impl From<Cow<'_, str>> for AttributeValue {
    fn from(val: Cow<'_, str>) -> AttributeValue {
        AttributeValue::String(val.into_owned())
    }
}

impl From<AttributeValue> for AnyValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::String(s) => AnyValue::from(s),
            AttributeValue::Int(i) => AnyValue::from(i),
            AttributeValue::Double(d) => AnyValue::from(d),
            AttributeValue::Bool(b) => AnyValue::from(b),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Int(i) => write!(f, "{i}"),
            AttributeValue::Double(d) => write!(f, "{d}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A single emitted log event.
///
/// Records are immutable once handed to the router. The builder-style
/// `with_*` methods consume the record and are meant to be used while it is
/// being assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: Level,
    message: String,
    namespace: String,
    timestamp: SystemTime,
    origin: Option<String>,
    attributes: Vec<(String, AttributeValue)>,
}

impl LogRecord {
    /// Creates a record stamped with the current time and no attributes.
    pub fn new(
        namespace: impl Into<String>,
        level: Level,
        message: impl Into<String>,
    ) -> Self {
        LogRecord {
            level,
            message: message.into(),
            namespace: namespace.into(),
            timestamp: SystemTime::now(),
            origin: None,
            attributes: Vec::new(),
        }
    }

    /// Overrides the record timestamp.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the code location that produced the record, e.g. a module path.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Adds an attribute. A key that is already present keeps its position
    /// and takes the new value.
    pub fn with_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
        self
    }

    /// Adds several attributes, in iteration order.
    pub fn with_attributes<I, K, V>(self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        attributes
            .into_iter()
            .fold(self, |record, (k, v)| record.with_attribute(k, v))
    }

    /// Severity of the record.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Formatted message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Dot-separated origin of the record. The root namespace is `""`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Code location that produced the record, if known.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Time the record was created.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Structured attributes in insertion order.
    pub fn attributes(&self) -> &[(String, AttributeValue)] {
        &self.attributes
    }

    /// Looks up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}
