//! Dot-separated namespace helpers.
//!
//! A namespace identifies the logical origin of a record, e.g.
//! `app.service.a`. The root namespace is the empty string and is an
//! ancestor of every other namespace.
use crate::error::{ConfigError, RouterResult};

/// The root namespace.
pub const ROOT: &str = "";

/// Separator between namespace segments.
pub const SEPARATOR: char = '.';

/// Checks that `namespace` is the root or a sequence of non-empty segments.
pub fn validate(namespace: &str) -> RouterResult<()> {
    if namespace == ROOT || namespace.split(SEPARATOR).all(|segment| !segment.is_empty()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidNamespace(namespace.to_string()))
    }
}

/// Returns the parent of `namespace`, or `None` for the root.
pub fn parent(namespace: &str) -> Option<&str> {
    if namespace == ROOT {
        return None;
    }
    match namespace.rfind(SEPARATOR) {
        Some(idx) => Some(&namespace[..idx]),
        None => Some(ROOT),
    }
}

/// Iterates `namespace` followed by each of its ancestors, ending with the root.
pub fn ancestors(namespace: &str) -> Ancestors<'_> {
    Ancestors {
        next: Some(namespace),
    }
}

/// Iterator returned by [`ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = parent(current);
        Some(current)
    }
}
