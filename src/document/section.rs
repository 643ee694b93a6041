//! Section - owned snapshot of a sub-mapping of a document

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

use crate::util::route;

/// A hierarchical sub-node of a document, addressed by its route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    route: String,
    entries: Mapping,
}

impl Section {
    pub fn new(route: impl Into<String>, entries: Mapping) -> Self {
        Self {
            route: route.into(),
            entries,
        }
    }

    /// Route this section was read from ("" for the root)
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Direct child keys in document order
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().filter_map(route::key_text).collect()
    }

    /// Value at a route relative to this section
    pub fn get(&self, relative: &str) -> Option<&Value> {
        let (head, rest) = match relative.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (relative, None),
        };
        let child = self
            .entries
            .iter()
            .find(|(k, _)| route::key_text(k).as_deref() == Some(head))
            .map(|(_, v)| v)?;
        match rest {
            Some(rest) => route::get(child, rest),
            None => Some(child),
        }
    }

    /// Whether the section holds nothing
    ///
    /// Non-recursive: no direct entries at all.
    /// Recursive: no leaf value anywhere below; nested mappings that are
    /// themselves empty do not count.
    pub fn is_empty(&self, recursive: bool) -> bool {
        if !recursive {
            return self.entries.is_empty();
        }
        self.entries.values().all(is_empty_branch)
    }

    /// Direct entries as key → raw value
    pub fn to_map(&self) -> HashMap<String, Value> {
        self.entries
            .iter()
            .filter_map(|(k, v)| route::key_text(k).map(|key| (key, v.clone())))
            .collect()
    }

    pub fn mapping(&self) -> &Mapping {
        &self.entries
    }

    pub fn into_mapping(self) -> Mapping {
        self.entries
    }
}

fn is_empty_branch(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => map.values().all(is_empty_branch),
        _ => false,
    }
}
