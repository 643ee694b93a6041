//! Chaining state: where each nested object reads its fields from
//!
//! Objects are addressed structurally instead of by identity: a root index
//! plus the field names walked from that root. The same key names the same
//! slot on every pass, so prefixes recorded once stay valid across reloads.

use std::collections::HashMap;
use std::fmt;

/// Structural address of a bound object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeKey {
    root: usize,
    route: Vec<String>,
}

impl NodeKey {
    pub fn root(index: usize) -> Self {
        Self {
            root: index,
            route: Vec::new(),
        }
    }

    /// Key of the object held by `field` of this one
    pub fn child(&self, field: &str) -> Self {
        let mut route = self.route.clone();
        route.push(field.to_string());
        Self {
            root: self.root,
            route,
        }
    }

    pub fn root_index(&self) -> usize {
        self.root
    }

    /// Field names from the root down to this object
    pub fn route(&self) -> &[String] {
        &self.route
    }

    pub fn is_root(&self) -> bool {
        self.route.is_empty()
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.root)?;
        for field in &self.route {
            write!(f, "/{field}")?;
        }
        Ok(())
    }
}

/// One queued object, consumed exactly once per drain
#[derive(Debug, Clone)]
pub struct PendingNode {
    pub key: NodeKey,
}

impl PendingNode {
    pub fn new(key: NodeKey) -> Self {
        Self { key }
    }
}

/// Inherited prefixes of chained objects
///
/// Entries are never evicted; the table lives as long as its binder.
#[derive(Debug, Default)]
pub struct ChainTable {
    prefixes: HashMap<NodeKey, String>,
}

impl ChainTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: NodeKey, prefix: String) {
        self.prefixes.insert(key, prefix);
    }

    pub fn prefix(&self, key: &NodeKey) -> Option<&str> {
        self.prefixes.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}
