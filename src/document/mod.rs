//! Document Module - the key-value tree the binder reads and writes
//!
//! The binder only ever talks to a [`Document`]; it never parses text.
//! - `section`: owned sub-mapping snapshots with emptiness checks
//! - `yaml`: file-backed implementation on top of `serde_yaml`

mod section;
mod yaml;

use serde_yaml::Value;

use crate::error::BindError;

pub use section::Section;
pub use yaml::YamlDocument;

/// Hierarchical key-value store addressed by dotted routes
pub trait Document: Send {
    /// Raw value at `route`, `None` when absent
    fn get(&self, route: &str) -> Option<Value>;

    /// Mapping at `route`, `None` when absent or not a mapping
    fn section(&self, route: &str) -> Option<Section>;

    /// Write a value, creating intermediate sections as needed
    fn set(&mut self, route: &str, value: Value) -> Result<(), BindError>;

    /// Flush to the backing store
    fn save(&mut self) -> Result<(), BindError>;

    /// Refresh the in-memory tree from the backing store
    fn reload(&mut self) -> Result<(), BindError>;

    /// Human readable origin, used in logs
    fn name(&self) -> &str {
        "<memory>"
    }
}
