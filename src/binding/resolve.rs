//! Path resolution: inherited prefix + field fragment
//!
//! Prefixes always end with `.` (or are empty), so composing is plain
//! concatenation:
//! ```text
//! root Server (section "server")       prefix "server."
//!   field tls -> Tls (section "tls")   path   "server.tls"
//!                                      child  "server.tls.tls."
//!     field cert                       path   "server.tls.tls.cert"
//! ```

use crate::schema::{FieldBinding, Schema};

/// Full route of `binding` under `prefix`
pub fn field_path(prefix: &str, binding: &FieldBinding) -> String {
    let fragment = binding.fragment();
    let mut path = String::with_capacity(prefix.len() + fragment.len());
    path.push_str(prefix);
    path.push_str(fragment);
    path
}

/// Prefix of an object that was not reached through a parent field
pub fn container_prefix(schema: &Schema) -> String {
    schema
        .section()
        .map(|section| format!("{section}."))
        .unwrap_or_default()
}

/// Prefix handed to a nested object found at `field_path`
pub fn child_prefix(field_path: &str, child: &Schema) -> String {
    match child.section() {
        Some(section) => format!("{field_path}.{section}."),
        None => format!("{field_path}."),
    }
}
