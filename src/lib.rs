//! yamlbind - bind dotted-path YAML documents to config structs

pub mod binding;
pub mod builder;
pub mod document;
pub mod error;
pub mod schema;
pub mod util;
pub mod value;
pub mod version;

use std::sync::Arc;

use parking_lot::Mutex;

pub use binding::{Binder, ErrorCollector, SharedBound};
pub use builder::{BinderBuilder, VERSION_ROUTE};
pub use document::{Document, Section, YamlDocument};
pub use error::{BindError, FixSuggestion};
pub use schema::{Bound, Container, FieldBinding, FieldKind, Schema, SchemaBuilder, Tag};
pub use value::{Argument, FieldValue, Scalar};
pub use version::{compare, VersionOrder};

/// Wrap a bound object so it can be registered and read back after binding
pub fn shared<T: Bound>(value: T) -> Arc<Mutex<T>> {
    Arc::new(Mutex::new(value))
}
