//! Schema Module - declarative binding manifests
//!
//! Every bound type describes itself once with a [`SchemaBuilder`]:
//! container metadata (section, required-all, all-fields) and an ordered
//! list of field bindings. The binder never inspects a type any other way.
//!
//! ```
//! use std::sync::Arc;
//! use yamlbind::{Bound, Schema, Tag};
//!
//! #[derive(Default)]
//! struct Database {
//!     host: Option<String>,
//!     port: i32,
//! }
//!
//! impl Bound for Database {
//!     fn schema(&self) -> Arc<Schema> {
//!         Schema::cached::<Self>(|| {
//!             Schema::builder::<Self>()
//!                 .section("database")
//!                 .field("host", |d| &mut d.host, Tag::new().required())
//!                 .field("port", |d| &mut d.port, Tag::new().required())
//!                 .build()
//!         })
//!     }
//! }
//! ```

mod access;
mod builder;

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

pub(crate) use access::{Access, Construct, WrappedAccess};
pub use builder::SchemaBuilder;

/// Process-wide schema cache, one entry per bound type
static REGISTRY: Lazy<DashMap<TypeId, Arc<Schema>>> = Lazy::new(DashMap::new);

/// How a field is filled from the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// String, integer, float or boolean
    Scalar,
    /// List of scalars
    List,
    /// Raw document section
    Section,
    /// Key → raw value projection of a section
    Map,
    /// Another bound object, filled in a later pass of the queue
    Nested,
    /// Built from one scalar or section argument
    Wrapped,
}

/// Upcast helper so a `&mut dyn Bound` can reach its concrete type
pub trait AsAny: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// An object whose fields are injected from a document
pub trait Bound: AsAny + Send {
    /// The binding manifest for this object
    fn schema(&self) -> Arc<Schema>;

    /// Completion hook, run once the whole queue has drained without errors
    fn on_inject(&mut self) {}
}

/// Class-level metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    /// Section all fields are read under (empty means the root)
    pub section: String,
    /// Section must exist and hold values; every field becomes required
    pub required_all: bool,
    /// Bind untagged fields too, using their names as paths
    pub all_fields: bool,
}

/// Per-field path metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    tagged: bool,
    path: Option<String>,
    required: bool,
}

impl Tag {
    /// No metadata: the field only binds when the container binds all fields
    pub fn none() -> Self {
        Self::default()
    }

    /// Tagged, path defaults to the field name
    pub fn new() -> Self {
        Self {
            tagged: true,
            ..Self::default()
        }
    }

    /// Tagged with an explicit dotted path fragment
    pub fn at(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            tagged: true,
            path: (!path.is_empty()).then_some(path),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.tagged = true;
        self.required = true;
        self
    }
}

/// One field of a bound type
pub struct FieldBinding {
    name: String,
    tag: Tag,
    kind: FieldKind,
    access: Access,
}

impl FieldBinding {
    pub(crate) fn new(name: String, tag: Tag, kind: FieldKind, access: Access) -> Self {
        Self {
            name,
            tag,
            kind,
            access,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_tagged(&self) -> bool {
        self.tag.tagged
    }

    pub fn is_required(&self) -> bool {
        self.tag.required
    }

    /// Path fragment: the explicit tag path, else the field name
    pub fn fragment(&self) -> &str {
        self.tag.path.as_deref().unwrap_or(&self.name)
    }

    pub(crate) fn access(&self) -> &Access {
        &self.access
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Binding manifest of one type, immutable once built
#[derive(Debug)]
pub struct Schema {
    type_name: &'static str,
    container: Option<Container>,
    fields: Vec<FieldBinding>,
}

impl Schema {
    pub fn builder<T: Bound>() -> SchemaBuilder<T> {
        SchemaBuilder::new()
    }

    /// Schema of `T`, built on first use and shared afterwards
    pub fn cached<T: Bound>(build: impl FnOnce() -> Schema) -> Arc<Schema> {
        let id = TypeId::of::<T>();
        if let Some(schema) = REGISTRY.get(&id) {
            return Arc::clone(schema.value());
        }
        // Built outside the map lock: a builder may look up other schemas
        let schema = Arc::new(build());
        Arc::clone(REGISTRY.entry(id).or_insert(schema).value())
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Non-empty container section name
    pub fn section(&self) -> Option<&str> {
        self.container
            .as_ref()
            .map(|c| c.section.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn required_all(&self) -> bool {
        self.container.as_ref().is_some_and(|c| c.required_all)
    }

    /// All declared fields in declaration order
    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldBinding> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that take part in binding: everything under `all_fields`,
    /// otherwise only tagged fields
    pub fn active_fields(&self) -> impl Iterator<Item = &FieldBinding> {
        let all = self.container.as_ref().is_some_and(|c| c.all_fields);
        self.fields.iter().filter(move |f| all || f.is_tagged())
    }
}
