//! BinderBuilder - wires a document, its defaults and the bound roots
//!
//! ```no_run
//! use yamlbind::{shared, BinderBuilder};
//! # use std::sync::Arc;
//! # use yamlbind::{Bound, Schema, Tag};
//! # #[derive(Default)]
//! # struct Settings { name: String }
//! # impl Bound for Settings {
//! #     fn schema(&self) -> Arc<Schema> {
//! #         Schema::cached::<Self>(|| {
//! #             Schema::builder::<Self>().field("name", |s| &mut s.name, Tag::new()).build()
//! #         })
//! #     }
//! # }
//!
//! let settings = shared(Settings::default());
//! let binder = BinderBuilder::file("config.yml")?
//!     .defaults("name: demo\nversion: \"1.0\"\n")
//!     .version("1.0")
//!     .register(settings.clone())
//!     .build(|_| println!("loaded"), |errors| eprintln!("invalid: {errors:?}"))?;
//! binder.reload();
//! # Ok::<(), yamlbind::BindError>(())
//! ```

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::binding::{Binder, SharedBound};
use crate::document::{Document, YamlDocument};
use crate::error::BindError;
use crate::schema::Bound;
use crate::version;

/// Route the document version is stored at
pub const VERSION_ROUTE: &str = "version";

// ============================================================================
// DOCUMENT SOURCE
// ============================================================================

enum Source {
    /// Supports a default resource and versioned updates
    Yaml(YamlDocument),
    /// Any other adapter, used as is
    Custom(Box<dyn Document>),
}

// ============================================================================
// BINDER BUILDER
// ============================================================================

/// Fluent setup of a [`Binder`]; `build` runs the first drain
pub struct BinderBuilder {
    source: Source,
    defaults: Option<String>,
    version: Option<String>,
    roots: Vec<SharedBound>,
}

impl BinderBuilder {
    /// Bind against any document adapter
    pub fn new(document: impl Document + 'static) -> Self {
        Self::from_source(Source::Custom(Box::new(document)))
    }

    /// Bind against a YAML document
    pub fn yaml(document: YamlDocument) -> Self {
        Self::from_source(Source::Yaml(document))
    }

    /// Bind against the YAML file at `path` (created on first save)
    pub fn file(path: impl AsRef<Path>) -> Result<Self, BindError> {
        Ok(Self::yaml(YamlDocument::open(path)?))
    }

    fn from_source(source: Source) -> Self {
        Self {
            source,
            defaults: None,
            version: None,
            roots: Vec::new(),
        }
    }

    /// Default resource merged into the document before the first drain
    pub fn defaults(mut self, yaml: impl Into<String>) -> Self {
        self.defaults = Some(yaml.into());
        self
    }

    /// Version of the shipped configuration
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a root object; roots are drained in registration order
    pub fn register<T: Bound>(mut self, root: Arc<Mutex<T>>) -> Self {
        self.roots.push(root);
        self
    }

    /// Add an already type-erased root
    pub fn register_shared(mut self, root: SharedBound) -> Self {
        self.roots.push(root);
        self
    }

    /// Prepare the document, run the initial drain and return the binder
    ///
    /// Fails only on setup problems (bad version string, unparsable
    /// defaults); binding problems go to `on_failure`.
    pub fn build<S, F>(self, on_success: S, on_failure: F) -> Result<Binder, BindError>
    where
        S: Fn(&Binder) + Send + Sync + 'static,
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        if let Some(version) = &self.version {
            if !version::is_valid(version) {
                return Err(BindError::InvalidVersion {
                    version: version.clone(),
                });
            }
        }

        let (document, from_resources) = prepare(self.source, self.defaults, self.version)?;
        debug!(
            document = %document.name(),
            roots = self.roots.len(),
            from_resources,
            "Building binder"
        );

        let binder = Binder::new(
            document,
            self.roots,
            Box::new(on_success),
            Box::new(on_failure),
        );
        binder.run(from_resources);
        Ok(binder)
    }
}

/// Merge defaults and stamp the version; returns whether defaults were applied
fn prepare(
    source: Source,
    defaults: Option<String>,
    version: Option<String>,
) -> Result<(Box<dyn Document>, bool), BindError> {
    match (source, defaults) {
        (Source::Yaml(document), Some(defaults)) => {
            let mut document = document.with_defaults(&defaults)?;
            if version.is_some() {
                document = document.with_versioning(VERSION_ROUTE);
            }
            document.update()?;
            if let Err(e) = document.save() {
                warn!(document = %document.name(), error = %e, "Saving merged defaults failed");
            }
            Ok((Box::new(document), true))
        }
        (Source::Yaml(document), None) => Ok((stamp(Box::new(document), version)?, false)),
        (Source::Custom(document), defaults) => {
            if defaults.is_some() {
                warn!(document = %document.name(), "Defaults only apply to YAML documents, ignoring");
            }
            Ok((stamp(document, version)?, false))
        }
    }
}

fn stamp(
    mut document: Box<dyn Document>,
    version: Option<String>,
) -> Result<Box<dyn Document>, BindError> {
    if let Some(version) = version {
        document.set(VERSION_ROUTE, Value::String(version))?;
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::schema::{Schema, Tag};

    #[derive(Default)]
    struct Named {
        name: Option<String>,
    }

    impl Bound for Named {
        fn schema(&self) -> Arc<Schema> {
            Schema::cached::<Self>(|| {
                Schema::builder::<Self>()
                    .field("name", |n| &mut n.name, Tag::new().required())
                    .build()
            })
        }
    }

    #[test]
    fn invalid_version_is_rejected_before_binding() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (a, b) = (calls.clone(), calls.clone());
        let result = BinderBuilder::yaml(YamlDocument::new())
            .version("1.x")
            .build(
                move |_| {
                    a.fetch_add(1, Ordering::SeqCst);
                },
                move |_| {
                    b.fetch_add(1, Ordering::SeqCst);
                },
            );
        assert!(matches!(result, Err(BindError::InvalidVersion { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn defaults_fill_the_document_before_binding() {
        let named = Arc::new(Mutex::new(Named::default()));
        let binder = BinderBuilder::yaml(YamlDocument::new())
            .defaults("name: shipped\nversion: \"2\"\n")
            .version("2")
            .register(named.clone())
            .build(|_| {}, |errors| panic!("unexpected errors {errors:?}"))
            .unwrap();
        assert_eq!(named.lock().name.as_deref(), Some("shipped"));
        assert_eq!(binder.value::<String>("version").as_deref(), Some("2"));
    }

    #[test]
    fn version_without_defaults_is_stamped() {
        let binder = BinderBuilder::yaml(YamlDocument::parse("name: x").unwrap())
            .version("1.4")
            .build(|_| {}, |_| {})
            .unwrap();
        assert_eq!(binder.value::<String>(VERSION_ROUTE).as_deref(), Some("1.4"));
    }

    #[test]
    fn custom_documents_ignore_defaults() {
        let named = Arc::new(Mutex::new(Named::default()));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = failures.clone();
        BinderBuilder::new(YamlDocument::new())
            .defaults("name: shipped")
            .register(named.clone())
            .build(|_| {}, move |errors| sink.lock().extend(errors))
            .unwrap();
        assert_eq!(*failures.lock(), vec!["name".to_string()]);
        assert_eq!(named.lock().name, None);
    }
}
