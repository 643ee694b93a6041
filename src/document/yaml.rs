//! YamlDocument - `serde_yaml` backed document with optional defaults
//!
//! A document may carry a default resource (the YAML shipped with the
//! application). [`YamlDocument::update`] copies every key the defaults
//! have and the document lacks, gated by an optional version route.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use super::{Document, Section};
use crate::error::BindError;
use crate::util::route;
use crate::version::{self, VersionOrder};

#[derive(Debug, Clone)]
pub struct YamlDocument {
    root: Value,
    /// Backing file, `None` for purely in-memory documents
    path: Option<PathBuf>,
    /// Parsed default resource
    defaults: Option<Value>,
    /// Route holding the document version (e.g. "version")
    version_route: Option<String>,
    name: String,
}

impl Default for YamlDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlDocument {
    /// Empty in-memory document
    pub fn new() -> Self {
        Self {
            root: Value::Mapping(Mapping::new()),
            path: None,
            defaults: None,
            version_route: None,
            name: "<memory>".into(),
        }
    }

    /// In-memory document parsed from YAML text
    pub fn parse(yaml: &str) -> Result<Self, BindError> {
        Ok(Self {
            root: parse_root(yaml, "<memory>")?,
            ..Self::new()
        })
    }

    /// Document backed by `path`; a missing file starts empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BindError> {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        let root = read_file(&path, &name)?;
        Ok(Self {
            root,
            path: Some(path),
            defaults: None,
            version_route: None,
            name,
        })
    }

    /// Attach the default resource used by [`YamlDocument::update`]
    pub fn with_defaults(mut self, yaml: &str) -> Result<Self, BindError> {
        self.defaults = Some(parse_root(yaml, "<defaults>")?);
        Ok(self)
    }

    /// Gate [`YamlDocument::update`] on the version stored at `route`
    pub fn with_versioning(mut self, route: impl Into<String>) -> Self {
        self.version_route = Some(route.into());
        self
    }

    pub fn has_defaults(&self) -> bool {
        self.defaults.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn to_yaml_string(&self) -> Result<String, BindError> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Copy keys missing from the document out of the defaults
    ///
    /// With versioning, a document newer than its defaults is left alone
    /// and a merged document takes the defaults' version. Returns whether
    /// anything changed.
    pub fn update(&mut self) -> Result<bool, BindError> {
        let Some(defaults) = &self.defaults else {
            return Ok(false);
        };

        let mut target_version = None;
        if let Some(version_route) = &self.version_route {
            let current = route::get(&self.root, version_route).and_then(version_text);
            let shipped = route::get(defaults, version_route).and_then(version_text);

            if let (Some(current), Some(shipped)) = (&current, &shipped) {
                match version::compare(current, shipped) {
                    Ok(VersionOrder::Greater) => {
                        debug!(document = %self.name, %current, %shipped, "Document newer than defaults, skipping update");
                        return Ok(false);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(document = %self.name, error = %e, "Unreadable document version, updating anyway");
                    }
                }
            }
            if shipped != current {
                target_version = shipped;
            }
        }

        let mut changed = merge_missing(&mut self.root, defaults);
        if let (Some(version_route), Some(shipped)) = (&self.version_route, target_version) {
            route::set(&mut self.root, version_route, Value::String(shipped))?;
            changed = true;
        }
        debug!(document = %self.name, changed, "Merged defaults");
        Ok(changed)
    }
}

impl Document for YamlDocument {
    fn get(&self, route: &str) -> Option<Value> {
        route::get(&self.root, route).cloned()
    }

    fn section(&self, route: &str) -> Option<Section> {
        match route::get(&self.root, route)? {
            Value::Mapping(map) => Some(Section::new(route, map.clone())),
            _ => None,
        }
    }

    fn set(&mut self, route: &str, value: Value) -> Result<(), BindError> {
        route::set(&mut self.root, route, value)
    }

    fn save(&mut self) -> Result<(), BindError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(&self.root)?)?;
        Ok(())
    }

    fn reload(&mut self) -> Result<(), BindError> {
        if let Some(path) = &self.path {
            self.root = read_file(path, &self.name)?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn read_file(path: &Path, name: &str) -> Result<Value, BindError> {
    if !path.exists() {
        return Ok(Value::Mapping(Mapping::new()));
    }
    parse_root(&fs::read_to_string(path)?, name)
}

/// Parse YAML text whose top level must be a mapping (empty text is allowed)
fn parse_root(yaml: &str, name: &str) -> Result<Value, BindError> {
    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        root @ Value::Mapping(_) => Ok(root),
        _ => Err(BindError::NotAMapping {
            source_name: name.to_string(),
        }),
    }
}

/// Version values should be quoted: an unquoted `1.10` parses as the float
/// `1.1`, so numbers are accepted with a warning.
fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            warn!(version = %n, "Unquoted version read as a number, quote it to keep every digit");
            Some(n.to_string())
        }
        _ => None,
    }
}

/// Insert every key of `defaults` missing from `target`, recursing into
/// mappings present on both sides
fn merge_missing(target: &mut Value, defaults: &Value) -> bool {
    let (Value::Mapping(target), Value::Mapping(defaults)) = (target, defaults) else {
        return false;
    };

    let mut changed = false;
    for (key, default) in defaults {
        let text = route::key_text(key);
        let existing = target
            .iter_mut()
            .find(|(k, _)| route::key_text(k) == text)
            .map(|(_, v)| v);
        match existing {
            Some(value) => changed |= merge_missing(value, default),
            None => {
                target.insert(key.clone(), default.clone());
                changed = true;
            }
        }
    }
    changed
}
