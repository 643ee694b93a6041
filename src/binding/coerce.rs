//! Value coercion: fill one field from the document
//!
//! Every problem becomes a route in the [`ErrorCollector`]; nothing here
//! aborts the drain.

use std::any::Any;
use std::collections::HashMap;

use serde_yaml::Value;
use tracing::{debug, trace, warn};

use super::collector::ErrorCollector;
use crate::document::Document;
use crate::schema::{Construct, WrappedAccess};
use crate::value::Slot;

/// Fill a scalar, list, section or map field from `path`
///
/// `from_resources` is set only on the initial pass over a document that
/// was merged with its default resource.
pub fn configure(
    document: &mut dyn Document,
    errors: &mut ErrorCollector,
    path: &str,
    slot: Slot<'_>,
    required: bool,
    from_resources: bool,
) {
    match slot {
        Slot::Scalar(field) => {
            let value = document.get(path);
            if !field.assign(value.as_ref()) && required {
                debug!(path, "Required value missing or of the wrong type");
                errors.report(path);
            }
        }
        Slot::Section(field) => match document.section(path) {
            None => {
                debug!(path, "Section missing");
                errors.report(path);
            }
            Some(section) if required && section.is_empty(true) => {
                debug!(path, "Required section is empty");
                errors.report(path);
            }
            Some(section) => field.assign(section),
        },
        Slot::Map(map) if from_resources => match document.section(path) {
            None => {
                debug!(path, "Map section missing");
                errors.report(path);
            }
            Some(section) if required && section.is_empty(true) => {
                debug!(path, "Required map section is empty");
                errors.report(path);
            }
            Some(section) => *map = section.to_map(),
        },
        Slot::Map(map) => merge_map(document, errors, path, map, required),
    }
}

/// Live pass: the document wins when it has entries, otherwise a non-empty
/// in-memory map seeds the document
fn merge_map(
    document: &mut dyn Document,
    errors: &mut ErrorCollector,
    path: &str,
    map: &mut HashMap<String, Value>,
    required: bool,
) {
    if let Some(section) = document.section(path).filter(|s| !s.is_empty(false)) {
        trace!(path, keys = section.keys().len(), "Copying section into map");
        map.extend(section.to_map());
        return;
    }
    if map.is_empty() {
        if required {
            debug!(path, "Required map has no entries on either side");
            errors.report(path);
        }
        return;
    }
    trace!(path, keys = map.len(), "Seeding document from map defaults");
    for (key, value) in map.iter() {
        let route = format!("{path}.{key}");
        if let Err(e) = document.set(&route, value.clone()) {
            warn!(route = %route, error = %e, "Could not seed map entry");
        }
    }
}

/// Build a wrapped field from its single argument at `path`
pub(crate) fn construct(
    document: &dyn Document,
    errors: &mut ErrorCollector,
    path: &str,
    access: &dyn WrappedAccess,
    owner: &mut dyn Any,
) {
    match access.construct(owner, document, path) {
        Construct::Set => {}
        Construct::Missing | Construct::Rejected => errors.report(path),
        Construct::Unreachable => debug!(path, "Wrapped field owner has an unexpected type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::document::{Section, YamlDocument};
    use crate::value::{FieldValue, ScalarSlot};

    fn document(yaml: &str) -> YamlDocument {
        YamlDocument::parse(yaml).unwrap()
    }

    fn run<V: FieldValue>(
        doc: &mut YamlDocument,
        path: &str,
        field: &mut V,
        required: bool,
        from_resources: bool,
    ) -> Vec<String> {
        let mut errors = ErrorCollector::new();
        configure(doc, &mut errors, path, field.slot(), required, from_resources);
        errors.into_errors()
    }

    #[test]
    fn scalar_is_read_at_path() {
        let mut doc = document("db: {host: local, port: 5432}");
        let mut host: Option<String> = None;
        let mut port = 0i32;
        assert!(run(&mut doc, "db.host", &mut host, true, false).is_empty());
        assert!(run(&mut doc, "db.port", &mut port, true, false).is_empty());
        assert_eq!(host.as_deref(), Some("local"));
        assert_eq!(port, 5432);
    }

    #[test]
    fn missing_required_scalar_reports_and_falls_back() {
        let mut doc = document("db: {host: local}");
        let mut port = 8080i32;
        assert_eq!(run(&mut doc, "db.port", &mut port, true, true), vec!["db.port"]);
        assert_eq!(port, 0);
    }

    #[test]
    fn missing_optional_scalar_is_silent() {
        let mut doc = document("db: {}");
        let mut host = Some("old".to_string());
        assert!(run(&mut doc, "db.host", &mut host, false, true).is_empty());
        assert_eq!(host, None);
    }

    #[test]
    fn wrong_type_counts_as_missing() {
        let mut doc = document("db: {port: lots}");
        let mut port = 1i64;
        assert_eq!(run(&mut doc, "db.port", &mut port, true, false), vec!["db.port"]);
    }

    #[test]
    fn section_checks() {
        let mut doc = document("a: {b: {}}\nc: {d: 1}");
        let mut section: Option<Section> = None;
        assert_eq!(run(&mut doc, "missing", &mut section, false, true), vec!["missing"]);
        assert_eq!(run(&mut doc, "a", &mut section, true, true), vec!["a"]);
        assert!(run(&mut doc, "a", &mut section, false, true).is_empty());
        assert!(section.as_ref().unwrap().is_empty(true));
        assert!(run(&mut doc, "c", &mut section, true, true).is_empty());
        assert_eq!(section.unwrap().keys(), vec!["d"]);
    }

    #[test]
    fn map_from_resources_replaces_contents() {
        let mut doc = document("limits: {cpu: 2, mem: 4g}");
        let mut map = HashMap::from([("old".to_string(), Value::from(1))]);
        assert!(run(&mut doc, "limits", &mut map, false, true).is_empty());
        assert_eq!(map.len(), 2);
        assert_eq!(map["cpu"], Value::from(2));
        assert!(!map.contains_key("old"));
    }

    #[test]
    fn live_map_takes_document_entries() {
        let mut doc = document("limits: {cpu: 8}");
        let mut map = HashMap::from([
            ("cpu".to_string(), Value::from(1)),
            ("disk".to_string(), Value::from(10)),
        ]);
        assert!(run(&mut doc, "limits", &mut map, false, false).is_empty());
        assert_eq!(map["cpu"], Value::from(8));
        assert_eq!(map["disk"], Value::from(10));
    }

    #[test]
    fn live_map_seeds_empty_document() {
        let mut doc = document("{}");
        let mut map = HashMap::from([("cpu".to_string(), Value::from(2))]);
        assert!(run(&mut doc, "limits", &mut map, false, false).is_empty());
        assert_eq!(doc.get("limits.cpu"), Some(Value::from(2)));
    }

    #[test]
    fn live_map_required_with_nothing_reports() {
        let mut doc = document("{}");
        let mut map: HashMap<String, Value> = HashMap::new();
        assert_eq!(run(&mut doc, "limits", &mut map, true, false), vec!["limits"]);
        assert!(run(&mut doc, "limits", &mut map, false, false).is_empty());
    }

    #[test]
    fn plain_slot_via_trait_object() {
        let mut doc = document("n: 3");
        let mut n = 0i32;
        let mut errors = ErrorCollector::new();
        let slot = Slot::Scalar(&mut n as &mut dyn ScalarSlot);
        configure(&mut doc, &mut errors, "n", slot, true, false);
        assert_eq!(n, 3);
        assert!(!errors.has_errors());
    }
}
