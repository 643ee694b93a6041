//! Dotted routes over a YAML tree
//!
//! Supports:
//! - `a.b.c` (mapping traversal)
//! - `` (empty route addresses the root)
//!
//! Does NOT support:
//! - Sequence indexing: `items.0` is looked up as the key "0"
//! - Escaped dots inside keys

use serde_yaml::{Mapping, Value};

use crate::error::BindError;

/// Split a route into its segments
///
/// Examples:
/// - "database.host" → ["database", "host"]
/// - "" → []
pub fn parse(route: &str) -> Result<Vec<&str>, BindError> {
    if route.is_empty() {
        return Ok(vec![]);
    }

    let segments: Vec<&str> = route.split('.').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return Err(BindError::InvalidRoute {
            route: route.to_string(),
            reason: "empty segment".into(),
        });
    }
    Ok(segments)
}

/// Render a mapping key as route text
///
/// Keys written as plain numbers or booleans in YAML still address
/// as text, so `1: x` is reachable through the route "1".
pub fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn find_key<'a>(mapping: &'a Mapping, segment: &str) -> Option<&'a Value> {
    mapping
        .iter()
        .find(|(k, _)| key_text(k).as_deref() == Some(segment))
        .map(|(_, v)| v)
}

/// Look up the value at `route`
///
/// Malformed routes resolve to nothing, the same as a missing key.
pub fn get<'a>(root: &'a Value, route: &str) -> Option<&'a Value> {
    let segments = parse(route).ok()?;
    let mut current = root;

    for segment in segments {
        current = match current {
            Value::Mapping(map) => find_key(map, segment)?,
            Value::Tagged(tagged) => match &tagged.value {
                Value::Mapping(map) => find_key(map, segment)?,
                _ => return None,
            },
            _ => return None,
        };
    }

    Some(current)
}

/// Write `value` at `route`, creating intermediate mappings
///
/// A non-mapping value sitting on an intermediate segment is replaced.
pub fn set(root: &mut Value, route: &str, value: Value) -> Result<(), BindError> {
    let segments = parse(route)?;
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return Ok(());
    };

    let mut current = root;
    for segment in parents {
        let key = existing_key(ensure_mapping(current, route)?, segment);
        current = ensure_mapping(current, route)?
            .entry(key)
            .or_insert_with(|| Value::Mapping(Mapping::new()));
    }

    let map = ensure_mapping(current, route)?;
    let key = existing_key(map, last);
    map.insert(key, value);
    Ok(())
}

/// The stored key matching `segment`, or a fresh string key
fn existing_key(mapping: &Mapping, segment: &str) -> Value {
    mapping
        .keys()
        .find(|k| key_text(k).as_deref() == Some(segment))
        .cloned()
        .unwrap_or_else(|| Value::String(segment.to_string()))
}

/// Replace a non-mapping value with an empty mapping and borrow it
fn ensure_mapping<'a>(value: &'a mut Value, route: &str) -> Result<&'a mut Mapping, BindError> {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    value.as_mapping_mut().ok_or_else(|| BindError::InvalidRoute {
        route: route.to_string(),
        reason: "parent is not a mapping".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn parse_simple_route() {
        assert_eq!(parse("a.b.c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn parse_empty_is_root() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_empty_segment() {
        let err = parse("a..b").unwrap_err();
        assert!(err.to_string().contains("YB-011"));
        assert!(parse("a.").is_err());
        assert!(parse(".a").is_err());
    }

    #[test]
    fn get_nested_value() {
        let root = doc("database:\n  host: local\n  port: 5432\n");
        assert_eq!(get(&root, "database.host"), Some(&Value::from("local")));
        assert_eq!(get(&root, "database.port"), Some(&Value::from(5432)));
    }

    #[test]
    fn get_missing_or_through_scalar() {
        let root = doc("a:\n  b: 1\n");
        assert!(get(&root, "a.c").is_none());
        assert!(get(&root, "a.b.c").is_none());
        assert!(get(&root, "a..b").is_none());
    }

    #[test]
    fn get_numeric_key_as_text() {
        let root = doc("levels:\n  1: low\n  2: high\n");
        assert_eq!(get(&root, "levels.2"), Some(&Value::from("high")));
    }

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut root = Value::Mapping(Mapping::new());
        set(&mut root, "a.b.c", Value::from(true)).unwrap();
        assert_eq!(get(&root, "a.b.c"), Some(&Value::from(true)));
    }

    #[test]
    fn set_overwrites_existing_and_scalar_parents() {
        let mut root = doc("a: 1\nb:\n  c: old\n");
        set(&mut root, "b.c", Value::from("new")).unwrap();
        set(&mut root, "a.x", Value::from(2)).unwrap();
        assert_eq!(get(&root, "b.c"), Some(&Value::from("new")));
        assert_eq!(get(&root, "a.x"), Some(&Value::from(2)));
    }

    #[test]
    fn set_replaces_scalar_root_and_keeps_tagged_mappings() {
        let mut root = Value::from("plain");
        set(&mut root, "a.b", Value::from(1)).unwrap();
        assert_eq!(get(&root, "a.b"), Some(&Value::from(1)));

        let mut root = doc("a: !custom {b: 1}\n");
        set(&mut root, "a.c", Value::from(2)).unwrap();
        assert_eq!(get(&root, "a.b"), Some(&Value::from(1)));
        assert_eq!(get(&root, "a.c"), Some(&Value::from(2)));
    }

    #[test]
    fn set_empty_route_replaces_root() {
        let mut root = doc("a: 1\n");
        set(&mut root, "", doc("b: 2\n")).unwrap();
        assert!(get(&root, "a").is_none());
        assert_eq!(get(&root, "b"), Some(&Value::from(2)));
    }
}
