//! Nested-path access over JSON value trees.
//!
//! Both mapping directions go through the same two primitives, so structural
//! placement stays symmetric: the path an importer writes is the path the
//! exporter reads back.

use serde_json::Value;

/// Navigate into a nested [`Value`] by dotted path.
///
/// Returns `None` if any segment is missing or a non-object value is hit
/// before the final segment. Never fails.
#[must_use]
pub fn get_nested<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Set a value at a nested path, creating intermediate objects as needed.
///
/// A non-object value encountered mid-path is replaced by an object so the
/// write always lands. An empty path is a no-op.
pub fn set_nested(root: &mut Value, path: &str, new_val: Value) {
    if path.is_empty() {
        return;
    }

    let (parent_path, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut current = root;
    if let Some(parents) = parent_path {
        for segment in parents.split('.') {
            if !current.is_object() {
                *current = Value::Object(serde_json::Map::new());
            }
            let Some(map) = current.as_object_mut() else {
                return;
            };
            current = map
                .entry(segment.to_owned())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
        }
    }

    if !current.is_object() {
        *current = Value::Object(serde_json::Map::new());
    }
    if let Some(map) = current.as_object_mut() {
        map.insert(leaf.to_owned(), new_val);
    }
}

/// Remove a value at a nested path. Missing intermediates are a no-op;
/// empty parent objects are left in place.
pub fn remove_nested(root: &mut Value, path: &str) {
    if path.is_empty() {
        return;
    }

    let (parent_path, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut current = root;
    if let Some(parents) = parent_path {
        for segment in parents.split('.') {
            let Some(next) = current.as_object_mut().and_then(|m| m.get_mut(segment)) else {
                return;
            };
            current = next;
        }
    }

    if let Some(map) = current.as_object_mut() {
        map.remove(leaf);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_get_nested_present() {
        let root = json!({"interface": {"privacyPolicy": {"externalUrl": "https://example.com"}}});
        let val = get_nested(&root, "interface.privacyPolicy.externalUrl").unwrap();
        assert_eq!(val, &json!("https://example.com"));
    }

    #[test]
    fn test_get_nested_missing_segment() {
        let root = json!({"interface": {}});
        assert!(get_nested(&root, "interface.privacyPolicy.externalUrl").is_none());
    }

    #[test]
    fn test_get_nested_through_scalar() {
        let root = json!({"interface": "oops"});
        assert!(get_nested(&root, "interface.privacyPolicy").is_none());
    }

    #[test]
    fn test_set_nested_creates_intermediates() {
        let mut root = json!({});
        set_nested(&mut root, "registration.socialLogins", json!(["github"]));
        assert_eq!(
            get_nested(&root, "registration.socialLogins").unwrap(),
            &json!(["github"])
        );
    }

    #[test]
    fn test_set_nested_replaces_scalar_intermediate() {
        let mut root = json!({"registration": 7});
        set_nested(&mut root, "registration.socialLogins", json!([]));
        assert!(root["registration"].is_object());
    }

    #[test]
    fn test_set_nested_top_level() {
        let mut root = json!({});
        set_nested(&mut root, "appTitle", json!("Demo"));
        assert_eq!(root["appTitle"], json!("Demo"));
    }

    #[test]
    fn test_remove_nested() {
        let mut root = json!({"a": {"b": {"c": 1, "d": 2}}});
        remove_nested(&mut root, "a.b.c");
        assert!(get_nested(&root, "a.b.c").is_none());
        assert_eq!(get_nested(&root, "a.b.d").unwrap(), &json!(2));
    }

    #[test]
    fn test_remove_nested_missing_is_noop() {
        let mut root = json!({"a": 1});
        remove_nested(&mut root, "b.c");
        assert_eq!(root, json!({"a": 1}));
    }
}
