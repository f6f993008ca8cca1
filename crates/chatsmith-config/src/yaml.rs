//! Nested-document (YAML) mapping.
//!
//! The input side accepts any field that declares a document path. The
//! output side only ever writes fields that have *no* flat-file key, so
//! secrets and dual-placement values always end up only in the flat file.

use serde_json::Value;
use tracing::debug;

use crate::config::Configuration;
use crate::error::ConfigResult;
use crate::path::{get_nested, set_nested};
use crate::registry::FieldRegistry;

/// Parse nested-document text into a value tree.
///
/// # Errors
///
/// A malformed document is one fatal, whole-input error; there is no
/// partial-document recovery.
pub fn parse_yaml(text: &str) -> ConfigResult<Value> {
    let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
    Ok(serde_json::to_value(doc)?)
}

/// Map a parsed document to a partial update tree.
///
/// For every descriptor declaring a document path, the value at that path
/// is extracted. Missing values, explicit nulls, and unresolved placeholder
/// tokens are skipped; everything else goes through the descriptor's import
/// transform (or is taken raw) and lands at the field's internal path.
#[must_use]
pub fn to_updates(registry: &FieldRegistry, doc: &Value) -> Value {
    let mut updates = Value::Object(serde_json::Map::new());
    for desc in registry.fields() {
        let Some(path) = desc.yaml_path else {
            continue;
        };
        let Some(raw) = get_nested(doc, path) else {
            continue;
        };
        if raw.is_null() {
            // An explicit null is treated as absent, not as a clear.
            continue;
        }
        if raw.as_str().is_some_and(is_placeholder) {
            debug!(field = desc.id, path, "skipping unresolved placeholder");
            continue;
        }

        let value = desc.import.map_or_else(|| raw.clone(), |f| f(raw));
        set_nested(&mut updates, desc.target_path(), value);
    }
    updates
}

/// Build the exportable nested document for a configuration.
///
/// Restricted to descriptors with a document path and no flat-file key;
/// fields whose override flag requests the vendor default are omitted.
/// Key order follows registry declaration order.
///
/// # Errors
///
/// Returns a [`crate::ConfigError`] if a value cannot be represented in the
/// document format.
pub fn from_config(
    registry: &FieldRegistry,
    config: &Configuration,
) -> ConfigResult<serde_yaml::Value> {
    let mut root = serde_yaml::Mapping::new();
    for desc in registry.fields() {
        let Some(path) = desc.yaml_path else {
            continue;
        };
        if desc.env_key.is_some() {
            continue;
        }
        if config.overrides().get(desc.id).copied().unwrap_or(false) {
            continue;
        }

        let current = config
            .get(desc.target_path())
            .or_else(|| config.get(path));
        let Some(value) = current else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        insert_nested(&mut root, path, serde_yaml::to_value(value)?);
    }
    Ok(serde_yaml::Value::Mapping(root))
}

/// A string that is exactly one unresolved variable reference, e.g.
/// `${OPENAI_API_KEY}`. Never a literal.
#[must_use]
pub(crate) fn is_placeholder(s: &str) -> bool {
    let Some(inner) = s.strip_prefix("${").and_then(|t| t.strip_suffix('}')) else {
        return false;
    };
    !inner.is_empty() && !inner.contains("${") && !inner.contains('}')
}

/// Insert a value into a document mapping at a dotted path, creating
/// intermediate mappings as needed.
fn insert_nested(root: &mut serde_yaml::Mapping, path: &str, value: serde_yaml::Value) {
    let (parent_path, leaf) = match path.rsplit_once('.') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, path),
    };

    let mut current = root;
    if let Some(parents) = parent_path {
        for segment in parents.split('.') {
            let key = serde_yaml::Value::String(segment.to_owned());
            let slot = current
                .entry(key)
                .or_insert_with(|| serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
            if !slot.is_mapping() {
                *slot = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
            }
            let Some(next) = slot.as_mapping_mut() else {
                return;
            };
            current = next;
        }
    }

    current.insert(serde_yaml::Value::String(leaf.to_owned()), value);
}
