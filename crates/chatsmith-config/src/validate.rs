//! Pre-import detection of unknown and misplaced fields.
//!
//! Findings are always returned as data, never as errors, so the caller can
//! block the import entirely or offer a partial import of exactly the
//! validated subset. Both flat-file checks run to completion; a single pass
//! yields the complete problem set.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::registry::FieldRegistry;

/// Result of validating a flat key/value map.
#[derive(Debug, Clone, Default)]
pub struct EnvValidation {
    /// Keys matching no descriptor's flat-file key.
    pub unmapped_keys: Vec<String>,
    /// Keys that name a field which must be supplied via the nested
    /// document, never the flat file. Reported separately from unknown keys
    /// so the caller can explain *why* (wrong file, not wrong name).
    pub yaml_only_violations: Vec<String>,
}

impl EnvValidation {
    /// True when the input contained no unknown or misplaced keys.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.unmapped_keys.is_empty() && self.yaml_only_violations.is_empty()
    }

    /// The subset of `flat` that passed validation, for a caller electing a
    /// partial import.
    #[must_use]
    pub fn validated_subset(
        &self,
        flat: &BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        flat.iter()
            .filter(|(key, _)| {
                !self.unmapped_keys.contains(key) && !self.yaml_only_violations.contains(key)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Classify every key of a flat map.
///
/// A key resolving through the env-key index is mapped; otherwise a match
/// in the precomputed flat-style index of YAML-only fields is a placement
/// violation, and anything else is unmapped.
#[must_use]
pub fn validate_env(registry: &FieldRegistry, flat: &BTreeMap<String, String>) -> EnvValidation {
    let mut result = EnvValidation::default();
    for key in flat.keys() {
        if registry.by_env_key(key).is_some() {
            continue;
        }
        if registry.yaml_only_by_flat_name(key).is_some() {
            result.yaml_only_violations.push(key.clone());
        } else {
            result.unmapped_keys.push(key.clone());
        }
    }
    result
}

/// Result of validating a nested document.
#[derive(Debug, Clone, Default)]
pub struct YamlValidation {
    /// Dot-paths of leaves matching no descriptor's document path.
    pub unmapped_paths: Vec<String>,
}

impl YamlValidation {
    /// True when every leaf of the document mapped to a descriptor.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.unmapped_paths.is_empty()
    }
}

/// Walk a parsed document and collect unmapped leaf paths.
///
/// A branch object is only reported once its own path fails to match and
/// recursion into it finds unmapped leaves; recursion always runs before
/// giving up on a branch.
#[must_use]
pub fn validate_yaml(registry: &FieldRegistry, doc: &Value) -> YamlValidation {
    let mut result = YamlValidation::default();
    if let Value::Object(map) = doc {
        for (key, child) in map {
            walk(registry, key.clone(), child, &mut result.unmapped_paths);
        }
    }
    result
}

fn walk(registry: &FieldRegistry, path: String, value: &Value, unmapped: &mut Vec<String>) {
    if registry.by_yaml_path(&path).is_some() {
        return;
    }

    if let Value::Object(map) = value {
        for (key, child) in map {
            walk(registry, format!("{path}.{key}"), child, unmapped);
        }
    } else {
        unmapped.push(path);
    }
}
