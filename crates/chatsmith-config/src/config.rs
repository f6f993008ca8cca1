//! Configuration snapshots.
//!
//! A [`Configuration`] is the single in-memory tree of current values plus
//! the sparse per-field override map. It is created at session start from
//! registry defaults and every transformation takes a snapshot and returns
//! a new one; callers serialize commits of the returned snapshot.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::path::{get_nested, set_nested};
use crate::registry::FieldRegistry;

/// Named configuration snapshot: value tree plus override map.
///
/// The override map is sparse; an absent entry means "explicit value",
/// keeping snapshots created before override tracking existed readable.
#[derive(Clone, Serialize, Deserialize)]
pub struct Configuration {
    name: String,
    values: Value,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    overrides: BTreeMap<String, bool>,
}

impl Configuration {
    /// Create a configuration from registry defaults.
    ///
    /// Only fields with a concrete (non-null) documented default are
    /// materialized; the rest stay absent and export as commented lines.
    #[must_use]
    pub fn from_defaults(registry: &FieldRegistry, name: impl Into<String>) -> Self {
        let mut values = Value::Object(serde_json::Map::new());
        for desc in registry.fields() {
            if !desc.default.is_null() {
                set_nested(&mut values, desc.target_path(), desc.default.clone());
            }
        }
        Self {
            name: name.into(),
            values,
            overrides: BTreeMap::new(),
        }
    }

    /// Configuration name; also the key of the generated-secret cache.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current value tree.
    #[must_use]
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Read a value by internal dot-path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_nested(&self.values, path)
    }

    /// Return a new snapshot with a single field set to `value`.
    ///
    /// The field's override entry is cleared: an explicit edit always means
    /// "stop tracking the vendor default".
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownField`] when `field_id` is not in the
    /// registry.
    pub fn with_field(
        &self,
        registry: &FieldRegistry,
        field_id: &str,
        value: Value,
    ) -> ConfigResult<Self> {
        let desc = registry
            .by_id(field_id)
            .ok_or_else(|| ConfigError::UnknownField(field_id.to_owned()))?;

        let mut next = self.clone();
        set_nested(&mut next.values, desc.target_path(), value);
        next.overrides.remove(desc.id);
        Ok(next)
    }

    /// Return a new snapshot with a partial update tree merged in.
    ///
    /// Every leaf of `updates` is written through the same path-set
    /// primitive the mappers use. Override entries of touched fields are
    /// cleared.
    #[must_use]
    pub fn with_updates(&self, registry: &FieldRegistry, updates: &Value) -> Self {
        let mut next = self.clone();
        apply_leaves(&mut next.values, "", updates);

        for desc in registry.fields() {
            if get_nested(updates, desc.target_path()).is_some() {
                next.overrides.remove(desc.id);
            }
        }
        next
    }

    /// Serialize the whole configuration for the persistence collaborator.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the tree cannot be serialized.
    pub fn to_snapshot(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restore a configuration from a serialized snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the snapshot is malformed.
    pub fn from_snapshot(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Copy of the value tree with sensitive field values masked, for
    /// display layers.
    #[must_use]
    pub fn redacted(&self, registry: &FieldRegistry) -> Value {
        let mut masked = self.values.clone();
        for desc in registry.fields() {
            if desc.sensitive && get_nested(&masked, desc.target_path()).is_some() {
                set_nested(&mut masked, desc.target_path(), Value::String("***".to_owned()));
            }
        }
        masked
    }

    pub(crate) fn overrides(&self) -> &BTreeMap<String, bool> {
        &self.overrides
    }

    pub(crate) fn overrides_mut(&mut self) -> &mut BTreeMap<String, bool> {
        &mut self.overrides
    }

    pub(crate) fn values_mut(&mut self) -> &mut Value {
        &mut self.values
    }
}

impl fmt::Debug for Configuration {
    /// Values are never printed; a snapshot may hold credentials.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("name", &self.name)
            .field(
                "fields",
                &self.values.as_object().map_or(0, serde_json::Map::len),
            )
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

/// Walk the update tree and write each leaf at its dotted path. Arrays and
/// scalars are leaves; objects recurse.
fn apply_leaves(target: &mut Value, prefix: &str, updates: &Value) {
    if let Value::Object(map) = updates {
        for (key, child) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            apply_leaves(target, &path, child);
        }
    } else if !prefix.is_empty() {
        set_nested(target, prefix, updates.clone());
    }
}
