//! Per-field vendor-default override tracking.
//!
//! The override map distinguishes "track the vendor's default forever" from
//! "freeze this value, which happens to equal today's default". Every
//! transform here is pure: it takes a snapshot and returns a new one.

use crate::config::Configuration;
use crate::error::{ConfigError, ConfigResult};
use crate::path::{remove_nested, set_nested};
use crate::registry::FieldRegistry;

/// Whether a field should track the vendor default. Absent entries mean
/// "explicit value".
#[must_use]
pub fn use_vendor_default(config: &Configuration, field_id: &str) -> bool {
    config.overrides().get(field_id).copied().unwrap_or(false)
}

/// Return a new snapshot with the field's override flag set.
#[must_use]
pub fn set_override(config: &Configuration, field_id: &str, use_default: bool) -> Configuration {
    let mut next = config.clone();
    next.overrides_mut().insert(field_id.to_owned(), use_default);
    next
}

/// Return a new snapshot with the field restored to its descriptor default
/// and its override entry cleared.
///
/// A null default removes the field from the tree entirely (there is no
/// concrete vendor value to restore).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownField`] when `field_id` is not in the
/// registry.
pub fn reset_field(
    registry: &FieldRegistry,
    config: &Configuration,
    field_id: &str,
) -> ConfigResult<Configuration> {
    let desc = registry
        .by_id(field_id)
        .ok_or_else(|| ConfigError::UnknownField(field_id.to_owned()))?;

    let mut next = config.clone();
    if desc.default.is_null() {
        remove_nested(next.values_mut(), desc.target_path());
    } else {
        set_nested(next.values_mut(), desc.target_path(), desc.default.clone());
    }
    next.overrides_mut().remove(desc.id);
    Ok(next)
}

/// Return a new snapshot with the whole override map emptied.
#[must_use]
pub fn clear_all(config: &Configuration) -> Configuration {
    let mut next = config.clone();
    next.overrides_mut().clear();
    next
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::registry::{Category, FieldDescriptor, FieldKind};

    fn registry() -> FieldRegistry {
        FieldRegistry::new(vec![
            FieldDescriptor::new("appTitle", FieldKind::String, Category::App, json!("LibreChat"))
                .env("APP_TITLE"),
            FieldDescriptor::new("mongoUri", FieldKind::String, Category::Server, Value::Null)
                .env("MONGO_URI"),
        ])
        .unwrap()
    }

    #[test]
    fn test_absent_entry_means_explicit() {
        let config = Configuration::from_defaults(&registry(), "demo");
        assert!(!use_vendor_default(&config, "appTitle"));
    }

    #[test]
    fn test_set_override_is_pure() {
        let config = Configuration::from_defaults(&registry(), "demo");
        let flagged = set_override(&config, "appTitle", true);
        assert!(use_vendor_default(&flagged, "appTitle"));
        assert!(!use_vendor_default(&config, "appTitle"));
    }

    #[test]
    fn test_reset_field_restores_default_and_clears_flag() {
        let registry = registry();
        let config = Configuration::from_defaults(&registry, "demo")
            .with_field(&registry, "appTitle", json!("Renamed"))
            .unwrap();
        let config = set_override(&config, "appTitle", true);

        let reset = reset_field(&registry, &config, "appTitle").unwrap();
        assert_eq!(reset.get("appTitle"), Some(&json!("LibreChat")));
        assert!(!use_vendor_default(&reset, "appTitle"));
        assert!(!reset.overrides().contains_key("appTitle"));
    }

    #[test]
    fn test_reset_field_with_null_default_removes_value() {
        let registry = registry();
        let config = Configuration::from_defaults(&registry, "demo")
            .with_field(&registry, "mongoUri", json!("mongodb://localhost/chat"))
            .unwrap();

        let reset = reset_field(&registry, &config, "mongoUri").unwrap();
        assert!(reset.get("mongoUri").is_none());
    }

    #[test]
    fn test_reset_unknown_field() {
        let registry = registry();
        let config = Configuration::from_defaults(&registry, "demo");
        assert!(matches!(
            reset_field(&registry, &config, "nope"),
            Err(ConfigError::UnknownField(_))
        ));
    }

    #[test]
    fn test_clear_all() {
        let config = Configuration::from_defaults(&registry(), "demo");
        let config = set_override(&config, "appTitle", true);
        let config = set_override(&config, "mongoUri", true);

        let cleared = clear_all(&config);
        assert!(cleared.overrides().is_empty());
    }
}
