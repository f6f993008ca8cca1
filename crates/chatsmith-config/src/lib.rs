#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Field-registry driven configuration engine for LibreChat deployments.
//!
//! This crate reconciles three representations of one deployment
//! configuration: the internal value tree, the flat `.env` file, and the
//! nested `librechat.yaml` document. It preserves round-trip fidelity,
//! per-field explicit-vs-vendor-default provenance, and the security
//! placement rule that secrets only ever land in the flat file.
//!
//! # Usage
//!
//! ```rust
//! use chatsmith_config::ConfigContext;
//!
//! let mut ctx = ConfigContext::with_default_catalog().unwrap();
//! let config = ctx.new_configuration("staging");
//!
//! // Validate, then import.
//! let report = ctx.validate_env("APP_TITLE=\"Demo\"\n").unwrap();
//! assert!(report.valid());
//! let (config, changes) = ctx.import_env_text(&config, "APP_TITLE=\"Demo\"\n").unwrap();
//! assert_eq!(changes.len(), 1);
//!
//! // Export both artifacts.
//! let env_text = ctx.export_env(&config);
//! assert!(env_text.contains("APP_TITLE=\"Demo\""));
//! let yaml_text = ctx.export_yaml(&config).unwrap();
//! assert!(yaml_text.starts_with('#'));
//! ```
//!
//! # Design
//!
//! Everything is single-threaded and synchronous: each mapping, validation,
//! and diff call is a pure function over an immutable snapshot. The only
//! mutable state is the per-configuration-name generated-secret cache held
//! by [`ConfigContext`], which exists so repeated exports of an unmodified
//! configuration stay byte-identical. The context is an explicit object —
//! tests construct an isolated instance per case; there are no process
//! globals.

/// The shipped LibreChat field catalog.
pub mod catalog;
/// Per-type flat-text conversion.
pub mod coerce;
/// Configuration snapshots.
pub mod config;
/// Recursive change analysis.
pub mod diff;
/// Flat-file mapping.
pub mod env;
/// Error types.
pub mod error;
/// Override tracking.
pub mod overrides;
/// Nested-path access primitives.
pub mod path;
/// Field descriptors and the lookup registry.
pub mod registry;
/// Canonical artifact output.
pub mod serialize;
/// Pre-import validation.
pub mod validate;
/// Nested-document mapping.
pub mod yaml;

use std::collections::BTreeMap;

pub use config::Configuration;
pub use diff::{ChangeEntry, ChangeReport, ChangeStatus};
pub use error::{ConfigError, ConfigResult};
pub use registry::{Category, FieldDescriptor, FieldKind, FieldRegistry, Placement};
pub use serialize::SecretCache;
pub use validate::{EnvValidation, YamlValidation};

/// Imported text larger than this is rejected before parsing (1 MiB).
pub const MAX_IMPORT_SIZE: usize = 1_048_576;

/// Engine context: the field registry plus the generated-secret cache.
///
/// Constructed once per session and passed wherever the engine is needed;
/// every operation that does not touch the secret cache takes `&self`.
#[derive(Debug)]
pub struct ConfigContext {
    registry: FieldRegistry,
    secrets: SecretCache,
}

impl ConfigContext {
    /// Build a context around an existing registry.
    #[must_use]
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            secrets: SecretCache::new(),
        }
    }

    /// Build a context with the shipped LibreChat catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the catalog fails registry construction.
    pub fn with_default_catalog() -> ConfigResult<Self> {
        Ok(Self::new(FieldRegistry::new(catalog::default_fields())?))
    }

    /// The field registry.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// A fresh configuration built from catalog defaults.
    #[must_use]
    pub fn new_configuration(&self, name: impl Into<String>) -> Configuration {
        Configuration::from_defaults(&self.registry, name)
    }

    /// Parse flat text and classify every key.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the input exceeds the size cap.
    pub fn validate_env(&self, text: &str) -> ConfigResult<EnvValidation> {
        check_size(text)?;
        let flat = env::parse_env(text);
        Ok(validate::validate_env(&self.registry, &flat))
    }

    /// Parse a nested document and collect unmapped leaf paths.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the input exceeds the size cap or the
    /// document is malformed (fatal, whole-input).
    pub fn validate_yaml(&self, text: &str) -> ConfigResult<YamlValidation> {
        check_size(text)?;
        let doc = yaml::parse_yaml(text)?;
        Ok(validate::validate_yaml(&self.registry, &doc))
    }

    /// Import a flat key/value map — typically the validated subset chosen
    /// by the caller after [`validate_env`](Self::validate_env).
    ///
    /// Returns the new snapshot and a report of exactly what the import
    /// touched.
    #[must_use]
    pub fn import_env(
        &self,
        config: &Configuration,
        flat: &BTreeMap<String, String>,
    ) -> (Configuration, ChangeReport) {
        let updates = env::to_updates(&self.registry, flat);
        let report = diff::diff(config.values(), &updates);
        (config.with_updates(&self.registry, &updates), report)
    }

    /// Parse and import flat text wholesale.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the input exceeds the size cap.
    pub fn import_env_text(
        &self,
        config: &Configuration,
        text: &str,
    ) -> ConfigResult<(Configuration, ChangeReport)> {
        check_size(text)?;
        let flat = env::parse_env(text);
        Ok(self.import_env(config, &flat))
    }

    /// Parse and import a nested document.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the input exceeds the size cap or the
    /// document is malformed (fatal, whole-input).
    pub fn import_yaml(
        &self,
        config: &Configuration,
        text: &str,
    ) -> ConfigResult<(Configuration, ChangeReport)> {
        check_size(text)?;
        let doc = yaml::parse_yaml(text)?;
        let updates = yaml::to_updates(&self.registry, &doc);
        let report = diff::diff(config.values(), &updates);
        Ok((config.with_updates(&self.registry, &updates), report))
    }

    /// Render the flat-file artifact.
    #[must_use]
    pub fn export_env(&mut self, config: &Configuration) -> String {
        serialize::render_env(&self.registry, config, &mut self.secrets)
    }

    /// Render the nested-document artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a value cannot be represented in the
    /// document format.
    pub fn export_yaml(&self, config: &Configuration) -> ConfigResult<String> {
        serialize::render_yaml(&self.registry, config)
    }
}

fn check_size(text: &str) -> ConfigResult<()> {
    if text.len() > MAX_IMPORT_SIZE {
        return Err(ConfigError::OversizedInput {
            actual: text.len(),
            limit: MAX_IMPORT_SIZE,
        });
    }
    Ok(())
}
