//! Field descriptors and the immutable lookup registry.
//!
//! The registry is built once from a descriptor list and is read-only
//! afterwards. Duplicate flat-file keys or document paths are construction
//! failures, never user-visible runtime errors.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

/// Semantic type of a configuration field.
///
/// Every place the engine branches on a field's type matches exhaustively on
/// this enum, so adding a kind is a compile-time obligation everywhere it
/// matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `true`/`false` toggle.
    Boolean,
    /// Integer-valued setting (ports, limits, durations in ms).
    Number,
    /// Free-form text.
    String,
    /// List of scalar values; comma-separated in the flat file.
    Array,
    /// Opaque nested object; only ever carried by the nested document.
    Object,
    /// String restricted to a closed set of allowed values.
    Enum,
}

/// Catalog category a field belongs to.
///
/// The export ordering over categories is owned by the serializer; the
/// category itself is just a grouping tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Branding and application identity.
    App,
    /// Host, port, database, and proxy settings.
    Server,
    /// Log verbosity and formatting.
    Logging,
    /// Encryption and token-signing material.
    Credentials,
    /// Login, registration, and session policy.
    Auth,
    /// Model provider API keys and model lists.
    Providers,
    /// Conversation search backend.
    Search,
    /// Outbound mail settings.
    Email,
    /// Abuse bans and concurrency limits.
    Moderation,
    /// Top-level nested-document settings.
    Core,
    /// UI panels and informational links.
    Interface,
    /// Registration providers and domain allow-list.
    Registration,
    /// Per-route rate limit windows.
    RateLimits,
    /// Upload size limits and per-endpoint file rules.
    Files,
    /// Per-endpoint behaviour tuning.
    Endpoints,
    /// Token credit accounting.
    Balance,
}

/// Which artifact(s) a field may be serialized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Flat file only.
    EnvOnly,
    /// Nested document only.
    YamlOnly,
    /// Declared in both; tolerated for upstream compatibility and always
    /// resolved in favour of the flat file on export.
    Dual,
}

/// Custom flat-text parser. Returning `None` signals an unparseable value;
/// the coercion layer then falls back to the descriptor default.
pub type ParseFn = fn(&str) -> Option<Value>;

/// Custom flat-text renderer. Returning `None` falls back to the generic
/// per-kind rendering rules.
pub type RenderFn = fn(&Value) -> Option<String>;

/// Custom nested-document import transform, applied to the raw extracted
/// value before it is written into the configuration tree.
pub type ImportFn = fn(&Value) -> Value;

/// Registry entry describing one field's identity, type, and placement.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Unique field id; also the default storage path in the internal tree.
    pub id: &'static str,
    /// Semantic type.
    pub kind: FieldKind,
    /// Grouping tag used by the export writers.
    pub category: Category,
    /// Documented vendor default. `Null` means the field has no concrete
    /// default and stays absent until explicitly set.
    pub default: Value,
    /// Flat-file variable name, when the field may live in the flat file.
    pub env_key: Option<&'static str>,
    /// Dot-path in the nested document, when the field may live there.
    pub yaml_path: Option<&'static str>,
    /// Internal storage dot-path, when the internal tree's shape differs
    /// from the nested document's shape. Defaults to `id`.
    pub config_path: Option<&'static str>,
    /// Closed value set for [`FieldKind::Enum`] fields; empty otherwise.
    pub allowed: &'static [&'static str],
    /// Inclusive lower bound for [`FieldKind::Number`] fields.
    pub min: Option<i64>,
    /// Inclusive upper bound for [`FieldKind::Number`] fields.
    pub max: Option<i64>,
    /// Custom flat-text parser, overriding the generic rules.
    pub parse: Option<ParseFn>,
    /// Custom flat-text renderer, overriding the generic rules.
    pub render: Option<RenderFn>,
    /// Custom nested-document import transform.
    pub import: Option<ImportFn>,
    /// Known-incompatibility annotation, surfaced as a comment in the flat
    /// export so operators see the caveat in the artifact itself.
    pub note: Option<&'static str>,
    /// For the generated-secret set: byte length of the random value the
    /// serializer caches and renders when the field is absent.
    pub secret_len: Option<usize>,
    /// Value must never appear in logs or debug output.
    pub sensitive: bool,
}

impl FieldDescriptor {
    /// Start a descriptor with the four required properties.
    #[must_use]
    pub fn new(id: &'static str, kind: FieldKind, category: Category, default: Value) -> Self {
        Self {
            id,
            kind,
            category,
            default,
            env_key: None,
            yaml_path: None,
            config_path: None,
            allowed: &[],
            min: None,
            max: None,
            parse: None,
            render: None,
            import: None,
            note: None,
            secret_len: None,
            sensitive: false,
        }
    }

    /// Declare the flat-file variable name.
    #[must_use]
    pub fn env(mut self, key: &'static str) -> Self {
        self.env_key = Some(key);
        self
    }

    /// Declare the nested-document dot-path.
    #[must_use]
    pub fn yaml(mut self, path: &'static str) -> Self {
        self.yaml_path = Some(path);
        self
    }

    /// Store the field at a different internal path than its document path.
    #[must_use]
    pub fn stored_at(mut self, path: &'static str) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Restrict an enum field to a closed value set.
    #[must_use]
    pub fn allowed(mut self, values: &'static [&'static str]) -> Self {
        self.allowed = values;
        self
    }

    /// Constrain a number field to an inclusive range.
    #[must_use]
    pub fn range(mut self, min: i64, max: i64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Install a custom flat-text parser.
    #[must_use]
    pub fn parse_with(mut self, f: ParseFn) -> Self {
        self.parse = Some(f);
        self
    }

    /// Install a custom flat-text renderer.
    #[must_use]
    pub fn render_with(mut self, f: RenderFn) -> Self {
        self.render = Some(f);
        self
    }

    /// Install a custom nested-document import transform.
    #[must_use]
    pub fn import_with(mut self, f: ImportFn) -> Self {
        self.import = Some(f);
        self
    }

    /// Attach a known-incompatibility annotation.
    #[must_use]
    pub fn note(mut self, text: &'static str) -> Self {
        self.note = Some(text);
        self
    }

    /// Mark the field as part of the generated-secret set: `bytes` random
    /// bytes, hex-encoded, rendered in place of the documented default when
    /// the field is absent. Implies [`sensitive`](Self::sensitive).
    #[must_use]
    pub fn generated_secret(mut self, bytes: usize) -> Self {
        self.secret_len = Some(bytes);
        self.sensitive = true;
        self
    }

    /// Mark the field's value as never-log, never-debug-print.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Placement policy derived from the declared keys. `None` when the
    /// descriptor declares neither key, which the registry rejects at
    /// construction.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        match (self.env_key, self.yaml_path) {
            (Some(_), Some(_)) => Some(Placement::Dual),
            (Some(_), None) => Some(Placement::EnvOnly),
            (None, Some(_)) => Some(Placement::YamlOnly),
            (None, None) => None,
        }
    }

    /// Dot-path where this field lives in the internal tree.
    #[must_use]
    pub fn target_path(&self) -> &'static str {
        self.config_path.unwrap_or(self.id)
    }
}

/// Immutable catalog of field descriptors with O(1) lookup indexes.
#[derive(Debug)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    by_id: HashMap<&'static str, usize>,
    by_env_key: HashMap<&'static str, usize>,
    by_yaml_path: HashMap<&'static str, usize>,
    /// Expected flat-style spellings of YAML-only fields, precomputed at
    /// construction so misplacement detection needs no runtime heuristic.
    yaml_only_flat_names: HashMap<String, usize>,
}

impl FieldRegistry {
    /// Build a registry from a descriptor list.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when two descriptors share an id, env key,
    /// or yaml path, or when a descriptor declares no placement at all.
    pub fn new(fields: Vec<FieldDescriptor>) -> ConfigResult<Self> {
        let mut by_id = HashMap::new();
        let mut by_env_key = HashMap::new();
        let mut by_yaml_path = HashMap::new();
        let mut yaml_only_flat_names = HashMap::new();

        for (idx, field) in fields.iter().enumerate() {
            if by_id.insert(field.id, idx).is_some() {
                return Err(ConfigError::DuplicateFieldId(field.id.to_owned()));
            }

            let Some(placement) = field.placement() else {
                return Err(ConfigError::Unplaceable(field.id.to_owned()));
            };

            if let Some(key) = field.env_key
                && by_env_key.insert(key, idx).is_some()
            {
                return Err(ConfigError::DuplicateEnvKey(key.to_owned()));
            }

            if let Some(path) = field.yaml_path {
                if by_yaml_path.insert(path, idx).is_some() {
                    return Err(ConfigError::DuplicateYamlPath(path.to_owned()));
                }

                if placement == Placement::YamlOnly {
                    yaml_only_flat_names.insert(flat_style_name(field.id), idx);
                    yaml_only_flat_names.insert(flat_style_name(path), idx);
                }
            }
        }

        Ok(Self {
            fields,
            by_id,
            by_env_key,
            by_yaml_path,
            yaml_only_flat_names,
        })
    }

    /// All descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by field id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&FieldDescriptor> {
        self.by_id.get(id).map(|&idx| &self.fields[idx])
    }

    /// Look up a descriptor by flat-file variable name.
    #[must_use]
    pub fn by_env_key(&self, key: &str) -> Option<&FieldDescriptor> {
        self.by_env_key.get(key).map(|&idx| &self.fields[idx])
    }

    /// Look up a descriptor by nested-document dot-path.
    #[must_use]
    pub fn by_yaml_path(&self, path: &str) -> Option<&FieldDescriptor> {
        self.by_yaml_path.get(path).map(|&idx| &self.fields[idx])
    }

    /// Look up a YAML-only descriptor by the flat-style name an operator
    /// would plausibly use for it in the flat file.
    #[must_use]
    pub fn yaml_only_by_flat_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.yaml_only_flat_names
            .get(name)
            .map(|&idx| &self.fields[idx])
    }
}

/// Convert a camel-case id or dot-path to its expected flat-style spelling:
/// `interface.privacyPolicy` becomes `INTERFACE_PRIVACY_POLICY`.
#[must_use]
pub(crate) fn flat_style_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_lower = false;
    for ch in input.chars() {
        if ch == '.' {
            out.push('_');
            prev_lower = false;
        } else if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch);
            prev_lower = false;
        } else {
            out.push(ch.to_ascii_uppercase());
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}
