//! Canonical output text for both artifact formats.
//!
//! Owns the category ordering table and the vendor-default comment
//! convention shared by the format writers. Output is a pure function of
//! (configuration, override map) except for the generated-secret set:
//! absent secrets render as a comment carrying a cached random value, keyed
//! by configuration name, so repeated exports of an unmodified
//! configuration are byte-identical.

use std::collections::{BTreeMap, HashMap};

use rand::RngCore;

use crate::config::Configuration;
use crate::env::{EnvLineState, line_state};
use crate::error::ConfigResult;
use crate::registry::{Category, FieldRegistry};
use crate::yaml;

/// Fixed export order over catalog categories.
pub(crate) const CATEGORY_ORDER: &[Category] = &[
    Category::App,
    Category::Server,
    Category::Logging,
    Category::Credentials,
    Category::Auth,
    Category::Providers,
    Category::Search,
    Category::Email,
    Category::Moderation,
    Category::Core,
    Category::Interface,
    Category::Registration,
    Category::RateLimits,
    Category::Files,
    Category::Endpoints,
    Category::Balance,
];

fn heading(category: Category) -> &'static str {
    match category {
        Category::App => "App Configuration",
        Category::Server => "Server Configuration",
        Category::Logging => "Logging",
        Category::Credentials => "Security Credentials",
        Category::Auth => "Authentication",
        Category::Providers => "Model Providers",
        Category::Search => "Conversation Search",
        Category::Email => "Email",
        Category::Moderation => "Moderation",
        Category::Core => "Core Settings",
        Category::Interface => "Interface",
        Category::Registration => "Registration",
        Category::RateLimits => "Rate Limits",
        Category::Files => "File Handling",
        Category::Endpoints => "Endpoints",
        Category::Balance => "Token Balance",
    }
}

/// Process-local cache of generated secret values.
///
/// Keyed by configuration name, then field id; append-only for the life of
/// the owning context, never evicted within a session.
#[derive(Default)]
pub struct SecretCache {
    generated: HashMap<String, BTreeMap<String, String>>,
}

impl std::fmt::Debug for SecretCache {
    /// Cached values are never printed.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCache")
            .field("configurations", &self.generated.len())
            .finish()
    }
}

impl SecretCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn get_or_generate(
        &mut self,
        config_name: &str,
        field_id: &str,
        bytes: usize,
    ) -> String {
        self.generated
            .entry(config_name.to_owned())
            .or_default()
            .entry(field_id.to_owned())
            .or_insert_with(|| {
                let mut buf = vec![0_u8; bytes];
                rand::thread_rng().fill_bytes(&mut buf);
                hex::encode(buf)
            })
            .clone()
    }
}

/// Render the flat-file artifact.
///
/// Lines are grouped under category headings in the fixed category order;
/// within a category, fields appear in registry declaration order. The
/// result is byte-identical across runs given identical input and an
/// unchanged secret cache.
#[must_use]
pub fn render_env(
    registry: &FieldRegistry,
    config: &Configuration,
    secrets: &mut SecretCache,
) -> String {
    let mut out = String::new();

    for &category in CATEGORY_ORDER {
        let fields: Vec<_> = registry
            .fields()
            .iter()
            .filter(|desc| desc.category == category && desc.env_key.is_some())
            .collect();
        if fields.is_empty() {
            continue;
        }

        push_heading(&mut out, heading(category));

        for desc in fields {
            let Some(key) = desc.env_key else {
                continue;
            };
            if let Some(note) = desc.note {
                out.push_str(&format!("# note: {note}\n"));
            }

            match line_state(desc, config) {
                EnvLineState::Active(value) => {
                    out.push_str(&format!("{key}={value}\n"));
                },
                EnvLineState::Commented(value) => {
                    let value = substitute_secret(desc.secret_len, desc.id, config, secrets, value);
                    out.push_str(&format!("# {key}={value}\n"));
                },
                EnvLineState::VendorDefault(value) => {
                    let value = substitute_secret(desc.secret_len, desc.id, config, secrets, value);
                    out.push_str(&format!("# {key}={value} (using vendor default)\n"));
                },
            }
        }
        out.push('\n');
    }

    out
}

fn substitute_secret(
    secret_len: Option<usize>,
    field_id: &str,
    config: &Configuration,
    secrets: &mut SecretCache,
    rendered_default: String,
) -> String {
    match secret_len {
        Some(bytes) => secrets.get_or_generate(config.name(), field_id, bytes),
        None => rendered_default,
    }
}

fn push_heading(out: &mut String, title: &str) {
    let bar = format!("#{}#", "=".repeat(52));
    out.push_str(&bar);
    out.push('\n');
    out.push_str(&format!("#{title:^52}#\n"));
    out.push_str(&bar);
    out.push_str("\n\n");
}

/// Render the nested-document artifact with its leading placement comment.
///
/// # Errors
///
/// Returns a [`crate::ConfigError`] if a value cannot be represented in the
/// document format.
pub fn render_yaml(registry: &FieldRegistry, config: &Configuration) -> ConfigResult<String> {
    let doc = yaml::from_config(registry, config)?;
    let body = serde_yaml::to_string(&doc)?;

    let mut out = String::new();
    out.push_str("# LibreChat declarative configuration.\n");
    out.push_str("# Credentials and any field that also has a flat-file key are written\n");
    out.push_str("# to the .env artifact only; this document never carries secrets.\n");
    out.push_str(&body);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::default_fields;

    fn setup() -> (FieldRegistry, Configuration) {
        let registry = FieldRegistry::new(default_fields()).unwrap();
        let config = Configuration::from_defaults(&registry, "demo");
        (registry, config)
    }

    #[test]
    fn test_env_output_is_deterministic() {
        let (registry, config) = setup();
        let mut secrets = SecretCache::new();
        let first = render_env(&registry, &config, &mut secrets);
        let second = render_env(&registry, &config, &mut secrets);
        assert_eq!(first, second);
    }

    #[test]
    fn test_category_headings_in_fixed_order() {
        let (registry, config) = setup();
        let mut secrets = SecretCache::new();
        let out = render_env(&registry, &config, &mut secrets);

        let app = out.find("App Configuration").unwrap();
        let server = out.find("Server Configuration").unwrap();
        let creds = out.find("Security Credentials").unwrap();
        assert!(app < server);
        assert!(server < creds);
    }

    #[test]
    fn test_active_and_commented_lines() {
        let (registry, config) = setup();
        let mut secrets = SecretCache::new();
        let out = render_env(&registry, &config, &mut secrets);

        assert!(out.contains("APP_TITLE=\"LibreChat\"\n"));
        assert!(out.contains("# OPENAI_API_KEY=\n"));
    }

    #[test]
    fn test_vendor_default_annotation() {
        let (registry, config) = setup();
        let config = crate::overrides::set_override(&config, "appTitle", true);
        let mut secrets = SecretCache::new();
        let out = render_env(&registry, &config, &mut secrets);

        assert!(out.contains("# APP_TITLE=\"LibreChat\" (using vendor default)\n"));
    }

    #[test]
    fn test_generated_secret_is_commented_and_stable() {
        let (registry, config) = setup();
        let mut secrets = SecretCache::new();
        let first = render_env(&registry, &config, &mut secrets);
        let line = first
            .lines()
            .find(|line| line.starts_with("# CREDS_KEY="))
            .unwrap()
            .to_owned();
        let value = line.strip_prefix("# CREDS_KEY=").unwrap();
        assert_eq!(value.len(), 64, "32 random bytes hex-encoded");

        // Re-export shows the same generated value.
        let second = render_env(&registry, &config, &mut secrets);
        assert!(second.contains(&line));
    }

    #[test]
    fn test_explicit_secret_renders_active() {
        let (registry, config) = setup();
        let config = config
            .with_field(&registry, "jwtSecret", json!("supersecret"))
            .unwrap();
        let mut secrets = SecretCache::new();
        let out = render_env(&registry, &config, &mut secrets);
        assert!(out.contains("JWT_SECRET=\"supersecret\"\n"));
    }

    #[test]
    fn test_incompatibility_note_rendered() {
        let (registry, config) = setup();
        let mut secrets = SecretCache::new();
        let out = render_env(&registry, &config, &mut secrets);
        let note_pos = out.find("# note: accepted from both artifacts").unwrap();
        let key_pos = out.find("TITLE_CONVO=").unwrap();
        assert!(note_pos < key_pos);
    }

    #[test]
    fn test_yaml_leading_comment_and_no_env_keys() {
        let (registry, config) = setup();
        let out = render_yaml(&registry, &config).unwrap();
        assert!(out.starts_with("# LibreChat declarative configuration.\n"));
        assert!(out.contains("version:"));
        // Dual-placement and env-only fields never appear.
        assert!(!out.contains("titleConvo"));
        assert!(!out.contains("APP_TITLE"));
    }

    #[test]
    fn test_yaml_output_is_deterministic() {
        let (registry, config) = setup();
        let first = render_yaml(&registry, &config).unwrap();
        let second = render_yaml(&registry, &config).unwrap();
        assert_eq!(first, second);
    }
}
