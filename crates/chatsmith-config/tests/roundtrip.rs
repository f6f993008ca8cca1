//! Cross-component properties: round-trip fidelity, deterministic output,
//! placement asymmetry, and the validate-then-partial-import protocol.

use std::collections::BTreeMap;

use chatsmith_config::config::Configuration;
use chatsmith_config::registry::{Category, FieldDescriptor, FieldKind};
use chatsmith_config::{ConfigContext, FieldRegistry, env, path, yaml};
use serde_json::{Value, json};

fn context() -> ConfigContext {
    ConfigContext::with_default_catalog().unwrap()
}

/// A configuration with explicit values of every flat-exportable kind.
fn customized(ctx: &ConfigContext) -> Configuration {
    let registry = ctx.registry();
    ctx.new_configuration("roundtrip")
        .with_field(registry, "appTitle", json!("My \"Quoted\" Chat, staging"))
        .unwrap()
        .with_field(registry, "port", json!(8080))
        .unwrap()
        .with_field(registry, "openaiModels", json!(["gpt-4o", "gpt-4o-mini"]))
        .unwrap()
        .with_field(registry, "openaiApiKey", json!("sk-test-123"))
        .unwrap()
        .with_field(registry, "summarize", json!(true))
        .unwrap()
}

/// The flat-placeable subset of a configuration: every field with an env
/// key whose current value is concrete, at its internal path.
fn flat_placeable_subset(ctx: &ConfigContext, config: &Configuration) -> Value {
    let mut expected = Value::Object(serde_json::Map::new());
    for desc in ctx.registry().fields() {
        if desc.env_key.is_none() {
            continue;
        }
        if let Some(value) = config.get(desc.target_path()) {
            path::set_nested(&mut expected, desc.target_path(), value.clone());
        }
    }
    expected
}

#[test]
fn env_round_trip_reproduces_flat_placeable_subset() {
    let mut ctx = context();
    let config = customized(&ctx);

    let exported = ctx.export_env(&config);
    let reimported = env::to_updates(ctx.registry(), &env::parse_env(&exported));

    assert_eq!(reimported, flat_placeable_subset(&ctx, &config));
}

#[test]
fn yaml_round_trip_reproduces_nested_subset() {
    let ctx = context();
    let registry = ctx.registry();
    let config = ctx
        .new_configuration("roundtrip")
        .with_field(registry, "privacyPolicyUrl", json!("https://example.com/privacy"))
        .unwrap()
        .with_field(registry, "socialLogins", json!(["github", "openid"]))
        .unwrap()
        .with_field(registry, "fileEndpoints", json!({"openAI": {"fileLimit": 5}}))
        .unwrap();

    let exported = ctx.export_yaml(&config).unwrap();
    let doc = yaml::parse_yaml(&exported).unwrap();
    let reimported = yaml::to_updates(registry, &doc);

    // Every field with no env key and a concrete value comes back at its
    // internal path.
    let mut expected = Value::Object(serde_json::Map::new());
    for desc in registry.fields() {
        if desc.env_key.is_some() || desc.yaml_path.is_none() {
            continue;
        }
        if let Some(value) = config.get(desc.target_path()) {
            path::set_nested(&mut expected, desc.target_path(), value.clone());
        }
    }
    assert_eq!(reimported, expected);
}

#[test]
fn exports_are_byte_identical_across_runs() {
    let mut ctx = context();
    let config = customized(&ctx);

    let env_first = ctx.export_env(&config);
    let yaml_first = ctx.export_yaml(&config).unwrap();
    assert_eq!(env_first, ctx.export_env(&config));
    assert_eq!(yaml_first, ctx.export_yaml(&config).unwrap());
}

#[test]
fn validation_completeness_over_flat_keys() {
    let ctx = context();
    let mut flat = BTreeMap::new();
    flat.insert("APP_TITLE".to_owned(), "\"Demo\"".to_owned());
    flat.insert("TOTALLY_UNKNOWN".to_owned(), "1".to_owned());
    flat.insert("ALSO_UNKNOWN".to_owned(), "2".to_owned());

    let report = chatsmith_config::validate::validate_env(ctx.registry(), &flat);

    let expected: Vec<String> = flat
        .keys()
        .filter(|key| ctx.registry().by_env_key(key).is_none())
        .cloned()
        .collect();
    assert_eq!(report.unmapped_keys, expected);
}

#[test]
fn yaml_only_field_in_flat_file_is_a_placement_violation() {
    let ctx = context();
    let report = ctx
        .validate_env("SOCIAL_LOGINS=github\nAPP_TITLE=\"Demo\"\n")
        .unwrap();

    assert!(!report.valid());
    assert_eq!(report.yaml_only_violations, vec!["SOCIAL_LOGINS".to_owned()]);
    assert!(report.unmapped_keys.is_empty());
}

#[test]
fn dual_placement_resolves_to_the_flat_file() {
    let mut ctx = context();
    let config = ctx.new_configuration("dual");

    // Import through the nested document...
    let (config, report) = ctx
        .import_yaml(&config, "endpoints:\n  openAI:\n    titleConvo: false\n")
        .unwrap();
    assert_eq!(report.len(), 1);

    // ...the flat export carries the value as an active line...
    let env_text = ctx.export_env(&config);
    assert!(env_text.contains("TITLE_CONVO=false\n"));

    // ...and the nested export never mentions it.
    let yaml_text = ctx.export_yaml(&config).unwrap();
    assert!(!yaml_text.contains("titleConvo"));
}

#[test]
fn placeholder_tokens_never_reach_the_configuration() {
    let ctx = context();
    let config = ctx.new_configuration("placeholders");

    let (config, report) = ctx
        .import_yaml(&config, "interface:\n  customWelcome: ${WELCOME_MSG}\n")
        .unwrap();

    assert!(report.is_empty());
    assert!(config.get("customWelcome").is_none());
}

#[test]
fn malformed_document_is_one_fatal_error() {
    let ctx = context();
    let config = ctx.new_configuration("bad");
    assert!(ctx.import_yaml(&config, "interface: [unclosed\n").is_err());
}

#[test]
fn validate_then_partial_import() {
    // The end-to-end scenario: a registry containing only APP_TITLE.
    let registry = FieldRegistry::new(vec![FieldDescriptor::new(
        "appTitle",
        FieldKind::String,
        Category::App,
        Value::Null,
    )
    .env("APP_TITLE")])
    .unwrap();
    let ctx = ConfigContext::new(registry);
    let config = ctx.new_configuration("partial");

    let text = "APP_TITLE=\"Demo\"\n#comment\nUNKNOWN_VAR=1\n";
    let report = ctx.validate_env(text).unwrap();
    assert!(!report.valid());
    assert_eq!(report.unmapped_keys, vec!["UNKNOWN_VAR".to_owned()]);

    // The caller elects the validated subset.
    let flat = env::parse_env(text);
    let subset = report.validated_subset(&flat);
    let (config, changes) = ctx.import_env(&config, &subset);

    assert_eq!(config.values(), &json!({"appTitle": "Demo"}));
    assert_eq!(changes.len(), 1);
    assert_eq!(changes.new_count(), 1);
}

#[test]
fn map_shaped_endpoint_catalog_normalizes_on_import() {
    let ctx = context();
    let config = ctx.new_configuration("records");

    // Upstream tolerates a mapping keyed by name; internally it is always
    // an ordered list of named records.
    let text = "endpoints:\n  custom:\n    mistral:\n      baseURL: https://api.mistral.ai/v1\n";
    let (config, _) = ctx.import_yaml(&config, text).unwrap();

    let records = config.get("customEndpoints").unwrap().as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], json!("mistral"));
    assert_eq!(records[0]["baseURL"], json!("https://api.mistral.ai/v1"));
}

#[test]
fn snapshot_survives_disk_and_restores_identical_exports() {
    let mut ctx = context();
    let config = customized(&ctx);

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("staging.json");
    std::fs::write(&file_path, config.to_snapshot().unwrap()).unwrap();

    let restored =
        Configuration::from_snapshot(&std::fs::read_to_string(&file_path).unwrap()).unwrap();

    assert_eq!(ctx.export_env(&config), ctx.export_env(&restored));
    assert_eq!(
        ctx.export_yaml(&config).unwrap(),
        ctx.export_yaml(&restored).unwrap()
    );
}

#[test]
fn coercion_failure_still_counts_as_touched() {
    let ctx = context();
    let config = ctx.new_configuration("lenient");

    // PORT falls back to its default on garbage, but the field is still
    // present in the change report.
    let (config, report) = ctx.import_env_text(&config, "PORT=not-a-number\n").unwrap();
    assert_eq!(config.get("port"), Some(&json!(3080)));
    assert!(report.entries.iter().any(|entry| entry.path == "port"));
}
