//! The shipped LibreChat field catalog.
//!
//! Data only: descriptor declarations grouped by category, in the order the
//! export writers emit them. Field ids, flat keys, and document paths follow
//! the platform's published configuration surface.

use serde_json::{Value, json};

use crate::registry::{Category, FieldDescriptor, FieldKind};

/// The full descriptor list for a LibreChat deployment.
#[must_use]
pub fn default_fields() -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();
    fields.extend(app_fields());
    fields.extend(server_fields());
    fields.extend(logging_fields());
    fields.extend(credentials_fields());
    fields.extend(auth_fields());
    fields.extend(provider_fields());
    fields.extend(search_fields());
    fields.extend(email_fields());
    fields.extend(moderation_fields());
    fields.extend(core_fields());
    fields.extend(interface_fields());
    fields.extend(registration_fields());
    fields.extend(rate_limit_fields());
    fields.extend(file_fields());
    fields.extend(endpoint_fields());
    fields.extend(balance_fields());
    fields
}

/// Parse the flat file's `1000 * 60 * 15` duration spelling: a product of
/// integer factors, or a single plain integer.
fn parse_ms_product(raw: &str) -> Option<Value> {
    let mut product: i64 = 1;
    for factor in raw.split('*') {
        let n: i64 = factor.trim().parse().ok()?;
        product = product.checked_mul(n)?;
    }
    Some(Value::from(product))
}

/// Normalize a catalog of named records to one internal shape.
///
/// Upstream accepts the custom endpoint list either as a sequence of
/// records carrying a `name`, or as a mapping keyed by name. Internally it
/// is always an ordered list of named records; nothing downstream branches
/// on shape.
fn normalize_named_records(raw: &Value) -> Value {
    match raw {
        Value::Object(map) => Value::Array(
            map.iter()
                .map(|(name, body)| {
                    let mut record = serde_json::Map::new();
                    record.insert("name".to_owned(), Value::String(name.clone()));
                    if let Value::Object(fields) = body {
                        record.extend(fields.clone());
                    }
                    Value::Object(record)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn app_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("appTitle", FieldKind::String, Category::App, json!("LibreChat"))
            .env("APP_TITLE"),
        FieldDescriptor::new("customFooter", FieldKind::String, Category::App, Value::Null)
            .env("CUSTOM_FOOTER"),
        FieldDescriptor::new("helpAndFaqUrl", FieldKind::String, Category::App, Value::Null)
            .env("HELP_AND_FAQ_URL"),
    ]
}

fn server_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("host", FieldKind::String, Category::Server, json!("localhost"))
            .env("HOST"),
        FieldDescriptor::new("port", FieldKind::Number, Category::Server, json!(3080))
            .env("PORT")
            .range(1, 65_535),
        FieldDescriptor::new(
            "mongoUri",
            FieldKind::String,
            Category::Server,
            json!("mongodb://127.0.0.1:27017/LibreChat"),
        )
        .env("MONGO_URI")
        .sensitive(),
        FieldDescriptor::new(
            "domainClient",
            FieldKind::String,
            Category::Server,
            json!("http://localhost:3080"),
        )
        .env("DOMAIN_CLIENT"),
        FieldDescriptor::new(
            "domainServer",
            FieldKind::String,
            Category::Server,
            json!("http://localhost:3080"),
        )
        .env("DOMAIN_SERVER"),
        FieldDescriptor::new("noIndex", FieldKind::Boolean, Category::Server, json!(true))
            .env("NO_INDEX"),
        FieldDescriptor::new("trustProxy", FieldKind::Number, Category::Server, json!(1))
            .env("TRUST_PROXY")
            .range(0, 10),
    ]
}

fn logging_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("debugLogging", FieldKind::Boolean, Category::Logging, json!(true))
            .env("DEBUG_LOGGING"),
        FieldDescriptor::new("debugConsole", FieldKind::Boolean, Category::Logging, json!(false))
            .env("DEBUG_CONSOLE"),
        FieldDescriptor::new("consoleJson", FieldKind::Boolean, Category::Logging, json!(false))
            .env("CONSOLE_JSON"),
    ]
}

fn credentials_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("credsKey", FieldKind::String, Category::Credentials, Value::Null)
            .env("CREDS_KEY")
            .generated_secret(32),
        FieldDescriptor::new("credsIv", FieldKind::String, Category::Credentials, Value::Null)
            .env("CREDS_IV")
            .generated_secret(16),
        FieldDescriptor::new("jwtSecret", FieldKind::String, Category::Credentials, Value::Null)
            .env("JWT_SECRET")
            .generated_secret(32),
        FieldDescriptor::new(
            "jwtRefreshSecret",
            FieldKind::String,
            Category::Credentials,
            Value::Null,
        )
        .env("JWT_REFRESH_SECRET")
        .generated_secret(32),
    ]
}

fn auth_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("allowEmailLogin", FieldKind::Boolean, Category::Auth, json!(true))
            .env("ALLOW_EMAIL_LOGIN"),
        FieldDescriptor::new("allowRegistration", FieldKind::Boolean, Category::Auth, json!(true))
            .env("ALLOW_REGISTRATION"),
        FieldDescriptor::new("allowSocialLogin", FieldKind::Boolean, Category::Auth, json!(false))
            .env("ALLOW_SOCIAL_LOGIN"),
        FieldDescriptor::new(
            "allowSocialRegistration",
            FieldKind::Boolean,
            Category::Auth,
            json!(false),
        )
        .env("ALLOW_SOCIAL_REGISTRATION"),
        FieldDescriptor::new(
            "allowPasswordReset",
            FieldKind::Boolean,
            Category::Auth,
            json!(false),
        )
        .env("ALLOW_PASSWORD_RESET"),
        FieldDescriptor::new(
            "allowUnverifiedEmailLogin",
            FieldKind::Boolean,
            Category::Auth,
            json!(true),
        )
        .env("ALLOW_UNVERIFIED_EMAIL_LOGIN"),
        // Expiries keep the flat file's `1000 * 60 * 15` product spelling.
        FieldDescriptor::new("sessionExpiry", FieldKind::Number, Category::Auth, json!(900_000))
            .env("SESSION_EXPIRY")
            .parse_with(parse_ms_product),
        FieldDescriptor::new(
            "refreshTokenExpiry",
            FieldKind::Number,
            Category::Auth,
            json!(604_800_000),
        )
        .env("REFRESH_TOKEN_EXPIRY")
        .parse_with(parse_ms_product),
    ]
}

fn provider_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("openaiApiKey", FieldKind::String, Category::Providers, Value::Null)
            .env("OPENAI_API_KEY")
            .sensitive(),
        FieldDescriptor::new(
            "anthropicApiKey",
            FieldKind::String,
            Category::Providers,
            Value::Null,
        )
        .env("ANTHROPIC_API_KEY")
        .sensitive(),
        FieldDescriptor::new("googleKey", FieldKind::String, Category::Providers, Value::Null)
            .env("GOOGLE_KEY")
            .sensitive(),
        FieldDescriptor::new("groqApiKey", FieldKind::String, Category::Providers, Value::Null)
            .env("GROQ_API_KEY")
            .sensitive(),
        FieldDescriptor::new("mistralApiKey", FieldKind::String, Category::Providers, Value::Null)
            .env("MISTRAL_API_KEY")
            .sensitive(),
        FieldDescriptor::new("openaiModels", FieldKind::Array, Category::Providers, json!([]))
            .env("OPENAI_MODELS"),
        FieldDescriptor::new("anthropicModels", FieldKind::Array, Category::Providers, json!([]))
            .env("ANTHROPIC_MODELS"),
    ]
}

fn search_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("search", FieldKind::Boolean, Category::Search, json!(true))
            .env("SEARCH"),
        FieldDescriptor::new(
            "meiliHost",
            FieldKind::String,
            Category::Search,
            json!("http://127.0.0.1:7700"),
        )
        .env("MEILI_HOST"),
        FieldDescriptor::new("meiliMasterKey", FieldKind::String, Category::Search, Value::Null)
            .env("MEILI_MASTER_KEY")
            .generated_secret(16),
        FieldDescriptor::new(
            "meiliNoAnalytics",
            FieldKind::Boolean,
            Category::Search,
            json!(true),
        )
        .env("MEILI_NO_ANALYTICS"),
    ]
}

fn email_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("emailService", FieldKind::String, Category::Email, Value::Null)
            .env("EMAIL_SERVICE"),
        FieldDescriptor::new("emailUsername", FieldKind::String, Category::Email, Value::Null)
            .env("EMAIL_USERNAME")
            .sensitive(),
        FieldDescriptor::new("emailPassword", FieldKind::String, Category::Email, Value::Null)
            .env("EMAIL_PASSWORD")
            .sensitive(),
        FieldDescriptor::new(
            "emailFrom",
            FieldKind::String,
            Category::Email,
            json!("noreply@librechat.ai"),
        )
        .env("EMAIL_FROM"),
        FieldDescriptor::new("emailFromName", FieldKind::String, Category::Email, Value::Null)
            .env("EMAIL_FROM_NAME"),
    ]
}

fn moderation_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("banViolations", FieldKind::Boolean, Category::Moderation, json!(true))
            .env("BAN_VIOLATIONS"),
        FieldDescriptor::new(
            "banDuration",
            FieldKind::Number,
            Category::Moderation,
            json!(7_200_000),
        )
        .env("BAN_DURATION")
        .parse_with(parse_ms_product),
        FieldDescriptor::new("banInterval", FieldKind::Number, Category::Moderation, json!(20))
            .env("BAN_INTERVAL"),
        FieldDescriptor::new(
            "limitConcurrentMessages",
            FieldKind::Boolean,
            Category::Moderation,
            json!(true),
        )
        .env("LIMIT_CONCURRENT_MESSAGES"),
        FieldDescriptor::new(
            "concurrentMessageMax",
            FieldKind::Number,
            Category::Moderation,
            json!(2),
        )
        .env("CONCURRENT_MESSAGE_MAX")
        .range(1, 100),
    ]
}

fn core_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("version", FieldKind::String, Category::Core, json!("1.2.8"))
            .yaml("version"),
        FieldDescriptor::new("cache", FieldKind::Boolean, Category::Core, json!(true))
            .yaml("cache"),
        FieldDescriptor::new("fileStrategy", FieldKind::Enum, Category::Core, json!("local"))
            .yaml("fileStrategy")
            .allowed(&["local", "s3", "firebase", "azure_blob"]),
        FieldDescriptor::new(
            "secureImageLinks",
            FieldKind::Boolean,
            Category::Core,
            json!(false),
        )
        .yaml("secureImageLinks"),
        FieldDescriptor::new("imageOutputType", FieldKind::Enum, Category::Core, json!("png"))
            .yaml("imageOutputType")
            .allowed(&["png", "webp", "jpeg", "url"]),
    ]
}

fn interface_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("customWelcome", FieldKind::String, Category::Interface, Value::Null)
            .yaml("interface.customWelcome"),
        FieldDescriptor::new(
            "privacyPolicyUrl",
            FieldKind::String,
            Category::Interface,
            Value::Null,
        )
        .yaml("interface.privacyPolicy.externalUrl")
        .stored_at("privacyPolicyUrl"),
        FieldDescriptor::new(
            "privacyPolicyNewTab",
            FieldKind::Boolean,
            Category::Interface,
            json!(true),
        )
        .yaml("interface.privacyPolicy.openNewTab")
        .stored_at("privacyPolicyNewTab"),
        FieldDescriptor::new(
            "termsOfServiceUrl",
            FieldKind::String,
            Category::Interface,
            Value::Null,
        )
        .yaml("interface.termsOfService.externalUrl")
        .stored_at("termsOfServiceUrl"),
        FieldDescriptor::new(
            "endpointsMenu",
            FieldKind::Boolean,
            Category::Interface,
            json!(true),
        )
        .yaml("interface.endpointsMenu"),
        FieldDescriptor::new("modelSelect", FieldKind::Boolean, Category::Interface, json!(true))
            .yaml("interface.modelSelect"),
        FieldDescriptor::new("parameters", FieldKind::Boolean, Category::Interface, json!(true))
            .yaml("interface.parameters"),
        FieldDescriptor::new("sidePanel", FieldKind::Boolean, Category::Interface, json!(true))
            .yaml("interface.sidePanel"),
        FieldDescriptor::new("presets", FieldKind::Boolean, Category::Interface, json!(true))
            .yaml("interface.presets"),
        FieldDescriptor::new("prompts", FieldKind::Boolean, Category::Interface, json!(true))
            .yaml("interface.prompts"),
        FieldDescriptor::new("bookmarks", FieldKind::Boolean, Category::Interface, json!(true))
            .yaml("interface.bookmarks"),
        FieldDescriptor::new("multiConvo", FieldKind::Boolean, Category::Interface, json!(false))
            .yaml("interface.multiConvo"),
    ]
}

fn registration_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(
            "socialLogins",
            FieldKind::Array,
            Category::Registration,
            json!(["github", "google", "discord", "openid", "facebook"]),
        )
        .yaml("registration.socialLogins")
        .stored_at("socialLogins"),
        FieldDescriptor::new(
            "allowedDomains",
            FieldKind::Array,
            Category::Registration,
            json!([]),
        )
        .yaml("registration.allowedDomains")
        .stored_at("allowedDomains"),
    ]
}

fn rate_limit_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(
            "fileUploadIpMax",
            FieldKind::Number,
            Category::RateLimits,
            json!(10),
        )
        .yaml("rateLimits.fileUploads.ipMax")
        .range(1, 10_000),
        FieldDescriptor::new(
            "fileUploadIpWindow",
            FieldKind::Number,
            Category::RateLimits,
            json!(15),
        )
        .yaml("rateLimits.fileUploads.ipWindowInMinutes"),
        FieldDescriptor::new(
            "convoImportIpMax",
            FieldKind::Number,
            Category::RateLimits,
            json!(50),
        )
        .yaml("rateLimits.conversationsImport.ipMax"),
        FieldDescriptor::new("ttsIpMax", FieldKind::Number, Category::RateLimits, json!(100))
            .yaml("rateLimits.tts.ipMax"),
        FieldDescriptor::new("sttIpMax", FieldKind::Number, Category::RateLimits, json!(100))
            .yaml("rateLimits.stt.ipMax"),
    ]
}

fn file_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new(
            "serverFileSizeLimit",
            FieldKind::Number,
            Category::Files,
            json!(100),
        )
        .yaml("fileConfig.serverFileSizeLimit"),
        FieldDescriptor::new("avatarSizeLimit", FieldKind::Number, Category::Files, json!(2))
            .yaml("fileConfig.avatarSizeLimit"),
        // Per-endpoint file rules are carried opaquely; their inner shape is
        // owned by the platform.
        FieldDescriptor::new("fileEndpoints", FieldKind::Object, Category::Files, json!({}))
            .yaml("fileConfig.endpoints")
            .stored_at("fileEndpoints"),
    ]
}

fn endpoint_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("titleConvo", FieldKind::Boolean, Category::Endpoints, json!(true))
            .env("TITLE_CONVO")
            .yaml("endpoints.openAI.titleConvo")
            .note("accepted from both artifacts for upstream compatibility; the flat value wins"),
        FieldDescriptor::new(
            "titleModel",
            FieldKind::String,
            Category::Endpoints,
            json!("gpt-4o-mini"),
        )
        .env("OPENAI_TITLE_MODEL")
        .yaml("endpoints.openAI.titleModel")
        .note("accepted from both artifacts for upstream compatibility; the flat value wins"),
        FieldDescriptor::new("summarize", FieldKind::Boolean, Category::Endpoints, json!(false))
            .env("OPENAI_SUMMARIZE")
            .yaml("endpoints.openAI.summarize")
            .note("accepted from both artifacts for upstream compatibility; the flat value wins"),
        FieldDescriptor::new(
            "summaryModel",
            FieldKind::String,
            Category::Endpoints,
            json!("gpt-4o-mini"),
        )
        .env("OPENAI_SUMMARY_MODEL")
        .yaml("endpoints.openAI.summaryModel")
        .note("accepted from both artifacts for upstream compatibility; the flat value wins"),
        FieldDescriptor::new(
            "agentsRecursionLimit",
            FieldKind::Number,
            Category::Endpoints,
            json!(25),
        )
        .yaml("endpoints.agents.recursionLimit")
        .range(1, 100),
        FieldDescriptor::new(
            "agentsCapabilities",
            FieldKind::Array,
            Category::Endpoints,
            json!(["execute_code", "file_search", "actions", "tools"]),
        )
        .yaml("endpoints.agents.capabilities"),
        FieldDescriptor::new(
            "assistantsDisableBuilder",
            FieldKind::Boolean,
            Category::Endpoints,
            json!(false),
        )
        .yaml("endpoints.assistants.disableBuilder"),
        FieldDescriptor::new(
            "assistantsPollIntervalMs",
            FieldKind::Number,
            Category::Endpoints,
            json!(750),
        )
        .yaml("endpoints.assistants.pollIntervalMs")
        .range(100, 10_000),
        FieldDescriptor::new(
            "assistantsTimeoutMs",
            FieldKind::Number,
            Category::Endpoints,
            json!(180_000),
        )
        .yaml("endpoints.assistants.timeoutMs"),
        FieldDescriptor::new("customEndpoints", FieldKind::Array, Category::Endpoints, json!([]))
            .yaml("endpoints.custom")
            .stored_at("customEndpoints")
            .import_with(normalize_named_records),
    ]
}

fn balance_fields() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::new("balanceEnabled", FieldKind::Boolean, Category::Balance, json!(false))
            .yaml("balance.enabled")
            .stored_at("balanceEnabled"),
        FieldDescriptor::new("startBalance", FieldKind::Number, Category::Balance, json!(20_000))
            .yaml("balance.startBalance")
            .stored_at("startBalance"),
        FieldDescriptor::new(
            "autoRefillEnabled",
            FieldKind::Boolean,
            Category::Balance,
            json!(false),
        )
        .yaml("balance.autoRefillEnabled")
        .stored_at("autoRefillEnabled"),
        FieldDescriptor::new("refillAmount", FieldKind::Number, Category::Balance, json!(10_000))
            .yaml("balance.refillAmount")
            .stored_at("refillAmount")
            .range(0, 10_000_000),
    ]
}
