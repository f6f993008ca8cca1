//! Per-type conversion between flat-file text and typed values.
//!
//! Conversion never fails: an unparseable or out-of-range value falls back
//! to the descriptor default with a warning, and the field still counts as
//! present for change analysis. A descriptor's custom transformer, when
//! present, overrides the generic rules in either direction.

use serde_json::Value;
use tracing::warn;

use crate::registry::{FieldDescriptor, FieldKind};

/// Convert flat-file text into a typed value for `desc`.
#[must_use]
pub fn parse_env_value(desc: &FieldDescriptor, raw: &str) -> Value {
    if let Some(parse) = desc.parse {
        return parse(raw).unwrap_or_else(|| {
            warn!(field = desc.id, "custom parser rejected value; using default");
            desc.default.clone()
        });
    }

    match desc.kind {
        FieldKind::Boolean => Value::Bool(raw == "true" || raw == "1"),
        FieldKind::Number => parse_number(desc, raw),
        FieldKind::Array => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_owned()))
                .collect(),
        ),
        FieldKind::String => Value::String(unquote(raw)),
        FieldKind::Enum => {
            let candidate = unquote(raw);
            if desc.allowed.contains(&candidate.as_str()) {
                Value::String(candidate)
            } else {
                warn!(
                    field = desc.id,
                    value = candidate,
                    "value not in allowed set; using default"
                );
                desc.default.clone()
            }
        },
        FieldKind::Object => serde_json::from_str(raw).unwrap_or_else(|_| {
            warn!(field = desc.id, "object value is not valid JSON; using default");
            desc.default.clone()
        }),
    }
}

fn parse_number(desc: &FieldDescriptor, raw: &str) -> Value {
    let Ok(n) = raw.trim().parse::<i64>() else {
        warn!(field = desc.id, value = raw, "not an integer; using default");
        return desc.default.clone();
    };

    if desc.min.is_some_and(|min| n < min) || desc.max.is_some_and(|max| n > max) {
        warn!(field = desc.id, value = n, "integer out of range; using default");
        return desc.default.clone();
    }

    Value::from(n)
}

/// Render a typed value as flat-file text for `desc`.
///
/// Strings and other scalar-like values are quoted with backslash and
/// double-quote escaped, so embedded commas, spaces, and quotes survive one
/// round trip through a line-oriented file. `Null` renders as the empty
/// string (no documented default to show).
#[must_use]
pub fn render_env_value(desc: &FieldDescriptor, value: &Value) -> String {
    if let Some(render) = desc.render
        && let Some(text) = render(value)
    {
        return text;
    }

    if value.is_null() {
        return String::new();
    }

    match desc.kind {
        FieldKind::Boolean => {
            if value.as_bool().unwrap_or(false) {
                "true".to_owned()
            } else {
                "false".to_owned()
            }
        },
        FieldKind::Number => value
            .as_i64()
            .map_or_else(|| value.to_string(), |n| n.to_string()),
        FieldKind::Array => value.as_array().map_or_else(String::new, |items| {
            items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map_or_else(|| item.to_string(), str::to_owned)
                })
                .collect::<Vec<_>>()
                .join(",")
        }),
        FieldKind::String | FieldKind::Enum => {
            quote(value.as_str().unwrap_or_default())
        },
        FieldKind::Object => quote(&serde_json::to_string(value).unwrap_or_default()),
    }
}

/// Quote and escape a string for the flat file.
#[must_use]
pub(crate) fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// Strip one level of surrounding quotes and unescape; text without
/// surrounding quotes passes through unchanged.
#[must_use]
pub(crate) fn unquote(s: &str) -> String {
    let Some(inner) = s.strip_prefix('"').and_then(|t| t.strip_suffix('"')) else {
        return s.to_owned();
    };

    let mut out = String::with_capacity(inner.len());
    let mut escaped = false;
    for ch in inner.chars() {
        if escaped {
            out.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    out
}
