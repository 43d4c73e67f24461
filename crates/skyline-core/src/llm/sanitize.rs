//! Secret redaction for endpoint error bodies

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

const MAX_ERROR_CHARS: usize = 512;
const REDACTED: &str = "[REDACTED]";

static BEARER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bBearer\s+[A-Za-z0-9._\-+/=]{8,}").expect("valid bearer regex")
});

static API_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bsk-[A-Za-z0-9_\-]{8,}").expect("valid api key regex"));

static SECRET_ASSIGNMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b(x-api-key|api[_-]?key|token|secret|password|authorization)\b\s*[:=]\s*["']?[^"',\s}]+"#,
    )
    .expect("valid secret assignment regex")
});

/// Redact credentials from an error body and bound its length
pub fn sanitize_error_body(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let redacted = match serde_json::from_str::<Value>(trimmed) {
        Ok(mut json) => {
            redact_value(&mut json);
            json.to_string()
        }
        Err(_) => redact_text(trimmed),
    };
    truncate(redacted)
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if is_secret_key(key) {
                    *val = Value::String(REDACTED.to_string());
                } else {
                    redact_value(val);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        Value::String(text) => *text = redact_text(text),
        _ => {}
    }
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase().replace('-', "_");
    ["api_key", "token", "secret", "password", "authorization"]
        .iter()
        .any(|marker| key.contains(marker))
}

fn redact_text(text: &str) -> String {
    let text = BEARER_RE.replace_all(text, "Bearer [REDACTED]");
    let text = API_KEY_RE.replace_all(&text, REDACTED);
    SECRET_ASSIGNMENT_RE
        .replace_all(&text, "$1=[REDACTED]")
        .into_owned()
}

fn truncate(text: String) -> String {
    let count = text.chars().count();
    if count <= MAX_ERROR_CHARS {
        return text;
    }
    let head: String = text.chars().take(MAX_ERROR_CHARS).collect();
    format!("{head}... [{} more chars]", count - MAX_ERROR_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_keys_are_redacted() {
        let body = r#"{"error":{"message":"bad key","x-api-key":"sk-ant-abcdefghijkl"}}"#;
        let clean = sanitize_error_body(body);
        assert!(!clean.contains("sk-ant"));
        assert!(clean.contains("bad key"));
    }

    #[test]
    fn test_inline_secrets_are_redacted() {
        let clean = sanitize_error_body("denied: Authorization: Bearer abcdefghijklmnop api_key=hunter22");
        assert!(!clean.contains("abcdefghijklmnop"));
        assert!(!clean.contains("hunter22"));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let clean = sanitize_error_body(&"x".repeat(2_000));
        assert!(clean.ends_with("[1488 more chars]"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(sanitize_error_body("  "), "<empty body>");
    }
}
