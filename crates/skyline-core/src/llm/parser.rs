//! Locating the JSON object inside a free-form completion

use serde_json::{Map, Value};

/// Why no usable object was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// No opening brace, or every candidate was cut off before closing
    NoObject,
    /// A balanced span exists but none parses as a JSON object
    Malformed,
}

/// End offset (exclusive) of the balanced object starting at `start`
///
/// Braces inside string literals, including escaped quotes, are ignored.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// First balanced span that parses as a JSON object
///
/// An opening brace that never closes ends the search: every later brace
/// sits inside that cut-off object.
pub fn extract_first_object(text: &str) -> Result<Map<String, Value>, ExtractError> {
    let mut saw_balanced = false;

    for (start, ch) in text.char_indices() {
        if ch != '{' {
            continue;
        }
        let Some(end) = balanced_end(text, start) else {
            break;
        };
        saw_balanced = true;
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text[start..end]) {
            return Ok(map);
        }
    }

    if saw_balanced {
        Err(ExtractError::Malformed)
    } else {
        Err(ExtractError::NoObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_surrounded_by_prose() {
        let reply = "Sure! Here it is:\n```json\n{\"app_type\": \"nodejs\", \"ports\": [3000]}\n```\nDone.";
        let map = extract_first_object(reply).unwrap();
        assert_eq!(map["app_type"], "nodejs");
    }

    #[test]
    fn test_braces_inside_strings() {
        let reply = r#"{"framework": "react", "note": "use ${PORT} and \"}\" carefully"} trailing }"#;
        let map = extract_first_object(reply).unwrap();
        assert_eq!(map["framework"], "react");
        assert_eq!(map["note"], "use ${PORT} and \"}\" carefully");
    }

    #[test]
    fn test_nested_objects_are_kept_whole() {
        let reply = r#"x {"database": {"required": true}, "resources": {"replicas": 3}} y"#;
        let map = extract_first_object(reply).unwrap();
        assert_eq!(map["resources"]["replicas"], 3);
    }

    #[test]
    fn test_truncated_reply_has_no_object() {
        let reply = r#"{"app_type": "java-maven", "database": {"required": tr"#;
        assert_eq!(extract_first_object(reply), Err(ExtractError::NoObject));
        assert_eq!(extract_first_object("no json here"), Err(ExtractError::NoObject));
    }

    #[test]
    fn test_truncated_reply_with_closed_inner_object() {
        let reply = r#"{"app_type": "java-maven", "database": {"required": true, "type": "mysql"}, "resources": {"cpu_req"#;
        assert_eq!(extract_first_object(reply), Err(ExtractError::NoObject));

        let reply = r#"Use {placeholders}: {"app_type": "python", "database": {"required": true}"#;
        assert_eq!(extract_first_object(reply), Err(ExtractError::Malformed));
    }

    #[test]
    fn test_balanced_but_invalid() {
        let reply = "{app_type: nodejs, ports: [3000,]}";
        assert_eq!(extract_first_object(reply), Err(ExtractError::Malformed));
    }

    #[test]
    fn test_prose_braces_before_the_object() {
        let reply = r#"Use {placeholders} like so: {"app_type": "python"}"#;
        let map = extract_first_object(reply).unwrap();
        assert_eq!(map["app_type"], "python");
    }
}
