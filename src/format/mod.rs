//! Display formatting for property values
//!
//! Classifies a value into a display mode and produces its text. The text is
//! HTML-safe for plain strings and is never truncated; long values only
//! switch mode so the report can give them a scroll region.

use serde::Serialize;
use serde_json::Value;

/// Escaped strings longer than this are shown as `LongSimple`
pub const LONG_VALUE_THRESHOLD: usize = 100;

/// How a formatted value should be laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Empty,
    Simple,
    LongSimple,
    Complex,
}

impl DisplayMode {
    /// CSS class used by the HTML report
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Empty => "empty",
            DisplayMode::Simple => "simple",
            DisplayMode::LongSimple => "long-simple",
            DisplayMode::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedValue {
    pub text: String,
    pub mode: DisplayMode,
}

impl FormattedValue {
    fn empty() -> Self {
        Self {
            text: String::new(),
            mode: DisplayMode::Empty,
        }
    }

    fn complex(text: String) -> Self {
        Self {
            text,
            mode: DisplayMode::Complex,
        }
    }

    fn inline(text: String) -> Self {
        let mode = if text.is_empty() {
            DisplayMode::Empty
        } else if text.chars().count() > LONG_VALUE_THRESHOLD {
            DisplayMode::LongSimple
        } else {
            DisplayMode::Simple
        };
        Self { text, mode }
    }
}

/// Null, empty string, empty list and empty map
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Format a value for display
pub fn format_value(value: &Value) -> FormattedValue {
    match value {
        Value::Null => FormattedValue::empty(),
        Value::Array(_) | Value::Object(_) => format_structure(value),
        Value::String(s) => format_string(s),
        Value::Bool(_) | Value::Number(_) => FormattedValue::inline(value.to_string()),
    }
}

fn format_structure(value: &Value) -> FormattedValue {
    if is_empty_value(value) {
        return FormattedValue::empty();
    }

    match serde_json::to_string_pretty(value) {
        Ok(text) => FormattedValue::complex(html_escape(&text)),
        Err(_) => FormattedValue::complex(html_escape(&value.to_string())),
    }
}

fn format_string(s: &str) -> FormattedValue {
    if s.is_empty() {
        return FormattedValue::empty();
    }

    // Providers often hand back JSON documents (policies, task definitions) as strings
    let trimmed = s.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(parsed) = serde_json::from_str::<Value>(s) {
            if parsed.is_object() || parsed.is_array() {
                return format_structure(&parsed);
            }
        }
    }

    let escaped = html_escape(s);
    if escaped.contains('\n') {
        FormattedValue::complex(escaped)
    } else {
        FormattedValue::inline(escaped)
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Reverse of `html_escape`, for plain-text consumers of formatted values
pub fn html_unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        for value in [json!(null), json!(""), json!([]), json!({})] {
            let formatted = format_value(&value);
            assert_eq!(formatted.mode, DisplayMode::Empty, "{:?}", value);
            assert_eq!(formatted.text, "");
            assert!(is_empty_value(&value));
        }

        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!(" ")));
    }

    #[test]
    fn test_structure_is_complex_and_round_trips() {
        let value = json!({"a": 1, "b": [1, 2, 3]});
        let formatted = format_value(&value);

        assert_eq!(formatted.mode, DisplayMode::Complex);
        assert!(formatted.text.contains("\n  &quot;a&quot;: 1"));

        let reparsed: Value = serde_json::from_str(&html_unescape(&formatted.text)).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_structure_keys_are_sorted() {
        let formatted = format_value(&json!({"zebra": 1, "apple": 2}));
        let apple = formatted.text.find("apple").unwrap();
        let zebra = formatted.text.find("zebra").unwrap();
        assert!(apple < zebra);
    }

    #[test]
    fn test_json_string_is_pretty_printed() {
        let formatted = format_value(&json!(r#"{"Version":"2012-10-17","Statement":[]}"#));
        assert_eq!(formatted.mode, DisplayMode::Complex);
        assert!(formatted.text.contains("&quot;Version&quot;: &quot;2012-10-17&quot;"));
    }

    #[test]
    fn test_empty_json_string_is_empty() {
        assert_eq!(format_value(&json!("{}")).mode, DisplayMode::Empty);
        assert_eq!(format_value(&json!("[]")).mode, DisplayMode::Empty);
    }

    #[test]
    fn test_invalid_json_string_falls_through() {
        let formatted = format_value(&json!("[not json"));
        assert_eq!(formatted.mode, DisplayMode::Simple);
        assert_eq!(formatted.text, "[not json");
    }

    #[test]
    fn test_plain_string_is_escaped() {
        let formatted = format_value(&json!("<b>\"Tom\" & 'Jerry'</b>"));
        assert_eq!(formatted.mode, DisplayMode::Simple);
        assert_eq!(
            formatted.text,
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_multiline_string_is_complex() {
        let formatted = format_value(&json!("#!/bin/bash\necho hi"));
        assert_eq!(formatted.mode, DisplayMode::Complex);
        assert_eq!(formatted.text, "#!/bin/bash\necho hi");
    }

    #[test]
    fn test_long_string_threshold() {
        let at_limit = "a".repeat(LONG_VALUE_THRESHOLD);
        assert_eq!(format_value(&json!(at_limit)).mode, DisplayMode::Simple);

        let over = "a".repeat(LONG_VALUE_THRESHOLD + 1);
        let formatted = format_value(&json!(over));
        assert_eq!(formatted.mode, DisplayMode::LongSimple);
        assert_eq!(formatted.text.len(), LONG_VALUE_THRESHOLD + 1);
    }

    #[test]
    fn test_threshold_applies_after_escaping() {
        // 60 ampersands escape to 300 characters
        let formatted = format_value(&json!("&".repeat(60)));
        assert_eq!(formatted.mode, DisplayMode::LongSimple);
    }

    #[test]
    fn test_scalars() {
        assert_eq!(
            format_value(&json!(42)),
            FormattedValue {
                text: "42".to_string(),
                mode: DisplayMode::Simple
            }
        );
        assert_eq!(format_value(&json!(true)).text, "true");
        assert_eq!(format_value(&json!(1.5)).text, "1.5");
    }

    #[test]
    fn test_html_escape_roundtrip_helpers() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_unescape("&amp;lt;"), "&lt;");
    }
}
