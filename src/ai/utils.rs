//! Shared utilities for model response handling

use crate::model::single_line;

/// Locate the first balanced `{...}` span in a model response.
///
/// Models wrap JSON in prose or code fences; only the span is returned.
/// Braces inside JSON strings (including escaped quotes) are not counted.
/// Returns `None` when no `{` exists or the first one is never closed.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
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
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Trim a model-written title, strip one wrapping quote on each side and
/// fold it onto a single line
pub fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    let quotes: &[char] = &['"', '\''];
    let trimmed = trimmed.strip_prefix(quotes).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(quotes).unwrap_or(trimmed);
    single_line(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_object_from_prose() {
        let text = r#"Sure! {"summary":"S","bulletPoints":["a","b"]} Hope this helps"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"summary":"S","bulletPoints":["a","b"]}"#)
        );
    }

    #[test]
    fn test_extract_json_object_from_code_block() {
        let text = "Here's the result:\n```json\n{\"key\": {\"nested\": 1}}\n```\nThat's it.";
        assert_eq!(extract_json_object(text), Some("{\"key\": {\"nested\": 1}}"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let text = r#"{"summary":"use } and { freely \" ok","bulletPoints":["x"]} trailing }"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"summary":"use } and { freely \" ok","bulletPoints":["x"]}"#)
        );
    }

    #[test]
    fn test_first_span_wins() {
        let text = r#"{"a":1} and then {"b":2}"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_no_json_returns_none() {
        assert_eq!(extract_json_object("No JSON here!"), None);
        assert_eq!(extract_json_object("{ never closed"), None);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  \"Quarterly Results\"\n"), "Quarterly Results");
        assert_eq!(clean_title("'Notes'"), "Notes");
        assert_eq!(clean_title("It's fine"), "It's fine");
        assert_eq!(clean_title("\"\""), "");
        assert_eq!(clean_title("\"Budget\nReview\""), "Budget Review");
    }
}
