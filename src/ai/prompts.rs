/// Characters of source text shown to the model when generating a title
pub const TITLE_CONTEXT_CHARS: usize = 500;

pub const SUMMARY_MAX_TOKENS: u32 = 1500;
pub const TITLE_MAX_TOKENS: u32 = 100;
pub const IMPROVE_MAX_TOKENS: u32 = 2000;

/// Build the summarization prompt. The response contract is a single JSON
/// object with exactly `summary` and `bulletPoints`.
pub fn build_summary_prompt(text: &str) -> String {
    format!(
        r#"You are an expert note-taking assistant. Turn the text below into a concise summary and a list of key points.

TEXT:
---
{}
---

RULES:
1. "summary": 2-3 sentences capturing the main idea
2. "bulletPoints": 5-10 short, self-contained key points, in the order they appear in the text
3. Do not invent facts that are not in the text

Respond with ONLY this JSON object, no other text:
{{
  "summary": "Your summary here",
  "bulletPoints": ["Point 1", "Point 2", "Point 3"]
}}"#,
        text
    )
}

/// Build the title prompt from the first [`TITLE_CONTEXT_CHARS`] characters
pub fn build_title_prompt(text: &str) -> String {
    let excerpt: String = text.chars().take(TITLE_CONTEXT_CHARS).collect();
    let ellipsis = if text.chars().count() > TITLE_CONTEXT_CHARS {
        "..."
    } else {
        ""
    };

    format!(
        r#"Generate a concise, descriptive title (5-10 words max) for the following text:

{}{}

Respond with ONLY the title. No quotes, no extra formatting."#,
        excerpt, ellipsis
    )
}

/// Build the rewrite prompt used by `improve_text`
pub fn build_improve_prompt(text: &str) -> String {
    format!(
        r#"Improve the following text: make it clearer, more concise and better organized while keeping the original meaning.

{}

Respond with ONLY the improved text."#,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_text_and_contract() {
        let prompt = build_summary_prompt("The quick brown fox");
        assert!(prompt.contains("The quick brown fox"));
        assert!(prompt.contains("\"bulletPoints\""));
        assert!(prompt.contains("\"summary\""));
    }

    #[test]
    fn test_title_prompt_uses_excerpt() {
        let text = format!("{}TAIL", "x".repeat(TITLE_CONTEXT_CHARS));
        let prompt = build_title_prompt(&text);
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains("..."));

        let short = build_title_prompt("short text");
        assert!(short.contains("short text\n"));
    }
}
