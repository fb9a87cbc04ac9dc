//! Fenced-block unwrapping.
//!
//! Models often wrap JSON in a Markdown code fence. The body is returned
//! only when both the opening token (three backticks plus an optional
//! language tag) and a closing token at the very end are present. Backticks
//! inside the body are never touched.

const FENCE: &str = "```";

/// Returns the fenced body (trimmed), or the trimmed input unchanged when it
/// is not a well-formed fenced block.
pub fn strip_fence(raw: &str) -> &str {
    let text = raw.trim();
    match fenced_body(text) {
        Some(body) => body.trim(),
        None => text,
    }
}

fn fenced_body(text: &str) -> Option<&str> {
    let after_open = text.strip_prefix(FENCE)?;
    let tag_len = after_open
        .bytes()
        .take_while(|b| is_tag_byte(*b))
        .count();
    let body_start = FENCE.len() + tag_len;

    if !text.ends_with(FENCE) {
        return None;
    }
    let body_end = text.len() - FENCE.len();
    if body_end < body_start {
        // "```" or "````": the closing token would overlap the opening one.
        return None;
    }

    Some(&text[body_start..body_end])
}

fn is_tag_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'.' | b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        let raw = "```json\n{\"score\": 4}\n```";
        assert_eq!(strip_fence(raw), "{\"score\": 4}");
    }

    #[test]
    fn strips_fence_without_tag() {
        assert_eq!(strip_fence("```\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn strips_single_line_fence() {
        assert_eq!(strip_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_fence("```JSON {\"a\":1} ```"), "{\"a\":1}");
    }

    #[test]
    fn keeps_interior_fences() {
        let raw = "```json\n{\"comment\": \"use ``` here\"}\n```";
        assert_eq!(strip_fence(raw), "{\"comment\": \"use ``` here\"}");
    }

    #[test]
    fn does_not_eat_json_characters() {
        // A naive character-set strip would also remove the leading 'j', 's', 'o', 'n'.
        let raw = "```json\n\"json\"\n```";
        assert_eq!(strip_fence(raw), "\"json\"");
    }

    #[test]
    fn unfenced_text_is_unchanged() {
        let raw = "  {\"questions\": [\"a\", \"b\", \"c\"]}  ";
        let once = strip_fence(raw);
        assert_eq!(once, raw.trim());
        assert_eq!(strip_fence(once), once);
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        let raw = "```json\n{\"score\": 4}";
        assert_eq!(strip_fence(raw), raw);
    }

    #[test]
    fn bare_fence_tokens_do_not_panic() {
        assert_eq!(strip_fence("```"), "```");
        assert_eq!(strip_fence("````"), "````");
        assert_eq!(strip_fence("``````"), "");
        assert_eq!(strip_fence("```json```"), "");
    }
}
