//! Validation and cleanup of raw backend completions.

use tracing::debug;

/// A completion containing any of these (case-insensitive) is rejected
/// outright instead of trimmed. A reply that breaks character cannot be
/// salvaged by cutting the bad part out.
const DISALLOWED_OUTPUT_MARKERS: &[&str] = &[
    "as an ai",
    "as a language model",
    "as an assistant",
    "ai assistant",
    "language model",
    "i am an ai",
    "i'm an ai",
    "sou uma ia",
    "sou um assistente",
    "como uma ia",
    "como assistente",
    "modelo de linguagem",
    "inteligência artificial",
    "system prompt",
    "my instructions",
    "minhas instruções",
    "[system]",
    "<|im_start|>",
    "```",
    "{\"",
];

/// Longest reply forwarded to the caller, in characters.
const MAX_REPLY_CHARS: usize = 200;

/// A sentence-boundary cut is only taken when it keeps at least this many
/// characters, otherwise the reply would shrink to a fragment.
const MIN_SENTENCE_CUT: usize = 50;

/// Cleans a raw completion into a sendable reply.
///
/// Strips the self-name prefix models like to add, unwraps surrounding
/// quotes, rejects anything that breaks character and truncates overlong
/// output at a sentence or word boundary. `None` means the completion was
/// rejected or empty.
pub fn clean_output(raw: &str, user_name: &str) -> Option<String> {
    let mut text = raw.trim();
    text = strip_name_prefix(text, user_name);
    text = strip_wrapping_quotes(text);

    let lowered = text.to_lowercase();
    for marker in DISALLOWED_OUTPUT_MARKERS {
        if lowered.contains(marker) {
            debug!(marker = %marker, "step: completion contains disallowed marker");
            return None;
        }
    }

    let reply = truncate_reply(text);
    if reply.is_empty() {
        None
    } else {
        Some(reply)
    }
}

/// Strips a leading "{user_name}:" the model echoed from the prompt,
/// compared case-insensitively without assuming ASCII.
fn strip_name_prefix<'a>(text: &'a str, user_name: &str) -> &'a str {
    if user_name.is_empty() {
        return text;
    }

    let mut indices = text.char_indices();
    for expected in user_name.chars() {
        match indices.next() {
            Some((_, actual)) if actual.to_lowercase().eq(expected.to_lowercase()) => {}
            _ => return text,
        }
    }

    match indices.next() {
        Some((colon_at, ':')) => text[colon_at + 1..].trim_start(),
        _ => text,
    }
}

fn strip_wrapping_quotes(text: &str) -> &str {
    let stripped = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .or_else(|| text.strip_prefix('“').and_then(|t| t.strip_suffix('”')));

    match stripped {
        Some(inner) if !inner.is_empty() => inner.trim(),
        _ => text,
    }
}

/// Cuts the reply down to [`MAX_REPLY_CHARS`] characters, preferring the last
/// sentence end, then the last whitespace, then a hard cut.
fn truncate_reply(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= MAX_REPLY_CHARS {
        return text.trim_end().to_string();
    }

    let head = &chars[..MAX_REPLY_CHARS];

    if let Some(end) = head
        .iter()
        .rposition(|c| matches!(c, '.' | '!' | '?'))
        .filter(|end| end + 1 > MIN_SENTENCE_CUT)
    {
        return head[..=end].iter().collect::<String>().trim_end().to_string();
    }

    if let Some(space) = head.iter().rposition(|c| c.is_whitespace()) {
        return head[..space].iter().collect::<String>().trim_end().to_string();
    }

    head.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_reply_passes_through() {
        assert_eq!(
            clean_output("vou sim, te espero lá", "Rafael"),
            Some("vou sim, te espero lá".to_string())
        );
    }

    #[test]
    fn test_strips_self_name_prefix() {
        assert_eq!(
            clean_output("Rafael: blz, bora", "Rafael"),
            Some("blz, bora".to_string())
        );
        assert_eq!(
            clean_output("RAFAEL: blz, bora", "Rafael"),
            Some("blz, bora".to_string())
        );
    }

    #[test]
    fn test_keeps_other_names_intact() {
        assert_eq!(
            clean_output("Ana: falei com ela hoje", "Rafael"),
            Some("Ana: falei com ela hoje".to_string())
        );
    }

    #[test]
    fn test_strips_wrapping_quotes() {
        assert_eq!(
            clean_output("\"bora sim!\"", "Rafael"),
            Some("bora sim!".to_string())
        );
    }

    #[test]
    fn test_rejects_assistant_speak() {
        assert_eq!(clean_output("As an AI, I cannot do that", "Rafael"), None);
        assert_eq!(
            clean_output("bom, como uma IA eu não tenho opinião", "Rafael"),
            None
        );
    }

    #[test]
    fn test_rejects_markup_and_json() {
        assert_eq!(clean_output("```json\n{}\n```", "Rafael"), None);
        assert_eq!(clean_output("{\"reply\": \"oi\"}", "Rafael"), None);
    }

    #[test]
    fn test_rejects_marker_past_the_truncation_point() {
        let sneaky = format!("{} and by the way, as an AI I loved it", "x".repeat(250));

        assert_eq!(clean_output(&sneaky, "Rafael"), None);
    }

    #[test]
    fn test_empty_output_is_rejected() {
        assert_eq!(clean_output("", "Rafael"), None);
        assert_eq!(clean_output("   \n ", "Rafael"), None);
        assert_eq!(clean_output("Rafael:", "Rafael"), None);
    }

    #[test]
    fn test_truncates_at_sentence_boundary() {
        let first = "essa história do churrasco ficou ótima demais, depois te conto o resto com calma.";
        let text = format!("{} {}", first, "a".repeat(200));

        assert_eq!(clean_output(&text, "Rafael"), Some(first.to_string()));
    }

    #[test]
    fn test_truncates_at_word_boundary_without_sentence_end() {
        let text = "palavra ".repeat(40);

        let reply = clean_output(&text, "Rafael").unwrap();

        assert!(reply.chars().count() <= 200);
        assert!(reply.ends_with("palavra"));
    }

    #[test]
    fn test_hard_cut_without_any_boundary() {
        let text = "a".repeat(300);

        let reply = clean_output(&text, "Rafael").unwrap();

        assert_eq!(reply.chars().count(), 200);
    }

    #[test]
    fn test_early_sentence_end_is_ignored() {
        let text = format!("oi. {}", "bla ".repeat(80));

        let reply = clean_output(&text, "Rafael").unwrap();

        assert!(reply.chars().count() > MIN_SENTENCE_CUT);
        assert!(reply.ends_with("bla"));
    }
}
