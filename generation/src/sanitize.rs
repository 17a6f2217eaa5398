//! Neutralizes prompt-injection attempts in incoming messages.
//!
//! Incoming text is untrusted: anyone who messages the user can try to smuggle
//! instructions into the prompt. Known injection phrases and prompt-format
//! tokens are stripped before the text gets anywhere near the backend.

use lazy_static::lazy_static;
use regex::Regex;

/// Phrases and tokens removed from incoming text. Matched case-insensitively;
/// longer variants must come before their prefixes.
const INJECTION_MARKERS: &[&str] = &[
    "ignore all previous instructions",
    "ignore previous instructions",
    "ignore all prior instructions",
    "ignore the instructions above",
    "disregard all previous instructions",
    "disregard previous instructions",
    "forget all previous instructions",
    "forget previous instructions",
    "ignore todas as instruções anteriores",
    "ignore as instruções anteriores",
    "esqueça as instruções anteriores",
    "esqueça tudo que te falaram",
    "new instructions:",
    "novas instruções:",
    "system prompt",
    "you are now",
    "act as if you",
    "pretend you are",
    "pretend to be",
    "finja que você é",
    "agora você é",
    "<|im_start|>",
    "<|im_end|>",
    "<system>",
    "</system>",
    "[system]",
    "[assistant]",
    "[user]",
    "```",
    "###",
    "---",
];

/// Longest incoming message forwarded to the prompt, in characters.
const MAX_INCOMING_CHARS: usize = 500;

lazy_static! {
    static ref INJECTION: Regex = {
        let alternation = INJECTION_MARKERS
            .iter()
            .map(|marker| regex::escape(marker))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i){}", alternation)).unwrap()
    };
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strips injection markers, collapses whitespace and truncates to
/// [`MAX_INCOMING_CHARS`] characters. Returns an empty string when the
/// message was nothing but markers.
pub fn sanitize_incoming(text: &str) -> String {
    let stripped = INJECTION.replace_all(text, " ");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let trimmed = collapsed.trim();

    if trimmed.chars().count() <= MAX_INCOMING_CHARS {
        trimmed.to_string()
    } else {
        trimmed.chars().take(MAX_INCOMING_CHARS).collect()
    }
}
