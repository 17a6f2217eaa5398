//! # Lexicon
//!
//! One source of truth for the word tables and text classifiers shared by the
//! style extractor and the decision engine. Tables are bilingual (Brazilian
//! Portuguese + English) to match the message data they run against.

mod emoji;
mod tables;

pub use emoji::{contains_emoji, extract_emojis, is_emoji_char};
pub use tables::*;

use lazy_static::lazy_static;
use regex::Regex;

/// Bump when table contents change in a way consumers may cache against.
pub const LEXICON_VERSION: u32 = 1;

lazy_static! {
    /// Ordered laugh patterns; earlier entries win ties. Each maps to the
    /// canonical token the style profile reports.
    pub static ref LAUGH_PATTERNS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)k{3,}").unwrap(), "kkkk"),
        (Regex::new(r"(?i)(?:ha){2,}h?").unwrap(), "haha"),
        (Regex::new(r"(?i)(?:he){2,}h?").unwrap(), "hehe"),
        (Regex::new(r"(?i)(?:hi){2,}h?").unwrap(), "hihi"),
        (Regex::new(r"(?i)(?:ks){2,}k?").unwrap(), "ksksks"),
        (Regex::new(r"(?i)\brs(?:rs)*\b").unwrap(), "rsrs"),
        (Regex::new(r"(?i)\blo+l\b").unwrap(), "lol"),
        (Regex::new(r"(?i)\blmao\b").unwrap(), "lmao"),
    ];

    static ref LAUGH_ONLY: Regex = Regex::new(
        r"(?i)^(?:[ks]{2,}|(?:ha){2,}h?|(?:he){2,}h?|(?:hi){2,}h?|rs(?:rs)*|lo+l|lmao)[!.]*$"
    )
    .unwrap();

    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();
}

/// Lowercased word tokens of `text` (letters and digits only).
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True when the whole message is a laugh token ("kkkk", "hahaha", "rs"...).
pub fn is_laugh_only(text: &str) -> bool {
    LAUGH_ONLY.is_match(text.trim())
}

/// True for bare acknowledgments and short reactions: laugh-only messages,
/// a single emoji, or up to two tokens drawn from the acknowledgment table.
pub fn is_acknowledgment(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    if is_laugh_only(trimmed) {
        return true;
    }
    let mut chars = trimmed.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if is_emoji_char(c) {
            return true;
        }
    }
    let tokens = tokenize(trimmed);
    !tokens.is_empty()
        && tokens.len() <= 2
        && tokens
            .iter()
            .all(|t| ACKNOWLEDGMENTS.contains(&t.as_str()) || is_laugh_only(t))
}

/// True when the message asks a question: trailing `?` or a leading question
/// word from the shared table.
pub fn is_question(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.ends_with('?') {
        return true;
    }
    tokenize(trimmed)
        .first()
        .map(|w| QUESTION_WORDS.contains(&w.as_str()))
        .unwrap_or(false)
}

fn starts_with_phrase(text: &str, phrase: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if !lower.starts_with(phrase) {
        return false;
    }
    match lower[phrase.len()..].chars().next() {
        None => true,
        Some(c) => !c.is_alphanumeric(),
    }
}

/// The greeting lexeme the message opens with, if any.
pub fn greeting_prefix(text: &str) -> Option<&'static str> {
    GREETINGS
        .iter()
        .find(|g| starts_with_phrase(text, g))
        .copied()
}

/// True when the message opens with a greeting from the shared table.
pub fn is_greeting(text: &str) -> bool {
    greeting_prefix(text).is_some()
}

/// The closing lexeme the message opens with, if any.
pub fn closing_prefix(text: &str) -> Option<&'static str> {
    CLOSINGS
        .iter()
        .find(|c| starts_with_phrase(text, c))
        .copied()
}

/// True when the message opens with (or is) a closing/farewell token.
pub fn is_closing(text: &str) -> bool {
    closing_prefix(text).is_some()
}

/// True when the message carries a request / call-to-action marker.
pub fn is_request(text: &str) -> bool {
    let lower = text.to_lowercase();
    REQUEST_MARKERS.iter().any(|m| {
        if m.contains(' ') {
            lower.contains(m)
        } else {
            tokenize(&lower).iter().any(|t| t == m)
        }
    })
}

/// True when the message announces news ("sabia que...", "guess what").
pub fn is_news(text: &str) -> bool {
    let lower = text.to_lowercase();
    NEWS_MARKERS.iter().any(|m| lower.contains(m))
}

/// True when the message tail invites a reply ("...e você", "né", "and you").
pub fn invites_reply(text: &str) -> bool {
    let lower = text
        .trim()
        .trim_end_matches(['?', '!', '.', ' '])
        .to_lowercase();
    REPLY_INVITERS
        .iter()
        .any(|m| lower.ends_with(m) || lower == *m)
}
