//! Emoji detection over explicit Unicode ranges. No external emoji crate;
//! the ranges below cover the blocks that show up in chat exports.

const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F300, 0x1F5FF), // symbols & pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport & map
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1FA70, 0x1FAFF), // extended-A
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
    (0x1F1E6, 0x1F1FF), // regional indicators
];

/// True when `c` falls in one of the emoji blocks.
pub fn is_emoji_char(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// True when the text contains at least one emoji.
pub fn contains_emoji(text: &str) -> bool {
    text.chars().any(is_emoji_char)
}

/// All emoji in `text`, in order, one `String` per scalar value.
pub fn extract_emojis(text: &str) -> Vec<String> {
    text.chars()
        .filter(|c| is_emoji_char(*c))
        .map(|c| c.to_string())
        .collect()
}
