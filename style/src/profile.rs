//! The style profile data model and its prompt rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Dominant letter-case habit across a person's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CapitalizationStyle {
    /// More than 60% of messages carry no uppercase letters.
    Lowercase,
    /// More than 20% of messages are written fully in caps.
    Uppercase,
    #[default]
    Normal,
}

/// Conversational context a reply was given in, used to key response starters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseContext {
    Greeting,
    Question,
    News,
    Request,
}

/// Real replies the person wrote, bucketed by what they were replying to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleResponses {
    pub to_questions: Vec<String>,
    pub to_greetings: Vec<String>,
    pub to_statements: Vec<String>,
}

impl SampleResponses {
    pub fn is_empty(&self) -> bool {
        self.to_questions.is_empty() && self.to_greetings.is_empty() && self.to_statements.is_empty()
    }
}

/// Short messages the person wrote while in a recognizable emotional register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionalPhrases {
    pub happy: Vec<String>,
    pub sad: Vec<String>,
    pub excited: Vec<String>,
    pub frustrated: Vec<String>,
}

/// Aggregated linguistic fingerprint of one person's self-authored messages.
///
/// Derived data: rebuilt wholesale from history, never edited directly.
/// `Default` is the documented fallback when no self-authored messages exist
/// (neutral formality 0.5, normal capitalization, everything else empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Number of self-authored messages the profile was built from.
    pub message_count: usize,
    pub avg_chars_per_message: f64,
    pub avg_words_per_message: f64,
    /// Fraction of messages containing at least one emoji, in [0, 1].
    pub emoji_frequency: f64,
    /// Canonical form of the dominant laugh token ("kkkk", "haha", ...).
    pub laugh_style: Option<String>,
    /// Formal hits / (formal + casual hits), in [0, 1]. 0.5 when no signal.
    pub formality: f64,
    pub capitalization: CapitalizationStyle,
    pub uses_abbreviations: bool,
    /// True when at least 30% of messages end in sentence punctuation.
    pub uses_punctuation: bool,
    /// True when elongations like "nãooo" show up outside laugh tokens.
    pub repeats_letters: bool,
    /// True when "!!" / "??" style runs show up repeatedly.
    pub uses_multi_punctuation: bool,
    pub abbreviations: Vec<String>,
    pub filler_words: Vec<String>,
    pub interjections: Vec<String>,
    pub affirmations: Vec<String>,
    pub negations: Vec<String>,
    pub top_words: Vec<String>,
    pub common_phrases: Vec<String>,
    pub sentence_starters: Vec<String>,
    pub sentence_endings: Vec<String>,
    pub greetings: Vec<String>,
    pub closings: Vec<String>,
    pub favorite_emojis: Vec<String>,
    /// Whole short messages the person repeats verbatim.
    pub signature_phrases: Vec<String>,
    /// Leading token bigrams of questions the person asks.
    pub question_patterns: Vec<String>,
    /// English loanwords mixed into Portuguese text.
    pub english_words: Vec<String>,
    /// Common words the person structurally avoids.
    pub never_uses: Vec<String>,
    pub sample_responses: SampleResponses,
    pub emotional_phrases: EmotionalPhrases,
    /// First words of past replies, keyed by the context they answered.
    pub response_starters: HashMap<ResponseContext, Vec<String>>,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            message_count: 0,
            avg_chars_per_message: 0.0,
            avg_words_per_message: 0.0,
            emoji_frequency: 0.0,
            laugh_style: None,
            formality: 0.5,
            capitalization: CapitalizationStyle::Normal,
            uses_abbreviations: false,
            uses_punctuation: false,
            repeats_letters: false,
            uses_multi_punctuation: false,
            abbreviations: Vec::new(),
            filler_words: Vec::new(),
            interjections: Vec::new(),
            affirmations: Vec::new(),
            negations: Vec::new(),
            top_words: Vec::new(),
            common_phrases: Vec::new(),
            sentence_starters: Vec::new(),
            sentence_endings: Vec::new(),
            greetings: Vec::new(),
            closings: Vec::new(),
            favorite_emojis: Vec::new(),
            signature_phrases: Vec::new(),
            question_patterns: Vec::new(),
            english_words: Vec::new(),
            never_uses: Vec::new(),
            sample_responses: SampleResponses::default(),
            emotional_phrases: EmotionalPhrases::default(),
            response_starters: HashMap::new(),
        }
    }
}

impl StyleProfile {
    /// Renders the profile as instruction lines for the generation prompt.
    ///
    /// Empty signals are skipped; a default profile renders only the
    /// length, tone, punctuation and emoji lines.
    pub fn describe(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!(
            "Typical message length: about {} words ({} characters).",
            self.avg_words_per_message.round().max(1.0) as usize,
            self.avg_chars_per_message.round().max(1.0) as usize,
        ));

        let tone = if self.formality < 0.35 {
            "very casual"
        } else if self.formality < 0.5 {
            "casual"
        } else if self.formality > 0.65 {
            "formal"
        } else {
            "neutral"
        };
        lines.push(format!("Overall tone: {}.", tone));

        match self.capitalization {
            CapitalizationStyle::Lowercase => {
                lines.push("Writes almost everything in lowercase, including sentence starts.".to_string());
            }
            CapitalizationStyle::Uppercase => {
                lines.push("Often writes whole messages in caps.".to_string());
            }
            CapitalizationStyle::Normal => {}
        }

        if self.uses_punctuation {
            lines.push("Usually ends messages with punctuation.".to_string());
        } else {
            lines.push("Usually skips final punctuation.".to_string());
        }
        if self.uses_multi_punctuation {
            lines.push("Sometimes doubles punctuation for emphasis (\"!!\", \"??\").".to_string());
        }
        if self.repeats_letters {
            lines.push("Sometimes stretches letters for emphasis (\"nãooo\").".to_string());
        }

        if let Some(laugh) = &self.laugh_style {
            lines.push(format!("Laughs in writing as \"{}\".", laugh));
        }

        if self.emoji_frequency > 0.05 && !self.favorite_emojis.is_empty() {
            lines.push(format!(
                "Uses emoji in roughly {}% of messages, favorites: {}.",
                (self.emoji_frequency * 100.0).round() as usize,
                self.favorite_emojis.join(" "),
            ));
        } else if self.emoji_frequency <= 0.05 {
            lines.push("Rarely uses emoji.".to_string());
        }

        if self.uses_abbreviations && !self.abbreviations.is_empty() {
            lines.push(format!(
                "Uses chat abbreviations like: {}.",
                self.abbreviations.join(", ")
            ));
        }
        if !self.filler_words.is_empty() {
            lines.push(format!("Common fillers: {}.", self.filler_words.join(", ")));
        }
        if !self.interjections.is_empty() {
            lines.push(format!(
                "Common interjections: {}.",
                self.interjections.join(", ")
            ));
        }
        if !self.affirmations.is_empty() {
            lines.push(format!(
                "Says yes with: {}.",
                self.affirmations.join(", ")
            ));
        }
        if !self.negations.is_empty() {
            lines.push(format!("Says no with: {}.", self.negations.join(", ")));
        }
        if !self.common_phrases.is_empty() {
            lines.push(format!(
                "Recurring phrases: {}.",
                self.common_phrases.join("; ")
            ));
        }
        if !self.signature_phrases.is_empty() {
            lines.push(format!(
                "Signature lines used verbatim: {}.",
                self.signature_phrases.join("; ")
            ));
        }
        if !self.greetings.is_empty() {
            lines.push(format!("Greets with: {}.", self.greetings.join(", ")));
        }
        if !self.closings.is_empty() {
            lines.push(format!("Signs off with: {}.", self.closings.join(", ")));
        }
        if !self.english_words.is_empty() {
            lines.push(format!(
                "Mixes English words into Portuguese: {}.",
                self.english_words.join(", ")
            ));
        }
        if !self.sentence_starters.is_empty() {
            lines.push(format!(
                "Often starts messages with: {}.",
                self.sentence_starters.join(", ")
            ));
        }

        lines
            .iter()
            .map(|l| format!("- {}", l))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
