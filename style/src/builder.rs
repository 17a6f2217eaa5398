//! Builds a [`StyleProfile`] from raw message history.
//!
//! Pure computation over a message slice, no I/O. Everything except sample
//! selection is deterministic; sample selection takes an injectable seed so
//! tests can pin it down.

use std::collections::HashMap;

use doppel_core::Message;
use lazy_static::lazy_static;
use lexicon::{
    closing_prefix, contains_emoji, extract_emojis, greeting_prefix, is_acknowledgment,
    is_greeting, is_question, tokenize, ABBREVIATIONS, AFFIRMATION_CANDIDATES, CASUAL_INDICATORS,
    COMMON_WORD_CANDIDATES, EMOTION_EXCITED, EMOTION_FRUSTRATED, EMOTION_HAPPY, EMOTION_SAD,
    ENGLISH_LOANWORDS, FILLER_CANDIDATES, FORMAL_INDICATORS, INTERJECTION_CANDIDATES,
    LAUGH_PATTERNS, NEGATION_CANDIDATES, STOPWORDS,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;

use crate::profile::{
    CapitalizationStyle, EmotionalPhrases, ResponseContext, SampleResponses, StyleProfile,
};

lazy_static! {
    static ref MULTI_PUNCT: Regex = Regex::new(r"[!?]{2,}").unwrap();
}

/// Fraction of no-uppercase messages above which the style is Lowercase.
const LOWERCASE_THRESHOLD: f64 = 0.6;
/// Fraction of all-caps messages above which the style is Uppercase.
const UPPERCASE_THRESHOLD: f64 = 0.2;
/// Fraction of punctuation-terminated messages above which uses_punctuation holds.
const PUNCTUATION_THRESHOLD: f64 = 0.3;
/// Minimum occurrences for the small ranked lists (fillers, emojis, starters).
const MIN_SMALL_LIST: usize = 2;
/// Minimum occurrences for the broad ranked lists (top words, phrases).
const MIN_TOP_LIST: usize = 3;
const MAX_NEVER_USES: usize = 15;
const MAX_SAMPLES_PER_BUCKET: usize = 5;
const MAX_SAMPLE_CHARS: usize = 200;
const MAX_EMOTIONAL_CHARS: usize = 60;

/// Extracts a [`StyleProfile`] from a correspondent's message slice.
///
/// Only `Sender::Me` messages feed the statistics; Them messages are read
/// solely to pair replies with what they answered.
#[derive(Debug, Clone, Default)]
pub struct StyleProfileBuilder {
    seed: Option<u64>,
}

impl StyleProfileBuilder {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Pins sample-response selection to a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the profile. Returns [`StyleProfile::default`] when the slice
    /// holds no self-authored messages.
    pub fn build(&self, messages: &[Message]) -> StyleProfile {
        let own: Vec<&str> = messages
            .iter()
            .filter(|m| m.is_me())
            .map(|m| m.content.as_str())
            .collect();
        if own.is_empty() {
            return StyleProfile::default();
        }

        let lowered: Vec<String> = own.iter().map(|t| t.to_lowercase()).collect();
        let tokenized: Vec<Vec<String>> = own.iter().map(|t| tokenize(t)).collect();
        let mut token_counts: HashMap<String, usize> = HashMap::new();
        for tokens in &tokenized {
            for tok in tokens {
                *token_counts.entry(tok.clone()).or_insert(0) += 1;
            }
        }

        let total = own.len() as f64;
        let avg_chars_per_message =
            own.iter().map(|t| t.chars().count()).sum::<usize>() as f64 / total;
        let avg_words_per_message =
            own.iter().map(|t| t.split_whitespace().count()).sum::<usize>() as f64 / total;
        let emoji_frequency = own.iter().filter(|t| contains_emoji(t)).count() as f64 / total;

        let (laugh_style, laugh_hits) = dominant_laugh(&own);
        let formality = formality_score(&token_counts, &lowered, laugh_hits);
        let capitalization = dominant_capitalization(&own);

        let abbreviation_counts = candidate_counts(ABBREVIATIONS, &token_counts, &lowered);
        let uses_abbreviations = abbreviation_counts.values().sum::<usize>() >= MIN_SMALL_LIST;

        let punctuated = own
            .iter()
            .filter(|t| t.trim_end().ends_with(['.', '!', '?']))
            .count();
        let uses_punctuation = punctuated as f64 / total >= PUNCTUATION_THRESHOLD;

        let repeats_letters = own
            .iter()
            .filter(|t| has_letter_run(&strip_laughs(t), 3))
            .count()
            >= 2;
        let uses_multi_punctuation =
            own.iter().filter(|t| MULTI_PUNCT.is_match(t)).count() >= 2;

        let filler_words = ranked(
            &candidate_counts(FILLER_CANDIDATES, &token_counts, &lowered),
            MIN_SMALL_LIST,
            5,
        );
        let interjections = ranked(
            &candidate_counts(INTERJECTION_CANDIDATES, &token_counts, &lowered),
            MIN_SMALL_LIST,
            5,
        );
        let affirmations = ranked(
            &candidate_counts(AFFIRMATION_CANDIDATES, &token_counts, &lowered),
            MIN_SMALL_LIST,
            5,
        );
        let negations = ranked(
            &candidate_counts(NEGATION_CANDIDATES, &token_counts, &lowered),
            MIN_SMALL_LIST,
            5,
        );
        let english_words = ranked(
            &candidate_counts(ENGLISH_LOANWORDS, &token_counts, &lowered),
            MIN_SMALL_LIST,
            8,
        );
        let abbreviations = ranked(&abbreviation_counts, MIN_SMALL_LIST, 8);

        let top_words = ranked(&content_word_counts(&token_counts), MIN_TOP_LIST, 10);
        let common_phrases = ranked(&ngram_counts(&tokenized), MIN_TOP_LIST, 8);
        let signature_phrases = ranked(&signature_counts(&own), MIN_TOP_LIST, 5);

        let mut starter_counts: HashMap<String, usize> = HashMap::new();
        let mut ending_counts: HashMap<String, usize> = HashMap::new();
        for tokens in &tokenized {
            if let Some(first) = tokens.first() {
                *starter_counts.entry(first.clone()).or_insert(0) += 1;
            }
            if tokens.len() > 1 {
                if let Some(last) = tokens.last() {
                    *ending_counts.entry(last.clone()).or_insert(0) += 1;
                }
            }
        }
        let sentence_starters = ranked(&starter_counts, MIN_SMALL_LIST, 5);
        let sentence_endings = ranked(&ending_counts, MIN_SMALL_LIST, 5);

        let mut greeting_counts: HashMap<String, usize> = HashMap::new();
        let mut closing_counts: HashMap<String, usize> = HashMap::new();
        let mut question_counts: HashMap<String, usize> = HashMap::new();
        for text in &own {
            if let Some(g) = greeting_prefix(text) {
                *greeting_counts.entry(g.to_string()).or_insert(0) += 1;
            }
            if let Some(c) = closing_prefix(text) {
                *closing_counts.entry(c.to_string()).or_insert(0) += 1;
            }
        }
        // Classify on the raw text: tokenizing first would drop the `?`.
        for (text, tokens) in own.iter().zip(&tokenized) {
            if tokens.len() >= 2 && is_question(text) {
                *question_counts
                    .entry(format!("{} {}", tokens[0], tokens[1]))
                    .or_insert(0) += 1;
            }
        }
        let greetings = ranked(&greeting_counts, MIN_SMALL_LIST, 5);
        let closings = ranked(&closing_counts, MIN_SMALL_LIST, 5);
        let question_patterns = ranked(&question_counts, MIN_SMALL_LIST, 5);

        let mut emoji_counts: HashMap<String, usize> = HashMap::new();
        for text in &own {
            for emoji in extract_emojis(text) {
                *emoji_counts.entry(emoji).or_insert(0) += 1;
            }
        }
        let favorite_emojis = ranked(&emoji_counts, MIN_SMALL_LIST, 5);

        let never_uses = never_used_words(&token_counts, &lowered);
        let emotional_phrases = emotional_buckets(&own);

        let mut rng: StdRng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (sample_responses, response_starters) = response_patterns(messages, &mut rng);

        StyleProfile {
            message_count: own.len(),
            avg_chars_per_message,
            avg_words_per_message,
            emoji_frequency,
            laugh_style,
            formality,
            capitalization,
            uses_abbreviations,
            uses_punctuation,
            repeats_letters,
            uses_multi_punctuation,
            abbreviations,
            filler_words,
            interjections,
            affirmations,
            negations,
            top_words,
            common_phrases,
            sentence_starters,
            sentence_endings,
            greetings,
            closings,
            favorite_emojis,
            signature_phrases,
            question_patterns,
            english_words,
            never_uses,
            sample_responses,
            emotional_phrases,
            response_starters,
        }
    }
}

/// Counts ranked high-to-low, alphabetical tie-break, `min_count` floor.
fn ranked(counts: &HashMap<String, usize>, min_count: usize, top: usize) -> Vec<String> {
    let mut entries: Vec<(&String, &usize)> =
        counts.iter().filter(|(_, n)| **n >= min_count).collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries.into_iter().take(top).map(|(w, _)| w.clone()).collect()
}

/// Word-boundary occurrences of `phrase` in `text`; both must be lowercase.
fn phrase_hits(text: &str, phrase: &str) -> usize {
    text.match_indices(phrase)
        .filter(|(idx, _)| {
            let before_ok = text[..*idx]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = text[idx + phrase.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
        .count()
}

/// Occurrence counts for each candidate found at least once. Single-word
/// candidates hit the token index; multi-word ones scan the lowered texts.
fn candidate_counts(
    candidates: &[&str],
    token_counts: &HashMap<String, usize>,
    lowered: &[String],
) -> HashMap<String, usize> {
    let mut out = HashMap::new();
    for cand in candidates {
        let n = if cand.contains(' ') {
            lowered.iter().map(|t| phrase_hits(t, cand)).sum()
        } else {
            token_counts.get(*cand).copied().unwrap_or(0)
        };
        if n > 0 {
            out.insert(cand.to_string(), n);
        }
    }
    out
}

/// Highest-tally laugh canonical and the total match count across patterns.
/// Earlier patterns win ties.
fn dominant_laugh(own: &[&str]) -> (Option<String>, usize) {
    let mut tallies: Vec<(usize, &'static str)> = Vec::new();
    for (re, canon) in LAUGH_PATTERNS.iter() {
        let n: usize = own.iter().map(|t| re.find_iter(t).count()).sum();
        tallies.push((n, canon));
    }
    let total: usize = tallies.iter().map(|(n, _)| n).sum();
    let mut best: Option<(usize, &'static str)> = None;
    for (n, canon) in tallies {
        if n > 0 && best.map_or(true, |(bn, _)| n > bn) {
            best = Some((n, canon));
        }
    }
    (best.map(|(_, canon)| canon.to_string()), total)
}

/// Formal hits over all tone hits; laughs count toward the casual side.
/// 0.5 when nothing fires either way.
fn formality_score(
    token_counts: &HashMap<String, usize>,
    lowered: &[String],
    laugh_hits: usize,
) -> f64 {
    let formal: usize = candidate_counts(FORMAL_INDICATORS, token_counts, lowered)
        .values()
        .sum();
    let casual: usize = candidate_counts(CASUAL_INDICATORS, token_counts, lowered)
        .values()
        .sum::<usize>()
        + laugh_hits;
    if formal + casual == 0 {
        0.5
    } else {
        formal as f64 / (formal + casual) as f64
    }
}

fn dominant_capitalization(own: &[&str]) -> CapitalizationStyle {
    let mut lower = 0usize;
    let mut upper = 0usize;
    let mut lettered = 0usize;
    for text in own {
        let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
        if letters.is_empty() {
            continue;
        }
        lettered += 1;
        if letters.iter().all(|c| c.is_lowercase()) {
            lower += 1;
        } else if letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase()) {
            upper += 1;
        }
    }
    if lettered == 0 {
        return CapitalizationStyle::Normal;
    }
    let lettered = lettered as f64;
    if lower as f64 / lettered > LOWERCASE_THRESHOLD {
        CapitalizationStyle::Lowercase
    } else if upper as f64 / lettered > UPPERCASE_THRESHOLD {
        CapitalizationStyle::Uppercase
    } else {
        CapitalizationStyle::Normal
    }
}

/// Blanks out laugh tokens so elongation detection skips "kkkk" and friends.
fn strip_laughs(text: &str) -> String {
    let mut out = text.to_string();
    for (re, _) in LAUGH_PATTERNS.iter() {
        out = re.replace_all(&out, " ").into_owned();
    }
    out
}

/// True when the text has `min_run` identical alphabetic chars in a row.
fn has_letter_run(text: &str, min_run: usize) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for c in text.to_lowercase().chars() {
        if c.is_alphabetic() && prev == Some(c) {
            run += 1;
        } else {
            run = 1;
        }
        if c.is_alphabetic() && run >= min_run {
            return true;
        }
        prev = Some(c);
    }
    false
}

/// Token counts restricted to content words (3+ chars, no stopwords, no
/// pure numbers).
fn content_word_counts(token_counts: &HashMap<String, usize>) -> HashMap<String, usize> {
    token_counts
        .iter()
        .filter(|(tok, _)| {
            tok.chars().count() >= 3
                && !STOPWORDS.contains(&tok.as_str())
                && !tok.chars().all(|c| c.is_numeric())
        })
        .map(|(tok, n)| (tok.clone(), *n))
        .collect()
}

/// Bigram and trigram counts, skipping all-stopword windows.
fn ngram_counts(tokenized: &[Vec<String>]) -> HashMap<String, usize> {
    let mut out = HashMap::new();
    for tokens in tokenized {
        for n in 2..=3 {
            for win in tokens.windows(n) {
                if win.iter().all(|t| STOPWORDS.contains(&t.as_str())) {
                    continue;
                }
                *out.entry(win.join(" ")).or_insert(0) += 1;
            }
        }
    }
    out
}

/// Whole 2-4 word messages the person repeats verbatim, excluding greetings
/// and bare acknowledgments (those already have their own lists).
fn signature_counts(own: &[&str]) -> HashMap<String, usize> {
    let mut out = HashMap::new();
    for text in own {
        let trimmed = text.trim();
        let words = trimmed.split_whitespace().count();
        if !(2..=4).contains(&words) || is_greeting(trimmed) || is_acknowledgment(trimmed) {
            continue;
        }
        *out.entry(trimmed.to_lowercase()).or_insert(0) += 1;
    }
    out
}

/// Common-word candidates with zero occurrences, in table order.
fn never_used_words(token_counts: &HashMap<String, usize>, lowered: &[String]) -> Vec<String> {
    COMMON_WORD_CANDIDATES
        .iter()
        .filter(|cand| {
            if cand.contains(' ') {
                lowered.iter().all(|t| phrase_hits(t, cand) == 0)
            } else {
                !token_counts.contains_key(**cand)
            }
        })
        .take(MAX_NEVER_USES)
        .map(|c| c.to_string())
        .collect()
}

fn emotional_buckets(own: &[&str]) -> EmotionalPhrases {
    let collect = |keywords: &[&str]| -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for text in own {
            let trimmed = text.trim();
            if trimmed.chars().count() > MAX_EMOTIONAL_CHARS {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if keywords.iter().any(|k| phrase_hits(&lower, k) > 0) {
                *counts.entry(trimmed.to_string()).or_insert(0) += 1;
            }
        }
        ranked(&counts, 1, 3)
    };
    EmotionalPhrases {
        happy: collect(EMOTION_HAPPY),
        sad: collect(EMOTION_SAD),
        excited: collect(EMOTION_EXCITED),
        frustrated: collect(EMOTION_FRUSTRATED),
    }
}

/// Scans adjacent Them→Me pairs for sample responses and contextual
/// response starters.
fn response_patterns(
    messages: &[Message],
    rng: &mut StdRng,
) -> (SampleResponses, HashMap<ResponseContext, Vec<String>>) {
    let mut to_questions: Vec<String> = Vec::new();
    let mut to_greetings: Vec<String> = Vec::new();
    let mut to_statements: Vec<String> = Vec::new();
    let mut starter_tallies: HashMap<ResponseContext, HashMap<String, usize>> = HashMap::new();
    let mut context_totals: HashMap<ResponseContext, usize> = HashMap::new();

    for win in messages.windows(2) {
        let (prev, reply) = (&win[0], &win[1]);
        if prev.is_me() || !reply.is_me() {
            continue;
        }
        let text = reply.content.trim();
        if text.is_empty() || text.chars().count() > MAX_SAMPLE_CHARS {
            continue;
        }

        if is_question(&prev.content) {
            to_questions.push(text.to_string());
        } else if is_greeting(&prev.content) {
            to_greetings.push(text.to_string());
        } else {
            to_statements.push(text.to_string());
        }

        if let Some(context) = classify_context(&prev.content) {
            let starter = text
                .split_whitespace()
                .take(3)
                .collect::<Vec<_>>()
                .join(" ");
            if !starter.is_empty() {
                *starter_tallies
                    .entry(context)
                    .or_default()
                    .entry(starter)
                    .or_insert(0) += 1;
                *context_totals.entry(context).or_insert(0) += 1;
            }
        }
    }

    let sample = |bucket: &[String], rng: &mut StdRng| -> Vec<String> {
        bucket
            .choose_multiple(rng, MAX_SAMPLES_PER_BUCKET)
            .cloned()
            .collect()
    };
    let samples = SampleResponses {
        to_questions: sample(&to_questions, rng),
        to_greetings: sample(&to_greetings, rng),
        to_statements: sample(&to_statements, rng),
    };

    let mut starters: HashMap<ResponseContext, Vec<String>> = HashMap::new();
    for (context, tallies) in starter_tallies {
        if context_totals.get(&context).copied().unwrap_or(0) >= MIN_SMALL_LIST {
            starters.insert(context, ranked(&tallies, 1, 5));
        }
    }
    (samples, starters)
}

fn classify_context(text: &str) -> Option<ResponseContext> {
    if is_question(text) {
        Some(ResponseContext::Question)
    } else if is_greeting(text) {
        Some(ResponseContext::Greeting)
    } else if lexicon::is_news(text) {
        Some(ResponseContext::News)
    } else if lexicon::is_request(text) {
        Some(ResponseContext::Request)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use doppel_core::Sender;

    fn msg(sender: Sender, content: &str, minute: i64) -> Message {
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap() + Duration::minutes(minute);
        Message::new(
            format!("m-{}-{}", minute, content.len()),
            "alice".to_string(),
            sender,
            content.to_string(),
            ts,
        )
    }

    fn me(content: &str, minute: i64) -> Message {
        msg(Sender::Me, content, minute)
    }

    fn them(content: &str, minute: i64) -> Message {
        msg(Sender::Them, content, minute)
    }

    #[test]
    fn test_no_self_messages_yields_default_profile() {
        let messages = vec![them("oi, tudo bem?", 0), them("vc sumiu", 1)];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert_eq!(profile, StyleProfile::default());
    }

    #[test]
    fn test_empty_slice_yields_default_profile() {
        let profile = StyleProfileBuilder::new().build(&[]);
        assert_eq!(profile, StyleProfile::default());
    }

    #[test]
    fn test_lowercase_style_detected() {
        let messages: Vec<Message> = (0..5)
            .map(|i| me("to indo pra casa agora", i))
            .chain(std::iter::once(me("Chego em dez minutos", 6)))
            .collect();
        let profile = StyleProfileBuilder::new().build(&messages);
        assert_eq!(profile.capitalization, CapitalizationStyle::Lowercase);
    }

    #[test]
    fn test_laugh_style_highest_tally_wins() {
        let messages = vec![
            me("kkkk demais", 0),
            me("kkkkk", 1),
            me("hahaha boa", 2),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert_eq!(profile.laugh_style.as_deref(), Some("kkkk"));
    }

    #[test]
    fn test_abbreviation_usage_and_ranking() {
        let messages = vec![
            me("vc vai hj?", 0),
            me("vc falou com ela", 1),
            me("blz, te vejo la", 2),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(profile.uses_abbreviations);
        assert_eq!(profile.abbreviations.first().map(|s| s.as_str()), Some("vc"));
    }

    #[test]
    fn test_formality_neutral_without_signal() {
        let messages = vec![me("cheguei em casa", 0), me("vou jantar agora", 1)];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!((profile.formality - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_formality_drops_with_casual_markers() {
        let messages = vec![
            me("blz mano, kkkk", 0),
            me("top demais cara", 1),
            me("bora mano", 2),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(profile.formality < 0.5);
    }

    #[test]
    fn test_letter_repetition_ignores_laughs() {
        let only_laughs = vec![me("kkkkk", 0), me("kkkk", 1), me("hahaha", 2)];
        let profile = StyleProfileBuilder::new().build(&only_laughs);
        assert!(!profile.repeats_letters);

        let stretched = vec![me("nãooo acredito", 0), me("simmm claro", 1)];
        let profile = StyleProfileBuilder::new().build(&stretched);
        assert!(profile.repeats_letters);
    }

    #[test]
    fn test_multi_punctuation_needs_two_messages() {
        let one = vec![me("sério??", 0), me("vou sim", 1)];
        assert!(!StyleProfileBuilder::new().build(&one).uses_multi_punctuation);

        let two = vec![me("sério??", 0), me("não!!", 1)];
        assert!(StyleProfileBuilder::new().build(&two).uses_multi_punctuation);
    }

    #[test]
    fn test_punctuation_threshold() {
        let messages = vec![
            me("cheguei.", 0),
            me("vou sair agora.", 1),
            me("depois te falo", 2),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(profile.uses_punctuation);
    }

    #[test]
    fn test_never_uses_reports_absent_formal_connectives() {
        let messages = vec![me("to chegando", 0), me("bora la", 1)];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(profile.never_uses.contains(&"portanto".to_string()));
        assert!(profile.never_uses.len() <= 15);
    }

    #[test]
    fn test_never_uses_excludes_words_actually_used() {
        let messages = vec![me("portanto vamos", 0), me("portanto sim", 1)];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(!profile.never_uses.contains(&"portanto".to_string()));
    }

    #[test]
    fn test_sample_responses_bucketed_by_preceding_message() {
        let messages = vec![
            them("vc viu o jogo?", 0),
            me("vi sim, que jogo", 1),
            them("bom dia", 10),
            me("bom diaa", 11),
            them("comprei um carro novo", 20),
            me("que legal, qual", 21),
        ];
        let profile = StyleProfileBuilder::new().with_seed(7).build(&messages);
        assert_eq!(
            profile.sample_responses.to_questions,
            vec!["vi sim, que jogo".to_string()]
        );
        assert_eq!(
            profile.sample_responses.to_greetings,
            vec!["bom diaa".to_string()]
        );
        assert_eq!(
            profile.sample_responses.to_statements,
            vec!["que legal, qual".to_string()]
        );
    }

    #[test]
    fn test_sampling_is_deterministic_with_seed() {
        let messages: Vec<Message> = (0..40)
            .flat_map(|i| {
                vec![
                    them(&format!("pergunta numero {}?", i), i * 2),
                    me(&format!("resposta numero {}", i), i * 2 + 1),
                ]
            })
            .collect();
        let a = StyleProfileBuilder::new().with_seed(42).build(&messages);
        let b = StyleProfileBuilder::new().with_seed(42).build(&messages);
        assert_eq!(a.sample_responses, b.sample_responses);
        assert_eq!(a.sample_responses.to_questions.len(), 5);
    }

    #[test]
    fn test_response_starters_require_two_occurrences() {
        let messages = vec![
            them("vc vai no show?", 0),
            me("vou sim", 1),
            them("vc viu isso?", 10),
            me("vou olhar agora", 11),
            them("bom dia", 20),
            me("opa bom dia", 21),
        ];
        let profile = StyleProfileBuilder::new().with_seed(1).build(&messages);
        let question_starters = profile
            .response_starters
            .get(&ResponseContext::Question)
            .cloned()
            .unwrap_or_default();
        assert!(!question_starters.is_empty());
        // one greeting reply is below the bucket floor
        assert!(!profile
            .response_starters
            .contains_key(&ResponseContext::Greeting));
    }

    #[test]
    fn test_favorite_emojis_and_frequency() {
        let messages = vec![
            me("boa 😂", 0),
            me("😂 demais", 1),
            me("sem emoji", 2),
            me("tranquilo", 3),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert_eq!(profile.favorite_emojis, vec!["😂".to_string()]);
        assert!((profile.emoji_frequency - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_top_words_skip_stopwords() {
        let messages = vec![
            me("o projeto ficou pronto", 0),
            me("o projeto atrasou de novo", 1),
            me("finalizando o projeto hoje", 2),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert_eq!(profile.top_words.first().map(|s| s.as_str()), Some("projeto"));
        assert!(!profile.top_words.contains(&"o".to_string()));
    }

    #[test]
    fn test_question_patterns_capture_mark_only_questions() {
        let messages = vec![
            me("vai no festival sábado?", 0),
            me("vai no festival sábado?", 1),
            me("tudo bem?", 2),
            me("tudo bem?", 3),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(profile.question_patterns.contains(&"vai no".to_string()));
        assert!(profile.question_patterns.contains(&"tudo bem".to_string()));
    }

    #[test]
    fn test_question_patterns_keep_question_word_leads() {
        let messages = vec![
            me("onde fica o novo escritório", 0),
            me("onde fica a casa dela", 1),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert_eq!(profile.question_patterns, vec!["onde fica".to_string()]);
    }

    #[test]
    fn test_signature_phrases_skip_greetings() {
        let messages = vec![
            me("pode crer mano", 0),
            me("pode crer mano", 1),
            me("pode crer mano", 2),
            me("bom dia gente", 3),
            me("bom dia gente", 4),
            me("bom dia gente", 5),
        ];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!(profile
            .signature_phrases
            .contains(&"pode crer mano".to_string()));
        assert!(!profile
            .signature_phrases
            .contains(&"bom dia gente".to_string()));
    }

    #[test]
    fn test_average_lengths() {
        let messages = vec![me("ab", 0), me("abcd", 1)];
        let profile = StyleProfileBuilder::new().build(&messages);
        assert!((profile.avg_chars_per_message - 3.0).abs() < 1e-9);
        assert!((profile.avg_words_per_message - 1.0).abs() < 1e-9);
        assert_eq!(profile.message_count, 2);
    }
}
