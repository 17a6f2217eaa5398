//! Grouping of chronological messages into embeddable units.

use chrono::Duration;
use doppel_core::{Message, Sender};

/// Minutes of silence that close the current thread.
pub const THREAD_GAP_MINUTES: i64 = 30;
/// A thread closes once it holds this many messages.
pub const THREAD_MAX_TURNS: usize = 8;
/// Threads shorter than this are dropped; they carry too little context.
pub const THREAD_MIN_TURNS: usize = 4;

/// Splits a chronological message slice into conversation threads.
///
/// Messages accumulate into the current thread until the gap since the
/// previous message exceeds [`THREAD_GAP_MINUTES`] or the thread reaches
/// [`THREAD_MAX_TURNS`]; runs shorter than [`THREAD_MIN_TURNS`] are discarded.
pub fn build_threads(messages: &[Message]) -> Vec<Vec<Message>> {
    let mut threads = Vec::new();
    let mut current: Vec<Message> = Vec::new();

    for message in messages {
        let gap_exceeded = current.last().map_or(false, |previous: &Message| {
            message.timestamp - previous.timestamp > Duration::minutes(THREAD_GAP_MINUTES)
        });

        if gap_exceeded || current.len() >= THREAD_MAX_TURNS {
            if current.len() >= THREAD_MIN_TURNS {
                threads.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }

        current.push(message.clone());
    }

    if current.len() >= THREAD_MIN_TURNS {
        threads.push(current);
    }

    threads
}

/// Derives legacy (their message, the user's immediate reply) pairs from a
/// chronological message slice.
pub fn build_pairs(messages: &[Message]) -> Vec<(Message, Message)> {
    messages
        .windows(2)
        .filter(|pair| pair[0].sender == Sender::Them && pair[1].sender == Sender::Me)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn message(id: &str, sender: Sender, minute: i64) -> Message {
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 14, 0, 0).unwrap();
        Message::new(
            id,
            "ana",
            sender,
            format!("mensagem {}", id),
            base + Duration::minutes(minute),
        )
    }

    #[test]
    fn test_close_run_becomes_one_thread() {
        let messages: Vec<Message> = (0..5)
            .map(|i| message(&format!("m{}", i), Sender::Them, i))
            .collect();

        let threads = build_threads(&messages);

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].len(), 5);
    }

    #[test]
    fn test_gap_splits_threads() {
        let mut messages: Vec<Message> = (0..4)
            .map(|i| message(&format!("a{}", i), Sender::Them, i))
            .collect();
        // 40 minutes of silence, then a second run.
        messages.extend((0..4).map(|i| message(&format!("b{}", i), Sender::Me, 44 + i)));

        let threads = build_threads(&messages);

        assert_eq!(threads.len(), 2);
        assert_eq!(threads[0][0].id, "a0");
        assert_eq!(threads[1][0].id, "b0");
    }

    #[test]
    fn test_max_size_closes_thread() {
        let messages: Vec<Message> = (0..10)
            .map(|i| message(&format!("m{}", i), Sender::Them, i))
            .collect();

        let threads = build_threads(&messages);

        // First thread closes at 8; the 2-message tail is below the minimum.
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].len(), 8);
    }

    #[test]
    fn test_short_runs_are_discarded() {
        let mut messages = vec![
            message("a0", Sender::Them, 0),
            message("a1", Sender::Me, 1),
        ];
        messages.push(message("b0", Sender::Them, 60));
        messages.push(message("b1", Sender::Me, 61));

        assert!(build_threads(&messages).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_threads(&[]).is_empty());
        assert!(build_pairs(&[]).is_empty());
    }

    #[test]
    fn test_pairs_require_them_then_me() {
        let messages = vec![
            message("m0", Sender::Me, 0),
            message("m1", Sender::Them, 1),
            message("m2", Sender::Them, 2),
            message("m3", Sender::Me, 3),
            message("m4", Sender::Me, 4),
        ];

        let pairs = build_pairs(&messages);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.id, "m2");
        assert_eq!(pairs[0].1.id, "m3");
    }
}
