//! Display duration derived from how long the text takes to read.
//!
//! Clients' requested timeouts only decide whether a notification is
//! persistent (`0`). Otherwise the duration is
//! `2000 + max(60000 * chars / 6 / 250, 3000)` milliseconds, so nothing is
//! shown for less than five seconds.

use serde::Serialize;

pub const AVERAGE_WORD_LENGTH: u64 = 6;
pub const WORDS_PER_MINUTE: u64 = 250;
const BASE_DELAY_MS: u64 = 2000;
const MIN_READING_TIME_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayDuration {
    pub timeout_ms: u32,
    /// The client asked for the notification to stay until dismissed.
    pub persistent: bool,
}

pub fn estimate(summary_len: usize, body_len: usize, requested_timeout: i32) -> DisplayDuration {
    let total = summary_len.saturating_add(body_len) as u64;
    let reading_ms = 60_000u64.saturating_mul(total) / AVERAGE_WORD_LENGTH / WORDS_PER_MINUTE;
    let timeout_ms = BASE_DELAY_MS.saturating_add(reading_ms.max(MIN_READING_TIME_MS));

    DisplayDuration {
        timeout_ms: u32::try_from(timeout_ms).unwrap_or(u32::MAX),
        persistent: requested_timeout == 0,
    }
}

/// Text length as the estimator counts it: Unicode scalar values, not bytes
/// and not UTF-16 code units. A character outside the Basic Multilingual
/// Plane (most emoji) counts once, not twice.
pub fn text_length(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 5, 5000, false)]
    #[case(0, 0, -1, 5000, false)]
    #[case(10, 65, -1, 5000, false)] // 3000 ms of reading time is exactly the floor
    #[case(10, 66, -1, 5040, false)]
    #[case(600, 600, 0, 50000, true)]
    #[case(600, 600, 7000, 50000, false)]
    fn estimate_cases(
        #[case] summary_len: usize,
        #[case] body_len: usize,
        #[case] requested: i32,
        #[case] timeout_ms: u32,
        #[case] persistent: bool,
    ) {
        assert_eq!(
            estimate(summary_len, body_len, requested),
            DisplayDuration { timeout_ms, persistent }
        );
    }

    #[test]
    fn persistence_ignores_text_length() {
        for len in [0, 1, 100, 10_000] {
            assert!(estimate(len, len, 0).persistent);
            assert!(!estimate(len, len, 1).persistent);
        }
    }

    #[test]
    fn huge_text_saturates() {
        assert_eq!(estimate(usize::MAX, usize::MAX, -1).timeout_ms, u32::MAX);
    }

    #[test]
    fn length_counts_characters() {
        assert_eq!(text_length("héllo"), 5);
        assert_eq!(text_length(""), 0);
        // Astral-plane characters count once.
        assert_eq!(text_length("\u{1F600}\u{1F600}"), 2);
    }
}
