//! Transcript signals: negative-indicator phrases and word-count tone.
//!
//! Matching is case-insensitive plain substring containment. No tokenizing,
//! no stemming: "can't" matches as written and "pain" also matches inside
//! "sharp pain" or "painful".

use crate::models::SentimentLabel;

/// Negative-indicator phrases, in reporting order.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "sharp pain",
    "barely",
    "severe",
    "worse",
    "can't",
    "difficulty",
    "unable",
];

pub const POSITIVE_WORDS: &[&str] = &["fine", "good", "better", "well", "improving"];

pub const NEGATIVE_WORDS: &[&str] = &["pain", "worse", "difficult", "can't", "barely"];

/// Word-list tally for one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneCounts {
    pub positive: usize,
    pub negative: usize,
}

impl ToneCounts {
    pub fn label(&self) -> SentimentLabel {
        if self.negative > self.positive {
            SentimentLabel::Negative
        } else if self.positive > self.negative {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Negative-indicator phrases present in the transcript, in list order.
pub fn detect_keywords(transcript: &str) -> Vec<String> {
    let lowered = transcript.to_lowercase();
    NEGATIVE_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// Counts how many words of each list occur in the transcript.
/// A word counts once no matter how often it repeats.
pub fn count_tone_words(transcript: &str) -> ToneCounts {
    let lowered = transcript.to_lowercase();
    let count = |words: &[&str]| words.iter().filter(|w| lowered.contains(*w)).count();
    ToneCounts {
        positive: count(POSITIVE_WORDS),
        negative: count(NEGATIVE_WORDS),
    }
}

pub fn analyze_sentiment(transcript: &str) -> SentimentLabel {
    count_tone_words(transcript).label()
}
