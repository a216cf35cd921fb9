//! Keyword-based sentiment and engagement scoring for free text.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::reporting::round2;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "brilliant", "excellent", "exciting", "fantastic",
    "good", "great", "happy", "incredible", "love", "outstanding", "perfect", "recommend",
    "superb", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "awful", "bad", "boring", "broken", "disappointed", "disappointing", "fail",
    "failed", "hate", "horrible", "poor", "problem", "sad", "scam", "terrible", "useless",
    "worst",
];

// Calls to action and hooks that tend to draw interaction
const ENGAGEMENT_WORDS: &[&str] = &[
    "buy", "click", "comment", "discover", "exclusive", "follow", "free", "join", "learn",
    "like", "limited", "new", "now", "save", "share", "subscribe", "tag", "try", "win",
];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+(?:'[a-z]+)?").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Result of scoring a piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContentAnalysis {
    pub word_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub engagement_count: usize,
    /// Distinct positive keywords found, alphabetical
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub engagement_keywords: Vec<String>,
    /// (positive - negative) / (positive + negative), from -1 to 1
    pub sentiment_score: f64,
    pub sentiment: Sentiment,
    /// Engagement keywords per hundred words
    pub engagement_score: f64,
}

#[derive(Default)]
struct KeywordHits {
    count: usize,
    found: BTreeSet<String>,
}

impl KeywordHits {
    fn record(&mut self, word: &str) {
        self.count += 1;
        self.found.insert(word.to_string());
    }
}

pub fn analyze(content: &str) -> ContentAnalysis {
    let lowered = content.to_lowercase();

    let mut word_count = 0;
    let mut positive = KeywordHits::default();
    let mut negative = KeywordHits::default();
    let mut engagement = KeywordHits::default();

    for word in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        word_count += 1;
        if POSITIVE_WORDS.contains(&word) {
            positive.record(word);
        }
        if NEGATIVE_WORDS.contains(&word) {
            negative.record(word);
        }
        if ENGAGEMENT_WORDS.contains(&word) {
            engagement.record(word);
        }
    }

    let polar = positive.count + negative.count;
    let sentiment_score = if polar > 0 {
        round2((positive.count as f64 - negative.count as f64) / polar as f64)
    } else {
        0.0
    };
    let sentiment = if sentiment_score > 0.0 {
        Sentiment::Positive
    } else if sentiment_score < 0.0 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };
    let engagement_score = if word_count > 0 {
        round2(engagement.count as f64 / word_count as f64 * 100.0)
    } else {
        0.0
    };

    ContentAnalysis {
        word_count,
        positive_count: positive.count,
        negative_count: negative.count,
        engagement_count: engagement.count,
        positive_keywords: positive.found.into_iter().collect(),
        negative_keywords: negative.found.into_iter().collect(),
        engagement_keywords: engagement.found.into_iter().collect(),
        sentiment_score,
        sentiment,
        engagement_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_product_copy() {
        let analysis = analyze(
            "This is an amazing product that will change your life! Great value and excellent quality.",
        );

        assert_eq!(analysis.word_count, 15);
        assert_eq!(analysis.positive_count, 3);
        assert_eq!(analysis.negative_count, 0);
        assert_eq!(analysis.positive_keywords, vec!["amazing", "excellent", "great"]);
        assert_eq!(analysis.sentiment_score, 1.0);
        assert_eq!(analysis.sentiment, Sentiment::Positive);
    }

    #[test]
    fn mixed_text_balances_out() {
        let analysis = analyze("Great idea, terrible execution.");
        assert_eq!(analysis.sentiment_score, 0.0);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn negative_text() {
        let analysis = analyze("Worst purchase ever. Bad support, bad product, but good box.");
        assert_eq!(analysis.negative_count, 3);
        assert_eq!(analysis.positive_count, 1);
        assert_eq!(analysis.negative_keywords, vec!["bad", "worst"]);
        assert_eq!(analysis.sentiment_score, -0.5);
        assert_eq!(analysis.sentiment, Sentiment::Negative);
    }

    #[test]
    fn engagement_hooks_are_counted() {
        let analysis = analyze("Follow us and share now");
        assert_eq!(analysis.word_count, 5);
        assert_eq!(analysis.engagement_count, 3);
        assert_eq!(analysis.engagement_score, 60.0);
    }

    #[test]
    fn empty_text_scores_zero() {
        let analysis = analyze("  ...  ");
        assert_eq!(analysis.word_count, 0);
        assert_eq!(analysis.sentiment_score, 0.0);
        assert_eq!(analysis.engagement_score, 0.0);
        assert_eq!(analysis.sentiment, Sentiment::Neutral);
    }
}
