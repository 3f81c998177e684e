//! Review records as they move through the pipeline stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Source label attached to every review collected from the Play Store.
pub const SOURCE_GOOGLE_PLAY: &str = "Google Play";

/// Theme assigned when no configured keyword matches a review.
pub const GENERAL_THEME: &str = "General";

/// A review as collected, or as loaded back from a raw dataset.
///
/// Raw datasets are loosely typed: text, rating, and timestamp may be missing
/// and the rating may be written as a float (`"5.0"`). The normalizer is the
/// only consumer that interprets these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReview {
    pub bank: String,
    pub review: Option<String>,
    pub rating: Option<f64>,
    pub date: Option<String>,
    #[serde(default)]
    pub source: String,
}

/// A deduplicated, complete review with a calendar date and integer rating.
///
/// Invariant: `review` is non-blank and `rating` is in `1..=5`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleanedReview {
    pub bank: String,
    pub review: String,
    pub rating: u8,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Parse a model label such as `POSITIVE` or `negative`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(SentimentLabel::Positive),
            "negative" => Some(SentimentLabel::Negative),
            "neutral" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sentiment label with its numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub label: SentimentLabel,
    pub score: f32,
}

impl Judgment {
    /// The `("neutral", 0.0)` judgment used for empty input and fallbacks.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.0,
        }
    }
}

impl Default for Judgment {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A cleaned review plus everything the analysis stages derive from it.
///
/// Stages fill fields in order: the language normalizer sets
/// `is_foreign_script` and `tokens`, the sentiment tagger sets both
/// judgments, and the theme tagger sets `themes`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedReview {
    pub review: CleanedReview,
    pub is_foreign_script: bool,
    pub tokens: Vec<String>,
    pub sentiment_lexicon: Option<Judgment>,
    pub sentiment_model: Option<Judgment>,
    pub themes: Vec<String>,
}

impl AnnotatedReview {
    /// Wrap a cleaned review with no derived fields yet.
    #[must_use]
    pub fn new(review: CleanedReview) -> Self {
        Self {
            review,
            is_foreign_script: false,
            tokens: Vec::new(),
            sentiment_lexicon: None,
            sentiment_model: None,
            themes: Vec::new(),
        }
    }

    #[must_use]
    pub fn bank(&self) -> &str {
        &self.review.bank
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.review.review
    }
}
