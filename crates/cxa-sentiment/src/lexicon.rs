//! Valence scoring against the full VADER lexicon.
//!
//! Words are looked up in the ~7,500-entry VADER lexicon (inflected forms
//! included). A word's valence is adjusted by preceding boosters, dampeners
//! and negations, by all-caps emphasis, and by a contrastive "but". The
//! summed valence is squashed into a compound score in `[-1.0, 1.0]`.

use std::fmt;

use cxa_core::{Judgment, SentimentLabel};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Lexicon-based sentiment scorer.
pub struct Lexicon {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon").finish_non_exhaustive()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::general()
    }
}

impl Lexicon {
    /// The general-purpose VADER lexicon.
    #[must_use]
    pub fn general() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Judge `text`: label from [`label_for_compound`], score is the compound.
    ///
    /// Blank text yields `("neutral", 0.0)`.
    #[must_use]
    pub fn judge(&self, text: &str) -> Judgment {
        if text.trim().is_empty() {
            return Judgment::neutral();
        }
        let score = self.compound(text);
        Judgment {
            label: label_for_compound(score),
            score,
        }
    }

    /// Compound polarity of `text` in `[-1.0, 1.0]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn compound(&self, text: &str) -> f32 {
        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().unwrap_or(0.0);
        (compound as f32).clamp(-1.0, 1.0)
    }
}

/// `positive` at or above 0.05, `negative` at or below -0.05, else `neutral`.
#[must_use]
pub fn label_for_compound(compound: f32) -> SentimentLabel {
    if compound >= 0.05 {
        SentimentLabel::Positive
    } else if compound <= -0.05 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(text: &str) -> f32 {
        Lexicon::general().compound(text)
    }

    #[test]
    fn blank_text_is_neutral_zero() {
        let lexicon = Lexicon::general();
        for text in ["", "   ", "!!!"] {
            let j = lexicon.judge(text);
            assert_eq!(j.label, SentimentLabel::Neutral, "{text:?}");
            assert!(j.score.abs() < f32::EPSILON, "{text:?}");
        }
    }

    #[test]
    fn unknown_words_are_neutral() {
        let j = Lexicon::general().judge("the account page");
        assert_eq!(j.label, SentimentLabel::Neutral);
    }

    #[test]
    fn great_service_is_positive() {
        let j = Lexicon::general().judge("Great service and fast transactions");
        assert_eq!(j.label, SentimentLabel::Positive);
        assert!(j.score >= 0.05, "got {}", j.score);
    }

    #[test]
    fn single_word_compound_matches_normalization() {
        // 3.1 / sqrt(3.1^2 + 15)
        let c = compound("great");
        assert!((c - 0.6249).abs() < 1e-3, "got {c}");
    }

    #[test]
    fn negative_words_score_negative() {
        let j = Lexicon::general().judge("Terrible app, it crashes every time");
        assert_eq!(j.label, SentimentLabel::Negative);
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(compound("not good") < 0.0);
        assert!(compound("don't like it") < 0.0);
    }

    #[test]
    fn boosters_and_dampeners_shift_intensity() {
        let plain = compound("good");
        assert!(compound("very good") > plain);
        assert!(compound("slightly good") < plain);
        assert!(compound("very bad") < compound("bad"));
    }

    #[test]
    fn caps_emphasis_in_mixed_case_text() {
        assert!(compound("GOOD app") > compound("good app"));
    }

    #[test]
    fn all_caps_text_gets_no_caps_emphasis() {
        assert!((compound("GOOD APP") - compound("good app")).abs() < f32::EPSILON);
    }

    #[test]
    fn exclamations_amplify_up_to_four() {
        assert!(compound("good!!") > compound("good"));
        assert!((compound("good!!!!!!") - compound("good!!!!")).abs() < f32::EPSILON);
    }

    #[test]
    fn but_shifts_weight_to_the_second_clause() {
        assert!(compound("The app is good but the login is terrible") < 0.0);
        assert!(compound("Slow at first but great now") > 0.0);
    }

    #[test]
    fn compound_stays_in_range() {
        let c = compound("great great great amazing awesome best love perfect!!!!");
        assert!(c <= 1.0 && c > 0.9, "got {c}");
        let c = compound("worst worst terrible awful horrible scam fraud");
        assert!(c >= -1.0 && c < -0.9, "got {c}");
    }

    #[test]
    fn inflected_forms_carry_valence() {
        let lexicon = Lexicon::general();
        for word in ["hate", "hated", "hates", "hating"] {
            let text = format!("I {word} this app");
            assert_eq!(lexicon.judge(&text).label, SentimentLabel::Negative, "{text}");
        }
        for word in ["disappointed", "disappointing"] {
            let text = format!("Really {word} with the update");
            assert_eq!(lexicon.judge(&text).label, SentimentLabel::Negative, "{text}");
        }
        for word in ["love", "loved", "loves", "loving"] {
            let text = format!("I {word} this app");
            assert_eq!(lexicon.judge(&text).label, SentimentLabel::Positive, "{text}");
        }
    }

    #[test]
    fn label_thresholds() {
        assert_eq!(label_for_compound(0.05), SentimentLabel::Positive);
        assert_eq!(label_for_compound(-0.05), SentimentLabel::Negative);
        assert_eq!(label_for_compound(0.049), SentimentLabel::Neutral);
        assert_eq!(label_for_compound(-0.049), SentimentLabel::Neutral);
    }
}
