use unicode_segmentation::UnicodeSegmentation;

use crate::lemmatize::Lemmatizer;
use crate::stopwords::is_stopword;

/// Lowercases, splits on Unicode word boundaries, drops stop words and
/// anything that is not purely alphabetic, and lemmatizes the rest.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    lemmatizer: Lemmatizer,
}

impl Tokenizer {
    #[must_use]
    pub fn new(lemmatizer: Lemmatizer) -> Self {
        Self { lemmatizer }
    }

    #[must_use]
    pub fn english() -> Self {
        Self::new(Lemmatizer::english())
    }

    /// Empty or whitespace-only text yields no tokens.
    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        text.to_lowercase()
            .unicode_words()
            .filter(|w| w.chars().all(char::is_alphabetic))
            .filter(|w| !is_stopword(w))
            .map(|w| self.lemmatizer.lemma(w))
            .collect()
    }
}
