//! Language normalization for cleaned reviews.
//!
//! Detects Amharic (Ethiopic script or common transliterations), translates
//! it through a [`Translator`], and reduces every review to a list of lemmas
//! with the [`Tokenizer`]. Rows whose translation fails are kept untouched and
//! also returned as a quarantine set.

pub mod detect;
pub mod error;
pub mod lemmatize;
pub mod stage;
pub mod stopwords;
pub mod tokenize;
pub mod translate;

pub use detect::is_foreign_script;
pub use error::NlpError;
pub use lemmatize::Lemmatizer;
pub use stage::{normalize_language, persist_quarantine, LanguageOutput, LanguageReport};
pub use tokenize::Tokenizer;
pub use translate::{GoogleTranslateClient, Translator};
