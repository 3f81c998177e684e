//! Sentiment and theme tagging for preprocessed reviews.
//!
//! Every review gets two independent sentiment judgments: a rule-based
//! lexicon score ([`Lexicon`]) and a pretrained classifier's label served
//! over HTTP ([`SentimentModel`]). Themes are keyword matches against the
//! per-bank [`cxa_core::ThemeTable`].

pub mod error;
pub mod lexicon;
pub mod model;
pub mod tagger;
pub mod themes;

pub use error::SentimentError;
pub use lexicon::{label_for_compound, Lexicon};
pub use model::{SentimentModel, TeiClassifier, MAX_MODEL_WORDS};
pub use tagger::{aggregate_sentiment, tag_sentiment, SentimentAggregate, SentimentReport};
pub use themes::{aggregate_themes, assign_themes, tag_themes, ThemeCount};
