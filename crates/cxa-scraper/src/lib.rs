//! Review collection from the Play Store and normalization of raw review
//! datasets into the cleaned dataset.

pub mod client;
pub mod collect;
pub mod error;
pub mod normalize;
pub mod parse;
pub mod types;

pub use client::PlayStoreClient;
pub use collect::{collect_reviews, persist_collection, BankCollection, CollectReport};
pub use error::ScraperError;
pub use normalize::{load_raw_datasets, normalize_reviews, CleanReport, RawLoad};
pub use types::{PlayReview, ReviewQuery, ReviewSort};
