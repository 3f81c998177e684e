//! Review collection across all configured banks.
//!
//! Per-bank fetch failures are logged and recorded rather than propagated so
//! a single unreachable app does not abort the whole run.

use cxa_core::{write_csv, BankConfig, DataLayout, DatasetError, RawReview, SOURCE_GOOGLE_PLAY};

use crate::client::PlayStoreClient;
use crate::types::{PlayReview, ReviewQuery};

/// Timestamp format written to raw datasets.
const RAW_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of collecting one bank.
#[derive(Debug, Clone, PartialEq)]
pub struct BankCollection {
    pub bank: String,
    pub reviews: Vec<RawReview>,
    /// Error message when the fetch failed; `reviews` is empty in that case.
    pub error: Option<String>,
}

impl BankCollection {
    #[must_use]
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary of a collect run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectReport {
    /// `(bank name, reviews collected)` in configuration order.
    pub per_bank: Vec<(String, usize)>,
    pub failed_banks: Vec<String>,
    pub total_reviews: usize,
    pub files_written: usize,
}

impl CollectReport {
    /// True when at least one bank was attempted and none succeeded.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.per_bank.is_empty() && self.failed_banks.len() == self.per_bank.len()
    }
}

/// Convert a store review into the raw dataset row for `bank`.
#[must_use]
pub fn to_raw_review(bank: &str, review: &PlayReview) -> RawReview {
    RawReview {
        bank: bank.to_owned(),
        review: review.content.clone(),
        rating: Some(f64::from(review.score)),
        date: Some(review.at.format(RAW_DATE_FORMAT).to_string()),
        source: SOURCE_GOOGLE_PLAY.to_owned(),
    }
}

/// Fetch up to `query.count` newest reviews for every bank, in order.
///
/// Never fails as a whole: a bank whose fetch errors yields an empty
/// [`BankCollection`] carrying the error message.
pub async fn collect_reviews(
    client: &PlayStoreClient,
    banks: &[BankConfig],
    query: &ReviewQuery,
) -> Vec<BankCollection> {
    let mut collections = Vec::with_capacity(banks.len());

    for bank in banks {
        match client.fetch_reviews(&bank.app_id, query).await {
            Ok(reviews) => {
                tracing::info!(
                    bank = %bank.name,
                    app_id = %bank.app_id,
                    count = reviews.len(),
                    "collected reviews"
                );
                collections.push(BankCollection {
                    bank: bank.name.clone(),
                    reviews: reviews
                        .iter()
                        .map(|r| to_raw_review(&bank.name, r))
                        .collect(),
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!(
                    bank = %bank.name,
                    app_id = %bank.app_id,
                    error = %e,
                    "review fetch failed, continuing with remaining banks"
                );
                collections.push(BankCollection {
                    bank: bank.name.clone(),
                    reviews: Vec::new(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    collections
}

/// Write one raw dataset per bank plus the combined dataset.
///
/// Banks with no reviews get no file, and no combined file is written when
/// nothing was collected.
///
/// # Errors
///
/// Returns [`DatasetError`] if a dataset cannot be written.
pub fn persist_collection(
    layout: &DataLayout,
    collections: &[BankCollection],
) -> Result<CollectReport, DatasetError> {
    let mut report = CollectReport::default();
    let mut combined: Vec<RawReview> = Vec::new();

    for collection in collections {
        report
            .per_bank
            .push((collection.bank.clone(), collection.reviews.len()));
        if collection.failed() {
            report.failed_banks.push(collection.bank.clone());
        }
        if collection.reviews.is_empty() {
            continue;
        }

        let path = layout.bank_raw_file(&collection.bank);
        write_csv(&path, &collection.reviews)?;
        report.files_written += 1;
        tracing::info!(
            bank = %collection.bank,
            path = %path.display(),
            rows = collection.reviews.len(),
            "wrote raw dataset"
        );
        combined.extend(collection.reviews.iter().cloned());
    }

    report.total_reviews = combined.len();
    if !combined.is_empty() {
        write_csv(&layout.combined_raw_file(), &combined)?;
        report.files_written += 1;
    }

    Ok(report)
}
