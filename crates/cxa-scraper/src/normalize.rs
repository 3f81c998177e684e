//! Normalization of raw review datasets into [`cxa_core::CleanedReview`]s.
//!
//! Date parsing is tolerant of the shapes the collector and spreadsheet
//! exports produce; everything else that cannot be interpreted is dropped
//! and counted in the [`CleanReport`].

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use cxa_core::{read_csv, BankConfig, CleanedReview, DataLayout, DatasetError, RawReview};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Raw rows loaded from the per-bank datasets.
#[derive(Debug, Default)]
pub struct RawLoad {
    pub reviews: Vec<RawReview>,
    pub files_read: usize,
    /// Per-bank datasets that did not exist.
    pub missing: Vec<PathBuf>,
}

/// Row counts removed at each cleaning step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub input_rows: usize,
    pub duplicates_removed: usize,
    pub missing_removed: usize,
    pub invalid_date_removed: usize,
    pub invalid_rating_removed: usize,
    pub output_rows: usize,
    pub per_bank: BTreeMap<String, usize>,
}

/// Load and concatenate the raw dataset of every configured bank, in
/// configuration order.
///
/// A missing per-bank file is skipped with a warning.
///
/// # Errors
///
/// Returns [`DatasetError::NotFound`] if none of the datasets exist, or any
/// read error from an existing dataset.
pub fn load_raw_datasets(layout: &DataLayout, banks: &[BankConfig]) -> Result<RawLoad, DatasetError> {
    let mut load = RawLoad::default();

    for bank in banks {
        let path = layout.bank_raw_file(&bank.name);
        match read_csv::<RawReview>(&path) {
            Ok(rows) => {
                tracing::debug!(bank = %bank.name, rows = rows.len(), "loaded raw dataset");
                load.reviews.extend(rows);
                load.files_read += 1;
            }
            Err(DatasetError::NotFound(_)) => {
                tracing::warn!(bank = %bank.name, path = %path.display(), "raw dataset not found, skipping");
                load.missing.push(path);
            }
            Err(e) => return Err(e),
        }
    }

    if load.files_read == 0 {
        return Err(DatasetError::NotFound(format!(
            "no raw review datasets under {}",
            layout.raw_dir().display()
        )));
    }
    Ok(load)
}

/// Clean raw reviews: drop duplicates, then rows missing text or rating,
/// then rows with an unreadable date or rating. Input order is preserved.
///
/// Running this again over its own output removes nothing.
#[must_use]
pub fn normalize_reviews(raw: Vec<RawReview>) -> (Vec<CleanedReview>, CleanReport) {
    let mut report = CleanReport {
        input_rows: raw.len(),
        ..CleanReport::default()
    };

    let mut seen: HashSet<(Option<String>, Option<String>, String)> = HashSet::new();
    let mut cleaned = Vec::with_capacity(raw.len());

    for row in raw {
        if !seen.insert(dedup_key(&row)) {
            report.duplicates_removed += 1;
            continue;
        }

        let (Some(text), Some(rating)) = (row.review.filter(|t| !t.trim().is_empty()), row.rating)
        else {
            report.missing_removed += 1;
            continue;
        };

        let Some(date) = row.date.as_deref().and_then(parse_review_date) else {
            report.invalid_date_removed += 1;
            continue;
        };

        let Some(rating) = coerce_rating(rating) else {
            report.invalid_rating_removed += 1;
            continue;
        };

        *report.per_bank.entry(row.bank.clone()).or_default() += 1;
        cleaned.push(CleanedReview {
            bank: row.bank,
            review: text,
            rating,
            date,
            source: row.source,
        });
    }

    report.output_rows = cleaned.len();
    tracing::info!(
        input = report.input_rows,
        output = report.output_rows,
        duplicates = report.duplicates_removed,
        missing = report.missing_removed,
        invalid_date = report.invalid_date_removed,
        invalid_rating = report.invalid_rating_removed,
        "cleaned reviews"
    );
    for (bank, count) in &report.per_bank {
        tracing::info!(bank = %bank, count, "cleaned reviews per bank");
    }

    (cleaned, report)
}

/// `(text, date, bank)` with the date in canonical form when it parses.
fn dedup_key(row: &RawReview) -> (Option<String>, Option<String>, String) {
    let date = row.date.as_deref().map(|raw| {
        parse_review_date(raw).map_or_else(|| raw.to_owned(), |d| d.format("%Y-%m-%d").to_string())
    });
    (row.review.clone(), date, row.bank.clone())
}

/// Parse a review timestamp into its calendar date.
#[must_use]
pub fn parse_review_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

/// Accept only whole-number ratings in `1..=5`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_rating(rating: f64) -> Option<u8> {
    if !(1.0..=5.0).contains(&rating) || rating.fract().abs() > f64::EPSILON {
        return None;
    }
    Some(rating as u8)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
