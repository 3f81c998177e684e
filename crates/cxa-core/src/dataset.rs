//! CSV datasets exchanged between pipeline stages.
//!
//! Every stage reads its input datasets fully into memory and writes new
//! ones; there is no other channel between stages. List-valued columns
//! (`tokens`, `themes`) hold a JSON array of strings.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::banks::file_stem;
use crate::reviews::{AnnotatedReview, CleanedReview, Judgment, SentimentLabel};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Read every row of a CSV dataset with a header line.
///
/// # Errors
///
/// Returns [`DatasetError::NotFound`] if `path` does not exist and
/// [`DatasetError::Csv`] if a row cannot be decoded into `T`.
pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.display().to_string()));
    }
    let csv_err = |source| DatasetError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Write `rows` as a CSV dataset, creating parent directories as needed.
///
/// Returns the number of rows written.
///
/// # Errors
///
/// Returns [`DatasetError`] if the directory or file cannot be created or a
/// row fails to serialize.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<usize, DatasetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DatasetError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let csv_err = |source| DatasetError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(rows.len())
}

/// Fixed file layout under the data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn raw_dir(&self) -> PathBuf {
        self.root.join("raw")
    }

    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.root.join("processed")
    }

    /// `raw/<bank_stem>_reviews_raw.csv`
    #[must_use]
    pub fn bank_raw_file(&self, bank_name: &str) -> PathBuf {
        self.raw_dir()
            .join(format!("{}_reviews_raw.csv", file_stem(bank_name)))
    }

    #[must_use]
    pub fn combined_raw_file(&self) -> PathBuf {
        self.raw_dir().join("all_reviews_raw.csv")
    }

    #[must_use]
    pub fn cleaned_file(&self) -> PathBuf {
        self.processed_dir().join("cleaned_reviews.csv")
    }

    #[must_use]
    pub fn preprocessed_file(&self) -> PathBuf {
        self.processed_dir().join("preprocessed_reviews.csv")
    }

    /// Rows whose translation failed.
    #[must_use]
    pub fn quarantine_file(&self) -> PathBuf {
        self.processed_dir().join("amharic_reviews.csv")
    }

    #[must_use]
    pub fn sentiment_file(&self) -> PathBuf {
        self.processed_dir().join("sentiment_reviews.csv")
    }

    #[must_use]
    pub fn sentiment_aggregates_file(&self) -> PathBuf {
        self.processed_dir().join("sentiment_aggregates.csv")
    }

    #[must_use]
    pub fn thematic_file(&self) -> PathBuf {
        self.processed_dir().join("thematic_reviews.csv")
    }

    #[must_use]
    pub fn theme_aggregates_file(&self) -> PathBuf {
        self.processed_dir().join("theme_aggregates.csv")
    }

    #[must_use]
    pub fn report_file(&self) -> PathBuf {
        self.processed_dir().join("report.md")
    }
}

// ---------------------------------------------------------------------------
// Stage records
// ---------------------------------------------------------------------------

/// Row of `preprocessed_reviews.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedRecord {
    pub bank: String,
    pub review: String,
    pub rating: u8,
    pub date: NaiveDate,
    pub source: String,
    #[serde(with = "json_list")]
    pub tokens: Vec<String>,
}

/// Row of `sentiment_reviews.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub bank: String,
    pub review: String,
    pub rating: u8,
    pub date: NaiveDate,
    pub source: String,
    #[serde(with = "json_list")]
    pub tokens: Vec<String>,
    pub vader_label: SentimentLabel,
    pub vader_score: f32,
    pub distilbert_label: SentimentLabel,
    pub distilbert_score: f32,
}

/// Row of `thematic_reviews.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThematicRecord {
    pub bank: String,
    pub review: String,
    pub rating: u8,
    pub date: NaiveDate,
    pub source: String,
    #[serde(with = "json_list")]
    pub tokens: Vec<String>,
    pub vader_label: SentimentLabel,
    pub vader_score: f32,
    pub distilbert_label: SentimentLabel,
    pub distilbert_score: f32,
    #[serde(with = "json_list")]
    pub themes: Vec<String>,
}

fn cleaned_parts(review: &CleanedReview) -> (String, String, u8, NaiveDate, String) {
    (
        review.bank.clone(),
        review.review.clone(),
        review.rating,
        review.date,
        review.source.clone(),
    )
}

impl From<&AnnotatedReview> for PreprocessedRecord {
    fn from(a: &AnnotatedReview) -> Self {
        let (bank, review, rating, date, source) = cleaned_parts(&a.review);
        Self {
            bank,
            review,
            rating,
            date,
            source,
            tokens: a.tokens.clone(),
        }
    }
}

impl From<PreprocessedRecord> for AnnotatedReview {
    fn from(r: PreprocessedRecord) -> Self {
        let mut annotated = AnnotatedReview::new(CleanedReview {
            bank: r.bank,
            review: r.review,
            rating: r.rating,
            date: r.date,
            source: r.source,
        });
        annotated.tokens = r.tokens;
        annotated
    }
}

impl From<&AnnotatedReview> for SentimentRecord {
    fn from(a: &AnnotatedReview) -> Self {
        let (bank, review, rating, date, source) = cleaned_parts(&a.review);
        let lexicon = a.sentiment_lexicon.unwrap_or_default();
        let model = a.sentiment_model.unwrap_or_default();
        Self {
            bank,
            review,
            rating,
            date,
            source,
            tokens: a.tokens.clone(),
            vader_label: lexicon.label,
            vader_score: lexicon.score,
            distilbert_label: model.label,
            distilbert_score: model.score,
        }
    }
}

impl From<SentimentRecord> for AnnotatedReview {
    fn from(r: SentimentRecord) -> Self {
        let mut annotated = AnnotatedReview::new(CleanedReview {
            bank: r.bank,
            review: r.review,
            rating: r.rating,
            date: r.date,
            source: r.source,
        });
        annotated.tokens = r.tokens;
        annotated.sentiment_lexicon = Some(Judgment {
            label: r.vader_label,
            score: r.vader_score,
        });
        annotated.sentiment_model = Some(Judgment {
            label: r.distilbert_label,
            score: r.distilbert_score,
        });
        annotated
    }
}

impl From<&AnnotatedReview> for ThematicRecord {
    fn from(a: &AnnotatedReview) -> Self {
        let s = SentimentRecord::from(a);
        Self {
            bank: s.bank,
            review: s.review,
            rating: s.rating,
            date: s.date,
            source: s.source,
            tokens: s.tokens,
            vader_label: s.vader_label,
            vader_score: s.vader_score,
            distilbert_label: s.distilbert_label,
            distilbert_score: s.distilbert_score,
            themes: a.themes.clone(),
        }
    }
}

/// (De)serialize a `Vec<String>` as a JSON array held in a single CSV field.
mod json_list {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(items: &[String], s: S) -> Result<S::Ok, S::Error> {
        let encoded = serde_json::to_string(items).map_err(ser::Error::custom)?;
        s.serialize_str(&encoded)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw).map_err(de::Error::custom)
    }
}
