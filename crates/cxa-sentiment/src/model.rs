//! Pretrained text-classification collaborator.

use std::time::Duration;

use async_trait::async_trait;
use cxa_core::{Judgment, SentimentLabel};
use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Longest input, in whitespace-delimited words, sent to the classifier.
pub const MAX_MODEL_WORDS: usize = 512;

/// Binary sentiment classifier.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Classify non-empty `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] when the classifier cannot produce a label.
    async fn classify(&self, text: &str) -> Result<Judgment, SentimentError>;
}

/// Client for a Text Embeddings Inference `/predict` endpoint serving a
/// sequence-classification model.
pub struct TeiClassifier {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    truncate: bool,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f32,
}

/// Single-input responses are a flat list; batch-style servers nest it.
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Flat(Vec<Prediction>),
    Nested(Vec<Vec<Prediction>>),
}

impl TeiClassifier {
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SentimentError> {
        reqwest::Url::parse(base_url).map_err(|e| SentimentError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl SentimentModel for TeiClassifier {
    async fn classify(&self, text: &str) -> Result<Judgment, SentimentError> {
        let inputs = truncate_words(text, MAX_MODEL_WORDS);
        let response = self
            .client
            .post(&self.url)
            .json(&PredictRequest {
                inputs: &inputs,
                truncate: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        parse_prediction(&body)
    }
}

/// Keep at most `max_words` whitespace-delimited words.
#[must_use]
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick the highest-scoring label of a `/predict` response.
///
/// # Errors
///
/// Returns [`SentimentError::Deserialize`] for unexpected bodies,
/// [`SentimentError::EmptyPrediction`] when no label is present, and
/// [`SentimentError::UnknownLabel`] for labels other than positive or negative.
pub fn parse_prediction(body: &str) -> Result<Judgment, SentimentError> {
    let response: PredictResponse =
        serde_json::from_str(body).map_err(|e| SentimentError::Deserialize {
            context: "classifier response".to_string(),
            source: e,
        })?;

    let predictions = match response {
        PredictResponse::Flat(p) => p,
        PredictResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
    };

    let best = predictions
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or(SentimentError::EmptyPrediction)?;

    let label = match SentimentLabel::parse(&best.label) {
        Some(label @ (SentimentLabel::Positive | SentimentLabel::Negative)) => label,
        _ => return Err(SentimentError::UnknownLabel(best.label)),
    };
    Ok(Judgment {
        label,
        score: best.score,
    })
}
