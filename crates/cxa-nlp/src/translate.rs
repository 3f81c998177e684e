//! Translation collaborator.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::NlpError;

/// Language the Amharic reviews are translated from.
pub const SOURCE_LANGUAGE: &str = "am";
/// Working language of the pipeline.
pub const TARGET_LANGUAGE: &str = "en";

/// Translates review text into the pipeline's working language.
#[async_trait]
pub trait Translator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`NlpError`] when the text could not be translated. An empty
    /// result is an error, never `Ok("")`.
    async fn translate(&self, text: &str) -> Result<String, NlpError>;
}

/// Client for the public Google Translate `translate_a/single` endpoint.
pub struct GoogleTranslateClient {
    client: reqwest::Client,
    url: String,
}

impl GoogleTranslateClient {
    /// # Errors
    ///
    /// Returns [`NlpError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`NlpError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, NlpError> {
        reqwest::Url::parse(base_url).map_err(|e| NlpError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/translate_a/single", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str) -> Result<String, NlpError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("client", "gtx"),
                ("sl", SOURCE_LANGUAGE),
                ("tl", TARGET_LANGUAGE),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NlpError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.text().await?;
        parse_translation(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists segments as
/// `[translated, original, ...]`.
///
/// # Errors
///
/// Returns [`NlpError::Deserialize`] for non-JSON bodies and
/// [`NlpError::EmptyTranslation`] when no translated text is present.
pub fn parse_translation(body: &str) -> Result<String, NlpError> {
    let value: Value = serde_json::from_str(body).map_err(|e| NlpError::Deserialize {
        context: "translation response".to_string(),
        source: e,
    })?;

    let translated: String = value
        .get(0)
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(|s| s.get(0).and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(NlpError::EmptyTranslation);
    }
    Ok(translated.to_owned())
}
