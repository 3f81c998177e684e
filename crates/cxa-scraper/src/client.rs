//! HTTP client for the Play Store review RPC.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;
use crate::parse::{build_request_payload, parse_reviews_page, ReviewPage};
use crate::types::{PlayReview, ReviewQuery};

/// Largest page the review RPC serves per request.
pub(crate) const MAX_PAGE_SIZE: u32 = 199;

/// Maximum number of pages to fetch for one app.
/// Prevents infinite loops on cycling continuation tokens.
pub(crate) const MAX_PAGES: usize = 50;

const BATCHEXECUTE_PATH: &str = "/_/PlayStoreUi/data/batchexecute";

/// HTTP client for the Play Store `batchexecute` review endpoint.
///
/// Non-2xx responses are typed errors. No request is retried: a failure is
/// terminal for the app being fetched.
pub struct PlayStoreClient {
    client: Client,
    base_url: String,
}

impl PlayStoreClient {
    /// Creates a `PlayStoreClient` against `base_url` (normally
    /// `https://play.google.com`) with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        reqwest::Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Fetches up to `query.count` reviews for `app_id`, newest first when
    /// `query.sort` is [`crate::ReviewSort::Newest`].
    ///
    /// Follows continuation tokens until the count is reached, the store
    /// reports no further pages, or [`MAX_PAGES`] pages have been fetched.
    /// Hitting the page ceiling keeps the reviews gathered so far.
    ///
    /// # Errors
    ///
    /// Propagates any error from a page request.
    pub async fn fetch_reviews(
        &self,
        app_id: &str,
        query: &ReviewQuery,
    ) -> Result<Vec<PlayReview>, ScraperError> {
        let target = usize::try_from(query.count).unwrap_or(usize::MAX);
        let mut reviews: Vec<PlayReview> = Vec::new();
        let mut token: Option<String> = None;
        let mut page_count = 0usize;

        while reviews.len() < target {
            if page_count == MAX_PAGES {
                tracing::warn!(
                    app_id,
                    max_pages = MAX_PAGES,
                    collected = reviews.len(),
                    "page limit reached; keeping reviews fetched so far"
                );
                break;
            }
            page_count += 1;

            let remaining = u32::try_from(target - reviews.len()).unwrap_or(u32::MAX);
            let page = self
                .fetch_page(app_id, query, remaining.min(MAX_PAGE_SIZE), token.as_deref())
                .await?;

            tracing::debug!(
                app_id,
                page = page_count,
                count = page.reviews.len(),
                "fetched review page"
            );

            let page_was_empty = page.reviews.is_empty();
            reviews.extend(page.reviews);

            match page.next_token {
                Some(next) if !page_was_empty && token.as_deref() != Some(next.as_str()) => {
                    token = Some(next);
                }
                _ => break,
            }
        }

        reviews.truncate(target);
        Ok(reviews)
    }

    /// Fetches a single page of reviews.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    /// - [`ScraperError::Http`]: network or TLS failure.
    /// - [`ScraperError::Deserialize`] / [`ScraperError::MalformedResponse`]:
    ///   the body does not have the expected shape.
    pub async fn fetch_page(
        &self,
        app_id: &str,
        query: &ReviewQuery,
        count: u32,
        token: Option<&str>,
    ) -> Result<ReviewPage, ScraperError> {
        let url = self.reviews_url(query);
        let payload = build_request_payload(app_id, query.sort, count, token);

        let response = self
            .client
            .post(&url)
            .form(&[("f.req", payload.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        parse_reviews_page(&body, app_id)
    }

    /// Builds the RPC URL with language and region query parameters.
    fn reviews_url(&self, query: &ReviewQuery) -> String {
        format!(
            "{}{BATCHEXECUTE_PATH}?hl={}&gl={}",
            self.base_url, query.lang, query.country
        )
    }
}
