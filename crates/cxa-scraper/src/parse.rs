//! Encoding of review RPC requests and decoding of their responses.
//!
//! See [`crate::types`] for the positional layout of the response.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::error::ScraperError;
use crate::types::{PlayReview, ReviewSort};

/// RPC id of the Play Store review listing.
const REVIEWS_RPC_ID: &str = "UsvDTd";

/// Anti-XSSI prefix the endpoint puts in front of every JSON body.
const XSSI_PREFIX: &str = ")]}'";

/// One decoded page of reviews.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPage {
    pub reviews: Vec<PlayReview>,
    pub next_token: Option<String>,
}

/// Build the `f.req` form value for one page request.
///
/// The inner request is itself JSON-encoded into a string, so both layers are
/// produced with `serde_json` rather than by string formatting.
#[must_use]
pub fn build_request_payload(
    app_id: &str,
    sort: ReviewSort,
    count: u32,
    token: Option<&str>,
) -> String {
    let inner = json!([
        null,
        null,
        [2, sort.code(), [count, null, token], null, []],
        [app_id, 7]
    ]);
    let outer = json!([[[REVIEWS_RPC_ID, inner.to_string(), null, "generic"]]]);
    outer.to_string()
}

/// Decode a raw `batchexecute` response body into a [`ReviewPage`].
///
/// Entries that lack a review id, rating, or timestamp are skipped.
///
/// # Errors
///
/// Returns [`ScraperError::Deserialize`] if either JSON layer does not parse
/// and [`ScraperError::MalformedResponse`] if the envelope has an unexpected
/// shape.
pub fn parse_reviews_page(body: &str, app_id: &str) -> Result<ReviewPage, ScraperError> {
    let trimmed = body.trim_start();
    let payload = trimmed.strip_prefix(XSSI_PREFIX).unwrap_or(trimmed);

    let envelope: Value =
        serde_json::from_str(payload.trim()).map_err(|e| ScraperError::Deserialize {
            context: format!("review envelope for {app_id}"),
            source: e,
        })?;

    let entry = envelope
        .get(0)
        .ok_or_else(|| ScraperError::MalformedResponse {
            app_id: app_id.to_owned(),
            reason: "empty envelope".to_string(),
        })?;

    // A null payload means the app has no (more) reviews.
    let Some(inner_raw) = entry.get(2).and_then(Value::as_str) else {
        return Ok(ReviewPage::default());
    };

    let inner: Value = serde_json::from_str(inner_raw).map_err(|e| ScraperError::Deserialize {
        context: format!("review payload for {app_id}"),
        source: e,
    })?;

    let reviews = inner
        .get(0)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| {
                    let parsed = parse_review_entry(e);
                    if parsed.is_none() {
                        tracing::debug!(app_id, "skipping review entry with missing fields");
                    }
                    parsed
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ReviewPage {
        reviews,
        next_token: extract_next_token(&inner),
    })
}

/// The continuation token is the last element of the second-to-last array.
fn extract_next_token(inner: &Value) -> Option<String> {
    let items = inner.as_array()?;
    let holder = items.get(items.len().checked_sub(2)?)?.as_array()?;
    holder
        .last()?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}

fn parse_review_entry(entry: &Value) -> Option<PlayReview> {
    let review_id = entry.get(0)?.as_str()?.to_owned();
    let score = u8::try_from(entry.get(2)?.as_u64()?).ok()?;
    let seconds = entry.get(5)?.get(0)?.as_i64()?;
    let at = DateTime::<Utc>::from_timestamp(seconds, 0)?;

    Some(PlayReview {
        review_id,
        content: entry.get(4).and_then(Value::as_str).map(str::to_owned),
        score,
        at,
    })
}
