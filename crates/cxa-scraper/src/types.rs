//! Play Store review types.
//!
//! ## Observed shape of the `UsvDTd` review RPC
//!
//! The `batchexecute` endpoint answers with an anti-XSSI prefix (`)]}'`)
//! followed by a JSON envelope. The envelope's first entry carries, at index
//! 2, a *string* that itself holds JSON:
//!
//! - index 0: the array of review entries (absent or `null` when the app has
//!   no reviews left to page through)
//! - second-to-last element: an array whose last element is the continuation
//!   token for the next page, or `null` on the final page
//!
//! Each review entry is positional:
//!
//! | Index  | Field                                  |
//! |--------|----------------------------------------|
//! | 0      | review id                              |
//! | 1[0]   | author display name                    |
//! | 2      | star rating (1–5)                      |
//! | 4      | review text (may be `null`)            |
//! | 5[0]   | creation time, Unix seconds            |
//! | 6      | thumbs-up count                        |
//! | 10     | app version the review was written on  |

use chrono::{DateTime, Utc};

/// Sort order accepted by the review RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewSort {
    MostRelevant,
    Newest,
    Rating,
}

impl ReviewSort {
    /// Numeric code the RPC expects.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            ReviewSort::MostRelevant => 1,
            ReviewSort::Newest => 2,
            ReviewSort::Rating => 3,
        }
    }
}

/// Parameters for one app's review fetch.
#[derive(Debug, Clone)]
pub struct ReviewQuery {
    /// Review language, e.g. `en`.
    pub lang: String,
    /// Store region, e.g. `et`.
    pub country: String,
    pub sort: ReviewSort,
    /// Maximum number of reviews to return.
    pub count: u32,
}

impl ReviewQuery {
    /// Newest-first query for `count` reviews.
    #[must_use]
    pub fn newest(lang: &str, country: &str, count: u32) -> Self {
        Self {
            lang: lang.to_string(),
            country: country.to_string(),
            sort: ReviewSort::Newest,
            count,
        }
    }
}

/// A single review decoded from the RPC response.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayReview {
    pub review_id: String,
    pub content: Option<String>,
    pub score: u8,
    pub at: DateTime<Utc>,
}
