//! Per-review sentiment tagging and `(bank, rating)` aggregation.

use std::collections::BTreeMap;

use cxa_core::{AnnotatedReview, Judgment, SentimentLabel};
use serde::{Serialize, Serializer};

use crate::lexicon::Lexicon;
use crate::model::SentimentModel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentReport {
    pub processed: usize,
    /// Rows whose model judgment fell back to neutral after a classifier error.
    pub model_failures: usize,
}

/// Set both sentiment judgments on every review.
///
/// A classifier error for one row is logged and that row's model judgment
/// falls back to `("neutral", 0.0)`. Blank text is neutral for both judgments
/// without calling the classifier.
pub async fn tag_sentiment(
    reviews: Vec<AnnotatedReview>,
    lexicon: &Lexicon,
    model: &dyn SentimentModel,
) -> (Vec<AnnotatedReview>, SentimentReport) {
    let mut report = SentimentReport::default();
    let mut tagged = Vec::with_capacity(reviews.len());

    for mut review in reviews {
        report.processed += 1;
        review.sentiment_lexicon = Some(lexicon.judge(review.text()));

        let model_judgment = if review.text().trim().is_empty() {
            Judgment::neutral()
        } else {
            match model.classify(review.text()).await {
                Ok(judgment) => judgment,
                Err(e) => {
                    tracing::warn!(
                        bank = %review.bank(),
                        error = %e,
                        "sentiment model failed, using neutral judgment"
                    );
                    report.model_failures += 1;
                    Judgment::neutral()
                }
            }
        };
        review.sentiment_model = Some(model_judgment);
        tagged.push(review);
    }

    tracing::info!(
        processed = report.processed,
        model_failures = report.model_failures,
        "sentiment tagging complete"
    );
    (tagged, report)
}

/// Sentiment summary of one `(bank, rating)` group.
///
/// Label counts are written as JSON objects, e.g. `{"negative":1,"positive":3}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentAggregate {
    pub bank: String,
    pub rating: u8,
    #[serde(serialize_with = "counts_as_json")]
    pub vader_label_counts: BTreeMap<SentimentLabel, usize>,
    #[serde(serialize_with = "counts_as_json")]
    pub distilbert_label_counts: BTreeMap<SentimentLabel, usize>,
    pub vader_score_mean: f64,
    pub vader_score_count: usize,
    pub distilbert_score_mean: f64,
}

#[derive(Default)]
struct GroupAccumulator {
    vader_counts: BTreeMap<SentimentLabel, usize>,
    model_counts: BTreeMap<SentimentLabel, usize>,
    vader_sum: f64,
    model_sum: f64,
    count: usize,
}

/// Group tagged reviews by `(bank, rating)`, sorted by that key.
///
/// Reviews missing a judgment contribute a neutral one.
#[must_use]
pub fn aggregate_sentiment(reviews: &[AnnotatedReview]) -> Vec<SentimentAggregate> {
    let mut groups: BTreeMap<(String, u8), GroupAccumulator> = BTreeMap::new();

    for review in reviews {
        let lexicon = review.sentiment_lexicon.unwrap_or_default();
        let model = review.sentiment_model.unwrap_or_default();
        let group = groups
            .entry((review.bank().to_owned(), review.review.rating))
            .or_default();

        *group.vader_counts.entry(lexicon.label).or_default() += 1;
        *group.model_counts.entry(model.label).or_default() += 1;
        group.vader_sum += f64::from(lexicon.score);
        group.model_sum += f64::from(model.score);
        group.count += 1;
    }

    groups
        .into_iter()
        .map(|((bank, rating), g)| {
            #[allow(clippy::cast_precision_loss)]
            let n = g.count as f64;
            SentimentAggregate {
                bank,
                rating,
                vader_label_counts: g.vader_counts,
                distilbert_label_counts: g.model_counts,
                vader_score_mean: g.vader_sum / n,
                vader_score_count: g.count,
                distilbert_score_mean: g.model_sum / n,
            }
        })
        .collect()
}

fn counts_as_json<S: Serializer>(
    counts: &BTreeMap<SentimentLabel, usize>,
    s: S,
) -> Result<S::Ok, S::Error> {
    let by_name: BTreeMap<&str, usize> = counts.iter().map(|(l, c)| (l.as_str(), *c)).collect();
    let encoded = serde_json::to_string(&by_name).map_err(serde::ser::Error::custom)?;
    s.serialize_str(&encoded)
}
