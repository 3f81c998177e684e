//! Integration tests for sentiment tagging and the TEI classifier client.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cxa_core::{AnnotatedReview, CleanedReview, Judgment, SentimentLabel};
use cxa_sentiment::{
    aggregate_sentiment, tag_sentiment, Lexicon, SentimentError, SentimentModel, TeiClassifier,
};

/// Labels everything positive and counts calls.
struct AlwaysPositive {
    calls: AtomicUsize,
}

#[async_trait]
impl SentimentModel for AlwaysPositive {
    async fn classify(&self, _text: &str) -> Result<Judgment, SentimentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Judgment {
            label: SentimentLabel::Positive,
            score: 0.99,
        })
    }
}

/// Fails on any text containing "boom".
struct FailsOnBoom;

#[async_trait]
impl SentimentModel for FailsOnBoom {
    async fn classify(&self, text: &str) -> Result<Judgment, SentimentError> {
        if text.contains("boom") {
            return Err(SentimentError::EmptyPrediction);
        }
        Ok(Judgment {
            label: SentimentLabel::Negative,
            score: 0.75,
        })
    }
}

fn review(bank: &str, rating: u8, text: &str) -> AnnotatedReview {
    AnnotatedReview::new(CleanedReview {
        bank: bank.to_owned(),
        review: text.to_owned(),
        rating,
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        source: "Google Play".to_owned(),
    })
}

// ---------------------------------------------------------------------------
// tag_sentiment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn great_service_is_positive_for_both_judgments() {
    let model = AlwaysPositive {
        calls: AtomicUsize::new(0),
    };
    let (tagged, report) = tag_sentiment(
        vec![review(
            "Commercial Bank of Ethiopia",
            5,
            "Great service and fast transactions",
        )],
        &Lexicon::general(),
        &model,
    )
    .await;

    assert_eq!(report.processed, 1);
    assert_eq!(report.model_failures, 0);
    let lexicon = tagged[0].sentiment_lexicon.unwrap();
    assert_eq!(lexicon.label, SentimentLabel::Positive);
    assert!(lexicon.score >= 0.05);
    assert_eq!(tagged[0].sentiment_model.unwrap().label, SentimentLabel::Positive);
}

#[tokio::test]
async fn blank_text_skips_the_model() {
    let model = AlwaysPositive {
        calls: AtomicUsize::new(0),
    };
    let (tagged, _) = tag_sentiment(
        vec![review("Dashen Bank", 3, "   ")],
        &Lexicon::general(),
        &model,
    )
    .await;

    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    assert_eq!(tagged[0].sentiment_model, Some(Judgment::neutral()));
    assert_eq!(tagged[0].sentiment_lexicon, Some(Judgment::neutral()));
}

#[tokio::test]
async fn model_failure_falls_back_to_neutral_and_is_counted() {
    let (tagged, report) = tag_sentiment(
        vec![
            review("Dashen Bank", 1, "boom it crashed"),
            review("Dashen Bank", 1, "slow app"),
        ],
        &Lexicon::general(),
        &FailsOnBoom,
    )
    .await;

    assert_eq!(report.processed, 2);
    assert_eq!(report.model_failures, 1);
    assert_eq!(tagged[0].sentiment_model, Some(Judgment::neutral()));
    assert_eq!(tagged[1].sentiment_model.unwrap().label, SentimentLabel::Negative);
}

#[tokio::test]
async fn lexicon_labels_are_always_in_the_closed_set() {
    let texts = [
        "Great app",
        "Worst bank ever!!!",
        "It is an app",
        "not bad but not great",
        "😀",
        "",
    ];
    let reviews = texts.iter().map(|t| review("Dashen Bank", 3, t)).collect();
    let (tagged, _) = tag_sentiment(reviews, &Lexicon::general(), &FailsOnBoom).await;

    for r in &tagged {
        let j = r.sentiment_lexicon.unwrap();
        assert!((-1.0..=1.0).contains(&j.score), "score out of range: {}", j.score);
        assert!(matches!(
            j.label,
            SentimentLabel::Positive | SentimentLabel::Negative | SentimentLabel::Neutral
        ));
    }
}

#[tokio::test]
async fn tagged_rows_aggregate_per_bank_and_rating() {
    let model = AlwaysPositive {
        calls: AtomicUsize::new(0),
    };
    let (tagged, _) = tag_sentiment(
        vec![
            review("Dashen Bank", 5, "Great"),
            review("Dashen Bank", 5, "Excellent"),
            review("Bank of Abyssinia", 2, "Terrible"),
        ],
        &Lexicon::general(),
        &model,
    )
    .await;

    let aggs = aggregate_sentiment(&tagged);
    assert_eq!(aggs.len(), 2);
    assert_eq!(aggs[0].bank, "Bank of Abyssinia");
    assert_eq!(aggs[1].vader_score_count, 2);
    assert_eq!(
        aggs[1].vader_label_counts.get(&SentimentLabel::Positive),
        Some(&2)
    );
}

// ---------------------------------------------------------------------------
// TeiClassifier
// ---------------------------------------------------------------------------

fn classifier(server: &MockServer) -> TeiClassifier {
    TeiClassifier::new(&server.uri(), 5, "cxa-test/0.1").expect("classifier should build")
}

#[tokio::test]
async fn tei_classifier_posts_text_with_truncation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_json(json!({"inputs": "Fast and reliable", "truncate": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"label": "POSITIVE", "score": 0.9987},
            {"label": "NEGATIVE", "score": 0.0013}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let j = classifier(&server).classify("Fast and reliable").await.unwrap();
    assert_eq!(j.label, SentimentLabel::Positive);
    assert!((j.score - 0.9987).abs() < 1e-6);
}

#[tokio::test]
async fn tei_classifier_maps_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = classifier(&server).classify("anything").await;
    assert!(
        matches!(result, Err(SentimentError::UnexpectedStatus { status: 503, .. })),
        "expected UnexpectedStatus(503), got: {result:?}"
    );
}

#[tokio::test]
async fn tei_classifier_failure_degrades_stage_to_neutral() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let model = classifier(&server);
    let (tagged, report) = tag_sentiment(
        vec![review("Dashen Bank", 4, "Good app")],
        &Lexicon::general(),
        &model,
    )
    .await;

    assert_eq!(report.model_failures, 1);
    assert_eq!(tagged[0].sentiment_model, Some(Judgment::neutral()));
    assert_eq!(
        tagged[0].sentiment_lexicon.unwrap().label,
        SentimentLabel::Positive
    );
}

#[tokio::test]
async fn tei_neutral_label_counts_as_a_model_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"label": "NEUTRAL", "score": 0.8}])),
        )
        .mount(&server)
        .await;

    let model = classifier(&server);
    let (tagged, report) = tag_sentiment(
        vec![review("Dashen Bank", 3, "It is an app")],
        &Lexicon::general(),
        &model,
    )
    .await;

    assert_eq!(report.model_failures, 1);
    assert_eq!(tagged[0].sentiment_model, Some(Judgment::neutral()));
}
