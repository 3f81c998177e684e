use chrono::NaiveDate;

use super::*;
use crate::schema::MAX_REVIEW_TEXT_CHARS;

/// In-memory store with the same row-level constraints as the real schema.
#[derive(Default)]
struct MemorySink {
    banks: Vec<String>,
    reviews: Vec<(i64, String)>,
    schema_fails: bool,
    rejected_bank: Option<String>,
}

impl ReviewSink for MemorySink {
    async fn create_schema(&mut self) -> Result<(), DbError> {
        if self.schema_fails {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(
                "permission denied for schema public".to_string(),
            )));
        }
        Ok(())
    }

    async fn resolve_bank(&mut self, name: &str) -> Result<ResolvedBank, DbError> {
        if self.rejected_bank.as_deref() == Some(name) {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(
                "value too long for type character varying(255)".to_string(),
            )));
        }
        if let Some(pos) = self.banks.iter().position(|b| b == name) {
            return Ok(ResolvedBank {
                id: i64::try_from(pos + 1).unwrap(),
                created: false,
            });
        }
        self.banks.push(name.to_owned());
        Ok(ResolvedBank {
            id: i64::try_from(self.banks.len()).unwrap(),
            created: true,
        })
    }

    async fn insert_review(
        &mut self,
        bank_id: i64,
        review: &CleanedReview,
    ) -> Result<(), DbError> {
        if review.review.chars().count() > MAX_REVIEW_TEXT_CHARS {
            return Err(DbError::Sqlx(sqlx::Error::Protocol(
                "value too long for type character varying(4000)".to_string(),
            )));
        }
        self.reviews.push((bank_id, review.review.clone()));
        Ok(())
    }
}

fn cleaned(bank: &str, text: &str) -> CleanedReview {
    CleanedReview {
        bank: bank.to_owned(),
        review: text.to_owned(),
        rating: 4,
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        source: "Google Play".to_owned(),
    }
}

#[tokio::test]
async fn two_rows_for_a_new_bank_insert_one_bank_and_two_reviews() {
    let mut sink = MemorySink::default();
    let reviews = vec![
        cleaned("Bank of Abyssinia", "works well"),
        cleaned("Bank of Abyssinia", "crashes on login"),
    ];

    let report = load_into(&mut sink, &reviews).await.unwrap();

    assert_eq!(sink.banks, vec!["Bank of Abyssinia"]);
    assert_eq!(sink.reviews.len(), 2);
    assert!(sink.reviews.iter().all(|(id, _)| *id == 1));
    assert_eq!(
        report,
        LoadReport {
            attempted: 2,
            inserted: 2,
            failed: 0,
            banks_created: 1,
        }
    );
}

#[tokio::test]
async fn oversized_text_fails_alone() {
    let mut sink = MemorySink::default();
    let reviews = vec![
        cleaned("Dashen Bank", "fine"),
        cleaned("Dashen Bank", &"x".repeat(MAX_REVIEW_TEXT_CHARS + 1)),
        cleaned("Dashen Bank", "still fine"),
    ];

    let report = load_into(&mut sink, &reviews).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed, 1);
    assert!(report.inserted < report.attempted);
    assert_eq!(sink.reviews[1].1, "still fine");
}

#[tokio::test]
async fn existing_banks_are_reused() {
    let mut sink = MemorySink {
        banks: vec!["Dashen Bank".to_owned()],
        ..MemorySink::default()
    };
    let reviews = vec![
        cleaned("Dashen Bank", "ok"),
        cleaned("Commercial Bank of Ethiopia", "slow"),
    ];

    let report = load_into(&mut sink, &reviews).await.unwrap();

    assert_eq!(report.banks_created, 1);
    assert_eq!(sink.reviews, vec![(1, "ok".to_owned()), (2, "slow".to_owned())]);
}

#[tokio::test]
async fn failed_bank_counts_its_reviews_as_failed() {
    let mut sink = MemorySink {
        rejected_bank: Some("Bad Bank".to_owned()),
        ..MemorySink::default()
    };
    let reviews = vec![
        cleaned("Bad Bank", "one"),
        cleaned("Dashen Bank", "two"),
        cleaned("Bad Bank", "three"),
    ];

    let report = load_into(&mut sink, &reviews).await.unwrap();

    assert_eq!(report.attempted, 3);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(sink.banks, vec!["Dashen Bank"]);
}

#[tokio::test]
async fn schema_failure_aborts_before_any_insert() {
    let mut sink = MemorySink {
        schema_fails: true,
        ..MemorySink::default()
    };

    let result = load_into(&mut sink, &[cleaned("Dashen Bank", "ok")]).await;

    assert!(matches!(result, Err(DbError::Sqlx(_))), "got {result:?}");
    assert!(sink.banks.is_empty());
    assert!(sink.reviews.is_empty());
}

#[tokio::test]
async fn empty_dataset_creates_nothing() {
    let mut sink = MemorySink::default();
    let report = load_into(&mut sink, &[]).await.unwrap();
    assert_eq!(report, LoadReport::default());
}
