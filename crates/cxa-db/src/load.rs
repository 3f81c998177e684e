//! Loading the cleaned dataset into `banks` and `reviews`.

use std::collections::HashMap;

use cxa_core::CleanedReview;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};

use crate::{schema, DbError};

/// Outcome of one load run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub attempted: usize,
    pub inserted: usize,
    pub failed: usize,
    pub banks_created: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedBank {
    pub id: i64,
    pub created: bool,
}

/// Storage operations a load run needs. Each method either applies fully or
/// leaves the store unchanged.
pub(crate) trait ReviewSink {
    async fn create_schema(&mut self) -> Result<(), DbError>;

    /// Insert `name` if it is new, returning its id either way.
    async fn resolve_bank(&mut self, name: &str) -> Result<ResolvedBank, DbError>;

    async fn insert_review(&mut self, bank_id: i64, review: &CleanedReview)
        -> Result<(), DbError>;
}

// ---------------------------------------------------------------------------
// Orchestration
// ---------------------------------------------------------------------------

/// Insert every distinct bank, then every review.
///
/// Row-level failures are logged and counted. A schema failure aborts the
/// run and is returned.
pub(crate) async fn load_into<S: ReviewSink>(
    sink: &mut S,
    reviews: &[CleanedReview],
) -> Result<LoadReport, DbError> {
    sink.create_schema().await?;

    let mut report = LoadReport::default();
    let mut bank_ids: HashMap<&str, Option<i64>> = HashMap::new();

    for review in reviews {
        let name = review.bank.as_str();
        if bank_ids.contains_key(name) {
            continue;
        }
        let id = match sink.resolve_bank(name).await {
            Ok(bank) => {
                if bank.created {
                    report.banks_created += 1;
                }
                Some(bank.id)
            }
            Err(e) => {
                tracing::warn!(bank = %name, error = %e, "failed to insert bank, skipping its reviews");
                None
            }
        };
        bank_ids.insert(name, id);
    }

    for review in reviews {
        report.attempted += 1;
        let Some(bank_id) = bank_ids.get(review.bank.as_str()).copied().flatten() else {
            report.failed += 1;
            continue;
        };

        match sink.insert_review(bank_id, review).await {
            Ok(()) => report.inserted += 1,
            Err(e) => {
                tracing::warn!(
                    bank = %review.bank,
                    date = %review.date,
                    error = %e,
                    "failed to insert review"
                );
                report.failed += 1;
            }
        }
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// PostgreSQL sink
// ---------------------------------------------------------------------------

/// Runs every row inside a savepoint of one enclosing transaction, so a
/// failing row rolls back alone.
struct PgSink {
    tx: Transaction<'static, Postgres>,
}

impl ReviewSink for PgSink {
    async fn create_schema(&mut self) -> Result<(), DbError> {
        schema::create_schema(&mut self.tx).await?;
        Ok(())
    }

    async fn resolve_bank(&mut self, name: &str) -> Result<ResolvedBank, DbError> {
        let mut savepoint = self.tx.begin().await?;
        let result = resolve_bank_in(&mut savepoint, name).await;
        finish_savepoint(savepoint, result).await
    }

    async fn insert_review(
        &mut self,
        bank_id: i64,
        review: &CleanedReview,
    ) -> Result<(), DbError> {
        let mut savepoint = self.tx.begin().await?;
        let result = sqlx::query(
            "INSERT INTO reviews (bank_id, review_text, rating, review_date) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(bank_id)
        .bind(&review.review)
        .bind(i16::from(review.rating))
        .bind(review.date)
        .execute(&mut *savepoint)
        .await
        .map(|_| ());
        finish_savepoint(savepoint, result).await
    }
}

async fn resolve_bank_in(conn: &mut PgConnection, name: &str) -> Result<ResolvedBank, sqlx::Error> {
    let inserted: Option<i64> = sqlx::query_scalar(
        "INSERT INTO banks (bank_name) VALUES ($1) \
         ON CONFLICT (bank_name) DO NOTHING \
         RETURNING bank_id",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(id) = inserted {
        return Ok(ResolvedBank { id, created: true });
    }

    let id: i64 = sqlx::query_scalar("SELECT bank_id FROM banks WHERE bank_name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok(ResolvedBank { id, created: false })
}

async fn finish_savepoint<T>(
    savepoint: Transaction<'_, Postgres>,
    result: Result<T, sqlx::Error>,
) -> Result<T, DbError> {
    match result {
        Ok(value) => {
            savepoint.commit().await?;
            Ok(value)
        }
        Err(e) => {
            savepoint.rollback().await?;
            Err(e.into())
        }
    }
}

/// Load `reviews` in a single transaction.
///
/// The schema is created if absent. Rows that fail to insert are counted in
/// [`LoadReport::failed`] without aborting the run. The transaction is
/// committed when every row has been attempted; on a run-level failure it is
/// rolled back and nothing from this run remains.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction cannot be opened or committed,
/// or if schema creation fails.
pub async fn load_cleaned_reviews(
    pool: &PgPool,
    reviews: &[CleanedReview],
) -> Result<LoadReport, DbError> {
    let mut sink = PgSink {
        tx: pool.begin().await?,
    };

    match load_into(&mut sink, reviews).await {
        Ok(report) => {
            sink.tx.commit().await?;
            tracing::info!(
                attempted = report.attempted,
                inserted = report.inserted,
                failed = report.failed,
                banks_created = report.banks_created,
                "load committed"
            );
            Ok(report)
        }
        Err(e) => {
            if let Err(rollback_err) = sink.tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback after failed load also failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
#[path = "load_test.rs"]
mod tests;
