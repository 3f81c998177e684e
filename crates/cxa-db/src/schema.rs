//! The two-table review schema.

use sqlx::PgConnection;

/// Longest review text the `reviews` table accepts.
pub const MAX_REVIEW_TEXT_CHARS: usize = 4000;

const CREATE_BANKS: &str = "CREATE TABLE IF NOT EXISTS banks (\
     bank_id BIGSERIAL PRIMARY KEY, \
     bank_name VARCHAR(255) NOT NULL UNIQUE, \
     created_date TIMESTAMPTZ NOT NULL DEFAULT NOW())";

const CREATE_REVIEWS: &str = "CREATE TABLE IF NOT EXISTS reviews (\
     review_id BIGSERIAL PRIMARY KEY, \
     bank_id BIGINT NOT NULL REFERENCES banks (bank_id), \
     review_text VARCHAR(4000) NOT NULL, \
     rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5), \
     review_date DATE NOT NULL, \
     created_date TIMESTAMPTZ NOT NULL DEFAULT NOW())";

/// Create `banks` and `reviews` if they do not exist yet.
///
/// Safe to run on every load; existing tables and rows are left untouched.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if either statement fails.
pub async fn create_schema(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_BANKS).execute(&mut *conn).await?;
    sqlx::query(CREATE_REVIEWS).execute(&mut *conn).await?;
    Ok(())
}
