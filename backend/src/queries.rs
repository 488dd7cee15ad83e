use rocket::async_trait;
use shared::models::*;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::store::{StoreError, VoteRecordStore};

#[derive(sqlx::FromRow)]
struct VoteRow {
    user_identifier: String,
    word: String,
    vote: Choice,
    voted_at: OffsetDateTime,
}

impl From<VoteRow> for VoteRecord {
    fn from(row: VoteRow) -> Self {
        VoteRecord {
            user_id: row.user_identifier,
            word: row.word,
            choice: row.vote,
            timestamp: row.voted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TallyRow {
    word: String,
    yes_votes: i64,
    no_votes: i64,
}

/// Postgres-backed vote records. The `(user_identifier, word)` primary key
/// enforces one vote per pair.
#[derive(Clone)]
pub struct PgVoteStore {
    pool: PgPool,
}

impl PgVoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRecordStore for PgVoteStore {
    async fn get(&self, user: &str, word: &str) -> Result<Option<VoteRecord>, StoreError> {
        let row = sqlx::query_as::<_, VoteRow>(
            "SELECT user_identifier, word, vote, voted_at
             FROM word_votes WHERE user_identifier = $1 AND word = $2",
        )
        .bind(user)
        .bind(word)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        Ok(row.map(VoteRecord::from))
    }

    async fn put(&self, record: &VoteRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO word_votes (user_identifier, word, vote, voted_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_identifier, word)
             DO UPDATE SET vote = EXCLUDED.vote, voted_at = EXCLUDED.voted_at",
        )
        .bind(&record.user_id)
        .bind(&record.word)
        .bind(record.choice)
        .bind(record.timestamp)
        .execute(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        Ok(())
    }

    async fn delete(&self, user: &str, word: &str) -> Result<Option<VoteRecord>, StoreError> {
        let row = sqlx::query_as::<_, VoteRow>(
            "DELETE FROM word_votes WHERE user_identifier = $1 AND word = $2
             RETURNING user_identifier, word, vote, voted_at",
        )
        .bind(user)
        .bind(word)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        Ok(row.map(VoteRecord::from))
    }

    async fn aggregate_all(&self) -> Result<Vec<AggregateEntry>, StoreError> {
        let rows = sqlx::query_as::<_, TallyRow>(
            "SELECT word,
                    COUNT(*) FILTER (WHERE vote = 1) AS yes_votes,
                    COUNT(*) FILTER (WHERE vote = 0) AS no_votes
             FROM word_votes
             GROUP BY word
             ORDER BY word",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        Ok(rows
            .into_iter()
            .map(|row| AggregateEntry {
                word: row.word,
                yes_votes: u64::try_from(row.yes_votes).unwrap_or(0),
                no_votes: u64::try_from(row.no_votes).unwrap_or(0),
            })
            .collect())
    }

    async fn list_for_user(&self, user: &str) -> Result<Vec<VoteRecord>, StoreError> {
        let rows = sqlx::query_as::<_, VoteRow>(
            "SELECT user_identifier, word, vote, voted_at
             FROM word_votes WHERE user_identifier = $1
             ORDER BY word",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::unavailable)?;

        Ok(rows.into_iter().map(VoteRecord::from).collect())
    }
}
