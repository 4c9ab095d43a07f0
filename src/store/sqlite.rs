use std::collections::BTreeSet;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{QuizRecord, StateStore, StorageError};

fn to_u32(value: i64) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| StorageError::OutOfRange(value))
}

/// `quiz_state` table in a SQLite database.
///
/// Every operation checks a connection out of the pool and hands it back when
/// the query future completes or is dropped.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the database at `database_url`, creating the file if needed.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        log::debug!("Connected to {database_url}");
        Ok(Self { pool })
    }

    /// Create the `quiz_state` table if it does not exist yet.
    pub async fn create_table(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS quiz_state (
                user_id INTEGER PRIMARY KEY,
                question_index INTEGER NOT NULL,
                correct_answers INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn upsert(
        &self,
        user_id: i64,
        question_index: u32,
        correct_count: u32,
    ) -> Result<(), StorageError> {
        log::debug!("Saving state of {user_id}: index {question_index}, correct {correct_count}");
        sqlx::query(
            r"
            INSERT INTO quiz_state (user_id, question_index, correct_answers)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                question_index = excluded.question_index,
                correct_answers = excluded.correct_answers
            ",
        )
        .bind(user_id)
        .bind(i64::from(question_index))
        .bind(i64::from(correct_count))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_question_index(&self, user_id: i64) -> Result<u32, StorageError> {
        let index: Option<i64> =
            sqlx::query_scalar("SELECT question_index FROM quiz_state WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        index.map_or(Ok(0), to_u32)
    }

    async fn get_correct_count(&self, user_id: i64) -> Result<u32, StorageError> {
        let correct: Option<i64> =
            sqlx::query_scalar("SELECT correct_answers FROM quiz_state WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        correct.map_or(Ok(0), to_u32)
    }

    async fn list_user_ids(&self) -> Result<BTreeSet<i64>, StorageError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT user_id FROM quiz_state")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn count_users_at_or_above(
        &self,
        percent: u8,
        total_questions: u32,
    ) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM quiz_state WHERE correct_answers * 100 >= ?1 * ?2",
        )
        .bind(i64::from(percent))
        .bind(i64::from(total_questions))
        .fetch_one(&self.pool)
        .await?;
        u64::try_from(count).map_err(|_| StorageError::OutOfRange(count))
    }

    async fn find(&self, user_id: i64) -> Result<Option<QuizRecord>, StorageError> {
        let row = sqlx::query(
            "SELECT question_index, correct_answers FROM quiz_state WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(QuizRecord {
                user_id,
                question_index: to_u32(row.try_get("question_index")?)?,
                correct_count: to_u32(row.try_get("correct_answers")?)?,
            })),
            None => Ok(None),
        }
    }
}
