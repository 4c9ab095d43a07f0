use std::collections::BTreeSet;

use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

/// Errors surfaced by state store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("stored value {0} is out of range")]
    OutOfRange(i64),

    #[error("state store lock poisoned")]
    Poisoned,
}

/// Persisted progress of a single user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizRecord {
    pub user_id: i64,
    pub question_index: u32,
    pub correct_count: u32,
}

/// Durable mapping from a user id to `(question_index, correct_count)`.
///
/// Stores know nothing about quizzes; absent users read as zero.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Insert the record for `user_id` or replace it entirely.
    async fn upsert(
        &self,
        user_id: i64,
        question_index: u32,
        correct_count: u32,
    ) -> Result<(), StorageError>;

    /// Stored question index, `0` when the user has no record.
    async fn get_question_index(&self, user_id: i64) -> Result<u32, StorageError>;

    /// Stored correct answer count, `0` when the user has no record.
    async fn get_correct_count(&self, user_id: i64) -> Result<u32, StorageError>;

    async fn list_user_ids(&self) -> Result<BTreeSet<i64>, StorageError>;

    /// Number of users with `correct_count >= percent / 100 * total_questions`.
    async fn count_users_at_or_above(
        &self,
        percent: u8,
        total_questions: u32,
    ) -> Result<u64, StorageError>;

    async fn find(&self, user_id: i64) -> Result<Option<QuizRecord>, StorageError>;
}

/// Integer form of `correct >= percent / 100 * total`.
pub(crate) fn meets_threshold(correct_count: u32, percent: u8, total_questions: u32) -> bool {
    u64::from(correct_count) * 100 >= u64::from(percent) * u64::from(total_questions)
}
