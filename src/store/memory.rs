use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{meets_threshold, QuizRecord, StateStore, StorageError};

/// Process-local store, lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<HashMap<i64, QuizRecord>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn upsert(
        &self,
        user_id: i64,
        question_index: u32,
        correct_count: u32,
    ) -> Result<(), StorageError> {
        let mut guard = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        guard.insert(
            user_id,
            QuizRecord {
                user_id,
                question_index,
                correct_count,
            },
        );
        Ok(())
    }

    async fn get_question_index(&self, user_id: i64) -> Result<u32, StorageError> {
        Ok(self
            .find(user_id)
            .await?
            .map_or(0, |record| record.question_index))
    }

    async fn get_correct_count(&self, user_id: i64) -> Result<u32, StorageError> {
        Ok(self
            .find(user_id)
            .await?
            .map_or(0, |record| record.correct_count))
    }

    async fn list_user_ids(&self) -> Result<BTreeSet<i64>, StorageError> {
        let guard = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.keys().copied().collect())
    }

    async fn count_users_at_or_above(
        &self,
        percent: u8,
        total_questions: u32,
    ) -> Result<u64, StorageError> {
        let guard = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        let count = guard
            .values()
            .filter(|record| meets_threshold(record.correct_count, percent, total_questions))
            .count();
        Ok(count as u64)
    }

    async fn find(&self, user_id: i64) -> Result<Option<QuizRecord>, StorageError> {
        let guard = self.records.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.get(&user_id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_reads_as_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.get_question_index(42).await.unwrap(), 0);
        assert_eq!(store.get_correct_count(42).await.unwrap(), 0);
        assert_eq!(store.find(42).await.unwrap(), None);
        assert!(store.list_user_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_whole_record() {
        let store = InMemoryStore::new();
        store.upsert(7, 3, 2).await.unwrap();
        store.upsert(7, 1, 0).await.unwrap();

        assert_eq!(store.get_question_index(7).await.unwrap(), 1);
        assert_eq!(store.get_correct_count(7).await.unwrap(), 0);
        assert_eq!(store.list_user_ids().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn counts_high_scorers() {
        let store = InMemoryStore::new();
        for (user_id, correct) in [3, 2, 1, 0, 3].into_iter().enumerate() {
            store.upsert(user_id as i64, 3, correct).await.unwrap();
        }

        assert_eq!(store.count_users_at_or_above(80, 3).await.unwrap(), 2);
        assert_eq!(store.count_users_at_or_above(50, 3).await.unwrap(), 3);
    }
}
