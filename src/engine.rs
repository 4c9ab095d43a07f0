use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::questions::QuestionBank;
use crate::store::{StateStore, StorageError};

/// Share of correct answers that makes a participant a high scorer.
pub const HIGH_SCORE_PERCENT: u8 = 80;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("the quiz is already complete")]
    AlreadyComplete,
}

/// A question ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub index: u32,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { correct_answer: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Next(Prompt),
    Complete { correct_count: u32, total: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub verdict: Verdict,
    pub question_index: u32,
    pub correct_count: u32,
    pub step: Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizProgress {
    NotStarted,
    InProgress(u32),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub has_record: bool,
    pub correct_count: u32,
    pub total_users: usize,
    pub total_questions: u32,
    pub high_scorers: u64,
}

/// Per-user linear walk through the question bank.
///
/// All progress lives in the injected [`StateStore`]; the engine itself holds
/// no per-user state.
#[derive(Clone)]
pub struct QuizEngine {
    store: Arc<dyn StateStore>,
    questions: QuestionBank,
}

impl QuizEngine {
    pub fn new(store: Arc<dyn StateStore>, questions: QuestionBank) -> Self {
        Self { store, questions }
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.questions
    }

    /// Reset the user to the first question, discarding any running quiz.
    #[instrument(level = "debug", skip(self))]
    pub async fn start_quiz(&self, user_id: i64) -> Result<Prompt, QuizError> {
        self.store.upsert(user_id, 0, 0).await?;
        log::info!("{user_id} started a new quiz");
        self.emit_question(0).ok_or(QuizError::AlreadyComplete)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn submit_answer(
        &self,
        user_id: i64,
        selected: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        let question_index = self.store.get_question_index(user_id).await?;
        let mut correct_count = self.store.get_correct_count(user_id).await?;

        let question = self
            .questions
            .get(question_index)
            .ok_or(QuizError::AlreadyComplete)?;

        let verdict = if question.is_correct(selected) {
            correct_count += 1;
            Verdict::Correct
        } else {
            Verdict::Incorrect {
                correct_answer: question.correct_answer().to_owned(),
            }
        };
        log::info!(
            "{user_id} answered '{selected}' to question #{}: {:?}",
            question_index + 1,
            verdict
        );

        let question_index = question_index + 1;
        self.store
            .upsert(user_id, question_index, correct_count)
            .await?;

        let step = match self.emit_question(question_index) {
            Some(prompt) => Step::Next(prompt),
            None => {
                log::info!(
                    "{user_id} completed the quiz with {correct_count}/{}",
                    self.questions.len()
                );
                Step::Complete {
                    correct_count,
                    total: self.questions.len(),
                }
            }
        };

        Ok(AnswerOutcome {
            verdict,
            question_index,
            correct_count,
            step,
        })
    }

    /// The question at `index`, or `None` past the last one.
    pub fn emit_question(&self, index: u32) -> Option<Prompt> {
        self.questions.get(index).map(|question| Prompt {
            index,
            text: question.text().to_owned(),
            options: question.options().to_vec(),
        })
    }

    pub async fn progress(&self, user_id: i64) -> Result<QuizProgress, QuizError> {
        let progress = match self.store.find(user_id).await? {
            None => QuizProgress::NotStarted,
            Some(record) if record.question_index >= self.questions.len() => {
                QuizProgress::Complete
            }
            Some(record) => QuizProgress::InProgress(record.question_index),
        };
        Ok(progress)
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_statistics(&self, user_id: i64) -> Result<Statistics, QuizError> {
        let users = self.store.list_user_ids().await?;
        let has_record = users.contains(&user_id);
        let correct_count = if has_record {
            self.store.get_correct_count(user_id).await?
        } else {
            0
        };
        let high_scorers = self
            .store
            .count_users_at_or_above(HIGH_SCORE_PERCENT, self.questions.len())
            .await?;

        Ok(Statistics {
            has_record,
            correct_count,
            total_users: users.len(),
            total_questions: self.questions.len(),
            high_scorers,
        })
    }
}
