use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

/// Telegram rejects callback data longer than this many bytes.
pub const MAX_OPTION_BYTES: usize = 64;

#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question list is empty")]
    Empty,

    #[error("question #{number} has {options} option(s), at least 2 are required")]
    TooFewOptions { number: usize, options: usize },

    #[error(
        "question #{number} has a {bytes}-byte option, at most {} bytes fit in a button",
        MAX_OPTION_BYTES
    )]
    OptionTooLong { number: usize, bytes: usize },

    #[error("{0} questions do not fit in a quiz")]
    TooMany(usize),

    #[error("question #{number} marks option {correct_option} as correct but has only {options}")]
    CorrectOptionOutOfRange {
        number: usize,
        correct_option: usize,
        options: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuestionError> {
        let question = Self {
            text: text.into(),
            options,
            correct_option,
        };
        question.validate(1)?;
        Ok(question)
    }

    fn validate(&self, number: usize) -> Result<(), QuestionError> {
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                number,
                options: self.options.len(),
            });
        }
        if let Some(option) = self
            .options
            .iter()
            .find(|option| option.len() > MAX_OPTION_BYTES)
        {
            return Err(QuestionError::OptionTooLong {
                number,
                bytes: option.len(),
            });
        }
        if self.correct_option >= self.options.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                number,
                correct_option: self.correct_option,
                options: self.options.len(),
            });
        }
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_option]
    }

    /// Answers are matched by option text, so duplicated texts are all correct.
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_answer() == selected
    }
}

/// Ordered, immutable list of questions shared by every quiz run.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Arc<[Question]>,
    len: u32,
}

fn question_count(len: usize) -> Result<u32, QuestionError> {
    u32::try_from(len).map_err(|_| QuestionError::TooMany(len))
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, QuestionError> {
        if questions.is_empty() {
            return Err(QuestionError::Empty);
        }
        let len = question_count(questions.len())?;
        for (i, question) in questions.iter().enumerate() {
            question.validate(i + 1)?;
        }
        Ok(Self {
            questions: questions.into(),
            len,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, QuestionError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuestionError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| QuestionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json(&json)?;
        log::info!("Loaded {} questions from {}", bank.len(), path.display());
        Ok(bank)
    }

    pub fn get(&self, index: u32) -> Option<&Question> {
        self.questions.get(index as usize)
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
