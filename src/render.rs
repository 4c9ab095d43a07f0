//! User-facing texts.

use crate::engine::{Prompt, Statistics, Verdict};

pub(crate) const WELCOME: &str = "Welcome to the quiz!";
pub(crate) const LETS_BEGIN: &str = "Let's begin the quiz!";
pub(crate) const LAST_QUESTION: &str = "That was the last question. The quiz is over!";
pub(crate) const ALREADY_COMPLETE: &str =
    "You have already finished the quiz. Press \"Start quiz\" to try again.";
pub(crate) const INVALID_INPUT: &str = "Unable to handle the message. Enter /help to see usages.";

pub(crate) fn question(prompt: &Prompt) -> String {
    format!("Question #{}\n{}", prompt.index + 1, prompt.text)
}

pub(crate) fn your_answer(selected: &str) -> String {
    format!("Your answer: {selected}.")
}

pub(crate) fn verdict(verdict: &Verdict) -> String {
    match verdict {
        Verdict::Correct => "Correct!".to_string(),
        Verdict::Incorrect { correct_answer } => {
            format!("Wrong. The correct answer is: {correct_answer}.")
        }
    }
}

pub(crate) fn score(correct_count: u32, total: u32) -> String {
    format!("You answered {correct_count} of {total} questions correctly.")
}

/// Lines of the statistics reply, one message each.
pub(crate) fn statistics(stats: &Statistics) -> Vec<String> {
    if stats.total_users == 0 {
        return vec!["You are the first participant of the quiz.".to_string()];
    }

    let mut lines = Vec::with_capacity(3);
    if stats.has_record {
        lines.push(score(stats.correct_count, stats.total_questions));
    } else {
        lines.push("You have not taken the quiz yet.".to_string());
    }
    lines.push(format!("Total participants: {}.", stats.total_users));
    lines.push(format!(
        "Participants who answered at least {}% correctly: {}.",
        crate::engine::HIGH_SCORE_PERCENT,
        stats.high_scorers
    ));
    lines
}
