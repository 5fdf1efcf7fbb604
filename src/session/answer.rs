use serde::{Deserialize, Serialize};

use crate::bank::question::Question;

/// One entry of the answer ledger. `is_correct` is only set together with
/// `selected_option_index`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: u64,
    pub selected_option_index: Option<usize>,
    pub is_correct: Option<bool>,
}

impl UserAnswer {
    pub fn unanswered(question: &Question) -> Self {
        Self {
            question_id: question.id,
            selected_option_index: None,
            is_correct: None,
        }
    }

    /// Returns false when the index is outside the question's options.
    pub fn record(&mut self, question: &Question, option_index: usize) -> bool {
        if option_index >= question.options.len() {
            return false;
        }
        self.selected_option_index = Some(option_index);
        self.is_correct = Some(question.is_correct(option_index));
        true
    }

    pub fn is_answered(&self) -> bool {
        self.selected_option_index.is_some()
    }

    pub fn counts_as_correct(&self) -> bool {
        self.is_correct == Some(true)
    }
}

pub fn correct_count(answers: &[UserAnswer]) -> usize {
    answers.iter().filter(|a| a.counts_as_correct()).count()
}

pub fn answered_count(answers: &[UserAnswer]) -> usize {
    answers.iter().filter(|a| a.is_answered()).count()
}
